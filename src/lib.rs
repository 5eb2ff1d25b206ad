//! Client library for a WhatsApp Business style messaging gateway.
//!
//! Messages (text, media, interactive, template) are modeled as closed
//! tagged unions, validated against the gateway's structural rules, and
//! only then serialized and sent. Every validation failure surfaces as a
//! typed [`WabaError`] before any network I/O happens.

pub mod cloudapi;
mod client;
mod config;
mod error;
pub mod template;
mod validate;

pub use client::WabaClient;
pub use cloudapi::{
    AudioContent, DocumentContent, ImageContent, InteractiveContent, InteractiveHeader,
    MediaKind, MediaLocator, MessageBody, MessageRequest, MessageStatus, ReplyButton,
    TemplateRequest, TextContent, VideoContent,
};
pub use config::{DeveloperOptions, LogFormat, LogLevel, LogTopic, WabaConfig};
pub use error::{PhoneField, WabaError};
pub use template::{
    validate_components, ButtonSubType, ComponentKind, TemplateComponent, TemplateParameter,
};
pub use validate::{is_valid_language_code, is_valid_phone_number};
