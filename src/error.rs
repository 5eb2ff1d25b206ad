use crate::cloudapi::MediaKind;
use crate::template::{ButtonSubType, ComponentKind};
use std::fmt;
use thiserror::Error;

/// Which side of the exchange a phone number belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhoneField {
    Sender,
    Recipient,
}

impl fmt::Display for PhoneField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PhoneField::Sender => f.write_str("sender"),
            PhoneField::Recipient => f.write_str("recipient"),
        }
    }
}

#[derive(Error, Debug)]
pub enum WabaError {
    #[error("invalid {field} phone number: {number:?}")]
    InvalidPhoneNumber { field: PhoneField, number: String },

    #[error("invalid language code {code:?}, expected a tag like \"en_US\"")]
    InvalidLanguageCode { code: String },

    #[error("{media} content requires exactly one of \"link\" or \"id\"")]
    MissingContentLocator { media: MediaKind },

    #[error("{component} component has no parameters")]
    EmptyComponentParameters { component: ComponentKind },

    #[error("too many {sub_type} buttons: {count} given, at most {limit} allowed")]
    TooManyButtons {
        sub_type: ButtonSubType,
        count: usize,
        limit: usize,
    },

    #[error("{first} buttons cannot be combined with {second} buttons")]
    IncompatibleButtonTypes {
        first: ButtonSubType,
        second: ButtonSubType,
    },

    #[error("duplicate button index {index}")]
    DuplicateButtonIndex { index: u8 },

    #[error("duplicate button text {text:?}")]
    DuplicateButtonText { text: String },

    #[error("interactive messages take 1 to 3 buttons, got {count}")]
    InteractiveButtonCountOutOfRange { count: usize },

    #[error("duplicate interactive button id {id:?}")]
    DuplicateButtonId { id: String },

    #[error("duplicate interactive button title {title:?}")]
    DuplicateButtonTitle { title: String },

    #[error("gateway returned status {status}: {message} (code {code}: {details})")]
    Api {
        status: u16,
        code: i64,
        message: String,
        details: String,
    },

    #[error("network error: {0}")]
    Network(#[source] reqwest::Error),

    #[error("internal error: {0}")]
    Internal(Box<dyn std::error::Error + Send + Sync>),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages_name_the_offending_value() {
        let err = WabaError::InvalidPhoneNumber {
            field: PhoneField::Recipient,
            number: "0123".into(),
        };
        assert_eq!(err.to_string(), "invalid recipient phone number: \"0123\"");

        let err = WabaError::TooManyButtons {
            sub_type: ButtonSubType::QuickReply,
            count: 11,
            limit: 10,
        };
        assert_eq!(
            err.to_string(),
            "too many quick_reply buttons: 11 given, at most 10 allowed"
        );

        let err = WabaError::InvalidLanguageCode {
            code: "english".into(),
        };
        assert_eq!(
            err.to_string(),
            "invalid language code \"english\", expected a tag like \"en_US\""
        );
    }
}
