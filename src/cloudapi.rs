use crate::error::{PhoneField, WabaError};
use crate::template::{self, TemplateComponent};
use crate::validate::{check_language_code, check_phone_number};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::HashSet;
use std::fmt;

pub const MAX_INTERACTIVE_BUTTONS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Document,
    Video,
    Audio,
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaKind::Image => f.write_str("image"),
            MediaKind::Document => f.write_str("document"),
            MediaKind::Video => f.write_str("video"),
            MediaKind::Audio => f.write_str("audio"),
        }
    }
}

/// Media content is addressed either by a remote URL or by an id previously
/// returned from the gateway's upload endpoint, never both.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MediaLocator {
    Link(String),
    Id(String),
}

impl MediaLocator {
    pub fn link(url: impl Into<String>) -> Self {
        Self::Link(url.into())
    }

    pub fn id(media_id: impl Into<String>) -> Self {
        Self::Id(media_id.into())
    }

    /// Runtime XOR check for callers that hold `link` and `id` as two
    /// optionals. Both set and neither set are rejected alike.
    pub fn from_parts(
        media: MediaKind,
        link: Option<String>,
        id: Option<String>,
    ) -> Result<Self, WabaError> {
        match (link, id) {
            (Some(link), None) => Ok(Self::Link(link)),
            (None, Some(id)) => Ok(Self::Id(id)),
            _ => Err(WabaError::MissingContentLocator { media }),
        }
    }
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct TextContent {
    pub body: String,
    pub preview_url: bool,
}

impl TextContent {
    pub fn new(body: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            preview_url: false,
        }
    }

    pub fn with_preview_url(mut self) -> Self {
        self.preview_url = true;
        self
    }
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ImageContent {
    #[serde(flatten)]
    pub locator: MediaLocator,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct DocumentContent {
    #[serde(flatten)]
    pub locator: MediaLocator,
    pub filename: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct VideoContent {
    #[serde(flatten)]
    pub locator: MediaLocator,
    pub caption: String,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct AudioContent {
    #[serde(flatten)]
    pub locator: MediaLocator,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct TextBody {
    pub text: String,
}

impl TextBody {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum InteractiveHeader {
    Text { text: String },
    Image { image: MediaLocator },
    Video { video: MediaLocator },
    Document { document: MediaLocator },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplyButton {
    pub id: String,
    pub title: String,
}

impl ReplyButton {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
        }
    }
}

// On the wire every interactive button is wrapped as
// {"type": "reply", "reply": {"id": ..., "title": ...}}.
fn serialize_reply_buttons<S>(buttons: &[ReplyButton], serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    #[derive(Serialize)]
    struct Reply<'a> {
        id: &'a str,
        title: &'a str,
    }

    #[derive(Serialize)]
    #[serde(tag = "type", rename_all = "lowercase")]
    enum Wire<'a> {
        Reply { reply: Reply<'a> },
    }

    serializer.collect_seq(buttons.iter().map(|b| Wire::Reply {
        reply: Reply {
            id: &b.id,
            title: &b.title,
        },
    }))
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct InteractiveContent {
    pub body: TextBody,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header: Option<InteractiveHeader>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub footer: Option<TextBody>,
    #[serde(serialize_with = "serialize_reply_buttons")]
    pub buttons: Vec<ReplyButton>,
}

impl InteractiveContent {
    pub fn new(body: impl Into<String>, buttons: Vec<ReplyButton>) -> Self {
        Self {
            body: TextBody::new(body),
            header: None,
            footer: None,
            buttons,
        }
    }

    pub fn with_header(mut self, header: InteractiveHeader) -> Self {
        self.header = Some(header);
        self
    }

    pub fn with_footer(mut self, footer: impl Into<String>) -> Self {
        self.footer = Some(TextBody::new(footer));
        self
    }

    pub(crate) fn validate_buttons(&self) -> Result<(), WabaError> {
        let count = self.buttons.len();
        if count == 0 || count > MAX_INTERACTIVE_BUTTONS {
            return Err(WabaError::InteractiveButtonCountOutOfRange { count });
        }

        let mut ids = HashSet::new();
        let mut titles = HashSet::new();
        for button in &self.buttons {
            if !ids.insert(button.id.as_str()) {
                return Err(WabaError::DuplicateButtonId {
                    id: button.id.clone(),
                });
            }
            if !titles.insert(button.title.as_str()) {
                return Err(WabaError::DuplicateButtonTitle {
                    title: button.title.clone(),
                });
            }
        }
        Ok(())
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum MessageBody {
    Text(TextContent),
    Image(ImageContent),
    Document(DocumentContent),
    Video(VideoContent),
    Audio(AudioContent),
    Interactive(InteractiveContent),
}

impl MessageBody {
    pub fn type_name(&self) -> &'static str {
        match self {
            MessageBody::Text(_) => "text",
            MessageBody::Image(_) => "image",
            MessageBody::Document(_) => "document",
            MessageBody::Video(_) => "video",
            MessageBody::Audio(_) => "audio",
            MessageBody::Interactive(_) => "interactive",
        }
    }
}

/// A fully validated, ready-to-send message. Serialization is a pure
/// function of the value, so formatting the same message twice yields
/// byte-identical JSON.
#[derive(Debug, Clone, PartialEq)]
pub struct MessageRequest {
    pub from: String,
    pub to: String,
    pub body: MessageBody,
}

impl MessageRequest {
    pub fn new(
        from: impl Into<String>,
        to: impl Into<String>,
        body: MessageBody,
    ) -> Result<Self, WabaError> {
        let from = from.into();
        let to = to.into();
        check_phone_number(PhoneField::Sender, &from)?;
        check_phone_number(PhoneField::Recipient, &to)?;

        if let MessageBody::Interactive(interactive) = &body {
            interactive.validate_buttons()?;
        }

        Ok(Self { from, to, body })
    }
}

impl Serialize for MessageRequest {
    // The gateway capitalizes the recipient field ("To") but not the sender,
    // and names the content key after the type tag. Neither is expressible
    // with derive, so the envelope is written out by hand.
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(4))?;
        map.serialize_entry("from", &self.from)?;
        map.serialize_entry("To", &self.to)?;
        map.serialize_entry("type", self.body.type_name())?;
        map.serialize_entry(self.body.type_name(), &self.body)?;
        map.end()
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct TemplateBody {
    pub name: String,
    pub lang_code: String,
    pub components: Vec<TemplateComponent>,
}

/// Template sends use their own envelope with a lowercase recipient field.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct TemplateRequest {
    pub from: String,
    pub to: String,
    pub template: TemplateBody,
}

impl TemplateRequest {
    pub fn new(
        from: impl Into<String>,
        to: impl Into<String>,
        name: impl Into<String>,
        lang_code: impl Into<String>,
        components: Vec<TemplateComponent>,
    ) -> Result<Self, WabaError> {
        let from = from.into();
        let to = to.into();
        let lang_code = lang_code.into();
        check_phone_number(PhoneField::Sender, &from)?;
        check_phone_number(PhoneField::Recipient, &to)?;
        check_language_code(&lang_code)?;
        template::validate_components(&components)?;

        Ok(Self {
            from,
            to,
            template: TemplateBody {
                name: name.into(),
                lang_code,
                components,
            },
        })
    }
}

/// One entry per queued message in a successful gateway response.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct MessageStatus {
    pub message_id: String,
    pub status: String,
    pub timestamp: String,
    pub to: String,
}

#[derive(Deserialize, Debug)]
pub struct ApiErrorBody {
    pub message: String,
    pub error: ApiErrorDetail,
}

#[derive(Deserialize, Debug)]
pub struct ApiErrorDetail {
    pub code: i64,
    pub details: String,
}
