use crate::cloudapi::MediaLocator;
use crate::error::WabaError;
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;

pub const MAX_QUICK_REPLY_BUTTONS: usize = 10;
const SINGLE_BUTTON_LIMIT: usize = 1;

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ButtonSubType {
    QuickReply,
    PhoneNumber,
    Url,
    CopyCode,
}

impl fmt::Display for ButtonSubType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ButtonSubType::QuickReply => f.write_str("quick_reply"),
            ButtonSubType::PhoneNumber => f.write_str("phone_number"),
            ButtonSubType::Url => f.write_str("url"),
            ButtonSubType::CopyCode => f.write_str("copy_code"),
        }
    }
}

/// Non-button component kinds, used in error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentKind {
    Header,
    Body,
    Footer,
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComponentKind::Header => f.write_str("header"),
            ComponentKind::Body => f.write_str("body"),
            ComponentKind::Footer => f.write_str("footer"),
        }
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TemplateParameter {
    Text { text: String },
    Image { image: MediaLocator },
    Video { video: MediaLocator },
    Document { document: MediaLocator },
}

impl TemplateParameter {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text { text: value.into() }
    }

    pub fn image(locator: MediaLocator) -> Self {
        Self::Image { image: locator }
    }

    pub fn video(locator: MediaLocator) -> Self {
        Self::Video { video: locator }
    }

    pub fn document(locator: MediaLocator) -> Self {
        Self::Document { document: locator }
    }
}

/// One building block of a template message.
///
/// Constructors are pure and perform no validation: a component can be
/// well-formed on its own and still be illegal next to its siblings, so
/// all structural rules are checked in [`validate_components`] over the
/// finished list.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TemplateComponent {
    Header {
        parameters: Vec<TemplateParameter>,
    },
    Body {
        parameters: Vec<TemplateParameter>,
    },
    Footer {
        parameters: Vec<TemplateParameter>,
    },
    Button {
        sub_type: ButtonSubType,
        index: u8,
        parameters: Vec<TemplateParameter>,
    },
}

impl TemplateComponent {
    pub fn header(parameters: Vec<TemplateParameter>) -> Self {
        Self::Header { parameters }
    }

    pub fn header_text(text: impl Into<String>) -> Self {
        Self::Header {
            parameters: vec![TemplateParameter::text(text)],
        }
    }

    pub fn header_image(locator: MediaLocator) -> Self {
        Self::Header {
            parameters: vec![TemplateParameter::image(locator)],
        }
    }

    pub fn header_video(locator: MediaLocator) -> Self {
        Self::Header {
            parameters: vec![TemplateParameter::video(locator)],
        }
    }

    pub fn header_document(locator: MediaLocator) -> Self {
        Self::Header {
            parameters: vec![TemplateParameter::document(locator)],
        }
    }

    pub fn body(parameters: Vec<TemplateParameter>) -> Self {
        Self::Body { parameters }
    }

    /// Body component with one text parameter per value, in order.
    pub fn body_text<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Body {
            parameters: values.into_iter().map(TemplateParameter::text).collect(),
        }
    }

    pub fn footer(parameters: Vec<TemplateParameter>) -> Self {
        Self::Footer { parameters }
    }

    pub fn footer_text<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Footer {
            parameters: values.into_iter().map(TemplateParameter::text).collect(),
        }
    }

    pub fn quick_reply_button(index: u8, label: impl Into<String>) -> Self {
        Self::button(ButtonSubType::QuickReply, index, label)
    }

    pub fn phone_number_button(index: u8, phone: impl Into<String>) -> Self {
        Self::button(ButtonSubType::PhoneNumber, index, phone)
    }

    pub fn url_button(index: u8, url: impl Into<String>) -> Self {
        Self::button(ButtonSubType::Url, index, url)
    }

    pub fn copy_code_button(index: u8, code: impl Into<String>) -> Self {
        Self::button(ButtonSubType::CopyCode, index, code)
    }

    pub fn button(sub_type: ButtonSubType, index: u8, text: impl Into<String>) -> Self {
        Self::Button {
            sub_type,
            index,
            parameters: vec![TemplateParameter::text(text)],
        }
    }
}

struct ButtonView<'a> {
    sub_type: ButtonSubType,
    index: u8,
    parameters: &'a [TemplateParameter],
}

/// Checks a finished component list against the gateway's structural rules.
/// The first violation encountered is reported; the limits (10 quick replies,
/// one each of phone_number/url/copy_code, exclusivity between groups) are
/// the gateway's own business rules.
pub fn validate_components(components: &[TemplateComponent]) -> Result<(), WabaError> {
    let mut buttons = Vec::new();

    for component in components {
        let (kind, parameters) = match component {
            TemplateComponent::Button {
                sub_type,
                index,
                parameters,
            } => {
                buttons.push(ButtonView {
                    sub_type: *sub_type,
                    index: *index,
                    parameters,
                });
                continue;
            }
            TemplateComponent::Header { parameters } => (ComponentKind::Header, parameters),
            TemplateComponent::Body { parameters } => (ComponentKind::Body, parameters),
            TemplateComponent::Footer { parameters } => (ComponentKind::Footer, parameters),
        };

        if parameters.is_empty() {
            return Err(WabaError::EmptyComponentParameters { component: kind });
        }
    }

    let count_of = |sub_type: ButtonSubType| {
        buttons
            .iter()
            .filter(|button| button.sub_type == sub_type)
            .count()
    };

    let quick_reply = count_of(ButtonSubType::QuickReply);
    if quick_reply > MAX_QUICK_REPLY_BUTTONS {
        return Err(WabaError::TooManyButtons {
            sub_type: ButtonSubType::QuickReply,
            count: quick_reply,
            limit: MAX_QUICK_REPLY_BUTTONS,
        });
    }

    let singles = [
        ButtonSubType::PhoneNumber,
        ButtonSubType::Url,
        ButtonSubType::CopyCode,
    ];
    for sub_type in singles {
        let count = count_of(sub_type);
        if count > SINGLE_BUTTON_LIMIT {
            return Err(WabaError::TooManyButtons {
                sub_type,
                count,
                limit: SINGLE_BUTTON_LIMIT,
            });
        }
    }

    // Uniqueness is checked before sub-type exclusivity: two buttons that
    // collide on an index are reported as a duplicate even when their
    // sub-types could not legally coexist either. Indices must be unique
    // across all button components but need not be sequential or start at
    // zero.
    let mut indices = HashSet::new();
    for button in &buttons {
        if !indices.insert(button.index) {
            return Err(WabaError::DuplicateButtonIndex {
                index: button.index,
            });
        }
    }

    let mut texts = HashSet::new();
    for button in &buttons {
        if let Some(TemplateParameter::Text { text }) = button.parameters.first() {
            if !texts.insert(text.as_str()) {
                return Err(WabaError::DuplicateButtonText { text: text.clone() });
            }
        }
    }

    if quick_reply > 0 {
        for sub_type in singles {
            if count_of(sub_type) > 0 {
                return Err(WabaError::IncompatibleButtonTypes {
                    first: ButtonSubType::QuickReply,
                    second: sub_type,
                });
            }
        }
    }

    if count_of(ButtonSubType::CopyCode) > 0 {
        for sub_type in [ButtonSubType::PhoneNumber, ButtonSubType::Url] {
            if count_of(sub_type) > 0 {
                return Err(WabaError::IncompatibleButtonTypes {
                    first: ButtonSubType::CopyCode,
                    second: sub_type,
                });
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn body_text_keeps_parameter_order() {
        let component = TemplateComponent::body_text(["John Doe", "ORD-12345"]);
        assert_eq!(
            serde_json::to_value(&component).unwrap(),
            json!({
                "type": "body",
                "parameters": [
                    {"type": "text", "text": "John Doe"},
                    {"type": "text", "text": "ORD-12345"}
                ]
            })
        );
    }

    #[test]
    fn button_component_wire_shape() {
        let component = TemplateComponent::quick_reply_button(2, "Track order");
        assert_eq!(
            serde_json::to_value(&component).unwrap(),
            json!({
                "type": "button",
                "sub_type": "quick_reply",
                "index": 2,
                "parameters": [{"type": "text", "text": "Track order"}]
            })
        );
    }

    #[test]
    fn header_media_wire_shape() {
        let component = TemplateComponent::header_image(MediaLocator::id("media-9"));
        assert_eq!(
            serde_json::to_value(&component).unwrap(),
            json!({
                "type": "header",
                "parameters": [{"type": "image", "image": {"id": "media-9"}}]
            })
        );
    }

    #[test]
    fn empty_non_button_component_is_rejected() {
        let err = validate_components(&[TemplateComponent::header(vec![])]).unwrap_err();
        assert!(matches!(
            err,
            WabaError::EmptyComponentParameters {
                component: ComponentKind::Header
            }
        ));

        let err = validate_components(&[
            TemplateComponent::body_text(["x"]),
            TemplateComponent::footer(vec![]),
        ])
        .unwrap_err();
        assert!(matches!(
            err,
            WabaError::EmptyComponentParameters {
                component: ComponentKind::Footer
            }
        ));
    }

    #[test]
    fn ten_quick_replies_pass_eleven_fail() {
        let ten: Vec<_> = (0..10)
            .map(|i| TemplateComponent::quick_reply_button(i, format!("option {i}")))
            .collect();
        assert!(validate_components(&ten).is_ok());

        let eleven: Vec<_> = (0..11)
            .map(|i| TemplateComponent::quick_reply_button(i, format!("option {i}")))
            .collect();
        let err = validate_components(&eleven).unwrap_err();
        assert!(matches!(
            err,
            WabaError::TooManyButtons {
                sub_type: ButtonSubType::QuickReply,
                count: 11,
                limit: 10,
            }
        ));
    }

    #[test]
    fn single_use_sub_types_are_limited_to_one() {
        let err = validate_components(&[
            TemplateComponent::url_button(0, "https://e.com/a"),
            TemplateComponent::url_button(1, "https://e.com/b"),
        ])
        .unwrap_err();
        assert!(matches!(
            err,
            WabaError::TooManyButtons {
                sub_type: ButtonSubType::Url,
                count: 2,
                limit: 1,
            }
        ));
    }

    #[test]
    fn quick_reply_excludes_every_other_sub_type() {
        for other in [
            TemplateComponent::phone_number_button(1, "14155550123"),
            TemplateComponent::url_button(1, "https://e.com"),
            TemplateComponent::copy_code_button(1, "SAVE10"),
        ] {
            let err =
                validate_components(&[TemplateComponent::quick_reply_button(0, "Yes"), other])
                    .unwrap_err();
            assert!(matches!(
                err,
                WabaError::IncompatibleButtonTypes {
                    first: ButtonSubType::QuickReply,
                    ..
                }
            ));
        }
    }

    #[test]
    fn copy_code_excludes_phone_and_url() {
        let err = validate_components(&[
            TemplateComponent::copy_code_button(0, "SAVE10"),
            TemplateComponent::phone_number_button(1, "14155550123"),
        ])
        .unwrap_err();
        assert!(matches!(
            err,
            WabaError::IncompatibleButtonTypes {
                first: ButtonSubType::CopyCode,
                second: ButtonSubType::PhoneNumber,
            }
        ));
    }

    #[test]
    fn url_and_phone_may_coexist() {
        assert!(validate_components(&[
            TemplateComponent::url_button(0, "https://e.com"),
            TemplateComponent::phone_number_button(1, "14155550123"),
        ])
        .is_ok());
    }

    #[test]
    fn duplicate_indices_fail_across_sub_types() {
        let err = validate_components(&[
            TemplateComponent::body_text(["John Doe", "ORD-12345"]),
            TemplateComponent::quick_reply_button(0, "Yes"),
            TemplateComponent::url_button(0, "https://e.com"),
        ])
        .unwrap_err();
        assert!(matches!(err, WabaError::DuplicateButtonIndex { index: 0 }));
    }

    #[test]
    fn indices_need_not_be_contiguous() {
        assert!(validate_components(&[
            TemplateComponent::quick_reply_button(3, "A"),
            TemplateComponent::quick_reply_button(7, "B"),
        ])
        .is_ok());
    }

    #[test]
    fn duplicate_button_text_fails() {
        let err = validate_components(&[
            TemplateComponent::quick_reply_button(0, "Same"),
            TemplateComponent::quick_reply_button(1, "Same"),
        ])
        .unwrap_err();
        assert!(matches!(err, WabaError::DuplicateButtonText { text } if text == "Same"));
    }

    #[test]
    fn full_component_list_passes() {
        assert!(validate_components(&[
            TemplateComponent::header_image(MediaLocator::link("https://e.com/h.png")),
            TemplateComponent::body_text(["John Doe", "ORD-12345"]),
            TemplateComponent::footer_text(["See you soon"]),
            TemplateComponent::quick_reply_button(0, "Track"),
            TemplateComponent::quick_reply_button(1, "Cancel"),
        ])
        .is_ok());
    }
}
