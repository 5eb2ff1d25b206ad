use crate::cloudapi::{
    ApiErrorBody, AudioContent, DocumentContent, ImageContent, InteractiveContent, MediaLocator,
    MessageBody, MessageRequest, MessageStatus, TemplateRequest, TextContent, VideoContent,
};
use crate::config::{LogTopic, WabaConfig};
use crate::error::WabaError;
use crate::template::TemplateComponent;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION};
use serde::Serialize;
use tracing::{debug, error};

/// Client for the messaging gateway. Owns a configuration snapshot and the
/// HTTP connection pool built from it.
pub struct WabaClient {
    config: WabaConfig,
    client: reqwest::Client,
}

impl WabaClient {
    pub fn new(config: WabaConfig) -> Result<Self, WabaError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", config.api_key))
                .map_err(|e| WabaError::Internal(e.into()))?,
        );
        for (name, value) in &config.headers {
            headers.insert(
                HeaderName::from_bytes(name.as_bytes()).map_err(|e| WabaError::Internal(e.into()))?,
                HeaderValue::from_str(value).map_err(|e| WabaError::Internal(e.into()))?,
            );
        }

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .default_headers(headers)
            .build()
            .map_err(|e| WabaError::Internal(e.into()))?;

        Ok(Self { config, client })
    }

    /// Replaces the configuration by rebuilding the whole client, transport
    /// included. Calls issued on the old client keep its snapshot.
    pub fn with_config(self, config: WabaConfig) -> Result<Self, WabaError> {
        Self::new(config)
    }

    pub fn config(&self) -> &WabaConfig {
        &self.config
    }

    /// Formats and sends a message from the configured sender. Validation
    /// failures surface before any request is made.
    pub async fn send(
        &self,
        to: impl Into<String>,
        body: MessageBody,
    ) -> Result<Vec<MessageStatus>, WabaError> {
        let request = MessageRequest::new(self.config.sender.clone(), to, body)?;
        self.execute("messages", &request).await
    }

    pub async fn send_text(
        &self,
        to: impl Into<String>,
        body: impl Into<String>,
        preview_url: bool,
    ) -> Result<Vec<MessageStatus>, WabaError> {
        let mut content = TextContent::new(body);
        content.preview_url = preview_url;
        self.send(to, MessageBody::Text(content)).await
    }

    pub async fn send_image(
        &self,
        to: impl Into<String>,
        locator: MediaLocator,
        caption: Option<String>,
    ) -> Result<Vec<MessageStatus>, WabaError> {
        self.send(to, MessageBody::Image(ImageContent { locator, caption }))
            .await
    }

    pub async fn send_document(
        &self,
        to: impl Into<String>,
        locator: MediaLocator,
        filename: impl Into<String>,
        caption: Option<String>,
    ) -> Result<Vec<MessageStatus>, WabaError> {
        self.send(
            to,
            MessageBody::Document(DocumentContent {
                locator,
                filename: filename.into(),
                caption,
            }),
        )
        .await
    }

    pub async fn send_video(
        &self,
        to: impl Into<String>,
        locator: MediaLocator,
        caption: impl Into<String>,
    ) -> Result<Vec<MessageStatus>, WabaError> {
        self.send(
            to,
            MessageBody::Video(VideoContent {
                locator,
                caption: caption.into(),
            }),
        )
        .await
    }

    pub async fn send_audio(
        &self,
        to: impl Into<String>,
        locator: MediaLocator,
    ) -> Result<Vec<MessageStatus>, WabaError> {
        self.send(to, MessageBody::Audio(AudioContent { locator }))
            .await
    }

    pub async fn send_interactive(
        &self,
        to: impl Into<String>,
        content: InteractiveContent,
    ) -> Result<Vec<MessageStatus>, WabaError> {
        self.send(to, MessageBody::Interactive(content)).await
    }

    /// Validates the component list and language code, then sends the
    /// template message.
    pub async fn send_template(
        &self,
        to: impl Into<String>,
        name: impl Into<String>,
        lang_code: impl Into<String>,
        components: Vec<TemplateComponent>,
    ) -> Result<Vec<MessageStatus>, WabaError> {
        let request = TemplateRequest::new(
            self.config.sender.clone(),
            to,
            name,
            lang_code,
            components,
        )?;
        self.execute("messages", &request).await
    }

    async fn execute<T: Serialize>(
        &self,
        path: &str,
        body: &T,
    ) -> Result<Vec<MessageStatus>, WabaError> {
        let url = format!(
            "{}/{}",
            self.config.base_url.as_str().trim_end_matches('/'),
            path
        );
        let options = &self.config.developer_options;

        if options.log_enabled(LogTopic::Request) {
            if let Ok(payload) = serde_json::to_string(body) {
                debug!(%url, payload, "gateway request");
            }
        }

        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(classify_transport_error)?;

        let status = response.status();
        let text = response.text().await.map_err(classify_transport_error)?;

        if options.log_enabled(LogTopic::Debug) {
            debug!(%url, status = status.as_u16(), bytes = text.len(), "gateway response received");
        }

        if status.is_success() {
            if options.log_enabled(LogTopic::Response) {
                debug!(status = status.as_u16(), body = %text, "gateway response");
            }
            serde_json::from_str(&text).map_err(|e| WabaError::Internal(e.into()))
        } else {
            let err = match serde_json::from_str::<ApiErrorBody>(&text) {
                Ok(parsed) => WabaError::Api {
                    status: status.as_u16(),
                    code: parsed.error.code,
                    message: parsed.message,
                    details: parsed.error.details,
                },
                Err(e) => WabaError::Internal(e.into()),
            };
            if options.log_enabled(LogTopic::Error) {
                error!(status = status.as_u16(), error = %err, "gateway request failed");
            }
            Err(err)
        }
    }
}

/// Failures before a response arrives are network errors; everything local
/// (request construction, body handling) is internal.
fn classify_transport_error(e: reqwest::Error) -> WabaError {
    if e.is_builder() || e.is_decode() {
        WabaError::Internal(e.into())
    } else {
        WabaError::Network(e)
    }
}
