//! Reqwest-backed parser client.
//!
//! This adapter owns transport details only: URL normalisation, the multipart
//! upload, timeout and HTTP status mapping, and JSON decoding.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, StatusCode, Url};
use serde_json::Value;

use crate::domain::ports::{RosterDocument, RosterParser, RosterParserError};

const LEGACY_SUFFIXES: [&str; 2] = ["/parse-ai/", "/parse-ai"];
const PARSE_SUFFIX: &str = "/parse";
const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// The configured parser URL could not be used.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid parser URL {url:?}: {message}")]
pub struct ParserUrlError {
    /// URL after normalisation.
    pub url: String,
    /// Parse failure.
    pub message: String,
}

/// Normalise a configured parser URL.
///
/// Blank values mean "not configured". A trailing `/parse-ai` or
/// `/parse-ai/` (any case) is rewritten to `/parse`.
///
/// ```rust,ignore
/// let url = effective_parser_url("https://parser.example/api/parse-ai/")?;
/// assert_eq!(url.map(|u| u.to_string()), Some("https://parser.example/api/parse".into()));
/// ```
pub fn effective_parser_url(raw: &str) -> Result<Option<Url>, ParserUrlError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let lowered = trimmed.to_ascii_lowercase();
    let rewritten = LEGACY_SUFFIXES
        .iter()
        .find(|suffix| lowered.ends_with(*suffix))
        .map(|suffix| format!("{}{PARSE_SUFFIX}", &trimmed[..trimmed.len() - suffix.len()]))
        .unwrap_or_else(|| trimmed.to_owned());

    Url::parse(&rewritten)
        .map(Some)
        .map_err(|error| ParserUrlError {
            url: rewritten,
            message: error.to_string(),
        })
}

/// Parser adapter posting one document per request to a fixed endpoint.
pub struct HttpRosterParser {
    client: Client,
    endpoint: Url,
}

impl HttpRosterParser {
    /// Build an adapter with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(endpoint: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, endpoint })
    }

    /// Endpoint requests are sent to.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl RosterParser for HttpRosterParser {
    async fn parse(&self, document: &RosterDocument) -> Result<Value, RosterParserError> {
        let form = Form::new().part("file", file_part(document)?);
        let response = self
            .client
            .post(self.endpoint.clone())
            .header(reqwest::header::ACCEPT, "application/json")
            .multipart(form)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }
        decode_body(body.as_ref())
    }
}

fn file_part(document: &RosterDocument) -> Result<Part, RosterParserError> {
    let mime = document
        .content_type
        .as_deref()
        .unwrap_or(DEFAULT_CONTENT_TYPE);
    Part::bytes(document.bytes.clone())
        .file_name(document.filename.clone())
        .mime_str(mime)
        .map_err(|error| RosterParserError::transport(format!("invalid content type: {error}")))
}

fn decode_body(body: &[u8]) -> Result<Value, RosterParserError> {
    serde_json::from_slice(body).map_err(|error| RosterParserError::decode(error.to_string()))
}

fn map_transport_error(error: reqwest::Error) -> RosterParserError {
    if error.is_timeout() {
        RosterParserError::timeout(error.to_string())
    } else {
        RosterParserError::transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> RosterParserError {
    let text = body_text(body);
    let message = if text.is_empty() {
        format!("parser returned status {}", status.as_u16())
    } else {
        text
    };

    match status {
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
            RosterParserError::timeout(message)
        }
        _ => RosterParserError::rejected(status.as_u16(), message),
    }
}

/// The parser's error text, verbatim apart from surrounding whitespace.
fn body_text(body: &[u8]) -> String {
    String::from_utf8_lossy(body).trim().to_owned()
}
