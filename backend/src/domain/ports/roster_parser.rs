//! Port for the remote document parser.

use async_trait::async_trait;
use serde_json::Value;

use super::define_port_error;

define_port_error! {
    /// Errors raised by parser adapters.
    pub enum RosterParserError {
        /// No parser URL is configured.
        NotConfigured => "roster parser URL is not configured",
        /// The request could not be sent or the response not read.
        Transport { message: String } => "roster parser transport failed: {message}",
        /// The parser did not answer in time.
        Timeout { message: String } => "roster parser timed out: {message}",
        /// The parser answered with a non-success status.
        Rejected { status: u16, message: String } => "{message}",
        /// The success body was not JSON.
        Decode { message: String } => "roster parser returned invalid JSON: {message}",
    }
}

/// Uploaded roster file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterDocument {
    /// File name sent with the multipart part.
    pub filename: String,
    /// MIME type of the upload, when known.
    pub content_type: Option<String>,
    /// File contents.
    pub bytes: Vec<u8>,
}

/// Converts a roster document into parser JSON.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RosterParser: Send + Sync {
    /// Send `document` to the parser and return its JSON body.
    async fn parse(&self, document: &RosterDocument) -> Result<Value, RosterParserError>;
}

/// Parser used when no URL is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureRosterParser;

#[async_trait]
impl RosterParser for FixtureRosterParser {
    async fn parse(&self, _document: &RosterDocument) -> Result<Value, RosterParserError> {
        Err(RosterParserError::not_configured())
    }
}
