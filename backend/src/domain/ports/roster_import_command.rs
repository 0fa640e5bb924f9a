//! Driving port for the admin import flow: parse preview, then save.

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use crate::domain::{AccessContext, Error, ImportReport, MonthYear};

use super::RosterDocument;

/// Parser output shown to the administrator before saving.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsePreview {
    /// Raw parser JSON, sent back unchanged on save.
    pub preview: Value,
    /// Day entries found in the payload.
    pub assignment_count: usize,
    /// Period the payload covers.
    pub period: MonthYear,
}

/// Save request carrying a previewed payload.
#[derive(Debug, Clone, PartialEq)]
pub struct SaveRosterRequest {
    /// Parser JSON.
    pub payload: Value,
    /// Replace an existing schedule for the same period.
    pub overwrite: bool,
}

/// Admin-only import use-cases.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RosterImportCommand: Send + Sync {
    /// Parse an uploaded document into a preview.
    async fn parse_document(
        &self,
        access: &AccessContext,
        document: RosterDocument,
    ) -> Result<ParsePreview, Error>;

    /// Validate and persist a payload.
    async fn save(
        &self,
        access: &AccessContext,
        request: SaveRosterRequest,
    ) -> Result<ImportReport, Error>;
}
