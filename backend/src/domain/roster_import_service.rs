//! Admin import flow: parse an uploaded document, then save the payload.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::{info, warn};

use crate::domain::ports::{
    ParsePreview, RosterDocument, RosterImportCommand, RosterImportRepository,
    RosterImportRepositoryError, RosterParser, RosterParserError, RosterRepository,
    SaveRosterRequest,
};
use crate::domain::roster_query_service::map_roster_error;
use crate::domain::{
    AccessContext, Error, ImportPlan, ImportReport, ImportTarget, MonthYear, ParsedPayload,
    ScheduleId,
};

/// Implements [`RosterImportCommand`].
#[derive(Clone)]
pub struct RosterImportService<P: ?Sized, R: ?Sized, W: ?Sized> {
    parser: Arc<P>,
    roster: Arc<R>,
    writer: Arc<W>,
}

impl<P: ?Sized, R: ?Sized, W: ?Sized> RosterImportService<P, R, W> {
    /// Create the service from the parser, the read repository and the import
    /// repository.
    pub fn new(parser: Arc<P>, roster: Arc<R>, writer: Arc<W>) -> Self {
        Self {
            parser,
            roster,
            writer,
        }
    }
}

fn map_parser_error(error: RosterParserError) -> Error {
    match error {
        RosterParserError::NotConfigured => {
            Error::service_unavailable("roster parser URL is not configured")
        }
        RosterParserError::Transport { message } | RosterParserError::Timeout { message } => {
            Error::service_unavailable(format!("roster parser unavailable: {message}"))
        }
        RosterParserError::Rejected { status, message } => {
            Error::invalid_request(message).with_details(json!({ "parserStatus": status }))
        }
        RosterParserError::Decode { message } => {
            Error::invalid_request(format!("roster parser returned invalid JSON: {message}"))
        }
    }
}

fn schedule_exists(period: MonthYear, schedule_id: Option<ScheduleId>) -> Error {
    Error::conflict(format!(
        "a schedule for {period} already exists; confirm overwrite to replace it"
    ))
    .with_details(json!({
        "code": "schedule_exists",
        "scheduleId": schedule_id,
        "month": period.month(),
        "year": period.year(),
    }))
}

fn map_import_error(error: RosterImportRepositoryError) -> Error {
    match error {
        RosterImportRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("roster storage unavailable: {message}"))
        }
        RosterImportRepositoryError::Query { message } => {
            Error::storage(format!("roster import failed: {message}"))
        }
        RosterImportRepositoryError::ScheduleExists { month, year } => {
            match MonthYear::new(month, year) {
                Ok(period) => schedule_exists(period, None),
                Err(_) => Error::conflict(format!("a schedule for {month}/{year} already exists")),
            }
        }
    }
}

fn validate_payload(value: &serde_json::Value) -> Result<(ParsedPayload, usize), Error> {
    let payload = ParsedPayload::from_value(value)
        .map_err(|err| Error::invalid_request(format!("invalid roster payload: {err}")))?;
    let count = payload.count_assignments();
    if count == 0 {
        return Err(Error::invalid_request(
            "the roster payload contains no assignments",
        ));
    }
    Ok((payload, count))
}

#[async_trait]
impl<P, R, W> RosterImportCommand for RosterImportService<P, R, W>
where
    P: RosterParser + ?Sized,
    R: RosterRepository + ?Sized,
    W: RosterImportRepository + ?Sized,
{
    async fn parse_document(
        &self,
        access: &AccessContext,
        document: RosterDocument,
    ) -> Result<ParsePreview, Error> {
        access.require_admin()?;
        if document.bytes.is_empty() {
            return Err(Error::invalid_request(
                "select a PDF or CSV file before parsing",
            ));
        }
        let preview = self
            .parser
            .parse(&document)
            .await
            .map_err(map_parser_error)?;
        let (payload, assignment_count) = validate_payload(&preview)?;
        info!(
            filename = %document.filename,
            period = %payload.metadata.period,
            assignment_count,
            "roster document parsed"
        );
        Ok(ParsePreview {
            preview,
            assignment_count,
            period: payload.metadata.period,
        })
    }

    async fn save(
        &self,
        access: &AccessContext,
        request: SaveRosterRequest,
    ) -> Result<ImportReport, Error> {
        access.require_admin()?;
        let (payload, expected) = validate_payload(&request.payload)?;
        let period = payload.metadata.period;
        let existing = self
            .roster
            .find_schedule(period)
            .await
            .map_err(map_roster_error)?;
        let target = match (existing, request.overwrite) {
            (Some(schedule), false) => return Err(schedule_exists(period, Some(schedule.id))),
            (Some(schedule), true) => ImportTarget::Overwrite(schedule.id),
            (None, _) => ImportTarget::Create,
        };
        let plan = ImportPlan::build(&payload, target);
        let report = self.writer.apply(&plan).await.map_err(map_import_error)?;
        if !report.unresolved_matriculas.is_empty() {
            warn!(
                period = %period,
                unresolved = report.unresolved_matriculas.len(),
                "roster import skipped rows with unresolved matriculas"
            );
        }
        info!(
            schedule_id = %report.schedule_id,
            period = %period,
            outcome = ?report.outcome,
            assignments_written = report.assignments_written,
            expected,
            "roster import committed"
        );
        Ok(report)
    }
}
