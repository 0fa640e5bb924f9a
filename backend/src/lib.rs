//! Shift roster service: calendar, employee and coworker views over monthly
//! schedules, plus an admin import flow fed by a remote document parser.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
#[cfg(feature = "test-support")]
pub mod test_support;

pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;
