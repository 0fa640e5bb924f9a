//! Tests for HTTP error mapping.

use super::*;
use actix_web::body::to_bytes;
use rstest::rstest;
use serde_json::json;

const TRACE_ID: &str = "00000000-0000-0000-0000-000000000000";

async fn body_of(error: &Error) -> (StatusCode, Option<String>, Error) {
    let response = ResponseError::error_response(error);
    let status = response.status();
    let header = response
        .headers()
        .get(TRACE_ID_HEADER)
        .map(|value| value.to_str().expect("ascii header").to_owned());
    let bytes = to_bytes(response.into_body())
        .await
        .expect("reading response body succeeds");
    let payload = serde_json::from_slice(&bytes).expect("error JSON");
    (status, header, payload)
}

#[rstest]
#[case(Error::invalid_request("bad"), StatusCode::BAD_REQUEST)]
#[case(Error::unauthorized("login required"), StatusCode::UNAUTHORIZED)]
#[case(Error::forbidden("only administrators"), StatusCode::FORBIDDEN)]
#[case(Error::not_found("missing"), StatusCode::NOT_FOUND)]
#[case(Error::conflict("schedule exists"), StatusCode::CONFLICT)]
#[case(Error::service_unavailable("parser down"), StatusCode::SERVICE_UNAVAILABLE)]
#[case(Error::storage("duplicate key"), StatusCode::INTERNAL_SERVER_ERROR)]
#[case(Error::internal("boom"), StatusCode::INTERNAL_SERVER_ERROR)]
fn status_code_matches_error_code(#[case] error: Error, #[case] expected: StatusCode) {
    assert_eq!(ResponseError::status_code(&error), expected);
}

#[rstest]
#[actix_web::test]
async fn internal_errors_are_redacted_but_keep_trace_id() {
    let error = Error::internal("failed to persist session: cookie too large")
        .with_trace_id(TRACE_ID)
        .with_details(json!({ "sql": "select" }));
    let (status, header, payload) = body_of(&error).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(header.as_deref(), Some(TRACE_ID));
    assert_eq!(payload.message(), REDACTED_MESSAGE);
    assert_eq!(payload.trace_id(), Some(TRACE_ID));
    assert!(payload.details().is_none());
}

#[rstest]
#[actix_web::test]
async fn storage_errors_keep_the_database_message() {
    let error = Error::storage("roster import failed: violates foreign key constraint")
        .with_trace_id(TRACE_ID);
    let (status, header, payload) = body_of(&error).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(header.as_deref(), Some(TRACE_ID));
    assert_eq!(payload.code(), ErrorCode::StorageError);
    assert_eq!(
        payload.message(),
        "roster import failed: violates foreign key constraint"
    );
}

#[rstest]
#[actix_web::test]
async fn conflict_details_reach_the_client() {
    let details = json!({ "code": "schedule_exists", "month": 3, "year": 2024 });
    let error = Error::conflict("Schedule 03/2024 already exists.").with_details(details.clone());
    let (status, header, payload) = body_of(&error).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(header.is_none());
    assert_eq!(payload.details(), Some(&details));
}

#[rstest]
fn actix_errors_become_internal() {
    let actix = actix_web::error::ErrorBadRequest("raw");
    let error = Error::from(actix);
    assert_eq!(error.code(), ErrorCode::InternalError);
    assert_eq!(error.message(), REDACTED_MESSAGE);
}
