//! HTTP request handlers for the covenant schedule API.
//!
//! This module contains the handler functions for all API endpoints.

use std::time::Instant;

use axum::{
    Json, Router,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, patch, post},
};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::models::{Covenant, CovenantInput, ScheduleStatus, Transaction, TransactionInput};
use crate::store::ScheduleStore;

use super::request::{CovenantQuery, GenerateRequest, ScheduleQuery, StatusUpdateRequest};
use super::response::{ApiError, ApiErrorResponse, GenerateResponse, StatusUpdateResponse};
use super::state::AppState;

type ApiResult = Result<Response, ApiErrorResponse>;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/schedules/generate", post(generate_handler))
        .route(
            "/schedules",
            post(create_schedules_handler).get(list_schedules_handler),
        )
        .route(
            "/schedules/:schedule_id",
            patch(update_status_handler).delete(delete_schedule_handler),
        )
        .route("/transactions", post(create_transaction_handler))
        .route("/transactions/:transaction_id", get(get_transaction_handler))
        .route(
            "/covenants",
            post(create_covenants_handler).get(list_covenants_handler),
        )
        .with_state(state)
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, "application/json")],
        Json(body),
    )
        .into_response()
}

/// Unwraps a JSON body, mapping extractor rejections to API errors.
fn parse_json<T>(
    payload: Result<Json<T>, JsonRejection>,
    correlation_id: Uuid,
) -> Result<T, ApiErrorResponse> {
    let rejection = match payload {
        Ok(Json(body)) => return Ok(body),
        Err(rejection) => rejection,
    };

    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            let body_text = err.body_text();
            warn!(
                correlation_id = %correlation_id,
                error = %body_text,
                "JSON data error"
            );
            if body_text.contains("missing field") {
                ApiError::validation_error(body_text)
            } else {
                ApiError::malformed_json(body_text)
            }
        }
        JsonRejection::JsonSyntaxError(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "JSON syntax error"
            );
            ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
        }
        JsonRejection::MissingJsonContentType(_) => {
            ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
        }
        _ => ApiError::malformed_json("Failed to parse request body"),
    };
    Err(ApiErrorResponse::bad_request(error))
}

fn log_failure(correlation_id: Uuid, error: &ApiErrorResponse, action: &str) {
    warn!(
        correlation_id = %correlation_id,
        status = error.status.as_u16(),
        code = %error.error.code,
        message = %error.error.message,
        "{} failed",
        action
    );
}

/// Handler for POST /schedules/generate.
///
/// Returns the schedules the generator would produce without storing them.
async fn generate_handler(
    State(state): State<AppState>,
    payload: Result<Json<GenerateRequest>, JsonRejection>,
) -> ApiResult {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing schedule preview request");

    let result = async {
        let (transaction, covenants) = parse_json(payload, correlation_id)?.into_domain()?;

        let start_time = Instant::now();
        let schedules = state.generator().generate(&transaction, &covenants)?;
        info!(
            correlation_id = %correlation_id,
            transaction_id = %transaction.transaction_id,
            schedule_count = schedules.len(),
            duration_us = start_time.elapsed().as_micros() as u64,
            "Schedule preview generated"
        );

        Ok::<_, ApiErrorResponse>(json_response(
            StatusCode::OK,
            GenerateResponse::new(transaction.transaction_id, schedules),
        ))
    }
    .await;

    result.inspect_err(|e| log_failure(correlation_id, e, "Schedule preview"))
}

/// Handler for POST /schedules.
///
/// Generates schedules and stores the transaction, its covenants and the
/// generated entries in one database transaction.
async fn create_schedules_handler(
    State(state): State<AppState>,
    payload: Result<Json<GenerateRequest>, JsonRejection>,
) -> ApiResult {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing schedule creation request");

    let result = async {
        let (transaction, covenants) = parse_json(payload, correlation_id)?.into_domain()?;

        let generator = state.generator();
        let schedules = generator.generate(&transaction, &covenants)?;

        let mut store = state.store().lock().await;
        store.save_generated(
            &transaction,
            &covenants,
            &schedules,
            Some(generator.calendar().holidays()),
        )?;
        info!(
            correlation_id = %correlation_id,
            transaction_id = %transaction.transaction_id,
            schedule_count = schedules.len(),
            "Schedules stored"
        );

        Ok::<_, ApiErrorResponse>(json_response(
            StatusCode::CREATED,
            GenerateResponse::new(transaction.transaction_id, schedules),
        ))
    }
    .await;

    result.inspect_err(|e| log_failure(correlation_id, e, "Schedule creation"))
}

/// Handler for GET /schedules.
async fn list_schedules_handler(
    State(state): State<AppState>,
    Query(query): Query<ScheduleQuery>,
) -> ApiResult {
    let store = state.store().lock().await;
    let schedules = store.get_schedules(query.covenant_id.as_deref())?;
    Ok(json_response(StatusCode::OK, schedules))
}

/// Handler for PATCH /schedules/:schedule_id.
async fn update_status_handler(
    State(state): State<AppState>,
    Path(schedule_id): Path<String>,
    payload: Result<Json<StatusUpdateRequest>, JsonRejection>,
) -> ApiResult {
    let correlation_id = Uuid::new_v4();

    let result = async {
        let request = parse_json(payload, correlation_id)?;
        let status: ScheduleStatus = request.status.parse()?;

        state
            .store()
            .lock()
            .await
            .update_schedule_status(&schedule_id, status)?;
        info!(
            correlation_id = %correlation_id,
            schedule_id = %schedule_id,
            status = %status,
            "Schedule status updated"
        );

        Ok::<_, ApiErrorResponse>(json_response(
            StatusCode::OK,
            StatusUpdateResponse {
                schedule_id: schedule_id.clone(),
                status,
            },
        ))
    }
    .await;

    result.inspect_err(|e| log_failure(correlation_id, e, "Status update"))
}

/// Handler for DELETE /schedules/:schedule_id.
async fn delete_schedule_handler(
    State(state): State<AppState>,
    Path(schedule_id): Path<String>,
) -> ApiResult {
    state.store().lock().await.delete_schedule(&schedule_id)?;
    info!(schedule_id = %schedule_id, "Schedule deleted");
    Ok(StatusCode::NO_CONTENT.into_response())
}

/// Handler for POST /transactions.
async fn create_transaction_handler(
    State(state): State<AppState>,
    payload: Result<Json<TransactionInput>, JsonRejection>,
) -> ApiResult {
    let correlation_id = Uuid::new_v4();

    let result = async {
        let transaction = Transaction::try_from(parse_json(payload, correlation_id)?)?;
        state.store().lock().await.save_transaction(&transaction)?;
        info!(
            correlation_id = %correlation_id,
            transaction_id = %transaction.transaction_id,
            "Transaction stored"
        );
        Ok::<_, ApiErrorResponse>(json_response(StatusCode::CREATED, transaction))
    }
    .await;

    result.inspect_err(|e| log_failure(correlation_id, e, "Transaction creation"))
}

/// Handler for GET /transactions/:transaction_id.
async fn get_transaction_handler(
    State(state): State<AppState>,
    Path(transaction_id): Path<String>,
) -> ApiResult {
    let store = state.store().lock().await;
    match store.get_transaction(&transaction_id)? {
        Some(transaction) => Ok(json_response(StatusCode::OK, transaction)),
        None => Err(ApiErrorResponse::new(
            StatusCode::NOT_FOUND,
            ApiError::transaction_not_found(&transaction_id),
        )),
    }
}

/// Handler for POST /covenants.
async fn create_covenants_handler(
    State(state): State<AppState>,
    payload: Result<Json<Vec<CovenantInput>>, JsonRejection>,
) -> ApiResult {
    let correlation_id = Uuid::new_v4();

    let result = async {
        let covenants = parse_json(payload, correlation_id)?
            .into_iter()
            .map(Covenant::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        state.store().lock().await.save_covenants(&covenants)?;
        info!(
            correlation_id = %correlation_id,
            covenant_count = covenants.len(),
            "Covenants stored"
        );
        Ok::<_, ApiErrorResponse>(json_response(StatusCode::CREATED, covenants))
    }
    .await;

    result.inspect_err(|e| log_failure(correlation_id, e, "Covenant creation"))
}

/// Handler for GET /covenants.
async fn list_covenants_handler(
    State(state): State<AppState>,
    Query(query): Query<CovenantQuery>,
) -> ApiResult {
    let store = state.store().lock().await;
    let covenants = store.get_covenants(query.transaction_id.as_deref())?;
    Ok(json_response(StatusCode::OK, covenants))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::AdjustmentDirection;
    use crate::schedule::ScheduleGenerator;
    use crate::store::SqliteScheduleStore;
    use axum::body::Body;
    use axum::http::Request;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    fn create_test_state() -> AppState {
        let generator = ScheduleGenerator::new([], AdjustmentDirection::Forward);
        let store = SqliteScheduleStore::open_in_memory().unwrap();
        AppState::new(generator, store)
    }

    fn valid_request() -> Value {
        json!({
            "transaction": {
                "transaction_id": "TXN-001",
                "name": "Corporate Credit Facility",
                "start_date": "2025-01-15",
                "end_date": "2027-01-15"
            },
            "covenants": [{
                "covenant_id": "COV-001",
                "transaction_id": "TXN-001",
                "description": "Monthly Financial Statements",
                "frequency": "monthly",
                "owner_email": "finance@company.com"
            }]
        })
    }

    async fn send(router: Router, method: &str, uri: &str, body: Option<Value>) -> Response {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header("Content-Type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        router.oneshot(request).await.unwrap()
    }

    async fn body_json(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_generate_preview_returns_200() {
        let router = create_router(create_test_state());
        let response = send(router, "POST", "/schedules/generate", Some(valid_request())).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get("content-type").unwrap(),
            "application/json"
        );

        let body = body_json(response).await;
        assert_eq!(body["schedule_count"], 24);
        assert_eq!(body["schedules"][0]["schedule_id"], "SCH-COV-001-001");
        assert_eq!(body["schedules"][0]["due_date"], "2025-02-17");
        assert_eq!(body["schedules"][0]["status"], "pending");
    }

    #[tokio::test]
    async fn test_preview_does_not_store() {
        let state = create_test_state();
        let router = create_router(state.clone());
        send(router, "POST", "/schedules/generate", Some(valid_request())).await;

        let store = state.store().lock().await;
        assert!(store.get_schedules(None).unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_malformed_json_returns_400() {
        let router = create_router(create_test_state());
        let response = router
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/schedules/generate")
                    .header("Content-Type", "application/json")
                    .body(Body::from("{invalid json"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["code"], "MALFORMED_JSON");
    }

    #[tokio::test]
    async fn test_missing_transaction_returns_validation_error() {
        let router = create_router(create_test_state());
        let response = send(
            router,
            "POST",
            "/schedules/generate",
            Some(json!({"covenants": []})),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_bad_frequency_returns_invalid_covenant() {
        let mut request = valid_request();
        request["covenants"][0]["frequency"] = json!("fortnightly");

        let router = create_router(create_test_state());
        let response = send(router, "POST", "/schedules/generate", Some(request)).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["code"], "INVALID_COVENANT");
        assert_eq!(body["details"], "frequency");
    }

    #[tokio::test]
    async fn test_unknown_status_returns_400() {
        let router = create_router(create_test_state());
        let response = send(
            router,
            "PATCH",
            "/schedules/SCH-COV-001-001",
            Some(json!({"status": "archived"})),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["code"], "INVALID_STATUS");
    }

    #[tokio::test]
    async fn test_missing_transaction_returns_404() {
        let router = create_router(create_test_state());
        let response = send(router, "GET", "/transactions/TXN-404", None).await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = body_json(response).await;
        assert_eq!(body["code"], "TRANSACTION_NOT_FOUND");
    }
}
