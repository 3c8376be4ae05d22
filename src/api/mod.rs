//! HTTP API for the covenant schedule generator.
//!
//! This module exposes schedule generation, and storage of transactions,
//! covenants and schedules, as REST endpoints.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{CovenantQuery, GenerateRequest, ScheduleQuery, StatusUpdateRequest};
pub use response::{ApiError, ApiErrorResponse, GenerateResponse, StatusUpdateResponse};
pub use state::AppState;
