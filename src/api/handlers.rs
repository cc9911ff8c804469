use crate::application::services;
use crate::domain::entities::{
    AppState, ErrorResponse, MemberFilter, Reservation, ReservationResponse,
    ReservationSaveRequest, ReservationSearchFilter, ReservationWaitingRequest,
    ReservationsResponse,
};
use crate::domain::errors::{BookingError, PaymentError};
use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::{error, warn};

pub async fn reservations(State(state): State<AppState>) -> Response {
    match services::find_all(&state).await {
        Ok(reservations) => (StatusCode::OK, Json(list_response(&reservations))).into_response(),
        Err(e) => error_response(e).into_response(),
    }
}

pub async fn my_reservations(
    Query(filter): Query<MemberFilter>,
    State(state): State<AppState>,
) -> Response {
    match services::find_by_member(&state, filter.member_id).await {
        Ok(reservations) => (StatusCode::OK, Json(list_response(&reservations))).into_response(),
        Err(e) => error_response(e).into_response(),
    }
}

pub async fn search_reservations(
    Query(filter): Query<ReservationSearchFilter>,
    State(state): State<AppState>,
) -> Response {
    match services::search(&state, &filter).await {
        Ok(reservations) => (StatusCode::OK, Json(list_response(&reservations))).into_response(),
        Err(e) => error_response(e).into_response(),
    }
}

pub async fn save_reservation(
    State(state): State<AppState>,
    Json(payload): Json<ReservationSaveRequest>,
) -> Response {
    match services::create_reservation(&state, payload).await {
        Ok(reservation) => created_response(&reservation),
        Err(e) => error_response(e).into_response(),
    }
}

pub async fn save_waiting(
    State(state): State<AppState>,
    Json(payload): Json<ReservationWaitingRequest>,
) -> Response {
    match services::create_waiting(&state, payload).await {
        Ok(reservation) => created_response(&reservation),
        Err(e) => error_response(e).into_response(),
    }
}

pub async fn cancel_reservation(
    Path(id): Path<u64>,
    State(state): State<AppState>,
) -> Response {
    match services::cancel(&state, id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response(e).into_response(),
    }
}

fn created_response(reservation: &Reservation) -> Response {
    (
        StatusCode::CREATED,
        [(header::LOCATION, format!("/reservations/{}", reservation.id))],
        Json(ReservationResponse::from(reservation)),
    )
        .into_response()
}

fn list_response(reservations: &[Reservation]) -> ReservationsResponse {
    ReservationsResponse {
        responses: reservations.iter().map(ReservationResponse::from).collect(),
    }
}

/// A declined payment is the member's problem (400, verbatim gateway reason).
/// Everything else is ours or the gateway's and must not read like a decline.
fn error_response(error: BookingError) -> (StatusCode, Json<ErrorResponse>) {
    match error {
        BookingError::Payment(PaymentError::Failure { code, message }) => {
            warn!(%code, "payment declined by gateway");
            (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    code,
                    message: format!("payment failed: {}", message),
                }),
            )
        }
        BookingError::Payment(PaymentError::Parse(diagnostic)) => {
            error!("unreadable gateway error body: {}", diagnostic);
            (
                StatusCode::BAD_GATEWAY,
                Json(ErrorResponse {
                    code: "PAYMENT_INTEGRATION_ERROR".to_string(),
                    message: "payment gateway returned an unexpected response".to_string(),
                }),
            )
        }
        BookingError::Payment(e) => {
            error!("payment gateway unreachable: {}", e);
            (
                StatusCode::BAD_GATEWAY,
                Json(ErrorResponse {
                    code: "PAYMENT_GATEWAY_UNAVAILABLE".to_string(),
                    message: "payment gateway is unavailable".to_string(),
                }),
            )
        }
        BookingError::NotFound(id) => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                code: "NOT_FOUND".to_string(),
                message: format!("reservation {} not found", id),
            }),
        ),
        e => {
            error!("storage failure: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    code: "INTERNAL_ERROR".to_string(),
                    message: "internal storage error".to_string(),
                }),
            )
        }
    }
}
