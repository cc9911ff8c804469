use crate::infrastructure::toss::TossPayClient;
use chrono::NaiveDate;
use redis::aio::ConnectionManager;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub redis: Arc<ConnectionManager>,
    pub payments: Arc<TossPayClient>,
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReservationStatus {
    #[serde(rename = "SUCCESS")]
    Success,
    #[serde(rename = "WAIT")]
    Wait,
}

/// A reservation as persisted in the store. Waiting-list entries carry no
/// payment fields.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct Reservation {
    pub id: u64,
    #[serde(rename = "memberId")]
    pub member_id: u64,
    pub date: NaiveDate,
    #[serde(rename = "themeId")]
    pub theme_id: u64,
    #[serde(rename = "timeId")]
    pub time_id: u64,
    pub status: ReservationStatus,
    #[serde(rename = "orderId")]
    pub order_id: Option<String>,
    pub amount: Option<i64>,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct ReservationSaveRequest {
    #[serde(rename = "memberId")]
    pub member_id: u64,
    pub date: NaiveDate,
    #[serde(rename = "themeId")]
    pub theme_id: u64,
    #[serde(rename = "timeId")]
    pub time_id: u64,
    #[serde(rename = "paymentKey")]
    pub payment_key: String,
    #[serde(rename = "orderId")]
    pub order_id: String,
    pub amount: i64,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct ReservationWaitingRequest {
    #[serde(rename = "memberId")]
    pub member_id: u64,
    pub date: NaiveDate,
    #[serde(rename = "themeId")]
    pub theme_id: u64,
    #[serde(rename = "timeId")]
    pub time_id: u64,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct ReservationSearchFilter {
    #[serde(rename = "themeId")]
    pub theme_id: Option<u64>,
    #[serde(rename = "memberId")]
    pub member_id: Option<u64>,
    #[serde(rename = "dateFrom")]
    pub date_from: Option<NaiveDate>,
    #[serde(rename = "dateTo")]
    pub date_to: Option<NaiveDate>,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct MemberFilter {
    #[serde(rename = "memberId")]
    pub member_id: u64,
}

#[derive(Deserialize, Serialize, Debug)]
pub struct ReservationResponse {
    pub id: u64,
    #[serde(rename = "memberId")]
    pub member_id: u64,
    pub date: NaiveDate,
    #[serde(rename = "themeId")]
    pub theme_id: u64,
    #[serde(rename = "timeId")]
    pub time_id: u64,
    pub status: ReservationStatus,
}

impl From<&Reservation> for ReservationResponse {
    fn from(reservation: &Reservation) -> Self {
        ReservationResponse {
            id: reservation.id,
            member_id: reservation.member_id,
            date: reservation.date,
            theme_id: reservation.theme_id,
            time_id: reservation.time_id,
            status: reservation.status,
        }
    }
}

#[derive(Deserialize, Serialize, Debug)]
pub struct ReservationsResponse {
    pub responses: Vec<ReservationResponse>,
}

#[derive(Deserialize, Serialize, Debug)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
}

/// Payment confirmation payload sent to the gateway. Field values are copied
/// verbatim from the reservation save request and never mutated afterwards.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct PaymentRequest {
    #[serde(rename = "orderId")]
    pub order_id: String,
    pub amount: i64,
    #[serde(rename = "paymentKey")]
    pub payment_key: String,
}

impl From<&ReservationSaveRequest> for PaymentRequest {
    fn from(request: &ReservationSaveRequest) -> Self {
        PaymentRequest {
            order_id: request.order_id.clone(),
            amount: request.amount,
            payment_key: request.payment_key.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn save_request() -> ReservationSaveRequest {
        ReservationSaveRequest {
            member_id: 1,
            date: NaiveDate::from_ymd_opt(2026, 8, 23).unwrap(),
            theme_id: 1,
            time_id: 1,
            payment_key: "testKey".to_string(),
            order_id: "testId".to_string(),
            amount: 1000,
        }
    }

    #[test]
    fn payment_request_copies_save_request_fields_verbatim() {
        let payment = PaymentRequest::from(&save_request());
        assert_eq!(payment.order_id, "testId");
        assert_eq!(payment.amount, 1000);
        assert_eq!(payment.payment_key, "testKey");
    }

    #[test]
    fn payment_request_uses_gateway_field_names() {
        let payment = PaymentRequest::from(&save_request());
        let json = serde_json::to_value(&payment).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "orderId": "testId",
                "amount": 1000,
                "paymentKey": "testKey"
            })
        );
    }

    #[test]
    fn save_request_accepts_camel_case_body() {
        let body = r#"{
            "memberId": 1,
            "date": "2026-08-23",
            "themeId": 2,
            "timeId": 3,
            "paymentKey": "testKey",
            "orderId": "testId",
            "amount": 1000
        }"#;
        let request: ReservationSaveRequest = serde_json::from_str(body).unwrap();
        assert_eq!(request.theme_id, 2);
        assert_eq!(request.time_id, 3);
        assert_eq!(request.date, NaiveDate::from_ymd_opt(2026, 8, 23).unwrap());
    }

    #[test]
    fn status_serializes_to_upper_case_names() {
        assert_eq!(
            serde_json::to_string(&ReservationStatus::Success).unwrap(),
            "\"SUCCESS\""
        );
        assert_eq!(
            serde_json::to_string(&ReservationStatus::Wait).unwrap(),
            "\"WAIT\""
        );
    }
}
