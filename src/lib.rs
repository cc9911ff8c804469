pub use crate::domain::entities::{AppState, PaymentRequest, Reservation, ReservationStatus};
pub use crate::domain::errors::{BookingError, PaymentError};

pub mod api;
pub mod application;
pub mod domain;
pub mod infrastructure;
