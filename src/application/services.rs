use crate::domain::entities::{
    AppState, PaymentRequest, Reservation, ReservationSaveRequest, ReservationSearchFilter,
    ReservationStatus, ReservationWaitingRequest,
};
use crate::domain::errors::BookingError;
use crate::infrastructure::{
    date_score, delete_reservation, load_reservations, load_reservations_between,
    next_reservation_id, store_reservation,
};
use chrono::NaiveDate;
use redis::aio::ConnectionManager;
use tracing::info;

/// Creates a paid reservation. The payment is confirmed before anything is
/// written, so a declined or unclassifiable payment leaves no trace in the
/// store.
pub async fn create_reservation(
    state: &AppState,
    request: ReservationSaveRequest,
) -> Result<Reservation, BookingError> {
    let payment = PaymentRequest::from(&request);
    state.payments.pay(&payment).await?;

    let mut conn = (*state.redis).clone();
    let id = next_reservation_id(&mut conn).await?;
    let reservation = Reservation {
        id,
        member_id: request.member_id,
        date: request.date,
        theme_id: request.theme_id,
        time_id: request.time_id,
        status: ReservationStatus::Success,
        order_id: Some(request.order_id),
        amount: Some(request.amount),
    };
    persist(&mut conn, &reservation).await?;
    info!(id, member_id = reservation.member_id, "reservation confirmed");
    Ok(reservation)
}

/// Creates a waiting-list entry. No payment is involved until the entry is
/// promoted to a real reservation.
pub async fn create_waiting(
    state: &AppState,
    request: ReservationWaitingRequest,
) -> Result<Reservation, BookingError> {
    let mut conn = (*state.redis).clone();
    let id = next_reservation_id(&mut conn).await?;
    let reservation = Reservation {
        id,
        member_id: request.member_id,
        date: request.date,
        theme_id: request.theme_id,
        time_id: request.time_id,
        status: ReservationStatus::Wait,
        order_id: None,
        amount: None,
    };
    persist(&mut conn, &reservation).await?;
    info!(id, member_id = reservation.member_id, "waiting entry created");
    Ok(reservation)
}

pub async fn find_all(state: &AppState) -> Result<Vec<Reservation>, BookingError> {
    let mut conn = (*state.redis).clone();
    Ok(load_reservations(&mut conn).await?)
}

pub async fn find_by_member(
    state: &AppState,
    member_id: u64,
) -> Result<Vec<Reservation>, BookingError> {
    let reservations = find_all(state).await?;
    Ok(reservations
        .into_iter()
        .filter(|reservation| reservation.member_id == member_id)
        .collect())
}

/// Date bounds are resolved against the index; theme and member conditions
/// are applied to the loaded documents.
pub async fn search(
    state: &AppState,
    filter: &ReservationSearchFilter,
) -> Result<Vec<Reservation>, BookingError> {
    let mut conn = (*state.redis).clone();
    let from = date_score(filter.date_from.unwrap_or(NaiveDate::MIN));
    let to = date_score(filter.date_to.unwrap_or(NaiveDate::MAX));

    let reservations = load_reservations_between(&mut conn, from, to).await?;
    Ok(reservations
        .into_iter()
        .filter(|reservation| matches_filter(reservation, filter))
        .collect())
}

pub async fn cancel(state: &AppState, id: u64) -> Result<(), BookingError> {
    let mut conn = (*state.redis).clone();
    if !delete_reservation(&mut conn, id).await? {
        return Err(BookingError::NotFound(id));
    }
    info!(id, "reservation cancelled");
    Ok(())
}

fn matches_filter(reservation: &Reservation, filter: &ReservationSearchFilter) -> bool {
    filter
        .theme_id
        .is_none_or(|theme_id| reservation.theme_id == theme_id)
        && filter
            .member_id
            .is_none_or(|member_id| reservation.member_id == member_id)
}

async fn persist(
    conn: &mut ConnectionManager,
    reservation: &Reservation,
) -> Result<(), BookingError> {
    let document = serde_json::to_string(reservation)?;
    store_reservation(conn, reservation.id, &document, date_score(reservation.date)).await?;
    Ok(())
}
