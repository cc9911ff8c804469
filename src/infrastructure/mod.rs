pub mod config;
pub mod redis;
pub mod toss;
pub mod utils;

pub use utils::date_score;

pub use redis::{
    delete_reservation, get_redis_connection, load_reservations, load_reservations_between,
    next_reservation_id, store_reservation,
};

pub use toss::TossPayClient;
