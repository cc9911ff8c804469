use crate::domain::entities::Reservation;
use crate::infrastructure::config::REDIS_URL;
use redis::aio::ConnectionManager;
use redis::{pipe, AsyncCommands, RedisError};
use tracing::warn;

const DATA_KEY: &str = "reservations:data";
const HISTORY_KEY: &str = "reservations:history";
const SEQ_KEY: &str = "reservations:seq";

pub async fn get_redis_connection() -> Result<ConnectionManager, RedisError> {
    let client = redis::Client::open(REDIS_URL.as_str().to_string())?;
    let manager = client.get_connection_manager().await?;
    Ok(manager)
}

pub async fn next_reservation_id(conn: &mut ConnectionManager) -> redis::RedisResult<u64> {
    AsyncCommands::incr(conn, SEQ_KEY, 1).await
}

/// Writes the reservation document and its date index entry atomically.
/// `reservation_json` is the serialized document, `date_score` the sorted-set
/// score of its date.
pub async fn store_reservation(
    conn: &mut ConnectionManager,
    id: u64,
    reservation_json: &str,
    date_score: f64,
) -> redis::RedisResult<()> {
    pipe()
        .atomic()
        .hset(DATA_KEY, id, reservation_json)
        .zadd(HISTORY_KEY, id, date_score)
        .query_async(conn)
        .await
}

pub async fn load_reservations(conn: &mut ConnectionManager) -> redis::RedisResult<Vec<Reservation>> {
    let documents: Vec<String> = AsyncCommands::hvals(conn, DATA_KEY).await?;
    Ok(parse_documents(documents))
}

/// Loads the reservations whose date score falls in `[from, to]`.
pub async fn load_reservations_between(
    conn: &mut ConnectionManager,
    from: f64,
    to: f64,
) -> redis::RedisResult<Vec<Reservation>> {
    let ids: Vec<String> = AsyncCommands::zrangebyscore(conn, HISTORY_KEY, from, to).await?;
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    // HMGET yields nil for an id deleted between the two reads.
    let documents: Vec<Option<String>> = AsyncCommands::hget(conn, DATA_KEY, &ids).await?;
    Ok(parse_documents(documents.into_iter().flatten().collect()))
}

/// Removes the reservation and its index entry. Returns false when the id
/// was not present.
pub async fn delete_reservation(
    conn: &mut ConnectionManager,
    id: u64,
) -> redis::RedisResult<bool> {
    let (removed, _): (i64, i64) = pipe()
        .atomic()
        .hdel(DATA_KEY, id)
        .zrem(HISTORY_KEY, id)
        .query_async(conn)
        .await?;
    Ok(removed > 0)
}

fn parse_documents(documents: Vec<String>) -> Vec<Reservation> {
    documents
        .iter()
        .filter_map(|document| match serde_json::from_str(document) {
            Ok(reservation) => Some(reservation),
            Err(e) => {
                warn!("skipping unreadable reservation document: {}", e);
                None
            }
        })
        .collect()
}
