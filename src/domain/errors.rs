use thiserror::Error;

/// Failure modes of a single payment confirmation attempt.
///
/// `Failure` and `Parse` are only produced for 4xx responses: `Failure` when
/// the gateway returned its documented `{code, message}` error body, `Parse`
/// when the body could not be read as that shape. 5xx statuses and transport
/// failures are propagated without inspecting the body.
#[derive(Debug, Error)]
pub enum PaymentError {
    #[error("payment failed: {message}")]
    Failure { code: String, message: String },
    #[error("unexpected gateway error body: {0}")]
    Parse(String),
    #[error("gateway responded with status {0}")]
    Gateway(reqwest::StatusCode),
    #[error(transparent)]
    Transport(#[from] reqwest::Error),
}

#[derive(Debug, Error)]
pub enum BookingError {
    #[error(transparent)]
    Payment(#[from] PaymentError),
    #[error("reservation {0} not found")]
    NotFound(u64),
    #[error("storage error: {0}")]
    Storage(#[from] redis::RedisError),
    #[error("serialization error: {0}")]
    Codec(#[from] serde_json::Error),
}
