use once_cell::sync::Lazy;
use std::env;

pub static TOSS_PAYMENTS_URL: Lazy<String> = Lazy::new(|| {
    env::var("TOSS_PAYMENTS_URL").unwrap_or_else(|_| "https://api.tosspayments.com".to_string())
});

// Test key by default so a misconfigured deployment can never confirm real
// payments. Never log this value.
pub static TOSS_SECRET_KEY: Lazy<String> = Lazy::new(|| {
    env::var("TOSS_SECRET_KEY").unwrap_or_else(|_| "test_sk_roomescape".to_string())
});

pub static REDIS_URL: Lazy<String> = Lazy::new(|| {
    env::var("REDIS_URL").unwrap_or_else(|_| "redis://127.0.0.1:6379/".to_string())
});
