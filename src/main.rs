use axum::routing::{delete, get, post};
use axum::Router;
use redis::aio::ConnectionManager;
use reqwest::Client;
use roomescape::api::handlers::{
    cancel_reservation, my_reservations, reservations, save_reservation, save_waiting,
    search_reservations,
};
use roomescape::domain::entities::AppState;
use roomescape::infrastructure::config::{TOSS_PAYMENTS_URL, TOSS_SECRET_KEY};
use roomescape::infrastructure::{get_redis_connection, TossPayClient};
use std::env;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("info".parse().expect("valid directive")),
        )
        .init();

    let port = env::var("PORT").unwrap_or("8080".to_string());

    // The request timeout is the only cancellation bound on gateway calls.
    let client = Arc::new(
        Client::builder()
            .connect_timeout(std::time::Duration::from_millis(500))
            .timeout(std::time::Duration::from_secs(10))
            .tcp_nodelay(true)
            .build()
            .expect("failed to build http client"),
    );

    let connection: Arc<ConnectionManager> = match get_redis_connection().await {
        Ok(conn) => Arc::new(conn),
        Err(e) => {
            error!("failed to connect to redis: {:?}", e);
            return;
        }
    };

    let payments = Arc::new(TossPayClient::new(
        TOSS_PAYMENTS_URL.as_str(),
        TOSS_SECRET_KEY.as_str(),
        Arc::clone(&client),
    ));

    let app = Router::new()
        .route("/reservations", get(reservations).post(save_reservation))
        .route("/reservations/mine", get(my_reservations))
        .route("/reservations/search", get(search_reservations))
        .route("/reservations/waiting", post(save_waiting))
        .route("/reservations/{id}", delete(cancel_reservation))
        .with_state(AppState {
            redis: connection,
            payments,
        });

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port))
        .await
        .expect("failed to bind listener");
    info!("listening on 0.0.0.0:{}", port);
    axum::serve(listener, app).await.expect("server error");
}
