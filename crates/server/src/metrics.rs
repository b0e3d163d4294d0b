use axum::http::StatusCode;
use once_cell::sync::Lazy;
use prometheus::{register_int_counter_vec, Encoder, IntCounterVec, TextEncoder};

// Prometheus metrics (default registry)
pub static REGISTER_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "auth_register_total",
        "Registration attempts by outcome",
        &["outcome"]
    )
    .expect("register auth_register_total")
});

pub static LOGIN_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "auth_login_total",
        "Login attempts by outcome",
        &["outcome"]
    )
    .expect("register auth_login_total")
});

pub fn encode_metrics() -> (StatusCode, String) {
    Lazy::force(&REGISTER_TOTAL);
    Lazy::force(&LOGIN_TOTAL);
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        return (StatusCode::INTERNAL_SERVER_ERROR, format!("metrics encode error: {e}"));
    }
    (StatusCode::OK, String::from_utf8(buffer).unwrap_or_default())
}

pub async fn metrics() -> (StatusCode, String) {
    encode_metrics()
}
