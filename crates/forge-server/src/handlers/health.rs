//! Health check

pub async fn health() -> &'static str {
    "ok"
}
