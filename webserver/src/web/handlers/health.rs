use axum::Json;

pub async fn root() -> Json<&'static str> {
    Json("Welcome to Sliike app!")
}

pub async fn health() -> Json<&'static str> {
    Json("Sliike server is running")
}
