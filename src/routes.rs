use super::{controllers, models};
use axum::routing::{get, post, Router};

#[rustfmt::skip]
pub fn get_routes() -> Router<models::AppState> {
    Router::new()
        .route("/", get(controllers::overview))
        .route("/add", get(controllers::add_property_form))
        .route("/add", post(controllers::submit_property))
}
