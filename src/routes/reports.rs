use axum::{
    Json, Router,
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    routing::get,
};

use crate::{
    error::AppResult,
    middleware::auth::AuthUser,
    response::ApiResponse,
    services::report_service::{self, REPORT_FILENAME},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/orders.csv", get(export_orders))
}

#[utoipa::path(
    get,
    path = "/api/reports/orders.csv",
    responses(
        (status = 200, description = "CSV attachment, or an informational envelope when there are no orders"),
        (status = 403, description = "Forbidden"),
    ),
    security(("bearer_auth" = [])),
    tag = "Reports"
)]
pub async fn export_orders(State(state): State<AppState>, user: AuthUser) -> AppResult<Response> {
    match report_service::export_orders(&state, &user).await? {
        Some(csv) => {
            let headers = [
                (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{REPORT_FILENAME}\""),
                ),
            ];
            Ok((headers, csv).into_response())
        }
        None => Ok(Json(ApiResponse::<serde_json::Value>::info(
            "No orders to export",
        ))
        .into_response()),
    }
}
