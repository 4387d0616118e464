use chrono::Utc;
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::{EntityTrait, FromQueryResult, QueryOrder, QuerySelect};
use uuid::Uuid;

use crate::{
    audit::record_audit,
    entity::orders::{Column as OrderCol, Entity as Orders},
    error::AppResult,
    format::{format_amount, format_report_timestamp},
    middleware::auth::{AuthUser, ensure_admin},
    state::AppState,
};

pub const REPORT_FILENAME: &str = "orders_report.csv";

pub const REPORT_HEADER: &str =
    "Order ID,Customer Name,Customer Email,Order Date,Status,Total Amount";

#[derive(Debug, FromQueryResult)]
pub struct ReportRow {
    pub id: Uuid,
    pub customer_name: String,
    pub customer_email: String,
    pub order_date: DateTimeWithTimeZone,
    pub status: String,
    pub total_amount: i64,
}

/// Serializes every order into CSV text, or `None` when there is nothing
/// to export (an informational outcome, not an error).
pub async fn export_orders(state: &AppState, user: &AuthUser) -> AppResult<Option<String>> {
    ensure_admin(user)?;

    let rows = Orders::find()
        .select_only()
        .column(OrderCol::Id)
        .column(OrderCol::CustomerName)
        .column(OrderCol::CustomerEmail)
        .column(OrderCol::OrderDate)
        .column(OrderCol::Status)
        .column(OrderCol::TotalAmount)
        .order_by_desc(OrderCol::OrderDate)
        .into_model::<ReportRow>()
        .all(&state.orm)
        .await?;

    if rows.is_empty() {
        return Ok(None);
    }

    record_audit(
        &state.pool,
        Some(user.user_id),
        "report_export",
        Some("orders"),
        Some(serde_json::json!({ "rows": rows.len() })),
    )
    .await;

    Ok(Some(build_report(&rows)))
}

/// Header plus one line per order. Fields are comma-joined with no quoting
/// or escaping, so a comma inside a name corrupts that row; this matches
/// the upstream report format exactly.
pub fn build_report(rows: &[ReportRow]) -> String {
    let mut out = String::from(REPORT_HEADER);
    out.push('\n');
    for row in rows {
        out.push_str(&format!(
            "{},{},{},{},{},{}\n",
            row.id,
            row.customer_name,
            row.customer_email,
            format_report_timestamp(row.order_date.with_timezone(&Utc)),
            row.status,
            format_amount(row.total_amount),
        ));
    }
    out
}
