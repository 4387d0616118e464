use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::{Order, OrderStatus};

/// One page of the admin order table. `pages` is the link window shown
/// under the table: at most five page numbers centered on the current page.
#[derive(Debug, Serialize, ToSchema)]
pub struct OrderPage {
    pub items: Vec<Order>,
    pub pages: Vec<i64>,
    pub page_count: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderLineView {
    pub id: String,
    pub name: String,
    pub price: i64,
    pub quantity: i32,
    pub subtotal: i64,
}

/// Detail projection. `total` echoes the stored total_amount rather than
/// summing the line subtotals, so the two can diverge when the stored
/// total is stale.
#[derive(Debug, Serialize, ToSchema)]
pub struct OrderDetail {
    pub order: Order,
    pub lines: Vec<OrderLineView>,
    pub total: i64,
    pub available_statuses: Vec<OrderStatus>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RecentOrder {
    pub id: Uuid,
    pub short_id: String,
    pub status: OrderStatus,
    pub total_amount: i64,
    pub total_label: String,
    pub order_date: DateTime<Utc>,
    pub order_date_label: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RecentOrderList {
    pub items: Vec<RecentOrder>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateOrderStatusRequest {
    pub status: String,
}
