use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, EntityTrait, FromQueryResult, QueryOrder, QuerySelect, Set,
};
use serde::de::DeserializeOwned;
use uuid::Uuid;

use crate::{
    audit::record_audit,
    dto::orders::{
        OrderDetail, OrderLineView, OrderPage, RecentOrder, RecentOrderList,
        UpdateOrderStatusRequest,
    },
    entity::orders::{
        ActiveModel as OrderActive, Column as OrderCol, Entity as Orders, Model as OrderModel,
    },
    error::{AppError, AppResult},
    format::{format_currency, format_date},
    middleware::auth::{AuthUser, ensure_admin},
    models::{Order, OrderLine, OrderStatus, ShippingAddress},
    response::{ApiResponse, Meta},
    routes::params::OrderListQuery,
    state::AppState,
};

/// The order table always shows ten rows per page.
pub const PAGE_SIZE: usize = 10;

const RECENT_LIMIT: u64 = 5;

/// Lists orders for the admin table. The whole collection is fetched and
/// normalized, then searched and paged in memory; result sets here are
/// small and the search predicate spans the formatted id, which has no
/// clean SQL translation.
pub async fn list_orders(
    state: &AppState,
    user: &AuthUser,
    query: OrderListQuery,
) -> AppResult<ApiResponse<OrderPage>> {
    ensure_admin(user)?;
    let page = query.page.unwrap_or(1).max(1);
    let status = parse_status_filter(query.status.as_deref())?;
    let term = query.q.unwrap_or_default();

    let orders = Orders::find()
        .order_by_desc(OrderCol::OrderDate)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(order_from_entity)
        .collect::<AppResult<Vec<_>>>()?;

    let filtered = filter_orders(orders, &term, status);
    let total = filtered.len();
    let pages = page_count(total);
    let window = page_window(page, pages);
    let items = paginate(filtered, page);

    let meta = Meta::new(page, PAGE_SIZE as i64, total as i64);
    let data = OrderPage {
        items,
        pages: window,
        page_count: pages,
    };
    Ok(ApiResponse::success("Orders", data, Some(meta)))
}

/// The five most recent orders, reading only the columns the summary
/// widget shows.
pub async fn recent_orders(state: &AppState) -> AppResult<ApiResponse<RecentOrderList>> {
    #[derive(Debug, FromQueryResult)]
    struct RecentRow {
        id: Uuid,
        status: String,
        total_amount: i64,
        order_date: sea_orm::prelude::DateTimeWithTimeZone,
    }

    let rows = Orders::find()
        .select_only()
        .column(OrderCol::Id)
        .column(OrderCol::Status)
        .column(OrderCol::TotalAmount)
        .column(OrderCol::OrderDate)
        .order_by_desc(OrderCol::OrderDate)
        .limit(RECENT_LIMIT)
        .into_model::<RecentRow>()
        .all(&state.orm)
        .await?;

    let mut items = Vec::with_capacity(rows.len());
    for row in rows {
        let status = row
            .status
            .parse::<OrderStatus>()
            .map_err(|e| AppError::Internal(anyhow::anyhow!(e)))?;
        let order_date = row.order_date.with_timezone(&Utc);
        items.push(RecentOrder {
            short_id: short_order_id(row.id),
            id: row.id,
            status,
            total_amount: row.total_amount,
            total_label: format_currency(row.total_amount),
            order_date,
            order_date_label: format_date(order_date),
        });
    }

    Ok(ApiResponse::success(
        "Recent orders",
        RecentOrderList { items },
        Some(Meta::empty()),
    ))
}

pub async fn get_order(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<OrderDetail>> {
    ensure_admin(user)?;
    let model = Orders::find_by_id(id).one(&state.orm).await?;
    let model = match model {
        Some(m) => m,
        None => return Err(AppError::NotFound),
    };
    let order = order_from_entity(model)?;

    Ok(ApiResponse::success(
        "Order",
        order_detail(order),
        Some(Meta::empty()),
    ))
}

/// Moves an order to a new status. Any status may replace any other; the
/// only validation is that the target parses as a known status.
pub async fn update_order_status(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateOrderStatusRequest,
) -> AppResult<ApiResponse<Order>> {
    ensure_admin(user)?;
    let status = payload
        .status
        .parse::<OrderStatus>()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let existing = Orders::find_by_id(id).one(&state.orm).await?;
    let existing = match existing {
        Some(o) => o,
        None => return Err(AppError::NotFound),
    };

    let mut active: OrderActive = existing.into();
    active.status = Set(status.to_string());
    active.updated_at = Set(Utc::now().into());
    let order = active.update(&state.orm).await?;

    record_audit(
        &state.pool,
        Some(user.user_id),
        "order_status_update",
        Some("orders"),
        Some(serde_json::json!({ "order_id": order.id, "status": order.status })),
    )
    .await;

    Ok(ApiResponse::success(
        "Order updated",
        order_from_entity(order)?,
        Some(Meta::empty()),
    ))
}

/// Applies both list filters: case-insensitive substring over id, customer
/// name and email, intersected with an exact status match.
pub fn filter_orders(
    mut orders: Vec<Order>,
    term: &str,
    status: Option<OrderStatus>,
) -> Vec<Order> {
    orders.retain(|o| matches_search(o, term) && status.map_or(true, |s| s == o.status));
    orders
}

pub fn matches_search(order: &Order, term: &str) -> bool {
    if term.is_empty() {
        return true;
    }
    let term = term.to_lowercase();
    order.id.to_string().contains(&term)
        || order.customer_name.to_lowercase().contains(&term)
        || order.customer_email.to_lowercase().contains(&term)
}

pub fn page_count(filtered: usize) -> i64 {
    filtered.div_ceil(PAGE_SIZE) as i64
}

/// The requested page is taken as-is: a page beyond the end of the
/// filtered set yields an empty slice, it is not clamped back to the
/// last page.
pub fn paginate<T>(items: Vec<T>, page: i64) -> Vec<T> {
    let page = page.max(1) as usize;
    // The page index comes straight from the query string, so the offset
    // must saturate rather than overflow on absurd values.
    items
        .into_iter()
        .skip((page - 1).saturating_mul(PAGE_SIZE))
        .take(PAGE_SIZE)
        .collect()
}

/// At most five page links, centered on the current page and clamped to
/// `[1, pages]`. No pages, no links.
pub fn page_window(page: i64, pages: i64) -> Vec<i64> {
    if pages <= 0 {
        return Vec::new();
    }
    let start = (page - 2).clamp(1, (pages - 4).max(1));
    let end = (start + 4).min(pages);
    (start..=end).collect()
}

pub fn order_detail(order: Order) -> OrderDetail {
    let lines = order
        .items
        .iter()
        .map(|line| OrderLineView {
            id: line.id.clone(),
            name: line.name.clone(),
            price: line.price,
            quantity: line.quantity,
            subtotal: line.price * line.quantity as i64,
        })
        .collect();
    OrderDetail {
        lines,
        total: order.total_amount,
        available_statuses: order.status.available_statuses(),
        order,
    }
}

/// Normalizes a stored row into the domain shape. The JSON columns may
/// hold either the structure itself or a JSON string wrapping it; both
/// forms are accepted. An unknown status string fails the row.
pub fn order_from_entity(model: OrderModel) -> AppResult<Order> {
    let status = model
        .status
        .parse::<OrderStatus>()
        .map_err(|e| AppError::Internal(anyhow::anyhow!("order {}: {e}", model.id)))?;
    let items: Vec<OrderLine> = parse_json_column(model.items)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("order {}: bad items: {e}", model.id)))?;
    let shipping_address: ShippingAddress = parse_json_column(model.shipping_address)
        .map_err(|e| {
            AppError::Internal(anyhow::anyhow!("order {}: bad shipping address: {e}", model.id))
        })?;

    Ok(Order {
        id: model.id,
        customer_name: model.customer_name,
        customer_email: model.customer_email,
        order_date: model.order_date.with_timezone(&Utc),
        status,
        total_amount: model.total_amount,
        items,
        shipping_address,
    })
}

pub fn short_order_id(id: Uuid) -> String {
    let full = id.to_string();
    full[full.len() - 8..].to_string()
}

fn parse_status_filter(raw: Option<&str>) -> AppResult<Option<OrderStatus>> {
    match raw {
        None | Some("") | Some("all") => Ok(None),
        Some(s) => {
            let status = s
                .parse::<OrderStatus>()
                .map_err(|e| AppError::BadRequest(e.to_string()))?;
            Ok(Some(status))
        }
    }
}

fn parse_json_column<T: DeserializeOwned>(
    value: serde_json::Value,
) -> Result<T, serde_json::Error> {
    match value {
        serde_json::Value::String(inner) => serde_json::from_str(&inner),
        other => serde_json::from_value(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn sample_order(name: &str, email: &str, status: OrderStatus) -> Order {
        Order {
            id: Uuid::new_v4(),
            customer_name: name.to_string(),
            customer_email: email.to_string(),
            order_date: Utc.with_ymd_and_hms(2026, 1, 15, 9, 0, 0).unwrap(),
            status,
            total_amount: 4998,
            items: vec![OrderLine {
                id: "sku-1".to_string(),
                name: "Desk Lamp".to_string(),
                price: 2499,
                quantity: 2,
            }],
            shipping_address: ShippingAddress {
                street: "12 Main St".to_string(),
                city: "Springfield".to_string(),
                state: "IL".to_string(),
                zip_code: "62701".to_string(),
            },
        }
    }

    fn fixture(n: usize) -> Vec<Order> {
        (0..n)
            .map(|i| {
                sample_order(
                    &format!("Customer {i}"),
                    &format!("customer{i}@example.com"),
                    if i % 2 == 0 {
                        OrderStatus::Pending
                    } else {
                        OrderStatus::Shipped
                    },
                )
            })
            .collect()
    }

    #[test]
    fn filter_is_intersection_of_predicates() {
        let mut orders = fixture(6);
        orders[0].customer_name = "Alice Carter".to_string();
        orders[1].customer_name = "Alice Munro".to_string();

        let hits = filter_orders(orders, "alice", Some(OrderStatus::Shipped));
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].customer_name, "Alice Munro");
    }

    #[test]
    fn filter_is_idempotent() {
        let orders = fixture(10);
        let once = filter_orders(orders, "customer", Some(OrderStatus::Pending));
        let twice = filter_orders(once.clone(), "customer", Some(OrderStatus::Pending));
        assert_eq!(once.len(), twice.len());
    }

    #[test]
    fn search_matches_id_substring() {
        let orders = fixture(3);
        let fragment = short_order_id(orders[1].id);
        let hits = filter_orders(orders, &fragment, None);
        assert!(!hits.is_empty());
    }

    #[test]
    fn empty_term_matches_everything() {
        let order = sample_order("A", "a@example.com", OrderStatus::Pending);
        assert!(matches_search(&order, ""));
    }

    #[test]
    fn page_count_rounds_up() {
        assert_eq!(page_count(0), 0);
        assert_eq!(page_count(1), 1);
        assert_eq!(page_count(10), 1);
        assert_eq!(page_count(11), 2);
        assert_eq!(page_count(23), 3);
    }

    #[test]
    fn third_page_of_twenty_three() {
        let orders = fixture(23);
        let expected: Vec<Uuid> = orders[20..23].iter().map(|o| o.id).collect();
        let page = paginate(orders, 3);
        assert_eq!(page.len(), 3);
        let got: Vec<Uuid> = page.iter().map(|o| o.id).collect();
        assert_eq!(got, expected);
        assert_eq!(page_window(3, page_count(23)), vec![1, 2, 3]);
    }

    #[test]
    fn out_of_range_page_is_empty_not_clamped() {
        let orders = fixture(5);
        assert!(paginate(orders, 4).is_empty());
    }

    #[test]
    fn extreme_page_index_is_empty_not_overflow() {
        let orders = fixture(3);
        assert!(paginate(orders, i64::MAX).is_empty());
        // Negative pages clamp to the first page rather than underflowing.
        let orders = fixture(3);
        assert_eq!(paginate(orders, i64::MIN).len(), 3);
    }

    #[test]
    fn window_is_centered_and_clamped() {
        assert_eq!(page_window(1, 10), vec![1, 2, 3, 4, 5]);
        assert_eq!(page_window(6, 10), vec![4, 5, 6, 7, 8]);
        assert_eq!(page_window(10, 10), vec![6, 7, 8, 9, 10]);
        assert_eq!(page_window(1, 2), vec![1, 2]);
        assert_eq!(page_window(1, 0), Vec::<i64>::new());
    }

    #[test]
    fn detail_keeps_stored_total_even_when_stale() {
        let mut order = sample_order("A", "a@example.com", OrderStatus::Processing);
        order.total_amount = 100; // does not match 2 x 2499
        let detail = order_detail(order);
        assert_eq!(detail.lines[0].subtotal, 4998);
        assert_eq!(detail.total, 100);
    }

    #[test]
    fn detail_offers_every_other_status() {
        let order = sample_order("A", "a@example.com", OrderStatus::Cancelled);
        let detail = order_detail(order);
        assert_eq!(detail.available_statuses.len(), 4);
        assert!(!detail.available_statuses.contains(&OrderStatus::Cancelled));
    }

    #[test]
    fn normalizes_string_encoded_json_columns() {
        let date = Utc.with_ymd_and_hms(2026, 2, 1, 8, 0, 0).unwrap();
        let model = OrderModel {
            id: Uuid::new_v4(),
            customer_name: "Bo Diaz".to_string(),
            customer_email: "bo@example.com".to_string(),
            order_date: date.fixed_offset(),
            status: "processing".to_string(),
            total_amount: 1500,
            items: serde_json::Value::String(
                r#"[{"id":"sku-9","name":"Mug","price":750,"quantity":2}]"#.to_string(),
            ),
            shipping_address: serde_json::json!({
                "street": "4 Elm St", "city": "Dover", "state": "DE", "zip_code": "19901"
            }),
            created_at: date.fixed_offset(),
            updated_at: date.fixed_offset(),
        };

        let order = order_from_entity(model).unwrap();
        assert_eq!(order.status, OrderStatus::Processing);
        assert_eq!(order.items.len(), 1);
        assert_eq!(order.items[0].price, 750);
        assert_eq!(order.shipping_address.city, "Dover");
    }

    #[test]
    fn unknown_stored_status_fails_normalization() {
        let date = Utc.with_ymd_and_hms(2026, 2, 1, 8, 0, 0).unwrap();
        let model = OrderModel {
            id: Uuid::new_v4(),
            customer_name: "Bo Diaz".to_string(),
            customer_email: "bo@example.com".to_string(),
            order_date: date.fixed_offset(),
            status: "archived".to_string(),
            total_amount: 1500,
            items: serde_json::json!([]),
            shipping_address: serde_json::json!({
                "street": "4 Elm St", "city": "Dover", "state": "DE", "zip_code": "19901"
            }),
            created_at: date.fixed_offset(),
            updated_at: date.fixed_offset(),
        };

        assert!(order_from_entity(model).is_err());
    }

    #[test]
    fn short_id_is_last_eight_chars() {
        let id = Uuid::parse_str("0191b2c3-aaaa-bbbb-cccc-0123456789ab").unwrap();
        assert_eq!(short_order_id(id), "456789ab");
    }
}
