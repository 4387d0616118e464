use chrono::{Duration, Utc};
use sea_orm::{ConnectionTrait, Statement};
use serde_json::json;
use storefront_admin_api::{
    db::{create_orm_conn, create_pool, run_migrations},
    dto::{cart::AddToCartRequest, orders::UpdateOrderStatusRequest, wishlist::AddWishlistRequest},
    middleware::auth::AuthUser,
    models::OrderStatus,
    routes::params::OrderListQuery,
    services::{cart_service, order_service, report_service, wishlist_service},
    state::AppState,
};
use uuid::Uuid;

// Integration flow: admin works the order table and exports the report;
// a storefront user toggles wishlist membership and hits the duplicate
// cart guard.
#[tokio::test]
async fn order_table_report_and_membership_flow() -> anyhow::Result<()> {
    // Allow skipping when no DB is configured in the environment.
    let database_url = match std::env::var("TEST_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
    {
        Ok(url) => url,
        Err(_) => {
            eprintln!(
                "Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run integration flow tests."
            );
            return Ok(());
        }
    };

    let state = setup_state(&database_url).await?;

    let admin = AuthUser {
        user_id: Uuid::new_v4(),
        role: "admin".into(),
    };
    let shopper = AuthUser {
        user_id: Uuid::new_v4(),
        role: "user".into(),
    };

    // Seed 12 orders so the table spans two pages; make one searchable by name.
    for i in 0..12 {
        let status = if i < 4 { "pending" } else { "shipped" };
        let name = if i == 0 { "Greta Olsen" } else { "Shopper" };
        insert_order(&state, name, &format!("s{i}@example.com"), status, i).await?;
    }

    // Page 2 holds the remaining two orders; the window never exceeds the page count.
    let page2 = order_service::list_orders(
        &state,
        &admin,
        OrderListQuery {
            page: Some(2),
            q: None,
            status: None,
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(page2.items.len(), 2);
    assert_eq!(page2.page_count, 2);
    assert_eq!(page2.pages, vec![1, 2]);

    // Search and status filter intersect.
    let hits = order_service::list_orders(
        &state,
        &admin,
        OrderListQuery {
            page: Some(1),
            q: Some("greta".into()),
            status: Some("pending".into()),
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(hits.items.len(), 1);
    assert_eq!(hits.items[0].customer_name, "Greta Olsen");

    // Any status may replace any other; the detail view stops offering the
    // new current status afterwards.
    let target = hits.items[0].id;
    let updated = order_service::update_order_status(
        &state,
        &admin,
        target,
        UpdateOrderStatusRequest {
            status: "cancelled".into(),
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(updated.status, OrderStatus::Cancelled);

    let detail = order_service::get_order(&state, &admin, target)
        .await?
        .data
        .unwrap();
    assert!(!detail.available_statuses.contains(&OrderStatus::Cancelled));
    assert_eq!(detail.available_statuses.len(), 4);

    // Unknown statuses are rejected before any write.
    let rejected = order_service::update_order_status(
        &state,
        &admin,
        target,
        UpdateOrderStatusRequest {
            status: "refunded".into(),
        },
    )
    .await;
    assert!(rejected.is_err());

    // Recent widget: five rows, newest first.
    let recent = order_service::recent_orders(&state).await?.data.unwrap();
    assert_eq!(recent.items.len(), 5);
    assert!(recent.items[0].order_date >= recent.items[4].order_date);
    assert_eq!(recent.items[0].short_id.len(), 8);

    // Report: header plus one line per order.
    let csv = report_service::export_orders(&state, &admin)
        .await?
        .expect("expected CSV for seeded orders");
    assert_eq!(csv.lines().count(), 13);
    assert!(csv.starts_with(report_service::REPORT_HEADER));

    // Wishlist toggle: add then remove restores the original membership.
    let product_id = insert_product(&state, "Walnut Desk Lamp", true).await?;

    let before = wishlist_service::check_membership(&state.pool, &shopper, product_id)
        .await?
        .data
        .unwrap();
    assert!(!before.wishlisted);

    wishlist_service::add_entry(
        &state.pool,
        &shopper,
        AddWishlistRequest { product_id },
    )
    .await?;
    let during = wishlist_service::check_membership(&state.pool, &shopper, product_id)
        .await?
        .data
        .unwrap();
    assert!(during.wishlisted);

    wishlist_service::remove_entry(&state.pool, &shopper, product_id).await?;
    let after = wishlist_service::check_membership(&state.pool, &shopper, product_id)
        .await?
        .data
        .unwrap();
    assert!(!after.wishlisted);

    // Duplicate cart adds never touch the existing row.
    let added = cart_service::add_to_cart(
        &state.pool,
        &shopper,
        AddToCartRequest { product_id },
    )
    .await?;
    assert_eq!(added.message, "Added to cart");
    assert_eq!(added.data.unwrap().quantity, 1);

    let duplicate = cart_service::add_to_cart(
        &state.pool,
        &shopper,
        AddToCartRequest { product_id },
    )
    .await?;
    assert_eq!(duplicate.message, "Already in cart");
    assert!(duplicate.data.is_none());

    let count: (i64,) = sqlx::query_as(
        "SELECT COUNT(*) FROM cart_items WHERE user_id = $1 AND product_id = $2",
    )
    .bind(shopper.user_id)
    .bind(product_id)
    .fetch_one(&state.pool)
    .await?;
    assert_eq!(count.0, 1);

    // Out-of-stock products never reach the cart.
    let unavailable = insert_product(&state, "Linen Throw Blanket", false).await?;
    let refused = cart_service::add_to_cart(
        &state.pool,
        &shopper,
        AddToCartRequest {
            product_id: unavailable,
        },
    )
    .await;
    assert!(refused.is_err());

    // With no orders left there is nothing to export.
    sqlx::query("TRUNCATE TABLE orders").execute(&state.pool).await?;
    let empty = report_service::export_orders(&state, &admin).await?;
    assert!(empty.is_none());

    // Non-admins cannot touch the order surface.
    let forbidden = order_service::list_orders(
        &state,
        &shopper,
        OrderListQuery {
            page: None,
            q: None,
            status: None,
        },
    )
    .await;
    assert!(forbidden.is_err());

    Ok(())
}

async fn setup_state(database_url: &str) -> anyhow::Result<AppState> {
    let pool = create_pool(database_url).await?;
    let orm = create_orm_conn(database_url).await?;
    run_migrations(&orm).await?;

    // Clean tables between runs
    let backend = orm.get_database_backend();
    orm.execute(Statement::from_string(
        backend,
        "TRUNCATE TABLE cart_items, wishlist, orders, audit_logs, products CASCADE",
    ))
    .await?;

    Ok(AppState { pool, orm })
}

async fn insert_order(
    state: &AppState,
    name: &str,
    email: &str,
    status: &str,
    age_hours: i64,
) -> anyhow::Result<Uuid> {
    let id = Uuid::new_v4();
    let items = json!([
        { "id": "sku-1", "name": "Sample Item", "price": 1250, "quantity": 2 }
    ]);
    let address = json!({
        "street": "12 Main St", "city": "Springfield", "state": "IL", "zip_code": "62701"
    });
    sqlx::query(
        r#"
        INSERT INTO orders (id, customer_name, customer_email, order_date, status, total_amount, items, shipping_address)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        "#,
    )
    .bind(id)
    .bind(name)
    .bind(email)
    .bind(Utc::now() - Duration::hours(age_hours))
    .bind(status)
    .bind(2500_i64)
    .bind(items)
    .bind(address)
    .execute(&state.pool)
    .await?;

    Ok(id)
}

async fn insert_product(state: &AppState, name: &str, in_stock: bool) -> anyhow::Result<Uuid> {
    let id = Uuid::new_v4();
    sqlx::query(
        r#"
        INSERT INTO products (id, name, price, category, in_stock)
        VALUES ($1, $2, $3, $4, $5)
        "#,
    )
    .bind(id)
    .bind(name)
    .bind(4599_i64)
    .bind("lighting")
    .bind(in_stock)
    .execute(&state.pool)
    .await?;

    Ok(id)
}
