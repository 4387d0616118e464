use chrono::{Duration, Utc};
use serde_json::json;
use storefront_admin_api::{config::AppConfig, db::create_pool};
use uuid::Uuid;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let pool = create_pool(&config.database_url).await?;
    // Ensure migrations are applied.
    sqlx::migrate!("./migrations").run(&pool).await?;

    let products = seed_products(&pool).await?;
    let orders = seed_orders(&pool).await?;

    println!("Seed completed. Products: {products}, Orders: {orders}");
    Ok(())
}

async fn seed_products(pool: &sqlx::PgPool) -> anyhow::Result<u64> {
    let fixtures = [
        ("Walnut Desk Lamp", 4599_i64, Some(20), "lighting", true, Some(4.6)),
        ("Ceramic Mug Set", 2800, None, "kitchen", true, Some(4.2)),
        ("Linen Throw Blanket", 7250, Some(10), "textiles", false, None),
    ];

    let mut inserted = 0;
    for (name, price, discount, category, in_stock, rating) in fixtures {
        let result = sqlx::query(
            r#"
            INSERT INTO products (id, name, price, discount_percent, category, in_stock, rating, sales_count)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (id) DO NOTHING
            "#,
        )
        .bind(stable_id(name))
        .bind(name)
        .bind(price)
        .bind(discount)
        .bind(category)
        .bind(in_stock)
        .bind(rating)
        .bind(42_i32)
        .execute(pool)
        .await?;
        inserted += result.rows_affected();
    }

    Ok(inserted)
}

async fn seed_orders(pool: &sqlx::PgPool) -> anyhow::Result<u64> {
    let now = Utc::now();
    let address = json!({
        "street": "742 Evergreen Terrace",
        "city": "Springfield",
        "state": "IL",
        "zip_code": "62704"
    });

    let fixtures = [
        ("Maya Flores", "maya@example.com", "pending", 5198_i64, 0_i64),
        ("Jon Ames", "jon@example.com", "shipped", 2800, 2),
        ("Priya Nair", "priya@example.com", "completed", 7250, 5),
    ];

    let mut inserted = 0;
    for (i, (name, email, status, total, days_ago)) in fixtures.into_iter().enumerate() {
        let items = json!([
            { "id": format!("sku-{i}"), "name": "Sample Item", "price": total, "quantity": 1 }
        ]);
        // Store one order with string-encoded JSON columns, the form
        // legacy rows arrive in, so normalization stays exercised end to end.
        let (items, shipping): (serde_json::Value, serde_json::Value) = if i == 0 {
            (
                serde_json::Value::String(items.to_string()),
                serde_json::Value::String(address.to_string()),
            )
        } else {
            (items, address.clone())
        };

        let result = sqlx::query(
            r#"
            INSERT INTO orders (id, customer_name, customer_email, order_date, status, total_amount, items, shipping_address)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (id) DO NOTHING
            "#,
        )
        .bind(stable_id(email))
        .bind(name)
        .bind(email)
        .bind(now - Duration::days(days_ago))
        .bind(status)
        .bind(total)
        .bind(items)
        .bind(shipping)
        .execute(pool)
        .await?;
        inserted += result.rows_affected();
    }

    Ok(inserted)
}

// Deterministic ids so re-running the seed is a no-op.
fn stable_id(key: &str) -> Uuid {
    Uuid::new_v5(&Uuid::NAMESPACE_OID, key.as_bytes())
}
