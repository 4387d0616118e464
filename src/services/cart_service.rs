use uuid::Uuid;

use crate::{
    audit::record_audit,
    db::DbPool,
    dto::cart::{AddToCartRequest, CartStatus},
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::CartItem,
    response::{ApiResponse, Meta},
};

pub async fn check_membership(
    pool: &DbPool,
    user: &AuthUser,
    product_id: Uuid,
) -> AppResult<ApiResponse<CartStatus>> {
    let existing: Option<(Uuid,)> =
        sqlx::query_as("SELECT id FROM cart_items WHERE user_id = $1 AND product_id = $2")
            .bind(user.user_id)
            .bind(product_id)
            .fetch_optional(pool)
            .await?;

    let data = CartStatus {
        in_cart: existing.is_some(),
    };
    Ok(ApiResponse::success("OK", data, None))
}

/// Adds a product to the cart with quantity 1. Preconditions run in order
/// before any write: the product must exist and be in stock, and a row
/// already present for this (user, product) short-circuits into an
/// informational outcome without touching the quantity.
pub async fn add_to_cart(
    pool: &DbPool,
    user: &AuthUser,
    payload: AddToCartRequest,
) -> AppResult<ApiResponse<CartItem>> {
    let product: Option<(bool,)> = sqlx::query_as("SELECT in_stock FROM products WHERE id = $1")
        .bind(payload.product_id)
        .fetch_optional(pool)
        .await?;

    let in_stock = match product {
        Some((in_stock,)) => in_stock,
        None => return Err(AppError::BadRequest("Product not found".into())),
    };
    if !in_stock {
        return Err(AppError::BadRequest("Product is out of stock".into()));
    }

    let existing: Option<(Uuid,)> =
        sqlx::query_as("SELECT id FROM cart_items WHERE user_id = $1 AND product_id = $2")
            .bind(user.user_id)
            .bind(payload.product_id)
            .fetch_optional(pool)
            .await?;

    if existing.is_some() {
        return Ok(ApiResponse::info("Already in cart"));
    }

    let id = Uuid::new_v4();
    let cart_item = sqlx::query_as::<_, CartItem>(
        r#"
        INSERT INTO cart_items (id, user_id, product_id, quantity)
        VALUES ($1, $2, $3, 1)
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(user.user_id)
    .bind(payload.product_id)
    .fetch_one(pool)
    .await?;

    record_audit(
        pool,
        Some(user.user_id),
        "cart_add",
        Some("cart_items"),
        Some(serde_json::json!({ "product_id": payload.product_id })),
    )
    .await;

    Ok(ApiResponse::success(
        "Added to cart",
        cart_item,
        Some(Meta::empty()),
    ))
}
