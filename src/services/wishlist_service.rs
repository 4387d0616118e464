use uuid::Uuid;

use crate::{
    audit::record_audit,
    db::DbPool,
    dto::wishlist::{AddWishlistRequest, WishlistStatus},
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::WishlistEntry,
    response::{ApiResponse, Meta},
};

/// Passive membership probe used by the product card on mount.
pub async fn check_membership(
    pool: &DbPool,
    user: &AuthUser,
    product_id: Uuid,
) -> AppResult<ApiResponse<WishlistStatus>> {
    let existing: Option<(Uuid,)> =
        sqlx::query_as("SELECT id FROM wishlist WHERE user_id = $1 AND product_id = $2")
            .bind(user.user_id)
            .bind(product_id)
            .fetch_optional(pool)
            .await?;

    let data = WishlistStatus {
        wishlisted: existing.is_some(),
    };
    Ok(ApiResponse::success("OK", data, None))
}

pub async fn add_entry(
    pool: &DbPool,
    user: &AuthUser,
    payload: AddWishlistRequest,
) -> AppResult<ApiResponse<WishlistEntry>> {
    let product_exists: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM products WHERE id = $1")
        .bind(payload.product_id)
        .fetch_optional(pool)
        .await?;

    if product_exists.is_none() {
        return Err(AppError::BadRequest("Product not found".into()));
    }

    let existing: Option<WishlistEntry> =
        sqlx::query_as("SELECT * FROM wishlist WHERE user_id = $1 AND product_id = $2")
            .bind(user.user_id)
            .bind(payload.product_id)
            .fetch_optional(pool)
            .await?;

    // One row per (user, product); re-adding is a no-op.
    let entry = if let Some(entry) = existing {
        entry
    } else {
        let id = Uuid::new_v4();
        sqlx::query_as::<_, WishlistEntry>(
            r#"
            INSERT INTO wishlist (id, user_id, product_id)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(user.user_id)
        .bind(payload.product_id)
        .fetch_one(pool)
        .await?
    };

    record_audit(
        pool,
        Some(user.user_id),
        "wishlist_add",
        Some("wishlist"),
        Some(serde_json::json!({ "product_id": payload.product_id })),
    )
    .await;

    Ok(ApiResponse::success(
        "Added to wishlist",
        entry,
        Some(Meta::empty()),
    ))
}

pub async fn remove_entry(
    pool: &DbPool,
    user: &AuthUser,
    product_id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let result = sqlx::query("DELETE FROM wishlist WHERE user_id = $1 AND product_id = $2")
        .bind(user.user_id)
        .bind(product_id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound);
    }

    record_audit(
        pool,
        Some(user.user_id),
        "wishlist_remove",
        Some("wishlist"),
        Some(serde_json::json!({ "product_id": product_id })),
    )
    .await;

    Ok(ApiResponse::success(
        "Removed from wishlist",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}
