use serde::Serialize;
use utoipa::ToSchema;

use crate::format::{calculate_discount_price, star_rating};
use crate::models::Product;

#[derive(Debug, Serialize, ToSchema)]
pub struct ProductList {
    pub items: Vec<Product>,
}

/// A product plus its derived price. The final price is computed at read
/// time and never persisted.
#[derive(Debug, Serialize, ToSchema)]
pub struct ProductView {
    pub product: Product,
    pub final_price: i64,
    pub stars: Option<String>,
}

impl From<Product> for ProductView {
    fn from(product: Product) -> Self {
        let final_price =
            calculate_discount_price(product.price, product.discount_percent.unwrap_or(0) as i64);
        let stars = product.rating.map(star_rating);
        Self {
            product,
            final_price,
            stars,
        }
    }
}
