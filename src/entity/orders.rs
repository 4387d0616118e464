use sea_orm::entity::prelude::*;

// `items` and `shipping_address` are JSON columns; legacy rows may hold a
// JSON string wrapping the structure instead of the structure itself, so
// they stay untyped here and are parsed during normalization.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "orders")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: Uuid,
    pub customer_name: String,
    pub customer_email: String,
    pub order_date: DateTimeWithTimeZone,
    pub status: String,
    pub total_amount: i64,
    pub items: Json,
    pub shipping_address: Json,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
