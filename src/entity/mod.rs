pub mod audit_logs;
pub mod cart_items;
pub mod orders;
pub mod products;
pub mod wishlist;

pub use audit_logs::Entity as AuditLogs;
pub use cart_items::Entity as CartItems;
pub use orders::Entity as Orders;
pub use products::Entity as Products;
pub use wishlist::Entity as Wishlist;
