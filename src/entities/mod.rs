pub mod accounts;
pub mod categories;
pub mod check_in_histories;
pub mod colors;
pub mod comments;
pub mod customers;
pub mod locations;
pub mod news;
pub mod order_details;
pub mod orders;
pub mod pages;
pub mod product_details;
pub mod products;
pub mod promotion_products;
pub mod promotions;
pub mod reward_histories;
pub mod roles;
pub mod sizes;
pub mod suppliers;
pub mod user_promotions;
pub mod vouchers;

pub use accounts as account_entity;
pub use categories as category_entity;
pub use check_in_histories as check_in_entity;
pub use colors as color_entity;
pub use comments as comment_entity;
pub use customers as customer_entity;
pub use locations as location_entity;
pub use news as news_entity;
pub use order_details as order_detail_entity;
pub use orders as order_entity;
pub use pages as page_entity;
pub use product_details as product_detail_entity;
pub use products as product_entity;
pub use promotion_products as promotion_product_entity;
pub use promotions as promotion_entity;
pub use reward_histories as reward_entity;
pub use roles as role_entity;
pub use sizes as size_entity;
pub use suppliers as supplier_entity;
pub use user_promotions as user_promotion_entity;
pub use vouchers as voucher_entity;

pub use orders::{PaymentMethod, TransactStatus};
pub use vouchers::DiscountType;
