pub mod account_service;
pub mod admin_order_service;
pub mod auth_service;
pub mod cart_service;
pub mod catalog_service;
pub mod category_service;
pub mod checkout_service;
pub mod content_service;
pub mod customer_service;
pub mod dashboard_service;
pub mod inventory;
pub mod loyalty_service;
pub mod order_release;
pub mod order_service;
pub mod pricing;
pub mod product_service;
pub mod promotion_service;
pub mod supplier_service;
pub mod upload_service;
pub mod voucher_service;

pub use account_service::AccountService;
pub use admin_order_service::AdminOrderService;
pub use auth_service::AuthService;
pub use cart_service::CartService;
pub use catalog_service::CatalogService;
pub use category_service::CategoryService;
pub use checkout_service::CheckoutService;
pub use content_service::ContentService;
pub use customer_service::CustomerService;
pub use dashboard_service::DashboardService;
pub use loyalty_service::LoyaltyService;
pub use order_service::OrderService;
pub use product_service::ProductService;
pub use promotion_service::PromotionService;
pub use supplier_service::SupplierService;
pub use upload_service::UploadService;
pub use voucher_service::VoucherService;
