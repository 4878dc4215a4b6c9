pub mod auth;
pub mod cors;

pub use auth::{
    ADMIN_AUTH_COOKIE, AdminGuard, AdminIdentity, AuthMiddleware, CUSTOMER_AUTH_COOKIE, CustomerIdentity,
    auth_cookie, current_customer, expired_cookie, require_admin, require_customer,
    require_super_admin,
};
pub use cors::create_cors;
