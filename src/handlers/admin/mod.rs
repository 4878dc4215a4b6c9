//! 后台接口：全部位于 `/admin` 下；除登录相关外都挂在 [`AdminGuard`] 之后

pub mod accounts;
pub mod auth;
pub mod categories;
pub mod content;
pub mod customers;
pub mod dashboard;
pub mod orders;
pub mod products;
pub mod promotions;

use crate::middlewares::AdminGuard;
use actix_web::web;

pub fn admin_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/admin")
            .configure(auth::admin_auth_config)
            .service(
                web::scope("")
                    .wrap(AdminGuard)
                    .configure(accounts::accounts_config)
                    .configure(customers::customers_config)
                    .configure(products::products_config)
                    .configure(categories::categories_config)
                    .configure(orders::orders_config)
                    .configure(promotions::promotions_config)
                    .configure(content::content_config)
                    .configure(dashboard::dashboard_config),
            ),
    );
}
