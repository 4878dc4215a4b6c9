use actix_web::web;
use utoipa::OpenApi;
use utoipa::{
    Modify,
    openapi::security::{Http, HttpAuthScheme, SecurityScheme},
};
use utoipa_swagger_ui::SwaggerUi;

use crate::entities::{DiscountType, PaymentMethod, TransactStatus};
use crate::handlers;
use crate::models::*;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
            )
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::auth::register,
        handlers::auth::login,
        handlers::auth::logout,
        handlers::account::get_profile,
        handlers::account::update_profile,
        handlers::account::change_password,
        handlers::account::upload_avatar,
        handlers::cart::get_cart,
        handlers::cart::add_item,
        handlers::cart::update_item,
        handlers::cart::remove_item,
        handlers::cart::sync_cart,
        handlers::cart::buy_now,
        handlers::cart::clear_cart,
        handlers::checkout::preview,
        handlers::checkout::available_vouchers,
        handlers::checkout::place_order,
        handlers::order::get_orders,
        handlers::order::get_order,
        handlers::order::cancel_order,
        handlers::catalog::home,
        handlers::catalog::list_products,
        handlers::catalog::product_detail,
        handlers::catalog::post_comment,
        handlers::catalog::categories,
        handlers::catalog::category_products,
        handlers::catalog::locations,
        handlers::content::list_pages,
        handlers::content::get_page,
        handlers::content::list_news,
        handlers::content::get_news,
        handlers::loyalty::status,
        handlers::loyalty::check_in,
        handlers::loyalty::history,
        handlers::loyalty::tiers,
        handlers::loyalty::redeem,
        handlers::loyalty::reward_history,
        handlers::admin::auth::login,
        handlers::admin::auth::logout,
        handlers::admin::auth::me,
        handlers::admin::accounts::list_accounts,
        handlers::admin::accounts::get_account,
        handlers::admin::accounts::create_account,
        handlers::admin::accounts::update_account,
        handlers::admin::accounts::delete_account,
        handlers::admin::accounts::toggle_account,
        handlers::admin::accounts::list_roles,
        handlers::admin::accounts::get_role,
        handlers::admin::accounts::create_role,
        handlers::admin::accounts::update_role,
        handlers::admin::accounts::delete_role,
        handlers::admin::customers::list_customers,
        handlers::admin::customers::get_customer,
        handlers::admin::customers::toggle_customer,
        handlers::admin::customers::delete_customer,
        handlers::admin::categories::list_categories,
        handlers::admin::categories::get_category,
        handlers::admin::categories::create_category,
        handlers::admin::categories::update_category,
        handlers::admin::categories::delete_category,
        handlers::admin::categories::toggle_category,
        handlers::admin::categories::list_suppliers,
        handlers::admin::categories::get_supplier,
        handlers::admin::categories::create_supplier,
        handlers::admin::categories::update_supplier,
        handlers::admin::categories::delete_supplier,
        handlers::admin::categories::toggle_supplier,
        handlers::admin::products::list_products,
        handlers::admin::products::get_product,
        handlers::admin::products::create_product,
        handlers::admin::products::edit_product,
        handlers::admin::products::delete_product,
        handlers::admin::products::toggle_product,
        handlers::admin::products::set_variant_stock,
        handlers::admin::products::toggle_variant,
        handlers::admin::products::list_sizes,
        handlers::admin::products::create_size,
        handlers::admin::products::list_colors,
        handlers::admin::products::create_color,
        handlers::admin::orders::list_orders,
        handlers::admin::orders::get_order,
        handlers::admin::orders::update_status,
        handlers::admin::orders::edit_order,
        handlers::admin::orders::delete_order,
        handlers::admin::promotions::list_promotions,
        handlers::admin::promotions::get_promotion,
        handlers::admin::promotions::create_promotion,
        handlers::admin::promotions::update_promotion,
        handlers::admin::promotions::delete_promotion,
        handlers::admin::promotions::toggle_promotion,
        handlers::admin::promotions::list_vouchers,
        handlers::admin::promotions::get_voucher,
        handlers::admin::promotions::create_voucher,
        handlers::admin::promotions::create_voucher_batch,
        handlers::admin::promotions::update_voucher,
        handlers::admin::promotions::delete_voucher,
        handlers::admin::promotions::toggle_voucher,
        handlers::admin::content::list_pages,
        handlers::admin::content::get_page,
        handlers::admin::content::create_page,
        handlers::admin::content::update_page,
        handlers::admin::content::delete_page,
        handlers::admin::content::toggle_page,
        handlers::admin::content::list_news,
        handlers::admin::content::get_news,
        handlers::admin::content::create_news,
        handlers::admin::content::update_news,
        handlers::admin::content::delete_news,
        handlers::admin::content::toggle_news,
        handlers::admin::content::list_comments,
        handlers::admin::content::toggle_comment,
        handlers::admin::content::delete_comment,
        handlers::admin::dashboard::summary,
        handlers::admin::dashboard::revenue,
        handlers::admin::dashboard::list_rewards,
        handlers::admin::dashboard::confirm_reward,
        handlers::admin::dashboard::upload_image,
    ),
    components(
        schemas(
            TransactStatus,
            PaymentMethod,
            DiscountType,
            ApiError,
            IdResponse,
            ToggleResponse,
            UploadResponse,
            CustomerResponse,
            RegisterRequest,
            LoginRequest,
            CustomerAuthResponse,
            UpdateProfileRequest,
            ChangePasswordRequest,
            AdminCustomerDetail,
            CartLine,
            CartResponse,
            CartItemInput,
            UpdateCartItemRequest,
            SyncCartRequest,
            AppliedPromotion,
            VoucherEvaluation,
            CheckoutPreviewResponse,
            AvailableVoucher,
            PlaceOrderRequest,
            OrderResponse,
            OrderDetailResponse,
            OrderWithDetails,
            UpdateOrderStatusRequest,
            OrderLineInput,
            EditOrderRequest,
            ProductSort,
            ProductSummary,
            ProductResponse,
            VariantResponse,
            ProductDetailResponse,
            CategoryResponse,
            CategoryRequest,
            SupplierResponse,
            SupplierRequest,
            SizeResponse,
            SizeRequest,
            ColorResponse,
            ColorRequest,
            LocationResponse,
            CommentResponse,
            CreateCommentRequest,
            HomeResponse,
            ProductRequest,
            AdminProductResponse,
            SetVariantStockRequest,
            PageResponse,
            PageRequest,
            NewsSummary,
            NewsResponse,
            NewsRequest,
            CheckInResponse,
            CheckInHistoryResponse,
            RewardTier,
            LoyaltyStatusResponse,
            RewardHistoryResponse,
            RedeemRequest,
            RedeemResponse,
            PromotionResponse,
            CreatePromotionRequest,
            UpdatePromotionRequest,
            VoucherResponse,
            VoucherRequest,
            CreateVoucherBatchRequest,
            AccountResponse,
            AdminLoginRequest,
            AdminAuthResponse,
            CreateAccountRequest,
            UpdateAccountRequest,
            RoleResponse,
            RoleRequest,
            StatusCount,
            LowStockVariant,
            DashboardSummary,
            RevenuePoint,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "auth", description = "Customer authentication API"),
        (name = "account", description = "Customer profile API"),
        (name = "cart", description = "Shopping cart API"),
        (name = "checkout", description = "Checkout API"),
        (name = "order", description = "Customer order API"),
        (name = "catalog", description = "Storefront catalog API"),
        (name = "content", description = "Pages and news API"),
        (name = "loyalty", description = "Check-in and reward API"),
        (name = "admin", description = "Back-office API"),
    ),
    info(
        title = "WebShop Backend API",
        version = "1.0.0",
        description = "WebShop storefront and back-office REST API documentation",
    ),
    servers(
        (url = "/api/v1", description = "Local server")
    )
)]
pub struct ApiDoc;

pub fn swagger_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
    )
    .route(
        "/swagger-ui",
        web::get().to(|| async {
            actix_web::HttpResponse::Found()
                .append_header(("Location", "/swagger-ui/"))
                .finish()
        }),
    );
}
