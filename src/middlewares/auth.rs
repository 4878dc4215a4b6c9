use crate::error::{AppError, AppResult};
use crate::utils::{Claims, JwtService};
use actix_web::cookie::{Cookie, SameSite, time::Duration as CookieDuration};
use actix_web::http::Method;
use actix_web::{
    Error, HttpMessage, HttpRequest,
    dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
    web,
};
use futures_util::future::LocalBoxFuture;
use std::future::{Ready, ready};

pub const CUSTOMER_AUTH_COOKIE: &str = "CustomerAuthentication";
pub const ADMIN_AUTH_COOKIE: &str = "AdminAuthentication";

/// 已登录客户（前台）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerIdentity {
    pub customer_id: i32,
    pub email: String,
}

/// 已登录后台账号
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminIdentity {
    pub account_id: i32,
    pub email: String,
    pub role_id: i32,
}

impl CustomerIdentity {
    fn from_claims(claims: &Claims) -> AppResult<Self> {
        Ok(Self {
            customer_id: claims.subject_id()?,
            email: claims.email.clone(),
        })
    }
}

impl AdminIdentity {
    fn from_claims(claims: &Claims) -> AppResult<Self> {
        let role_id = claims
            .role_id
            .ok_or_else(|| AppError::AuthError("Missing role".to_string()))?;
        Ok(Self {
            account_id: claims.subject_id()?,
            email: claims.email.clone(),
            role_id,
        })
    }
}

/// 路由访问级别
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Access {
    Public,
    /// 公开，但若带有效客户令牌则识别身份（购物车）
    OptionalCustomer,
    Customer,
    Admin,
}

struct RouteRules {
    public_exact: Vec<&'static str>,
    public_prefix: Vec<&'static str>,
    customer_prefix: Vec<&'static str>,
    admin_prefix: &'static str,
    admin_public: Vec<&'static str>,
}

impl RouteRules {
    fn new() -> Self {
        Self {
            public_exact: vec!["/swagger-ui", "/swagger-ui/", "/api-docs/openapi.json"],
            public_prefix: vec!["/swagger-ui/", "/api-docs/", "/uploads/"],
            customer_prefix: vec![
                "/api/v1/account",
                "/api/v1/checkout",
                "/api/v1/orders",
                "/api/v1/loyalty",
            ],
            admin_prefix: "/api/v1/admin",
            admin_public: vec!["/api/v1/admin/auth/login"],
        }
    }

    fn access(&self, path: &str) -> Access {
        if self.public_exact.contains(&path)
            || self.public_prefix.iter().any(|p| path.starts_with(p))
        {
            return Access::Public;
        }
        if path == self.admin_prefix || path.starts_with(&format!("{}/", self.admin_prefix)) {
            if self.admin_public.contains(&path) {
                return Access::Public;
            }
            return Access::Admin;
        }
        if self.customer_prefix.iter().any(|p| path.starts_with(p)) {
            return Access::Customer;
        }
        Access::OptionalCustomer
    }
}

/// 令牌来源：Cookie 优先，其次 `Authorization: Bearer`
fn extract_token(req: &ServiceRequest, cookie_name: &str) -> Option<String> {
    if let Some(cookie) = req.cookie(cookie_name)
        && !cookie.value().is_empty()
    {
        return Some(cookie.value().to_string());
    }
    req.headers()
        .get("Authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(|t| t.trim().to_string())
}

pub struct AuthMiddleware {
    jwt_service: JwtService,
}

impl AuthMiddleware {
    pub fn new(jwt_service: JwtService) -> Self {
        Self { jwt_service }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = AuthMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService {
            service,
            jwt_service: self.jwt_service.clone(),
            rules: RouteRules::new(),
        }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: S,
    jwt_service: JwtService,
    rules: RouteRules,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        // 放行所有 CORS 预检请求
        if req.method() == Method::OPTIONS {
            return Box::pin(self.service.call(req));
        }

        match self.rules.access(req.path()) {
            Access::Public => Box::pin(self.service.call(req)),
            Access::Admin => {
                let identity = match extract_token(&req, ADMIN_AUTH_COOKIE) {
                    Some(token) => self
                        .jwt_service
                        .verify_admin_token(&token)
                        .and_then(|claims| AdminIdentity::from_claims(&claims)),
                    None => Err(AppError::AuthError("Missing admin token".to_string())),
                };
                match identity {
                    Ok(identity) => {
                        req.extensions_mut().insert(identity);
                        Box::pin(self.service.call(req))
                    }
                    Err(e) => Box::pin(async move { Err(e.into()) }),
                }
            }
            access => {
                let identity = extract_token(&req, CUSTOMER_AUTH_COOKIE).map(|token| {
                    self.jwt_service
                        .verify_customer_token(&token)
                        .and_then(|claims| CustomerIdentity::from_claims(&claims))
                });
                match (identity, access) {
                    (Some(Ok(identity)), _) => {
                        req.extensions_mut().insert(identity);
                        Box::pin(self.service.call(req))
                    }
                    (Some(Err(e)), Access::Customer) => Box::pin(async move { Err(e.into()) }),
                    (None, Access::Customer) => {
                        let error = AppError::AuthError("Please sign in first".to_string());
                        Box::pin(async move { Err(error.into()) })
                    }
                    // 可选身份的路由上，无效令牌按匿名处理
                    _ => Box::pin(self.service.call(req)),
                }
            }
        }
    }
}

/// 后台作用域守卫：挂在 `/admin` 路由组上，按路由匹配结果而非原始路径生效
///
/// 请求若尚未被 [`AuthMiddleware`] 识别为后台账号，则自行校验后台令牌。
pub struct AdminGuard;

impl<S, B> Transform<S, ServiceRequest> for AdminGuard
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = AdminGuardService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AdminGuardService { service }))
    }
}

pub struct AdminGuardService<S> {
    service: S,
}

impl<S> AdminGuardService<S> {
    fn identify(req: &ServiceRequest) -> AppResult<AdminIdentity> {
        if let Some(identity) = req.extensions().get::<AdminIdentity>() {
            return Ok(identity.clone());
        }
        let token = extract_token(req, ADMIN_AUTH_COOKIE)
            .ok_or_else(|| AppError::AuthError("Missing admin token".to_string()))?;
        let jwt_service = req
            .app_data::<web::Data<JwtService>>()
            .ok_or_else(|| AppError::ConfigError("JWT service is not registered".to_string()))?;
        let claims = jwt_service.verify_admin_token(&token)?;
        AdminIdentity::from_claims(&claims)
    }
}

impl<S, B> Service<ServiceRequest> for AdminGuardService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        if req.method() == Method::OPTIONS {
            return Box::pin(self.service.call(req));
        }
        match Self::identify(&req) {
            Ok(identity) => {
                req.extensions_mut().insert(identity);
                Box::pin(self.service.call(req))
            }
            Err(e) => {
                log::warn!("Rejected admin request to {}: {e}", req.path());
                Box::pin(async move { Err(e.into()) })
            }
        }
    }
}

pub fn current_customer(req: &HttpRequest) -> Option<CustomerIdentity> {
    req.extensions().get::<CustomerIdentity>().cloned()
}

pub fn require_customer(req: &HttpRequest) -> AppResult<CustomerIdentity> {
    current_customer(req).ok_or_else(|| AppError::AuthError("Please sign in first".to_string()))
}

pub fn require_admin(req: &HttpRequest) -> AppResult<AdminIdentity> {
    req.extensions()
        .get::<AdminIdentity>()
        .cloned()
        .ok_or_else(|| AppError::AuthError("Missing admin token".to_string()))
}

/// 账号与角色管理仅限超级管理员角色
pub fn require_super_admin(req: &HttpRequest, super_admin_role_id: i32) -> AppResult<AdminIdentity> {
    let admin = require_admin(req)?;
    if admin.role_id != super_admin_role_id {
        return Err(AppError::PermissionDenied);
    }
    Ok(admin)
}

/// 登录令牌 Cookie（HttpOnly）
pub fn auth_cookie(name: &'static str, token: String, max_age_secs: i64, secure: bool) -> Cookie<'static> {
    Cookie::build(name, token)
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .max_age(CookieDuration::seconds(max_age_secs))
        .finish()
}

pub fn expired_cookie(name: &'static str) -> Cookie<'static> {
    let mut cookie = Cookie::build(name, "").path("/").finish();
    cookie.make_removal();
    cookie
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_access_levels() {
        let rules = RouteRules::new();
        assert_eq!(rules.access("/swagger-ui/index.html"), Access::Public);
        assert_eq!(rules.access("/api/v1/admin/auth/login"), Access::Public);
        assert_eq!(rules.access("/api/v1/admin/orders"), Access::Admin);
        assert_eq!(rules.access("/api/v1/admin"), Access::Admin);
        assert_eq!(rules.access("/api/v1/administrators"), Access::OptionalCustomer);
        assert_eq!(rules.access("/api/v1/checkout/preview"), Access::Customer);
        assert_eq!(rules.access("/api/v1/orders/3/cancel"), Access::Customer);
        assert_eq!(rules.access("/api/v1/cart"), Access::OptionalCustomer);
        assert_eq!(rules.access("/api/v1/ao-thun.html"), Access::OptionalCustomer);
    }

    #[test]
    fn test_expired_cookie_is_removal() {
        let cookie = expired_cookie(CUSTOMER_AUTH_COOKIE);
        assert_eq!(cookie.value(), "");
        assert_eq!(cookie.max_age(), Some(CookieDuration::ZERO));
    }
}
