use crate::error::{AppError, AppResult};
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

pub const SCOPE_CUSTOMER: &str = "customer";
pub const SCOPE_ADMIN: &str = "admin";

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // customer_id 或 account_id
    pub email: String,
    pub scope: String, // "customer" or "admin"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role_id: Option<i32>,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn subject_id(&self) -> AppResult<i32> {
        self.sub
            .parse::<i32>()
            .map_err(|_| AppError::AuthError("Invalid token subject".to_string()))
    }
}

#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    customer_token_expires_in: i64,
    admin_token_expires_in: i64,
}

impl JwtService {
    pub fn new(secret: &str, customer_expires_in: i64, admin_expires_in: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            customer_token_expires_in: customer_expires_in,
            admin_token_expires_in: admin_expires_in,
        }
    }

    pub fn generate_customer_token(&self, customer_id: i32, email: &str) -> AppResult<String> {
        let now = Utc::now();
        let exp = now + Duration::seconds(self.customer_token_expires_in);

        let claims = Claims {
            sub: customer_id.to_string(),
            email: email.to_string(),
            scope: SCOPE_CUSTOMER.to_string(),
            role_id: None,
            exp: exp.timestamp(),
            iat: now.timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding_key).map_err(AppError::JwtError)
    }

    pub fn generate_admin_token(
        &self,
        account_id: i32,
        email: &str,
        role_id: i32,
    ) -> AppResult<String> {
        let now = Utc::now();
        let exp = now + Duration::seconds(self.admin_token_expires_in);

        let claims = Claims {
            sub: account_id.to_string(),
            email: email.to_string(),
            scope: SCOPE_ADMIN.to_string(),
            role_id: Some(role_id),
            exp: exp.timestamp(),
            iat: now.timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding_key).map_err(AppError::JwtError)
    }

    pub fn verify_token(&self, token: &str) -> AppResult<Claims> {
        let validation = Validation::new(Algorithm::HS256);
        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(AppError::JwtError)
    }

    pub fn verify_customer_token(&self, token: &str) -> AppResult<Claims> {
        let claims = self.verify_token(token)?;

        if claims.scope != SCOPE_CUSTOMER {
            return Err(AppError::AuthError("Invalid customer token scope".to_string()));
        }

        Ok(claims)
    }

    pub fn verify_admin_token(&self, token: &str) -> AppResult<Claims> {
        let claims = self.verify_token(token)?;

        if claims.scope != SCOPE_ADMIN || claims.role_id.is_none() {
            return Err(AppError::AuthError("Invalid admin token scope".to_string()));
        }

        Ok(claims)
    }

    pub fn customer_token_expires_in(&self) -> i64 {
        self.customer_token_expires_in
    }

    pub fn admin_token_expires_in(&self) -> i64 {
        self.admin_token_expires_in
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> JwtService {
        JwtService::new("unit-test-secret", 3600, 600)
    }

    #[test]
    fn test_customer_token_scope() {
        let jwt = service();
        let token = jwt.generate_customer_token(7, "a@b.com").unwrap();
        let claims = jwt.verify_customer_token(&token).unwrap();
        assert_eq!(claims.subject_id().unwrap(), 7);
        assert!(jwt.verify_admin_token(&token).is_err());
    }

    #[test]
    fn test_admin_token_scope() {
        let jwt = service();
        let token = jwt.generate_admin_token(3, "admin@shop.com", 1).unwrap();
        let claims = jwt.verify_admin_token(&token).unwrap();
        assert_eq!(claims.role_id, Some(1));
        assert!(jwt.verify_customer_token(&token).is_err());
    }

    #[test]
    fn test_token_signed_with_other_secret_is_rejected() {
        let token = service().generate_customer_token(1, "a@b.com").unwrap();
        let other = JwtService::new("another-secret", 3600, 600);
        assert!(other.verify_token(&token).is_err());
    }
}
