use crate::error::{AppError, AppResult};
use bcrypt::{DEFAULT_COST, hash, verify};

/// 验证密码强度：至少 6 位，需同时包含字母和数字
pub fn validate_password(password: &str) -> AppResult<()> {
    if password.len() < 6 || password.len() > 128 {
        return Err(AppError::ValidationError(
            "Password must be between 6 and 128 characters".to_string(),
        ));
    }

    let has_letter = password.chars().any(|c| c.is_alphabetic());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());

    if !has_letter || !has_digit {
        return Err(AppError::ValidationError(
            "Password must contain both letters and digits".to_string(),
        ));
    }

    Ok(())
}

/// 对密码进行哈希
pub fn hash_password(password: &str) -> AppResult<String> {
    hash(password, DEFAULT_COST)
        .map_err(|e| AppError::InternalError(format!("Failed to hash password: {e}")))
}

/// 验证密码
pub fn verify_password(password: &str, hash: &str) -> AppResult<bool> {
    verify(password, hash)
        .map_err(|e| AppError::InternalError(format!("Failed to verify password: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_password() {
        assert!(validate_password("secret1").is_ok());
        assert!(validate_password("abc123").is_ok());
        assert!(validate_password("abcdef").is_err()); // 缺少数字
        assert!(validate_password("123456").is_err()); // 缺少字母
        assert!(validate_password("ab12").is_err()); // 太短
    }

    #[test]
    fn test_hash_and_verify_password() {
        let password = "shop2024";
        let hashed = hash_password(password).unwrap();

        assert!(verify_password(password, &hashed).unwrap());
        assert!(!verify_password("shop2025", &hashed).unwrap());
    }
}
