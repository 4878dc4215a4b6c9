use crate::error::{AppError, AppResult};
use regex::Regex;

/// 验证邮箱格式
pub fn validate_email(email: &str) -> AppResult<()> {
    let email_regex = Regex::new(r"^[A-Za-z0-9._%+\-]+@[A-Za-z0-9.\-]+\.[A-Za-z]{2,}$")
        .map_err(|e| AppError::InternalError(format!("Invalid email pattern: {e}")))?;

    if !email_regex.is_match(email) {
        return Err(AppError::ValidationError("Invalid email address".to_string()));
    }

    Ok(())
}

/// 验证手机号：9-11 位数字，可带前导 +
pub fn validate_phone(phone: &str) -> AppResult<()> {
    let phone_regex = Regex::new(r"^\+?\d{9,11}$")
        .map_err(|e| AppError::InternalError(format!("Invalid phone pattern: {e}")))?;

    if !phone_regex.is_match(phone) {
        return Err(AppError::ValidationError("Invalid phone number".to_string()));
    }

    Ok(())
}

/// 去掉空格、横线、括号等分隔符
pub fn normalize_phone(phone: &str) -> String {
    phone
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '+')
        .collect()
}

/// 必填字段校验，返回去除首尾空白后的值
pub fn require_text(field: &str, value: &str) -> AppResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::ValidationError(format!("{field} is required")));
    }
    Ok(trimmed.to_string())
}

/// 可选文本：空白视为 None
pub fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_email() {
        assert!(validate_email("customer@shop.vn").is_ok());
        assert!(validate_email("first.last+tag@mail.example.com").is_ok());
        assert!(validate_email("no-at-sign").is_err());
        assert!(validate_email("a@b").is_err());
    }

    #[test]
    fn test_validate_phone() {
        assert!(validate_phone("0912345678").is_ok());
        assert!(validate_phone("+84912345678").is_ok());
        assert!(validate_phone("12345").is_err());
        assert!(validate_phone("09123abc78").is_err());
    }

    #[test]
    fn test_normalize_phone() {
        assert_eq!(normalize_phone("091 234-5678"), "0912345678");
        assert_eq!(normalize_phone("(+84) 912.345.678"), "+84912345678");
    }

    #[test]
    fn test_require_text() {
        assert_eq!(require_text("name", "  Lan ").unwrap(), "Lan");
        assert!(require_text("name", "   ").is_err());
        assert_eq!(optional_text(Some("  ".into())), None);
        assert_eq!(optional_text(Some(" x ".into())), Some("x".into()));
    }
}
