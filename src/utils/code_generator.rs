use rand::Rng;

// 去掉易混淆字符 0/O/1/I
const VOUCHER_CHARSET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";
const SUFFIX_CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

fn random_string(charset: &[u8], len: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..len)
        .map(|_| charset[rng.gen_range(0..charset.len())] as char)
        .collect()
}

/// 生成优惠券码，例如 prefix = "SALE" -> "SALE-7KQ2M9XA"
pub fn generate_voucher_code(prefix: &str, len: usize) -> String {
    let body = random_string(VOUCHER_CHARSET, len);
    let prefix = prefix.trim().to_uppercase();
    if prefix.is_empty() {
        body
    } else {
        format!("{prefix}-{body}")
    }
}

/// 上传文件名使用的短随机后缀
pub fn generate_short_suffix() -> String {
    random_string(SUFFIX_CHARSET, 6)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_voucher_code_with_prefix() {
        let code = generate_voucher_code("sale", 8);
        assert!(code.starts_with("SALE-"));
        assert_eq!(code.len(), 13);
        assert!(code[5..].bytes().all(|b| VOUCHER_CHARSET.contains(&b)));
    }

    #[test]
    fn test_generate_voucher_code_without_prefix() {
        let code = generate_voucher_code("  ", 10);
        assert_eq!(code.len(), 10);
        assert!(!code.contains('-'));
    }

    #[test]
    fn test_generate_short_suffix() {
        let s = generate_short_suffix();
        assert_eq!(s.len(), 6);
        assert!(s.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()));
    }
}
