use super::generate_short_suffix;
use crate::error::AppResult;

/// 将带重音/越南语字符的字母折叠为 ASCII
fn fold_char(c: char) -> Option<char> {
    let folded = match c {
        'a'..='z' | '0'..='9' => c,
        'à' | 'á' | 'ạ' | 'ả' | 'ã' | 'â' | 'ầ' | 'ấ' | 'ậ' | 'ẩ' | 'ẫ' | 'ă' | 'ằ' | 'ắ'
        | 'ặ' | 'ẳ' | 'ẵ' | 'ä' | 'å' => 'a',
        'è' | 'é' | 'ẹ' | 'ẻ' | 'ẽ' | 'ê' | 'ề' | 'ế' | 'ệ' | 'ể' | 'ễ' | 'ë' => 'e',
        'ì' | 'í' | 'ị' | 'ỉ' | 'ĩ' | 'î' | 'ï' => 'i',
        'ò' | 'ó' | 'ọ' | 'ỏ' | 'õ' | 'ô' | 'ồ' | 'ố' | 'ộ' | 'ổ' | 'ỗ' | 'ơ' | 'ờ' | 'ớ'
        | 'ợ' | 'ở' | 'ỡ' | 'ö' | 'ø' => 'o',
        'ù' | 'ú' | 'ụ' | 'ủ' | 'ũ' | 'ư' | 'ừ' | 'ứ' | 'ự' | 'ử' | 'ữ' | 'û' | 'ü' => 'u',
        'ỳ' | 'ý' | 'ỵ' | 'ỷ' | 'ỹ' | 'ÿ' => 'y',
        'đ' => 'd',
        'ç' => 'c',
        'ñ' => 'n',
        _ => return None,
    };
    Some(folded)
}

/// 生成 SEO 友好的别名，例如 "Áo Thun Nam!" -> "ao-thun-nam"
pub fn slugify(input: &str) -> String {
    let mut slug = String::with_capacity(input.len());
    let mut pending_dash = false;

    for c in input.chars().flat_map(char::to_lowercase) {
        match fold_char(c) {
            Some(ascii) => {
                if pending_dash && !slug.is_empty() {
                    slug.push('-');
                }
                pending_dash = false;
                slug.push(ascii);
            }
            None => pending_dash = true,
        }
    }

    slug
}

/// 生成不重复的别名：已被占用时依次追加 -2、-3 ...
///
/// `taken` 判断别名是否已存在。
pub async fn unique_slug<F, Fut>(source: &str, fallback: &str, mut taken: F) -> AppResult<String>
where
    F: FnMut(String) -> Fut,
    Fut: Future<Output = AppResult<bool>>,
{
    let mut base = slugify(source);
    if base.is_empty() {
        base = fallback.to_string();
    }
    if !taken(base.clone()).await? {
        return Ok(base);
    }
    for n in 2..100 {
        let candidate = format!("{base}-{n}");
        if !taken(candidate.clone()).await? {
            return Ok(candidate);
        }
    }
    Ok(format!("{base}-{}", generate_short_suffix()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify_basic() {
        assert_eq!(slugify("Summer Dress 2024"), "summer-dress-2024");
        assert_eq!(slugify("  --Hello,   World!--  "), "hello-world");
    }

    #[test]
    fn test_slugify_folds_diacritics() {
        assert_eq!(slugify("Áo Thun Nam"), "ao-thun-nam");
        assert_eq!(slugify("Đầm Công Sở"), "dam-cong-so");
    }

    #[test]
    fn test_slugify_empty() {
        assert_eq!(slugify("!!!"), "");
    }

    #[tokio::test]
    async fn test_unique_slug_appends_counter() {
        let taken = ["ao-thun".to_string(), "ao-thun-2".to_string()];
        let slug = unique_slug("Áo thun", "product", |c| {
            let hit = taken.contains(&c);
            async move { Ok(hit) }
        })
        .await
        .unwrap();
        assert_eq!(slug, "ao-thun-3");

        let slug = unique_slug("!!!", "product", |_| async { Ok(false) })
            .await
            .unwrap();
        assert_eq!(slug, "product");
    }
}
