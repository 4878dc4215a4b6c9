use crate::error::{AppError, AppResult};
use crate::utils::{generate_short_suffix, slugify};

pub const ALLOWED_IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp"];
pub const UPLOAD_FOLDERS: &[&str] = &["products", "categories", "pages", "news", "avatars"];

/// 从原始文件名中取出小写扩展名并校验
pub fn image_extension(original_name: &str) -> AppResult<String> {
    let ext = original_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .ok_or_else(|| AppError::ValidationError("File has no extension".to_string()))?;

    if !ALLOWED_IMAGE_EXTENSIONS.contains(&ext.as_str()) {
        return Err(AppError::ValidationError(format!(
            "File type .{ext} is not allowed"
        )));
    }
    Ok(ext)
}

pub fn validate_folder(folder: &str) -> AppResult<()> {
    if !UPLOAD_FOLDERS.contains(&folder) {
        return Err(AppError::ValidationError(format!(
            "Unknown upload folder: {folder}"
        )));
    }
    Ok(())
}

/// 生成存储文件名：{slug(name)}-{随机后缀}.{ext}
pub fn build_file_name(name_hint: &str, ext: &str) -> String {
    let mut base = slugify(name_hint);
    if base.is_empty() {
        base = "file".to_string();
    }
    base.truncate(60);
    let base = base.trim_end_matches('-');
    format!("{base}-{}.{ext}", generate_short_suffix())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_extension() {
        assert_eq!(image_extension("Photo.JPG").unwrap(), "jpg");
        assert_eq!(image_extension("a.b.webp").unwrap(), "webp");
        assert!(image_extension("script.exe").is_err());
        assert!(image_extension("noext").is_err());
    }

    #[test]
    fn test_build_file_name() {
        let name = build_file_name("Áo Khoác Gió", "png");
        assert!(name.starts_with("ao-khoac-gio-"));
        assert!(name.ends_with(".png"));

        let fallback = build_file_name("***", "gif");
        assert!(fallback.starts_with("file-"));
    }

    #[test]
    fn test_validate_folder() {
        assert!(validate_folder("products").is_ok());
        assert!(validate_folder("../etc").is_err());
    }
}
