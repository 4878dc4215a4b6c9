use crate::config::UploadConfig;
use crate::error::{AppError, AppResult};
use crate::utils::upload::{build_file_name, image_extension, validate_folder};
use std::path::PathBuf;

/// 图片上传：写入 {dir}/{folder}/，返回 /uploads/{folder}/{file}
#[derive(Clone)]
pub struct UploadService {
    config: UploadConfig,
}

impl UploadService {
    pub fn new(config: UploadConfig) -> Self {
        Self { config }
    }

    pub fn max_bytes(&self) -> usize {
        self.config.max_bytes
    }

    pub fn root(&self) -> PathBuf {
        PathBuf::from(&self.config.dir)
    }

    pub async fn save(
        &self,
        folder: &str,
        name_hint: &str,
        original_name: &str,
        bytes: &[u8],
    ) -> AppResult<String> {
        validate_folder(folder)?;
        let ext = image_extension(original_name)?;
        if bytes.is_empty() {
            return Err(AppError::ValidationError("Uploaded file is empty".to_string()));
        }
        if bytes.len() > self.config.max_bytes {
            return Err(AppError::ValidationError(format!(
                "File exceeds the {} byte limit",
                self.config.max_bytes
            )));
        }

        let hint = match name_hint.trim() {
            "" => original_name
                .rsplit_once('.')
                .map(|(stem, _)| stem)
                .unwrap_or(original_name),
            hint => hint,
        };
        let file_name = build_file_name(hint, &ext);

        let dir = self.root().join(folder);
        tokio::fs::create_dir_all(&dir).await?;
        tokio::fs::write(dir.join(&file_name), bytes).await?;

        log::info!("Stored upload {folder}/{file_name} ({} bytes)", bytes.len());
        Ok(format!("/uploads/{folder}/{file_name}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service(dir: &std::path::Path, max_bytes: usize) -> UploadService {
        UploadService::new(UploadConfig {
            dir: dir.to_string_lossy().to_string(),
            max_bytes,
        })
    }

    #[tokio::test]
    async fn test_save_writes_under_folder() {
        let tmp = tempfile::tempdir().unwrap();
        let svc = service(tmp.path(), 1024);

        let path = svc
            .save("products", "Áo Thun", "photo.PNG", b"png-bytes")
            .await
            .unwrap();
        assert!(path.starts_with("/uploads/products/ao-thun-"));
        assert!(path.ends_with(".png"));

        let file_name = path.rsplit('/').next().unwrap();
        let stored = std::fs::read(tmp.path().join("products").join(file_name)).unwrap();
        assert_eq!(stored, b"png-bytes");
    }

    #[tokio::test]
    async fn test_save_rejects_oversized_and_bad_type() {
        let tmp = tempfile::tempdir().unwrap();
        let svc = service(tmp.path(), 4);

        assert!(svc.save("products", "x", "a.jpg", b"too large").await.is_err());
        assert!(svc.save("products", "x", "a.exe", b"ok").await.is_err());
        assert!(svc.save("../secret", "x", "a.jpg", b"ok").await.is_err());
    }
}
