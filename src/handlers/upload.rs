use crate::error::{AppError, AppResult};
use actix_multipart::Multipart;
use futures_util::StreamExt;

/// 表单中解析出的上传文件
pub struct UploadedFile {
    pub original_name: String,
    /// 表单字段 `name`，用于生成文件名
    pub name_hint: String,
    pub bytes: Vec<u8>,
}

/// 读取 multipart 表单：文件字段 `file`，可选文本字段 `name`
pub async fn read_upload(mut payload: Multipart, max_bytes: usize) -> AppResult<UploadedFile> {
    let mut file: Option<(String, Vec<u8>)> = None;
    let mut name_hint = String::new();

    while let Some(item) = payload.next().await {
        let mut field =
            item.map_err(|e| AppError::ValidationError(format!("Invalid upload: {e}")))?;
        let (field_name, file_name) = match field.content_disposition() {
            Some(cd) => (
                cd.get_name().unwrap_or_default().to_string(),
                cd.get_filename().map(str::to_string),
            ),
            None => continue,
        };

        let mut bytes = Vec::new();
        while let Some(chunk) = field.next().await {
            let chunk =
                chunk.map_err(|e| AppError::ValidationError(format!("Invalid upload: {e}")))?;
            if bytes.len() + chunk.len() > max_bytes {
                return Err(AppError::ValidationError(format!(
                    "File exceeds the {max_bytes} byte limit"
                )));
            }
            bytes.extend_from_slice(&chunk);
        }

        match (field_name.as_str(), file_name) {
            ("file", Some(original)) => file = Some((original, bytes)),
            ("name", _) => name_hint = String::from_utf8_lossy(&bytes).trim().to_string(),
            _ => {}
        }
    }

    let (original_name, bytes) =
        file.ok_or_else(|| AppError::ValidationError("No file uploaded".to_string()))?;
    Ok(UploadedFile {
        original_name,
        name_hint,
        bytes,
    })
}
