//! 题目图片附件
//!
//! 负责把本地图片文件转换为视觉模型可接受的 data URL

use std::path::Path;

use base64::{engine::general_purpose::STANDARD, Engine as _};

use crate::error::{AppResult, ModelError};

/// 题目图片
#[derive(Debug, Clone)]
pub struct ImageAttachment {
    bytes: Vec<u8>,
    mime: &'static str,
    source_path: String,
}

impl ImageAttachment {
    /// 从本地文件加载图片
    ///
    /// 按扩展名识别 MIME 类型，只接受常见的照片格式
    pub fn from_path(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let display = path.display().to_string();

        let mime = match path
            .extension()
            .and_then(|s| s.to_str())
            .map(|s| s.to_ascii_lowercase())
            .as_deref()
        {
            Some("jpg") | Some("jpeg") => "image/jpeg",
            Some("png") => "image/png",
            Some("webp") => "image/webp",
            _ => {
                return Err(ModelError::UnsupportedImage { path: display }.into());
            }
        };

        let bytes = std::fs::read(path).map_err(|e| ModelError::ImageReadFailed {
            path: display.clone(),
            source: Box::new(e),
        })?;

        Ok(Self {
            bytes,
            mime,
            source_path: display,
        })
    }

    pub fn source_path(&self) -> &str {
        &self.source_path
    }

    pub fn mime(&self) -> &'static str {
        self.mime
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// 生成 `data:<mime>;base64,...` 形式的 URL，直接嵌入 Vision 消息
    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime, STANDARD.encode(&self.bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_from_path_rejects_unknown_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("question.gif");
        std::fs::File::create(&path)
            .unwrap()
            .write_all(b"xx")
            .unwrap();

        let result = ImageAttachment::from_path(&path);
        assert!(result.is_err());
    }

    #[test]
    fn test_data_url_shape() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("question.png");
        std::fs::File::create(&path)
            .unwrap()
            .write_all(&[1, 2, 3])
            .unwrap();

        let img = ImageAttachment::from_path(&path).unwrap();
        assert_eq!(img.mime(), "image/png");
        assert!(img.to_data_url().starts_with("data:image/png;base64,"));
    }

    #[test]
    fn test_missing_file_is_reported() {
        let result = ImageAttachment::from_path("no_such_dir/question.jpg");
        assert!(result.is_err());
    }
}
