use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AttachmentError {
    #[error("plik {file_name} nie jest obrazem ({content_type})")]
    NotAnImage {
        file_name: String,
        content_type: String,
    },
}

/// A photo attached to the form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl Attachment {
    /// Accept a file only if its content type is `image/*`
    pub fn image(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Result<Self, AttachmentError> {
        let file_name = file_name.into();
        let content_type = content_type.into();

        if !content_type.starts_with("image/") {
            return Err(AttachmentError::NotAnImage {
                file_name,
                content_type,
            });
        }

        Ok(Self {
            file_name,
            content_type,
            bytes,
        })
    }

    /// Inline `data:` URL usable as an `<img src>` preview
    pub fn preview_data_url(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.content_type,
            STANDARD.encode(&self.bytes)
        )
    }
}
