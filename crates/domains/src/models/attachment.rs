use base64::{engine::general_purpose::STANDARD, Engine};
use serde::{Deserialize, Serialize};

/// A fully materialised blob (image or document) attached to a listing.
///
/// Reading the file is the caller's job; by the time a descriptor reaches
/// the store its content is already a `data:` URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub name: String,
    /// MIME type as reported by the uploader (e.g., "image/jpeg")
    #[serde(rename = "type")]
    pub mime: String,
    pub size: u64,
    pub content: String,
}

impl Attachment {
    /// Builds a descriptor from raw bytes, the way a file reader would.
    /// An empty or missing MIME type is guessed from the file name.
    pub fn from_bytes(name: impl Into<String>, mime: Option<&str>, data: &[u8]) -> Self {
        let name = name.into();
        let mime = match mime.map(str::trim).filter(|m| !m.is_empty()) {
            Some(m) => m.to_string(),
            None => mime_guess::from_path(&name)
                .first_or_octet_stream()
                .essence_str()
                .to_string(),
        };
        let content = format!("data:{};base64,{}", mime, STANDARD.encode(data));
        Self {
            name,
            mime,
            size: data.len() as u64,
            content,
        }
    }

    pub fn is_image(&self) -> bool {
        self.mime
            .parse::<mime::Mime>()
            .map(|m| m.type_() == mime::IMAGE)
            .unwrap_or(false)
    }
}
