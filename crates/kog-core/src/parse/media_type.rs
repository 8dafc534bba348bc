use serde::{Deserialize, Serialize};

use super::schema::SchemaOrRef;

/// A media type object.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MediaType {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<SchemaOrRef>,
}

/// The content kinds the generator distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    Json,
    Multipart,
    OctetStream,
    Xml,
    Other,
}

impl ContentKind {
    pub fn of(content_type: &str) -> Self {
        let essence = content_type
            .split(';')
            .next()
            .unwrap_or(content_type)
            .trim()
            .to_ascii_lowercase();
        match essence.as_str() {
            "application/json" => ContentKind::Json,
            "multipart/form-data" => ContentKind::Multipart,
            "application/octet-stream" => ContentKind::OctetStream,
            "application/xml" | "text/xml" => ContentKind::Xml,
            e if e.ends_with("+json") => ContentKind::Json,
            _ => ContentKind::Other,
        }
    }
}
