use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::repository::record_store::Record;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageType {
    Image,
    Document,
    Video,
    Audio,
    #[default]
    Other,
}

impl StorageType {
    /// Classifies an upload from its MIME type, falling back to the file extension.
    pub fn detect(content_type: &str, filename: &str) -> Self {
        let mime = content_type.to_ascii_lowercase();
        if mime.starts_with("image/") {
            return StorageType::Image;
        }
        if mime.starts_with("video/") {
            return StorageType::Video;
        }
        if mime.starts_with("audio/") {
            return StorageType::Audio;
        }
        if mime == "application/pdf"
            || mime.starts_with("text/")
            || mime.contains("word")
            || mime.contains("excel")
            || mime.contains("spreadsheet")
            || mime.contains("presentation")
        {
            return StorageType::Document;
        }

        let ext = filename
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "png" | "jpg" | "jpeg" | "gif" | "webp" | "svg" => StorageType::Image,
            "mp4" | "mov" | "avi" | "mkv" | "webm" => StorageType::Video,
            "mp3" | "wav" | "ogg" | "m4a" => StorageType::Audio,
            "pdf" | "doc" | "docx" | "xls" | "xlsx" | "ppt" | "pptx" | "txt" | "csv" => StorageType::Document,
            _ => StorageType::Other,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageStatus {
    #[default]
    Active,
    Archived,
}

impl StorageStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageStatus::Active => "active",
            StorageStatus::Archived => "archived",
        }
    }
}

impl std::str::FromStr for StorageStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "active" => Ok(StorageStatus::Active),
            "archived" => Ok(StorageStatus::Archived),
            other => Err(format!("Unknown file status: {}", other)),
        }
    }
}

/// Metadata of an uploaded file; the bytes live in the object store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageFile {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub name: String,
    #[serde(default)]
    pub file_type: StorageType,
    pub size: u64,
    pub url: String,
    pub object_key: String,
    #[serde(default)]
    pub content_type: Option<String>,
    #[serde(default)]
    pub status: StorageStatus,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl Record for StorageFile {
    const COLLECTION: &'static str = "storage";
    const LABEL: &'static str = "file";

    fn id(&self) -> Option<ObjectId> {
        self.id
    }

    fn set_id(&mut self, id: ObjectId) {
        self.id = Some(id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_from_mime() {
        assert_eq!(StorageType::detect("image/png", "x"), StorageType::Image);
        assert_eq!(StorageType::detect("application/pdf", "x"), StorageType::Document);
        assert_eq!(StorageType::detect("video/mp4", "x"), StorageType::Video);
        assert_eq!(StorageType::detect("audio/mpeg", "x"), StorageType::Audio);
    }

    #[test]
    fn test_detect_falls_back_to_extension() {
        assert_eq!(StorageType::detect("application/octet-stream", "floorplan.JPG"), StorageType::Image);
        assert_eq!(StorageType::detect("", "contract.docx"), StorageType::Document);
        assert_eq!(StorageType::detect("", "archive.zip"), StorageType::Other);
        assert_eq!(StorageType::detect("", "noextension"), StorageType::Other);
    }
}
