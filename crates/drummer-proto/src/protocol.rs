//! Wire types exchanged with the drum-removal backend.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Server-assigned song identifier.
pub type SongId = String;

/// One processed track as the backend reports it.
///
/// The backend also sends its storage paths (`original`, `processed`); the
/// client has no use for them and they are dropped on decode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Song {
    pub id: SongId,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// `GET /api/version`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VersionInfo {
    pub version: String,
    #[serde(default)]
    pub name: Option<String>,
}

/// Body of `PUT /api/songs/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenameRequest {
    pub name: String,
}

/// Body of `POST /api/youtube`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteUrlRequest {
    pub url: String,
}

/// Body the backend returns alongside a non-2xx status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
}

/// Multipart field name carrying the uploaded file.
pub const UPLOAD_FIELD: &str = "file";

/// Which rendition of a song to download.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DownloadVariant {
    /// Drums removed.
    Processed,
    /// The audio as it was submitted.
    Original,
}

impl DownloadVariant {
    pub fn suffix(self) -> &'static str {
        match self {
            Self::Processed => "_no_drums",
            Self::Original => "_original",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Processed => "processed",
            Self::Original => "original",
        }
    }

    /// Client-side file name for `song_name`, e.g. `Song_no_drums.mp3`.
    pub fn file_name(self, song_name: &str) -> String {
        format!("{}{}.mp3", sanitize_file_stem(song_name), self.suffix())
    }
}

/// Replace characters that are not safe in a file name on any platform.
pub fn sanitize_file_stem(name: &str) -> String {
    let cleaned: String = name
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '-',
            c if c.is_control() => '-',
            c => c,
        })
        .collect();
    let cleaned = cleaned.trim_matches('.').trim();
    if cleaned.is_empty() {
        "song".to_string()
    } else {
        cleaned.to_string()
    }
}

/// API route builders, relative to the backend base URL.
pub mod routes {
    use super::DownloadVariant;

    pub const SONGS: &str = "/api/songs";
    pub const VERSION: &str = "/api/version";
    pub const UPLOAD: &str = "/api/upload";
    pub const YOUTUBE: &str = "/api/youtube";

    pub fn song(id: &str) -> String {
        format!("{}/{}", SONGS, id)
    }

    pub fn download(id: &str, variant: DownloadVariant) -> String {
        match variant {
            DownloadVariant::Processed => format!("/api/download/{}", id),
            DownloadVariant::Original => format!("/api/download/{}/original", id),
        }
    }
}
