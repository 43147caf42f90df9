//! Backend client: the one seam between the client state and the network.
//!
//! `LibraryCore` talks to a `dyn Backend` so the orchestration logic can be
//! driven by an in-memory fake in tests; `HttpBackend` is the real thing.

use std::path::PathBuf;

use drummer_proto::protocol::{
    routes, DownloadVariant, ErrorBody, RemoteUrlRequest, RenameRequest, Song, SongId,
    VersionInfo, UPLOAD_FIELD,
};
use futures_util::future::{BoxFuture, FutureExt};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Connection refused, DNS failure, broken body, …
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-2xx response. `message` is the backend's `error` field, if any.
    #[error("server rejected request ({status}): {}", message.as_deref().unwrap_or("no message"))]
    Rejected { status: u16, message: Option<String> },

    #[error("unexpected response body: {0}")]
    Decode(String),

    #[error("file error: {0}")]
    Io(#[from] std::io::Error),
}

impl ApiError {
    /// User-facing text supplied by the backend, when it sent one.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Rejected {
                message: Some(m), ..
            } if !m.trim().is_empty() => Some(m.as_str()),
            _ => None,
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

/// Every backend call the client makes. Each method maps to exactly one
/// HTTP request.
pub trait Backend: Send + Sync + 'static {
    fn list_songs(&self) -> BoxFuture<'_, ApiResult<Vec<Song>>>;
    fn version(&self) -> BoxFuture<'_, ApiResult<VersionInfo>>;
    /// Upload a local audio file for drum removal.
    fn upload(&self, path: PathBuf) -> BoxFuture<'_, ApiResult<Song>>;
    /// Ask the backend to fetch and process a remote video.
    fn submit_url(&self, url: String) -> BoxFuture<'_, ApiResult<Song>>;
    fn rename(&self, id: SongId, name: String) -> BoxFuture<'_, ApiResult<Song>>;
    fn delete(&self, id: SongId) -> BoxFuture<'_, ApiResult<()>>;
    fn download(&self, id: SongId, variant: DownloadVariant) -> BoxFuture<'_, ApiResult<Vec<u8>>>;
}

pub struct HttpBackend {
    client: reqwest::Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// Turn a response into `T`, or into `ApiError::Rejected` carrying the
/// backend's `{ "error": … }` message.
async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> ApiResult<T> {
    let response = check_status(response).await?;
    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|e| ApiError::Decode(e.to_string()))
}

async fn check_status(response: reqwest::Response) -> ApiResult<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.bytes().await.unwrap_or_default();
    let message = serde_json::from_slice::<ErrorBody>(&body)
        .ok()
        .and_then(|b| b.error);
    debug!("backend returned {}: {:?}", status, message);
    Err(ApiError::Rejected {
        status: status.as_u16(),
        message,
    })
}

impl Backend for HttpBackend {
    fn list_songs(&self) -> BoxFuture<'_, ApiResult<Vec<Song>>> {
        async move {
            let response = self.client.get(self.url(routes::SONGS)).send().await?;
            // The backend answers `null` for an empty library.
            let songs: Option<Vec<Song>> = decode(response).await?;
            Ok(songs.unwrap_or_default())
        }
        .boxed()
    }

    fn version(&self) -> BoxFuture<'_, ApiResult<VersionInfo>> {
        async move {
            let response = self.client.get(self.url(routes::VERSION)).send().await?;
            decode(response).await
        }
        .boxed()
    }

    fn upload(&self, path: PathBuf) -> BoxFuture<'_, ApiResult<Song>> {
        async move {
            let file_name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| "upload.mp3".to_string());
            let data = tokio::fs::read(&path).await?;
            debug!("uploading {} ({} bytes)", file_name, data.len());
            let part = reqwest::multipart::Part::bytes(data)
                .file_name(file_name)
                .mime_str("audio/mpeg")?;
            let form = reqwest::multipart::Form::new().part(UPLOAD_FIELD, part);
            let response = self
                .client
                .post(self.url(routes::UPLOAD))
                .multipart(form)
                .send()
                .await?;
            decode(response).await
        }
        .boxed()
    }

    fn submit_url(&self, url: String) -> BoxFuture<'_, ApiResult<Song>> {
        async move {
            let response = self
                .client
                .post(self.url(routes::YOUTUBE))
                .json(&RemoteUrlRequest { url })
                .send()
                .await?;
            decode(response).await
        }
        .boxed()
    }

    fn rename(&self, id: SongId, name: String) -> BoxFuture<'_, ApiResult<Song>> {
        async move {
            let response = self
                .client
                .put(self.url(&routes::song(&id)))
                .json(&RenameRequest { name })
                .send()
                .await?;
            decode(response).await
        }
        .boxed()
    }

    fn delete(&self, id: SongId) -> BoxFuture<'_, ApiResult<()>> {
        async move {
            let response = self
                .client
                .delete(self.url(&routes::song(&id)))
                .send()
                .await?;
            check_status(response).await?;
            Ok(())
        }
        .boxed()
    }

    fn download(&self, id: SongId, variant: DownloadVariant) -> BoxFuture<'_, ApiResult<Vec<u8>>> {
        async move {
            let response = self
                .client
                .get(self.url(&routes::download(&id, variant)))
                .send()
                .await?;
            let response = check_status(response).await?;
            Ok(response.bytes().await?.to_vec())
        }
        .boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        extract::{Multipart, Path},
        http::StatusCode,
        response::IntoResponse,
        routing::{get, post, put},
        Json, Router,
    };
    use serde_json::json;
    use tokio::net::TcpListener;

    fn song_json(id: &str, name: &str) -> serde_json::Value {
        json!({
            "id": id,
            "name": name,
            "original": format!("uploads/{id}.mp3"),
            "processed": format!("processed/{id}.mp3"),
            "created_at": "2024-06-01T09:00:00Z",
        })
    }

    /// Mock of the drum-removal backend, bound to an ephemeral port.
    async fn spawn_backend(router: Router) -> HttpBackend {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        HttpBackend::new(format!("http://{}/", addr))
    }

    #[tokio::test]
    async fn test_list_songs_preserves_order_and_null() {
        let backend = spawn_backend(Router::new().route(
            "/api/songs",
            get(|| async { Json(json!([song_json("2", "Second"), song_json("1", "First")])) }),
        ))
        .await;
        let songs = backend.list_songs().await.unwrap();
        let names: Vec<&str> = songs.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["Second", "First"]);

        let backend =
            spawn_backend(Router::new().route("/api/songs", get(|| async { Json(json!(null)) })))
                .await;
        assert!(backend.list_songs().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_upload_sends_multipart_file_field() {
        async fn upload(mut multipart: Multipart) -> impl IntoResponse {
            while let Some(field) = multipart.next_field().await.unwrap() {
                if field.name() == Some("file") {
                    let name = field.file_name().unwrap_or_default().to_string();
                    let data = field.bytes().await.unwrap();
                    assert_eq!(&data[..], b"ID3fake");
                    let stem = name.trim_end_matches(".mp3").to_string();
                    return (StatusCode::OK, Json(song_json("new", &stem)));
                }
            }
            (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": "No file uploaded" })),
            )
        }

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("groove.mp3");
        tokio::fs::write(&path, b"ID3fake").await.unwrap();

        let backend = spawn_backend(Router::new().route("/api/upload", post(upload))).await;
        let song = backend.upload(path).await.unwrap();
        assert_eq!(song.id, "new");
        assert_eq!(song.name, "groove");
    }

    #[tokio::test]
    async fn test_rejection_carries_server_message() {
        let backend = spawn_backend(Router::new().route(
            "/api/youtube",
            post(|| async {
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "Video not found or unavailable" })),
                )
            }),
        ))
        .await;
        let err = backend
            .submit_url("https://youtu.be/abcdefghijk".into())
            .await
            .unwrap_err();
        assert_eq!(err.server_message(), Some("Video not found or unavailable"));
        assert!(matches!(err, ApiError::Rejected { status: 500, .. }));
    }

    #[tokio::test]
    async fn test_rejection_without_json_body() {
        let backend = spawn_backend(Router::new().route(
            "/api/songs/:id",
            axum::routing::delete(|| async { (StatusCode::NOT_FOUND, "gone") }),
        ))
        .await;
        let err = backend.delete("x".into()).await.unwrap_err();
        assert!(err.server_message().is_none());
    }

    #[tokio::test]
    async fn test_rename_round_trip() {
        let backend = spawn_backend(Router::new().route(
            "/api/songs/:id",
            put(
                |Path(id): Path<String>, Json(body): Json<RenameRequest>| async move {
                    Json(song_json(&id, &body.name))
                },
            ),
        ))
        .await;
        let song = backend.rename("7".into(), "Renamed".into()).await.unwrap();
        assert_eq!(song.id, "7");
        assert_eq!(song.name, "Renamed");
    }

    #[tokio::test]
    async fn test_download_variants_hit_distinct_routes() {
        let backend = spawn_backend(
            Router::new()
                .route("/api/download/:id", get(|| async { "processed-bytes" }))
                .route("/api/download/:id/original", get(|| async { "original-bytes" })),
        )
        .await;
        let processed = backend
            .download("1".into(), DownloadVariant::Processed)
            .await
            .unwrap();
        let original = backend
            .download("1".into(), DownloadVariant::Original)
            .await
            .unwrap();
        assert_eq!(processed, b"processed-bytes");
        assert_eq!(original, b"original-bytes");
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_transport_error() {
        // Bind then drop to get a port nothing listens on.
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let backend = HttpBackend::new(format!("http://{}", addr));
        let err = backend.version().await.unwrap_err();
        assert!(matches!(err, ApiError::Transport(_)));
        assert!(err.server_message().is_none());
    }
}
