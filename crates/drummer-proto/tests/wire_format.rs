//! Decoding checks against payloads captured from the backend.

use drummer_proto::protocol::{ErrorBody, RemoteUrlRequest, RenameRequest, Song, VersionInfo};

#[test]
fn song_list_keeps_server_order() {
    let body = r#"[
        {"id":"b","name":"Second","original":"","processed":"","created_at":"2024-05-02T10:00:00Z"},
        {"id":"a","name":"First","original":"","processed":"","created_at":"2024-05-01T10:00:00Z"}
    ]"#;
    let songs: Vec<Song> = serde_json::from_str(body).unwrap();
    let ids: Vec<&str> = songs.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, ["b", "a"]);
}

#[test]
fn null_song_list_decodes_as_none() {
    let songs: Option<Vec<Song>> = serde_json::from_str("null").unwrap();
    assert!(songs.unwrap_or_default().is_empty());
}

#[test]
fn error_body_with_and_without_message() {
    let with: ErrorBody = serde_json::from_str(r#"{"error":"Only MP3 files are supported"}"#).unwrap();
    assert_eq!(with.error.as_deref(), Some("Only MP3 files are supported"));

    let without: ErrorBody = serde_json::from_str(r#"{"message":"nope"}"#).unwrap();
    assert!(without.error.is_none());
}

#[test]
fn version_name_is_optional() {
    let v: VersionInfo = serde_json::from_str(r#"{"version":"1.4.2","name":"Drummer"}"#).unwrap();
    assert_eq!(v.version, "1.4.2");
    assert_eq!(v.name.as_deref(), Some("Drummer"));

    let v: VersionInfo = serde_json::from_str(r#"{"version":"dev"}"#).unwrap();
    assert!(v.name.is_none());
}

#[test]
fn request_bodies_serialize_to_expected_keys() {
    let rename = serde_json::to_value(RenameRequest { name: "New".into() }).unwrap();
    assert_eq!(rename, serde_json::json!({ "name": "New" }));

    let url = serde_json::to_value(RemoteUrlRequest {
        url: "https://youtu.be/abc".into(),
    })
    .unwrap();
    assert_eq!(url, serde_json::json!({ "url": "https://youtu.be/abc" }));
}
