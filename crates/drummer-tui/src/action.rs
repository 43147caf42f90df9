//! Action enum: every user intent the app can dispatch.

use std::path::PathBuf;

use drummer_proto::protocol::{DownloadVariant, SongId};

/// Unique identifier for a component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentId {
    Header,
    UploadPanel,
    SongList,
}

/// Components produce Actions; the App forwards them to the core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    // ── Submission ───────────────────────────────────────────────────────────
    SubmitFile(PathBuf),
    SubmitUrl(String),

    // ── Rename ───────────────────────────────────────────────────────────────
    StartRename(SongId),
    DraftChanged(String),
    SaveRename,
    CancelRename,

    // ── Delete ───────────────────────────────────────────────────────────────
    RequestDelete(SongId),
    ConfirmDelete,
    CancelDelete,

    Download(SongId, DownloadVariant),

    // ── Navigation ───────────────────────────────────────────────────────────
    FocusNext,
    FocusPrev,
    FocusPane(ComponentId),

    // ── System ───────────────────────────────────────────────────────────────
    DismissNotification,
    Quit,
}
