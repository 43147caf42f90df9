/// LibraryCore: single owner of all client-side library state.
///
/// The core never awaits a backend call itself. Each operation validates its
/// input, updates local state, and spawns the request as a background task.
/// Tasks (requests, the progress simulator, notification expiry timers)
/// report back by sending a `CoreEvent` on the channel handed to `new`; the
/// app's event loop feeds those into `handle_event`. Every state change
/// therefore happens on the loop that owns the core, without locks.
///
/// Late events are harmless: submission results and progress steps are
/// stamped with the `JobId` they belong to and dropped when that job is no
/// longer current, and expiry timers carry the `NotificationId` they were
/// scheduled for.
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use drummer_proto::config::Config;
use drummer_proto::protocol::{DownloadVariant, Song, SongId, VersionInfo};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::api::{ApiError, ApiResult, Backend};
use crate::catalog::SongCatalog;
use crate::download::{save_download, DownloadTracker};
use crate::edit::{EditController, EditId, EditSession, SaveRejected};
use crate::notify::{Notification, NotificationCenter, NotificationId, NOTIFICATION_LIFETIME};
use crate::progress::ProgressSimulator;
use crate::submit::{
    validate_file, validate_url, Job, JobId, JobKind, SubmitOutcome, REMOTE_JOB_LABEL,
};


pub const FETCH_FAILED: &str = "Failed to fetch songs";
pub const DELETE_OK: &str = "Song deleted successfully";
pub const DELETE_FAILED: &str = "Failed to delete song";
pub const RENAME_OK: &str = "Song renamed successfully";
pub const RENAME_FAILED: &str = "Failed to rename song";
pub const RENAME_BLANK: &str = "Please enter a valid name";
pub const DOWNLOAD_FAILED: &str = "Download failed";

// ── CoreEvent ─────────────────────────────────────────────────────────────────

/// Everything a background task can report back to the core.
#[derive(Debug)]
pub enum CoreEvent {
    SongsLoaded(ApiResult<Vec<Song>>),
    VersionLoaded(ApiResult<VersionInfo>),
    /// One simulated progress step.
    Progress {
        job: JobId,
        percent: u8,
        phase: &'static str,
    },
    SubmissionFinished {
        job: JobId,
        result: ApiResult<Song>,
    },
    RenameFinished {
        edit: EditId,
        song_id: SongId,
        result: ApiResult<Song>,
    },
    DeleteFinished {
        song_id: SongId,
        result: ApiResult<()>,
    },
    DownloadFinished {
        song_id: SongId,
        variant: DownloadVariant,
        result: ApiResult<PathBuf>,
    },
    NotificationExpired(NotificationId),
}

/// Timing and path knobs, normally taken from `config.toml`.
#[derive(Debug, Clone)]
pub struct CoreSettings {
    pub upload_interval: Duration,
    pub remote_interval: Duration,
    pub notification_lifetime: Duration,
    pub downloads_dir: PathBuf,
}

impl CoreSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            upload_interval: Duration::from_millis(config.progress.upload_interval_ms),
            remote_interval: Duration::from_millis(config.progress.remote_interval_ms),
            notification_lifetime: NOTIFICATION_LIFETIME,
            downloads_dir: config.paths.downloads_dir.clone(),
        }
    }

    fn interval_for(&self, kind: JobKind) -> Duration {
        match kind {
            JobKind::File => self.upload_interval,
            JobKind::RemoteUrl => self.remote_interval,
        }
    }
}

// ── LibraryCore ───────────────────────────────────────────────────────────────

pub struct LibraryCore {
    backend: Arc<dyn Backend>,
    settings: CoreSettings,
    event_tx: mpsc::Sender<CoreEvent>,
    catalog: SongCatalog,
    notifications: NotificationCenter,
    edit: EditController,
    job: Option<Job>,
    next_job: u64,
    /// Song awaiting a y/n delete confirmation.
    pending_delete: Option<SongId>,
    /// Deletes sent but not yet acknowledged.
    deleting: HashSet<SongId>,
    downloads: DownloadTracker,
    backend_version: Option<String>,
    /// Set when a remote submission succeeds; the URL field clears on read.
    url_cleared: bool,
}

impl LibraryCore {
    pub fn new(
        backend: Arc<dyn Backend>,
        settings: CoreSettings,
        event_tx: mpsc::Sender<CoreEvent>,
    ) -> Self {
        Self {
            backend,
            settings,
            event_tx,
            catalog: SongCatalog::new(),
            notifications: NotificationCenter::new(),
            edit: EditController::new(),
            job: None,
            next_job: 0,
            pending_delete: None,
            deleting: HashSet::new(),
            downloads: DownloadTracker::new(),
            backend_version: None,
            url_cleared: false,
        }
    }

    /// Fetch the song list and backend version.
    pub fn start(&self) {
        info!("LibraryCore: fetching catalog and version");
        let backend = Arc::clone(&self.backend);
        let tx = self.event_tx.clone();
        tokio::spawn(async move {
            let result = backend.list_songs().await;
            let _ = tx.send(CoreEvent::SongsLoaded(result)).await;
        });

        let backend = Arc::clone(&self.backend);
        let tx = self.event_tx.clone();
        tokio::spawn(async move {
            let result = backend.version().await;
            let _ = tx.send(CoreEvent::VersionLoaded(result)).await;
        });
    }

    // ── Submissions ───────────────────────────────────────────────────────────

    pub fn submit_file(&mut self, path: PathBuf) -> SubmitOutcome {
        if self.is_busy() {
            debug!("submit_file({}) refused: job in progress", path.display());
            return SubmitOutcome::Busy;
        }
        let label = match validate_file(&path) {
            Ok(label) => label,
            Err(e) => {
                self.notify_error(e.to_string());
                return SubmitOutcome::Rejected(e);
            }
        };

        let id = self.begin_job(JobKind::File, label);
        info!("upload {:?}: POST {}", id, path.display());
        let backend = Arc::clone(&self.backend);
        let tx = self.event_tx.clone();
        tokio::spawn(async move {
            let result = backend.upload(path).await;
            let _ = tx
                .send(CoreEvent::SubmissionFinished { job: id, result })
                .await;
        });
        SubmitOutcome::Started(id)
    }

    pub fn submit_url(&mut self, input: &str) -> SubmitOutcome {
        if self.is_busy() {
            debug!("submit_url refused: job in progress");
            return SubmitOutcome::Busy;
        }
        let url = match validate_url(input) {
            Ok(url) => url,
            Err(e) => {
                self.notify_error(e.to_string());
                return SubmitOutcome::Rejected(e);
            }
        };

        let id = self.begin_job(JobKind::RemoteUrl, REMOTE_JOB_LABEL);
        info!("remote {:?}: POST {}", id, url);
        let backend = Arc::clone(&self.backend);
        let tx = self.event_tx.clone();
        tokio::spawn(async move {
            let result = backend.submit_url(url).await;
            let _ = tx
                .send(CoreEvent::SubmissionFinished { job: id, result })
                .await;
        });
        SubmitOutcome::Started(id)
    }

    fn begin_job(&mut self, kind: JobKind, label: impl Into<String>) -> JobId {
        self.next_job += 1;
        let id = JobId::new(self.next_job);
        let mut job = Job::new(id, kind, label);
        job.attach_simulator(ProgressSimulator::spawn(
            id,
            kind.script(),
            self.settings.interval_for(kind),
            self.event_tx.clone(),
        ));
        self.job = Some(job);
        id
    }

    fn finish_job(&mut self, id: JobId, result: ApiResult<Song>) -> bool {
        if self.job.as_ref().map(|j| j.id) != Some(id) {
            debug!("ignoring result for stale job {:?}", id);
            return false;
        }
        let Some(mut job) = self.job.take() else {
            return false;
        };
        match result {
            Ok(song) => {
                job.complete();
                info!(
                    "{:?} ({}) finished after {:.1}s: {} ({})",
                    id,
                    job.label,
                    job.elapsed().as_secs_f32(),
                    song.name,
                    song.id
                );
                self.catalog.add(song);
                if job.kind == JobKind::RemoteUrl {
                    self.url_cleared = true;
                }
                self.notify_success(job.kind.success_message());
            }
            Err(e) => {
                job.stop_simulator();
                warn!("{:?} ({}) failed: {}", id, job.label, e);
                let text = e
                    .server_message()
                    .unwrap_or(job.kind.failure_message())
                    .to_string();
                self.notify_error(text);
            }
        }
        // Dropping the job aborts whatever is left of its simulator.
        drop(job);
        true
    }

    // ── Rename ────────────────────────────────────────────────────────────────

    pub fn start_rename(&mut self, song_id: &str) -> bool {
        let Some(song) = self.catalog.get(song_id) else {
            return false;
        };
        debug!("start rename of {} ({})", song.id, song.name);
        let name = song.name.clone();
        self.edit.start(song_id.to_string(), &name);
        true
    }

    pub fn update_draft(&mut self, text: impl Into<String>) {
        self.edit.update_draft(text);
    }

    pub fn cancel_rename(&mut self) {
        self.edit.cancel();
    }

    pub fn save_rename(&mut self) {
        match self.edit.begin_save() {
            Ok((edit, song_id, name)) => {
                info!("rename {}: PUT name={:?}", song_id, name);
                let backend = Arc::clone(&self.backend);
                let tx = self.event_tx.clone();
                tokio::spawn(async move {
                    let result = backend.rename(song_id.clone(), name).await;
                    let _ = tx
                        .send(CoreEvent::RenameFinished {
                            edit,
                            song_id,
                            result,
                        })
                        .await;
                });
            }
            Err(SaveRejected::BlankName) => {
                self.notify_error(RENAME_BLANK);
            }
            Err(reason) => debug!("save_rename ignored: {:?}", reason),
        }
    }

    fn finish_rename(&mut self, edit: EditId, song_id: SongId, result: ApiResult<Song>) {
        let succeeded = result.is_ok();
        match result {
            Ok(song) => {
                if !self.catalog.replace(&song_id, song) {
                    debug!("renamed song {} is no longer in the catalog", song_id);
                }
                self.notify_success(RENAME_OK);
            }
            Err(e) => {
                warn!("rename {} failed: {}", song_id, e);
                self.notify_error(RENAME_FAILED);
            }
        }
        if !self.edit.finish_save(edit, succeeded) {
            debug!("rename reply for {:?} no longer matches the open editor", edit);
        }
    }

    // ── Delete ────────────────────────────────────────────────────────────────

    /// Ask for confirmation before deleting `song_id`.
    pub fn request_delete(&mut self, song_id: &str) -> bool {
        if self.catalog.get(song_id).is_none() || self.deleting.contains(song_id) {
            return false;
        }
        self.pending_delete = Some(song_id.to_string());
        true
    }

    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
    }

    pub fn confirm_delete(&mut self) {
        let Some(song_id) = self.pending_delete.take() else {
            return;
        };
        info!("delete {}", song_id);
        self.deleting.insert(song_id.clone());
        let backend = Arc::clone(&self.backend);
        let tx = self.event_tx.clone();
        tokio::spawn(async move {
            let result = backend.delete(song_id.clone()).await;
            let _ = tx.send(CoreEvent::DeleteFinished { song_id, result }).await;
        });
    }

    fn finish_delete(&mut self, song_id: SongId, result: ApiResult<()>) {
        self.deleting.remove(&song_id);
        match result {
            Ok(()) => {
                self.catalog.remove(&song_id);
                self.edit.cancel_for(&song_id);
                self.notify_success(DELETE_OK);
            }
            Err(e) => {
                warn!("delete {} failed: {}", song_id, e);
                self.notify_error(DELETE_FAILED);
            }
        }
    }

    // ── Download ──────────────────────────────────────────────────────────────

    /// Fetch one rendition of a song into the downloads directory.
    pub fn download(&mut self, song_id: &str, variant: DownloadVariant) -> bool {
        let Some(song) = self.catalog.get(song_id) else {
            return false;
        };
        let file_name = variant.file_name(&song.name);
        if !self.downloads.begin(song_id, variant) {
            self.notify_info(format!("Already downloading {}", file_name));
            return false;
        }
        info!("download {} ({}) -> {}", song_id, variant.label(), file_name);
        self.notify_info(format!("Downloading {}", file_name));

        let backend = Arc::clone(&self.backend);
        let tx = self.event_tx.clone();
        let dir = self.settings.downloads_dir.clone();
        let song_id = song_id.to_string();
        tokio::spawn(async move {
            let result = match backend.download(song_id.clone(), variant).await {
                Ok(bytes) => save_download(&dir, &file_name, &bytes)
                    .await
                    .map_err(ApiError::from),
                Err(e) => Err(e),
            };
            let _ = tx
                .send(CoreEvent::DownloadFinished {
                    song_id,
                    variant,
                    result,
                })
                .await;
        });
        true
    }

    fn finish_download(&mut self, song_id: SongId, variant: DownloadVariant, result: ApiResult<PathBuf>) {
        self.downloads.finish(&song_id, variant);
        match result {
            Ok(path) => {
                let shown = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| path.display().to_string());
                self.notify_success(format!("Saved {}", shown));
            }
            Err(e) => {
                warn!("download {} ({}) failed: {}", song_id, variant.label(), e);
                self.notify_error(DOWNLOAD_FAILED);
            }
        }
    }

    // ── Notifications ─────────────────────────────────────────────────────────

    fn notify(&mut self, id: NotificationId) {
        let tx = self.event_tx.clone();
        let lifetime = self.settings.notification_lifetime;
        tokio::spawn(async move {
            tokio::time::sleep(lifetime).await;
            let _ = tx.send(CoreEvent::NotificationExpired(id)).await;
        });
    }

    fn notify_error(&mut self, text: impl Into<String>) {
        let id = self.notifications.error(text);
        self.notify(id);
    }

    fn notify_success(&mut self, text: impl Into<String>) {
        let id = self.notifications.success(text);
        self.notify(id);
    }

    fn notify_info(&mut self, text: impl Into<String>) {
        let id = self.notifications.info(text);
        self.notify(id);
    }

    pub fn dismiss_notification(&mut self) {
        self.notifications.dismiss();
    }

    // ── Event handling ────────────────────────────────────────────────────────

    /// Apply one event from a background task. Returns whether anything
    /// visible may have changed.
    pub fn handle_event(&mut self, event: CoreEvent) -> bool {
        match event {
            CoreEvent::SongsLoaded(Ok(songs)) => {
                info!("catalog loaded: {} songs", songs.len());
                self.catalog.populate(songs);
                true
            }
            CoreEvent::SongsLoaded(Err(e)) => {
                warn!("catalog fetch failed: {}", e);
                self.notify_error(FETCH_FAILED);
                true
            }
            CoreEvent::VersionLoaded(Ok(v)) => {
                debug!("backend version {} ({:?})", v.version, v.name);
                self.backend_version = Some(v.version);
                true
            }
            CoreEvent::VersionLoaded(Err(e)) => {
                warn!("version fetch failed: {}", e);
                false
            }
            CoreEvent::Progress {
                job,
                percent,
                phase,
            } => match self.job.as_mut() {
                Some(current) if current.id == job => {
                    current.advance(percent, phase);
                    true
                }
                _ => {
                    debug!("dropping stale progress step for {:?}", job);
                    false
                }
            },
            CoreEvent::SubmissionFinished { job, result } => self.finish_job(job, result),
            CoreEvent::RenameFinished {
                edit,
                song_id,
                result,
            } => {
                self.finish_rename(edit, song_id, result);
                true
            }
            CoreEvent::DeleteFinished { song_id, result } => {
                self.finish_delete(song_id, result);
                true
            }
            CoreEvent::DownloadFinished {
                song_id,
                variant,
                result,
            } => {
                self.finish_download(song_id, variant, result);
                true
            }
            CoreEvent::NotificationExpired(id) => self.notifications.expire(id),
        }
    }

    // ── Read access ───────────────────────────────────────────────────────────

    pub fn songs(&self) -> &[Song] {
        self.catalog.list()
    }

    pub fn catalog(&self) -> &SongCatalog {
        &self.catalog
    }

    pub fn notification(&self) -> Option<&Notification> {
        self.notifications.current()
    }

    pub fn editing(&self) -> Option<&EditSession> {
        self.edit.editing()
    }

    pub fn job(&self) -> Option<&Job> {
        self.job.as_ref()
    }

    pub fn is_busy(&self) -> bool {
        self.job.is_some()
    }

    /// Percent shown on the progress bar; 0 when no job is running.
    pub fn progress(&self) -> u8 {
        self.job.as_ref().map_or(0, |j| j.progress())
    }

    pub fn pending_delete(&self) -> Option<&str> {
        self.pending_delete.as_deref()
    }

    pub fn is_deleting(&self, song_id: &str) -> bool {
        self.deleting.contains(song_id)
    }

    pub fn is_downloading(&self, song_id: &str, variant: DownloadVariant) -> bool {
        self.downloads.is_active(song_id, variant)
    }

    pub fn backend_version(&self) -> Option<&str> {
        self.backend_version.as_deref()
    }

    /// True once after a remote submission succeeded.
    pub fn take_url_cleared(&mut self) -> bool {
        std::mem::take(&mut self.url_cleared)
    }
}
