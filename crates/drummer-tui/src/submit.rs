//! Submission jobs: input validation and the state of the one outstanding
//! upload or remote extraction.

use std::path::Path;
use std::sync::OnceLock;
use std::time::{Duration, Instant};

use regex::Regex;
use thiserror::Error;

use crate::progress::{ProgressSimulator, ProgressStep, MAX_SIMULATED_PERCENT, REMOTE_SCRIPT, UPLOAD_SCRIPT};

/// Label shown for remote submissions; the URL itself is not displayed.
pub const REMOTE_JOB_LABEL: &str = "YouTube video";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct JobId(u64);

impl JobId {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobKind {
    File,
    RemoteUrl,
}

impl JobKind {
    pub fn success_message(self) -> &'static str {
        match self {
            Self::File => "Song uploaded and processed successfully!",
            Self::RemoteUrl => "YouTube video processed successfully!",
        }
    }

    /// Shown when the backend gives no `error` text of its own.
    pub fn failure_message(self) -> &'static str {
        match self {
            Self::File => "Upload failed",
            Self::RemoteUrl => "Failed to process YouTube video",
        }
    }

    pub fn script(self) -> &'static [ProgressStep] {
        match self {
            Self::File => UPLOAD_SCRIPT,
            Self::RemoteUrl => REMOTE_SCRIPT,
        }
    }

    pub fn initial_phase(self) -> &'static str {
        match self {
            Self::File => "Uploading file...",
            Self::RemoteUrl => "Downloading video...",
        }
    }
}

/// Input rejected before any request is made. `Display` is the user-facing
/// notification text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    #[error("Please upload an MP3 file")]
    NotMp3,
    #[error("Please enter a YouTube URL")]
    EmptyUrl,
    #[error("Please enter a valid YouTube URL")]
    InvalidUrl,
}

/// Result of asking the core to start a submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Started(JobId),
    Rejected(SubmitError),
    /// Another job is still running; nothing happened.
    Busy,
}

/// Check that `path` names an MP3 file and return its display label.
pub fn validate_file(path: &Path) -> Result<String, SubmitError> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or(SubmitError::NotMp3)?;
    if name.to_lowercase().ends_with(".mp3") {
        Ok(name)
    } else {
        Err(SubmitError::NotMp3)
    }
}

fn video_url_re() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"^https?://(?:(?:www|m)\.)?(?:youtube\.com/(?:watch\?(?:[^#\s]*&)?v=|shorts/)|youtu\.be/)[A-Za-z0-9_-]{6,}(?:[?&#]\S*)?$",
        )
        .ok()
    })
    .as_ref()
}

/// Check a remote video URL and return it trimmed.
pub fn validate_url(input: &str) -> Result<String, SubmitError> {
    let url = input.trim();
    if url.is_empty() {
        return Err(SubmitError::EmptyUrl);
    }
    let matches = video_url_re().map(|re| re.is_match(url)).unwrap_or(false);
    if matches {
        Ok(url.to_string())
    } else {
        Err(SubmitError::InvalidUrl)
    }
}

/// The single outstanding submission.
#[derive(Debug)]
pub struct Job {
    pub id: JobId,
    pub kind: JobKind,
    pub label: String,
    progress: u8,
    phase: String,
    started: Instant,
    simulator: Option<ProgressSimulator>,
}

impl Job {
    pub fn new(id: JobId, kind: JobKind, label: impl Into<String>) -> Self {
        Self {
            id,
            kind,
            label: label.into(),
            progress: 0,
            phase: kind.initial_phase().to_string(),
            started: Instant::now(),
            simulator: None,
        }
    }

    pub fn attach_simulator(&mut self, simulator: ProgressSimulator) {
        self.simulator = Some(simulator);
    }

    /// Apply a simulated step. Never moves backwards, never passes the
    /// simulated ceiling.
    pub fn advance(&mut self, percent: u8, phase: &str) {
        let percent = percent.min(MAX_SIMULATED_PERCENT);
        if percent >= self.progress {
            self.progress = percent;
            self.phase = phase.to_string();
        }
    }

    pub fn stop_simulator(&mut self) {
        if let Some(sim) = self.simulator.take() {
            sim.stop();
        }
    }

    /// Mark the job as confirmed by the backend.
    pub fn complete(&mut self) {
        self.stop_simulator();
        self.progress = 100;
    }

    pub fn progress(&self) -> u8 {
        self.progress
    }

    pub fn phase(&self) -> &str {
        &self.phase
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_validate_file_extension() {
        assert_eq!(
            validate_file(&PathBuf::from("/music/Song.MP3")),
            Ok("Song.MP3".to_string())
        );
        assert_eq!(
            validate_file(&PathBuf::from("song.wav")),
            Err(SubmitError::NotMp3)
        );
        assert_eq!(
            validate_file(&PathBuf::from("mp3")),
            Err(SubmitError::NotMp3)
        );
        assert_eq!(validate_file(&PathBuf::from("/")), Err(SubmitError::NotMp3));
    }

    #[test]
    fn test_validate_url_accepts_known_shapes() {
        for url in [
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
            "http://youtube.com/watch?v=dQw4w9WgXcQ&t=42s",
            "https://m.youtube.com/watch?feature=share&v=dQw4w9WgXcQ",
            "https://youtube.com/shorts/abcDEF12345",
            "https://youtu.be/dQw4w9WgXcQ?si=xyz",
        ] {
            assert!(validate_url(url).is_ok(), "rejected {url}");
        }
        assert_eq!(
            validate_url("  https://youtu.be/dQw4w9WgXcQ \n"),
            Ok("https://youtu.be/dQw4w9WgXcQ".to_string())
        );
    }

    #[test]
    fn test_validate_url_rejects() {
        assert_eq!(validate_url("   "), Err(SubmitError::EmptyUrl));
        for url in [
            "invalid-url",
            "https://vimeo.com/12345678",
            "ftp://youtube.com/watch?v=dQw4w9WgXcQ",
            "https://youtube.com/",
            "https://notyoutube.com/watch?v=dQw4w9WgXcQ",
        ] {
            assert_eq!(validate_url(url), Err(SubmitError::InvalidUrl), "{url}");
        }
    }

    #[test]
    fn test_messages() {
        assert_eq!(SubmitError::NotMp3.to_string(), "Please upload an MP3 file");
        assert_eq!(JobKind::File.failure_message(), "Upload failed");
        assert_eq!(
            JobKind::RemoteUrl.success_message(),
            "YouTube video processed successfully!"
        );
    }

    #[test]
    fn test_job_progress_is_monotonic_and_capped() {
        let mut job = Job::new(JobId::new(1), JobKind::File, "a.mp3");
        assert_eq!(job.progress(), 0);
        assert_eq!(job.phase(), "Uploading file...");

        job.advance(50, "Separating stems...");
        job.advance(30, "Analyzing audio...");
        assert_eq!(job.progress(), 50);
        assert_eq!(job.phase(), "Separating stems...");

        job.advance(120, "Finalizing...");
        assert_eq!(job.progress(), MAX_SIMULATED_PERCENT);

        job.complete();
        assert_eq!(job.progress(), 100);
    }
}
