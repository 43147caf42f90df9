//! Simulated progress for a submission.
//!
//! The backend answers a submission with a single response and never reports
//! intermediate milestones, so a background task walks a fixed script of
//! steps while the request is outstanding. Steps carry the `JobId` they were
//! started for; the core drops any step whose job is no longer current.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::AbortHandle;
use tracing::trace;

use crate::core::CoreEvent;
use crate::submit::JobId;

/// Highest percentage a simulated step may report. 100 is reserved for a
/// confirmed success.
pub const MAX_SIMULATED_PERCENT: u8 = 95;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressStep {
    pub percent: u8,
    pub phase: &'static str,
}

const fn step(percent: u8, phase: &'static str) -> ProgressStep {
    ProgressStep { percent, phase }
}

pub const UPLOAD_SCRIPT: &[ProgressStep] = &[
    step(10, "Uploading file..."),
    step(30, "Analyzing audio..."),
    step(50, "Separating stems..."),
    step(70, "Removing drums..."),
    step(90, "Finalizing..."),
];

pub const REMOTE_SCRIPT: &[ProgressStep] = &[
    step(5, "Downloading video..."),
    step(20, "Downloading video..."),
    step(35, "Extracting audio..."),
    step(50, "Converting to MP3..."),
    step(65, "Separating stems..."),
    step(80, "Removing drums..."),
    step(95, "Finalizing..."),
];

/// Handle to a running simulator task. Dropping it stops the task.
#[derive(Debug)]
pub struct ProgressSimulator {
    handle: AbortHandle,
}

impl ProgressSimulator {
    /// Publish one step of `script` every `interval` until the script runs
    /// out or the simulator is dropped.
    pub fn spawn(
        job: JobId,
        script: &'static [ProgressStep],
        interval: Duration,
        tx: mpsc::Sender<CoreEvent>,
    ) -> Self {
        let task = tokio::spawn(async move {
            for step in script {
                tokio::time::sleep(interval).await;
                trace!("progress {:?}: {}% {}", job, step.percent, step.phase);
                let event = CoreEvent::Progress {
                    job,
                    percent: step.percent.min(MAX_SIMULATED_PERCENT),
                    phase: step.phase,
                };
                if tx.send(event).await.is_err() {
                    break;
                }
            }
        });
        Self {
            handle: task.abort_handle(),
        }
    }

    pub fn stop(&self) {
        self.handle.abort();
    }
}

impl Drop for ProgressSimulator {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_script_shape(script: &[ProgressStep]) {
        assert!(!script.is_empty());
        for pair in script.windows(2) {
            assert!(pair[0].percent <= pair[1].percent);
        }
        assert!(script.iter().all(|s| s.percent <= MAX_SIMULATED_PERCENT));
    }

    #[test]
    fn test_scripts_are_monotonic_and_capped() {
        assert_script_shape(UPLOAD_SCRIPT);
        assert_script_shape(REMOTE_SCRIPT);
    }

    #[tokio::test(start_paused = true)]
    async fn test_steps_arrive_on_interval() {
        let (tx, mut rx) = mpsc::channel(16);
        let job = JobId::new(7);
        let _sim = ProgressSimulator::spawn(job, UPLOAD_SCRIPT, Duration::from_secs(2), tx);

        let start = tokio::time::Instant::now();
        match rx.recv().await {
            Some(CoreEvent::Progress { job: j, percent, phase }) => {
                assert_eq!(j, job);
                assert_eq!(percent, 10);
                assert_eq!(phase, "Uploading file...");
            }
            other => panic!("unexpected event: {:?}", other),
        }
        assert!(start.elapsed() >= Duration::from_secs(2));

        let mut last = 0;
        while let Some(CoreEvent::Progress { percent, .. }) = rx.recv().await {
            last = percent;
        }
        assert_eq!(last, 90);
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_stops_task() {
        let (tx, mut rx) = mpsc::channel(16);
        let sim = ProgressSimulator::spawn(JobId::new(1), REMOTE_SCRIPT, Duration::from_secs(3), tx);
        assert!(matches!(rx.recv().await, Some(CoreEvent::Progress { percent: 5, .. })));
        drop(sim);
        // The aborted task drops its sender, closing the channel.
        assert!(rx.recv().await.is_none());
    }
}
