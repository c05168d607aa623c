//! Master-data reload progress poller.
//!
//! After a reload is triggered, the poller asks for progress on a fixed
//! interval until no domain reports `is_running`, then fetches master-data
//! stats once and stops. Each tick is delivered as a [`PollEvent`] on a
//! channel owned by the caller.
//!
//! At most one polling thread exists per poller. Stopping (or dropping) the
//! poller cancels the thread and waits for it to exit.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use log::{debug, info, warn};

use crate::AnalysisApi;
use crate::error::ApiError;
use crate::types::{MasterDataStats, ReloadProgress};

/// Poll every two seconds unless configured otherwise.
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(2);

/// What the polling thread reports.
#[derive(Debug)]
pub enum PollEvent {
    /// A progress response. Still running unless followed by `Finished`.
    Progress(ReloadProgress),
    /// A tick failed; polling continues.
    TickFailed(ApiError),
    /// Nothing is running any more. Carries the final stats refresh.
    Finished(Result<MasterDataStats, ApiError>),
}

/// Fixed-interval progress poller with explicit start/stop.
pub struct ReloadPoller {
    interval: Duration,
    active: Arc<AtomicBool>,
    cancel: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl Default for ReloadPoller {
    fn default() -> Self {
        Self::new(DEFAULT_INTERVAL)
    }
}

impl ReloadPoller {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            active: Arc::new(AtomicBool::new(false)),
            cancel: None,
            handle: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Whether a polling thread is currently running.
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    /// Begin polling `api`, sending events to `events`.
    ///
    /// Returns `false` (and does nothing) if a poll is already active.
    pub fn start<A>(&mut self, api: Arc<A>, events: Sender<PollEvent>) -> bool
    where
        A: AnalysisApi + Send + Sync + ?Sized + 'static,
    {
        if self.is_active() {
            debug!("reload poller already active; start ignored");
            return false;
        }
        // A previous thread may have finished on its own; reap it.
        self.join();

        let (cancel_tx, cancel_rx) = mpsc::channel::<()>();
        let active = Arc::clone(&self.active);
        let interval = self.interval;
        active.store(true, Ordering::SeqCst);
        info!("reload poller started ({} ms interval)", interval.as_millis());

        let handle = thread::spawn(move || {
            loop {
                match cancel_rx.recv_timeout(interval) {
                    Err(RecvTimeoutError::Timeout) => {}
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => {
                        debug!("reload poller cancelled");
                        break;
                    }
                }

                match api.reload_progress() {
                    Ok(progress) => {
                        let running = progress.any_running();
                        if events.send(PollEvent::Progress(progress)).is_err() {
                            break;
                        }
                        if !running {
                            info!("reload finished; refreshing master data stats");
                            let _ = events.send(PollEvent::Finished(api.master_data_stats()));
                            break;
                        }
                    }
                    Err(e) => {
                        warn!("reload progress poll failed: {e}");
                        if events.send(PollEvent::TickFailed(e)).is_err() {
                            break;
                        }
                    }
                }
            }
            active.store(false, Ordering::SeqCst);
        });

        self.cancel = Some(cancel_tx);
        self.handle = Some(handle);
        true
    }

    /// Cancel polling and wait for the thread to exit. No-op when idle.
    pub fn stop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            let _ = cancel.send(());
        }
        self.join();
        if self.active.swap(false, Ordering::SeqCst) {
            info!("reload poller stopped");
        }
    }

    fn join(&mut self) {
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!("reload poller thread panicked");
            }
        }
        self.cancel = None;
    }
}

impl Drop for ReloadPoller {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockApi;
    use crate::types::{DomainProgress, DomainStats};

    fn running() -> ReloadProgress {
        ReloadProgress {
            fundamental: DomainProgress {
                is_running: true,
                current: 10,
                total: 100,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    fn polls_until_idle_then_refreshes_stats() {
        let stats = MasterDataStats {
            technical: DomainStats {
                total_stocks: 900,
                ..Default::default()
            },
            ..Default::default()
        };
        let api = Arc::new(
            MockApi::builder()
                .with_progress(running())
                .with_progress(running())
                .with_stats(stats.clone())
                .build(),
        );
        let (tx, rx) = mpsc::channel();
        let mut poller = ReloadPoller::new(Duration::from_millis(5));
        assert!(poller.start(Arc::clone(&api), tx));

        let events: Vec<PollEvent> = rx.iter().collect();
        assert_eq!(events.len(), 4);
        assert!(matches!(events[0], PollEvent::Progress(_)));
        assert!(matches!(&events[3], PollEvent::Finished(Ok(s)) if *s == stats));

        poller.stop();
        assert!(!poller.is_active());
        assert_eq!(api.call_count("reload_progress"), 3);
        assert_eq!(api.call_count("master_data_stats"), 1);
    }

    #[test]
    fn failed_tick_does_not_stop_polling() {
        let api = Arc::new(
            MockApi::builder()
                .with_progress_failure("connection reset")
                .with_progress(running())
                .build(),
        );
        let (tx, rx) = mpsc::channel();
        let mut poller = ReloadPoller::new(Duration::from_millis(5));
        poller.start(api, tx);

        let events: Vec<PollEvent> = rx.iter().collect();
        assert!(matches!(events[0], PollEvent::TickFailed(ApiError::Transport(_))));
        assert!(matches!(events.last(), Some(PollEvent::Finished(Ok(_)))));
    }

    #[test]
    fn second_start_is_noop_while_active() {
        let api = Arc::new(MockApi::builder().build());
        let (tx, _rx) = mpsc::channel();
        let mut poller = ReloadPoller::new(Duration::from_secs(60));
        assert!(poller.start(Arc::clone(&api), tx.clone()));
        assert!(poller.is_active());
        assert!(!poller.start(Arc::clone(&api), tx));
        poller.stop();
        assert!(!poller.is_active());
        assert_eq!(api.call_count("reload_progress"), 0);
    }

    #[test]
    fn stop_is_idempotent_and_drop_cancels() {
        let mut poller = ReloadPoller::default();
        poller.stop();
        assert!(!poller.is_active());

        let api = Arc::new(MockApi::builder().build());
        let (tx, rx) = mpsc::channel();
        {
            let mut scoped = ReloadPoller::new(Duration::from_secs(60));
            scoped.start(api, tx);
        }
        // the thread exited and dropped its sender
        assert!(rx.recv_timeout(Duration::from_secs(1)).is_err());
    }

    #[test]
    fn restart_after_finish() {
        let api = Arc::new(MockApi::builder().build());
        let mut poller = ReloadPoller::new(Duration::from_millis(1));
        let (tx, rx) = mpsc::channel();
        assert!(poller.start(Arc::clone(&api), tx));
        let _: Vec<PollEvent> = rx.iter().collect();
        let (tx, rx) = mpsc::channel();
        assert!(poller.start(Arc::clone(&api), tx));
        let events: Vec<PollEvent> = rx.iter().collect();
        assert!(matches!(events.last(), Some(PollEvent::Finished(_))));
    }
}
