//! Driver loop
//!
//! Ticks on a fixed interval. Each tick takes at most one action from the
//! queue, and only when no previous operation is still in flight.

use serde::Serialize;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, Mutex};
use tokio::time::{Instant, MissedTickBehavior};

use crate::script::{ActionQueue, Command};
use crate::session::{
    Session, SessionApi, SessionError, SessionField, SessionResult, SessionState, UpdatePayload,
};
use crate::viewer::Viewer;

/// Outcome counts for one driver run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DriverReport {
    /// Operations that completed successfully
    pub executed: usize,
    /// Operations that reached the backend path but failed
    pub failed: usize,
    /// Lines that could not be turned into an operation
    pub skipped: usize,
}

#[derive(Default)]
struct DriverStats {
    executed: AtomicUsize,
    failed: AtomicUsize,
    skipped: AtomicUsize,
}

impl DriverStats {
    fn report(&self) -> DriverReport {
        DriverReport {
            executed: self.executed.load(Ordering::SeqCst),
            failed: self.failed.load(Ordering::SeqCst),
            skipped: self.skipped.load(Ordering::SeqCst),
        }
    }
}

/// Replays a scripted draft against the session API
#[derive(Clone)]
pub struct ActionDriver {
    queue: Arc<Mutex<ActionQueue>>,
    api: Arc<dyn SessionApi>,
    viewer: Viewer,
    session: SessionState,
    session_tx: Arc<watch::Sender<Option<Session>>>,
    delay: Duration,
    processing: Arc<AtomicBool>,
    stats: Arc<DriverStats>,
}

impl ActionDriver {
    pub fn new(queue: ActionQueue, api: Arc<dyn SessionApi>, viewer: Viewer, delay: Duration) -> Self {
        let (session_tx, _) = watch::channel(None);

        Self {
            queue: Arc::new(Mutex::new(queue)),
            api,
            viewer,
            session: SessionState::new(),
            session_tx: Arc::new(session_tx),
            delay,
            processing: Arc::new(AtomicBool::new(false)),
            stats: Arc::new(DriverStats::default()),
        }
    }

    /// Receiver that yields the session once `init` has completed
    pub fn sessions(&self) -> watch::Receiver<Option<Session>> {
        self.session_tx.subscribe()
    }

    pub fn session_state(&self) -> &SessionState {
        &self.session
    }

    /// Whether an operation is currently in flight
    pub fn is_processing(&self) -> bool {
        self.processing.load(Ordering::SeqCst)
    }

    /// Drain the queue. Returns once it is empty and nothing is in flight.
    ///
    /// The first action runs one `delay` after the call.
    pub async fn run(&self) -> DriverReport {
        let mut interval = tokio::time::interval_at(Instant::now() + self.delay, self.delay);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            interval.tick().await;

            if self.is_processing() {
                continue;
            }

            let next = self.queue.lock().await.next_action();
            let Some(action) = next else {
                break;
            };

            let command = match action.clone().into_command() {
                Ok(command) => command,
                Err(e) => {
                    tracing::warn!(error = %e, action = ?action, "Skipping action");
                    self.stats.skipped.fetch_add(1, Ordering::SeqCst);
                    continue;
                }
            };

            self.processing.store(true, Ordering::SeqCst);

            let driver = self.clone();
            tokio::spawn(async move {
                let name = command.name();
                match driver.perform(command).await {
                    Ok(()) => {
                        driver.stats.executed.fetch_add(1, Ordering::SeqCst);
                    }
                    Err(e) => {
                        tracing::error!(action = %name, error = %e, "Action failed");
                        driver.stats.failed.fetch_add(1, Ordering::SeqCst);
                    }
                }
                driver.processing.store(false, Ordering::SeqCst);
            });
        }

        let report = self.stats.report();
        tracing::info!(
            executed = report.executed,
            failed = report.failed,
            skipped = report.skipped,
            "Action queue drained"
        );
        report
    }

    async fn perform(&self, command: Command) -> SessionResult<()> {
        match command {
            Command::Init => self.init().await,
            Command::Cards(cards) => {
                self.push_update(SessionField::Cards, UpdatePayload::List(cards))
                    .await
            }
            Command::Drafted(drafted) => {
                self.push_update(SessionField::Drafted, UpdatePayload::List(drafted))
                    .await
            }
            Command::Hero(hero) => {
                self.push_update(SessionField::Hero, UpdatePayload::Single(hero))
                    .await
            }
        }
    }

    async fn init(&self) -> SessionResult<()> {
        tracing::info!("Initializing...");

        let session = self.api.create_session().await?;
        tracing::info!(session_id = %session.session_id, "Session started");

        self.viewer
            .set_viewer_link(self.api.viewer_url(&session.session_id))
            .await;
        self.viewer.init_chart().await;

        self.session.set(session.clone()).await;
        self.session_tx.send_replace(Some(session));
        Ok(())
    }

    async fn push_update(&self, field: SessionField, payload: UpdatePayload) -> SessionResult<()> {
        tracing::info!("Performing update to {}", field);

        let session = self
            .session
            .get()
            .await
            .ok_or(SessionError::NotInitialized)?;

        self.api.update(&session, field, payload).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{SessionSnapshot, UpdateResponse, ViewerPage};
    use async_trait::async_trait;

    /// Records calls and tracks how many overlap
    #[derive(Default)]
    struct FakeApi {
        calls: std::sync::Mutex<Vec<(String, UpdatePayload)>>,
        in_flight: AtomicUsize,
        max_in_flight: AtomicUsize,
        fail_updates: bool,
    }

    impl FakeApi {
        async fn enter(&self) {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(30)).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
        }
    }

    #[async_trait]
    impl SessionApi for FakeApi {
        async fn create_session(&self) -> SessionResult<Session> {
            self.enter().await;
            Ok(Session {
                session_id: "sess1".to_string(),
                auth_token: "tok".to_string(),
            })
        }

        async fn update(
            &self,
            session: &Session,
            field: SessionField,
            payload: UpdatePayload,
        ) -> SessionResult<UpdateResponse> {
            self.enter().await;
            assert_eq!(session.auth_token, "tok");
            if self.fail_updates {
                return Err(SessionError::Api {
                    status: 400,
                    message: "rejected".to_string(),
                });
            }
            self.calls
                .lock()
                .unwrap()
                .push((field.as_str().to_string(), payload));
            Ok(UpdateResponse {
                success: true,
                error: false,
            })
        }

        async fn snapshot(&self, _session_id: &str) -> SessionResult<SessionSnapshot> {
            Err(SessionError::Unavailable)
        }

        async fn viewer_page(&self, _session_id: &str) -> SessionResult<ViewerPage> {
            Err(SessionError::Unavailable)
        }

        fn viewer_url(&self, session_id: &str) -> String {
            format!("http://test/viewer/{}", session_id)
        }
    }

    fn driver(script: &str, api: Arc<FakeApi>) -> ActionDriver {
        ActionDriver::new(
            ActionQueue::from_script(script),
            api,
            Viewer::default(),
            Duration::from_millis(5),
        )
    }

    #[tokio::test]
    async fn test_runs_script_in_order_without_overlap() {
        let api = Arc::new(FakeApi::default());
        let driver = driver(
            "init\nhero mage\ncards A,B,C\ndrafted A, A, B\n",
            Arc::clone(&api),
        );

        let report = driver.run().await;
        assert_eq!(
            report,
            DriverReport {
                executed: 4,
                failed: 0,
                skipped: 0
            }
        );
        assert_eq!(api.max_in_flight.load(Ordering::SeqCst), 1);
        assert!(!driver.is_processing());

        let calls = api.calls.lock().unwrap().clone();
        assert_eq!(calls.len(), 3);
        assert_eq!(calls[0], ("hero".to_string(), UpdatePayload::Single("mage".into())));
        assert_eq!(
            calls[2],
            (
                "drafted".to_string(),
                UpdatePayload::List(vec!["A".into(), "A".into(), "B".into()])
            )
        );
    }

    #[tokio::test]
    async fn test_init_sets_session_link_and_chart() {
        let api = Arc::new(FakeApi::default());
        let driver = driver("init\n", api);
        let viewer = driver.viewer.clone();
        let sessions = driver.sessions();

        driver.run().await;

        let session = driver.session_state().get().await.unwrap();
        assert_eq!(session.session_id, "sess1");
        assert_eq!(sessions.borrow().clone(), Some(session));

        let state = viewer.snapshot().await;
        assert_eq!(state.viewer_link.as_deref(), Some("http://test/viewer/sess1"));
        assert!(state.chart.is_some());
    }

    #[tokio::test]
    async fn test_update_before_init_fails() {
        let api = Arc::new(FakeApi::default());
        let driver = driver("hero mage\n", Arc::clone(&api));

        let report = driver.run().await;
        assert_eq!(report.failed, 1);
        assert!(api.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_bad_lines_are_skipped() {
        let api = Arc::new(FakeApi::default());
        let driver = driver("init\nconcede\nhero\ncards A,B,C\n", Arc::clone(&api));

        let report = driver.run().await;
        assert_eq!(report.executed, 2);
        assert_eq!(report.skipped, 2);
    }

    #[tokio::test]
    async fn test_failed_update_clears_flag() {
        let api = Arc::new(FakeApi {
            fail_updates: true,
            ..Default::default()
        });
        let driver = driver("init\nhero mage\nhero priest\n", Arc::clone(&api));

        let report = driver.run().await;
        assert_eq!(report.executed, 1);
        assert_eq!(report.failed, 2);
        assert!(!driver.is_processing());
    }

    #[tokio::test]
    async fn test_empty_queue_reports_nothing() {
        let driver = driver("", Arc::new(FakeApi::default()));
        assert_eq!(driver.run().await, DriverReport::default());
    }

    #[tokio::test]
    async fn test_first_action_waits_one_interval() {
        let api = Arc::new(FakeApi::default());
        let driver = ActionDriver::new(
            ActionQueue::from_script("init\n"),
            api,
            Viewer::default(),
            Duration::from_millis(80),
        );
        let viewer = driver.viewer.clone();

        let started = Instant::now();
        let handle = tokio::spawn({
            let driver = driver.clone();
            async move { driver.run().await }
        });

        tokio::time::sleep(Duration::from_millis(40)).await;
        assert!(viewer.snapshot().await.viewer_link.is_none());
        assert!(!driver.is_processing());

        let report = handle.await.unwrap();
        assert_eq!(report.executed, 1);
        assert!(started.elapsed() >= Duration::from_millis(80));
    }
}
