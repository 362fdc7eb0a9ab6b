//! Sync trigger
//!
//! One trigger per action: mark the card busy, issue a single request, then
//! render a fixed message whatever the outcome. Failures only reach the logs.

use std::fmt;

use chrono::NaiveDateTime;
use serde_json::Value;
use thiserror::Error;

use crate::messages::{self, Locale, SyncStatus};

/// Administrative sync actions exposed by the panel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SyncAction {
    Leagues,
    Matches,
}

impl SyncAction {
    pub const ALL: [SyncAction; 2] = [SyncAction::Leagues, SyncAction::Matches];

    pub fn default_path(self) -> &'static str {
        match self {
            SyncAction::Leagues => "/api/sync/leagues",
            SyncAction::Matches => "/api/sync/matches",
        }
    }

    pub fn button_id(self) -> &'static str {
        match self {
            SyncAction::Leagues => "sync-leagues-btn",
            SyncAction::Matches => "sync-matches-btn",
        }
    }

    pub fn status_id(self) -> &'static str {
        match self {
            SyncAction::Leagues => "sync-leagues-status",
            SyncAction::Matches => "sync-matches-status",
        }
    }

    pub fn last_sync_id(self) -> &'static str {
        match self {
            SyncAction::Leagues => "last-sync",
            SyncAction::Matches => "last-sync-matches",
        }
    }
}

impl fmt::Display for SyncAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncAction::Leagues => f.write_str("leagues"),
            SyncAction::Matches => f.write_str("matches"),
        }
    }
}

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("network error: {0}")]
    Network(String),
    #[error("server answered {status}: {body}")]
    Status { status: u16, body: String },
    #[error("unreadable response body: {0}")]
    Body(String),
}

/// How a trigger invocation ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    Completed,
    Failed,
    /// Rejected because the same card was already busy
    Skipped,
}

/// Issues the request behind an action
#[allow(async_fn_in_trait)]
pub trait SyncTransport {
    async fn post(&self, action: SyncAction) -> Result<Value, SyncError>;
}

/// The on-page state of one card
pub trait SyncView {
    fn is_busy(&self) -> bool;
    fn set_busy(&self, busy: bool);
    fn set_status(&self, status: SyncStatus);
    fn set_last_sync(&self, label: String);
}

/// Synchronous half of a trigger, run inside the click handler so the button
/// is disabled before any await. Returns `false` if the card was already busy.
pub fn begin_sync<V: SyncView>(action: SyncAction, view: &V, locale: Locale) -> bool {
    if view.is_busy() {
        tracing::debug!(action = %action, "sync already running, trigger ignored");
        return false;
    }
    view.set_busy(true);
    view.set_status(SyncStatus::in_progress(action, locale));
    true
}

/// Awaits the single request and settles the card
pub async fn complete_sync<T, V>(
    action: SyncAction,
    transport: &T,
    view: &V,
    locale: Locale,
    now: impl FnOnce() -> NaiveDateTime,
) -> SyncOutcome
where
    T: SyncTransport,
    V: SyncView,
{
    let outcome = match transport.post(action).await {
        Ok(body) => {
            tracing::info!(action = %action, response = %body, "sync response");
            view.set_status(SyncStatus::completed(action, locale));
            view.set_last_sync(messages::last_sync_at(locale, now()));
            SyncOutcome::Completed
        }
        Err(err) => {
            tracing::error!(action = %action, error = %err, "sync error");
            view.set_status(SyncStatus::finished(action, locale));
            SyncOutcome::Failed
        }
    };
    view.set_busy(false);
    outcome
}

pub async fn run_sync<T, V>(
    action: SyncAction,
    transport: &T,
    view: &V,
    locale: Locale,
    now: impl FnOnce() -> NaiveDateTime,
) -> SyncOutcome
where
    T: SyncTransport,
    V: SyncView,
{
    if !begin_sync(action, view, locale) {
        return SyncOutcome::Skipped;
    }
    complete_sync(action, transport, view, locale, now).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::StatusTone;
    use chrono::NaiveDate;
    use serde_json::json;
    use std::cell::{Cell, RefCell};
    use tokio::sync::oneshot;

    #[derive(Debug, Clone, PartialEq)]
    enum Change {
        Busy(bool),
        Status(SyncStatus),
        LastSync(String),
    }

    #[derive(Default)]
    struct RecordingView {
        busy: Cell<bool>,
        status: RefCell<Option<SyncStatus>>,
        last_sync: RefCell<Option<String>>,
        changes: RefCell<Vec<Change>>,
    }

    impl SyncView for RecordingView {
        fn is_busy(&self) -> bool {
            self.busy.get()
        }

        fn set_busy(&self, busy: bool) {
            self.busy.set(busy);
            self.changes.borrow_mut().push(Change::Busy(busy));
        }

        fn set_status(&self, status: SyncStatus) {
            *self.status.borrow_mut() = Some(status.clone());
            self.changes.borrow_mut().push(Change::Status(status));
        }

        fn set_last_sync(&self, label: String) {
            *self.last_sync.borrow_mut() = Some(label.clone());
            self.changes.borrow_mut().push(Change::LastSync(label));
        }
    }

    /// Answers every action with a fixed result and counts requests
    struct FixedTransport {
        ok: bool,
        calls: RefCell<Vec<SyncAction>>,
    }

    impl FixedTransport {
        fn new(ok: bool) -> Self {
            FixedTransport { ok, calls: RefCell::new(Vec::new()) }
        }
    }

    impl SyncTransport for FixedTransport {
        async fn post(&self, action: SyncAction) -> Result<Value, SyncError> {
            self.calls.borrow_mut().push(action);
            if self.ok {
                Ok(json!({ "synced": 3 }))
            } else {
                Err(SyncError::Status { status: 500, body: r#"{"detail":"boom"}"#.to_string() })
            }
        }
    }

    /// Holds each request open until the test releases it
    struct GatedTransport {
        gate: RefCell<Option<oneshot::Receiver<Result<Value, SyncError>>>>,
        calls: Cell<usize>,
    }

    impl SyncTransport for GatedTransport {
        async fn post(&self, _action: SyncAction) -> Result<Value, SyncError> {
            self.calls.set(self.calls.get() + 1);
            let gate = self.gate.borrow_mut().take();
            match gate {
                Some(rx) => rx.await.unwrap_or_else(|_| Err(SyncError::Network("dropped".into()))),
                None => Err(SyncError::Network("no gate".into())),
            }
        }
    }

    fn noon() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, 19)
            .and_then(|d| d.and_hms_opt(12, 0, 0))
            .unwrap()
    }

    #[tokio::test]
    async fn test_success_sets_messages_and_last_sync() {
        let view = RecordingView::default();
        let transport = FixedTransport::new(true);

        let outcome = run_sync(SyncAction::Leagues, &transport, &view, Locale::Fr, noon).await;

        assert_eq!(outcome, SyncOutcome::Completed);
        assert_eq!(*transport.calls.borrow(), vec![SyncAction::Leagues]);
        assert_eq!(
            *view.changes.borrow(),
            vec![
                Change::Busy(true),
                Change::Status(SyncStatus::in_progress(SyncAction::Leagues, Locale::Fr)),
                Change::Status(SyncStatus::completed(SyncAction::Leagues, Locale::Fr)),
                Change::LastSync("Dernière sync: 19/10/2026 12:00:00".to_string()),
                Change::Busy(false),
            ]
        );
    }

    #[tokio::test]
    async fn test_failure_is_swallowed() {
        let view = RecordingView::default();
        let transport = FixedTransport::new(false);

        let outcome = run_sync(SyncAction::Matches, &transport, &view, Locale::Fr, noon).await;

        assert_eq!(outcome, SyncOutcome::Failed);
        assert!(!view.is_busy());
        let status = view.status.borrow().clone().unwrap();
        assert_eq!(status.text, "La synchronisation des matchs est terminée");
        assert_eq!(status.tone, StatusTone::Info);
        assert!(view.last_sync.borrow().is_none());
    }

    #[tokio::test]
    async fn test_busy_while_request_outstanding() {
        for ok in [true, false] {
            let (tx, rx) = oneshot::channel();
            let transport = GatedTransport { gate: RefCell::new(Some(rx)), calls: Cell::new(0) };
            let view = RecordingView::default();

            let check = async {
                assert!(view.is_busy());
                assert_eq!(
                    view.status.borrow().clone(),
                    Some(SyncStatus::in_progress(SyncAction::Leagues, Locale::En))
                );
                // A second click while the first is in flight
                let again = run_sync(SyncAction::Leagues, &transport, &view, Locale::En, noon).await;
                assert_eq!(again, SyncOutcome::Skipped);

                let result = if ok {
                    Ok(json!([]))
                } else {
                    Err(SyncError::Body("expected value".into()))
                };
                let _ = tx.send(result);
            };

            let (outcome, ()) = tokio::join!(
                run_sync(SyncAction::Leagues, &transport, &view, Locale::En, noon),
                check
            );

            assert_eq!(transport.calls.get(), 1);
            assert!(!view.is_busy());
            let expected = if ok { SyncOutcome::Completed } else { SyncOutcome::Failed };
            assert_eq!(outcome, expected);
        }
    }

    #[tokio::test]
    async fn test_last_sync_is_per_action() {
        let leagues = RecordingView::default();
        let matches = RecordingView::default();
        let transport = FixedTransport::new(true);

        let (a, b) = tokio::join!(
            run_sync(SyncAction::Leagues, &transport, &leagues, Locale::Fr, noon),
            async {
                run_sync(SyncAction::Matches, &FixedTransport::new(false), &matches, Locale::Fr, noon).await
            }
        );

        assert_eq!((a, b), (SyncOutcome::Completed, SyncOutcome::Failed));
        assert!(leagues.last_sync.borrow().is_some());
        assert!(matches.last_sync.borrow().is_none());
    }

    #[tokio::test]
    async fn test_begin_rejects_busy_card() {
        let view = RecordingView::default();
        assert!(begin_sync(SyncAction::Matches, &view, Locale::Fr));
        assert!(!begin_sync(SyncAction::Matches, &view, Locale::Fr));
        assert_eq!(view.changes.borrow().len(), 2);

        let outcome = complete_sync(SyncAction::Matches, &FixedTransport::new(true), &view, Locale::Fr, noon).await;
        assert_eq!(outcome, SyncOutcome::Completed);
        assert!(!view.is_busy());
    }

    #[test]
    fn test_action_endpoints_and_ids() {
        assert_eq!(SyncAction::Leagues.default_path(), "/api/sync/leagues");
        assert_eq!(SyncAction::Matches.default_path(), "/api/sync/matches");
        assert_eq!(SyncAction::Leagues.last_sync_id(), "last-sync");
        assert_eq!(SyncAction::Matches.last_sync_id(), "last-sync-matches");
        assert_eq!(SyncAction::Matches.to_string(), "matches");
    }
}
