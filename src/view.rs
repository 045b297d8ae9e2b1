//! View fetch lifecycle.
//!
//! Every data-bound view follows the same state machine:
//! `Idle -> Loading -> {Ready, DomainError, TransportError}`, with an
//! orthogonal `Unmounted` absorbing state reachable from anywhere. A
//! [`FetchSlot`] is one logical fetch role within a view (primary resource,
//! auxiliary list); it owns at most one in-flight task, cancels the prior
//! task when a new fetch starts, and never mutates state after unmount.

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use crate::classify::{ApiOutcome, DomainError};
use crate::error::Result;
use crate::session::SessionStore;
use crate::task::CancelableTask;

/// Local state of one fetch slot
#[derive(Debug, Clone, PartialEq)]
pub enum ViewState<T> {
    Idle,
    Loading,
    Ready(T),
    DomainError(DomainError),
    TransportError(String),
    Unmounted,
}

impl<T> ViewState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn is_unmounted(&self) -> bool {
        matches!(self, Self::Unmounted)
    }

    /// The loaded resource, if any
    pub fn ready(&self) -> Option<&T> {
        match self {
            Self::Ready(value) => Some(value),
            _ => None,
        }
    }

    /// The retained domain error, if any
    pub fn domain_error(&self) -> Option<&DomainError> {
        match self {
            Self::DomainError(error) => Some(error),
            _ => None,
        }
    }

    /// A dismissible notice describing the current error state, if the
    /// slot is in one.
    pub fn error_notice(&self) -> Option<ErrorNotice> {
        match self {
            Self::DomainError(error) => Some(ErrorNotice {
                kind: ErrorNoticeKind::Domain,
                message: error.message.clone(),
                code: Some(error.code),
            }),
            Self::TransportError(message) => Some(ErrorNotice {
                kind: ErrorNoticeKind::Transport,
                message: message.clone(),
                code: None,
            }),
            _ => None,
        }
    }
}

/// Which side of the error taxonomy a notice came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorNoticeKind {
    Domain,
    Transport,
}

/// User-visible, dismissible error affordance
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorNotice {
    pub kind: ErrorNoticeKind,
    pub message: String,
    pub code: Option<i64>,
}

/// One logical fetch role within a view.
///
/// Owns at most one in-flight [`CancelableTask`]; a new `start` cancels the
/// prior task first so a stale result can never overwrite fresher state.
pub struct FetchSlot<T> {
    state: ViewState<T>,
    task: Option<CancelableTask<ApiOutcome<T>>>,
    token: Option<CancellationToken>,
}

impl<T> Default for FetchSlot<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> FetchSlot<T> {
    pub fn new() -> Self {
        Self {
            state: ViewState::Idle,
            task: None,
            token: None,
        }
    }

    pub fn state(&self) -> &ViewState<T> {
        &self.state
    }

    /// Tear the slot down: cancel any pending task and absorb into
    /// `Unmounted`. Late resolutions are swallowed, never applied.
    pub fn unmount(&mut self) {
        if let Some(token) = &self.token {
            token.cancel();
        }
        self.state = ViewState::Unmounted;
    }

    /// Dismiss a visible error notice, returning the slot to `Idle`
    pub fn dismiss_error(&mut self) {
        if matches!(
            self.state,
            ViewState::DomainError(_) | ViewState::TransportError(_)
        ) {
            self.state = ViewState::Idle;
        }
    }
}

impl<T: Send + 'static> FetchSlot<T> {
    /// Begin a fetch. Any still-pending prior task for this slot is
    /// canceled before the new one is spawned.
    pub fn start<F>(&mut self, operation: F)
    where
        F: Future<Output = Result<ApiOutcome<T>>> + Send + 'static,
    {
        if self.state.is_unmounted() {
            return;
        }

        if let Some(token) = &self.token {
            token.cancel();
        }

        let task = CancelableTask::spawn(operation);
        self.token = Some(task.cancellation_token());
        self.task = Some(task);
        self.state = ViewState::Loading;
    }

    /// Await the pending task and fold its outcome into the slot state.
    ///
    /// Canceled outcomes are a no-op; domain errors and transport failures
    /// are retained; nothing is applied once the slot is unmounted.
    pub async fn resolve(&mut self) {
        let Some(task) = self.task.take() else {
            return;
        };

        let outcome = task.outcome().await;
        self.apply(outcome);
    }

    fn apply(&mut self, outcome: Result<ApiOutcome<T>>) {
        if self.state.is_unmounted() {
            return;
        }

        match outcome {
            Err(error) if error.is_canceled() => {
                tracing::trace!("fetch outcome suppressed by cancellation");
            }
            Err(error) => {
                tracing::warn!(%error, "fetch failed before producing a decodable value");
                self.state = ViewState::TransportError(error.to_string());
            }
            Ok(ApiOutcome::Domain(domain)) => {
                self.state = ViewState::DomainError(domain);
            }
            Ok(ApiOutcome::Ok(value)) => {
                self.state = ViewState::Ready(value);
            }
        }
    }
}

/// Side-channel "not authorized" notification.
///
/// Fires at most once per signal: clears the stored token, records the
/// current path as the login-return target, then notifies subscribers so
/// the routing collaborator can redirect to the login view.
pub struct AuthSignal {
    session: Arc<dyn SessionStore>,
    fired: AtomicBool,
    tx: watch::Sender<bool>,
}

impl AuthSignal {
    pub fn new(session: Arc<dyn SessionStore>) -> Self {
        let (tx, _rx) = watch::channel(false);
        Self {
            session,
            fired: AtomicBool::new(false),
            tx,
        }
    }

    /// Receiver flipping to `true` when the signal fires
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.tx.subscribe()
    }

    pub fn has_fired(&self) -> bool {
        self.fired.load(Ordering::SeqCst)
    }

    /// Inspect a slot's state after resolution and fire when it retains an
    /// unauthenticated domain error.
    pub fn observe<T>(&self, state: &ViewState<T>, current_path: &str) {
        if let Some(error) = state.domain_error() {
            if error.is_unauthenticated() {
                self.notify(current_path);
            }
        }
    }

    /// Fire the signal. Idempotent; only the first call has any effect.
    pub fn notify(&self, current_path: &str) {
        if self.fired.swap(true, Ordering::SeqCst) {
            return;
        }

        if self.session.token_available() {
            if let Err(error) = self.session.unset_token() {
                tracing::warn!(%error, "failed to clear session token");
            }
        }
        if let Err(error) = self.session.set_login_from(current_path) {
            tracing::warn!(%error, "failed to record login-return path");
        }

        let _ = self.tx.send(true);
    }
}

/// Where to navigate after a successful login: the recorded return path,
/// consumed, or the root path when none was set.
pub fn login_redirect_target(session: &dyn SessionStore) -> String {
    session
        .take_login_from()
        .unwrap_or_else(|| "/".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PeonyAdminError;
    use crate::session::MemorySessionStore;
    use serde_json::json;
    use std::time::Duration;
    use tokio::sync::oneshot;

    fn domain_error(code: i64) -> DomainError {
        DomainError::from_value(&json!({
            "message": "m",
            "code": code,
            "data": null,
            "timestamp": "t"
        }))
        .expect("valid domain error shape")
    }

    #[tokio::test]
    async fn test_slot_reaches_ready() {
        let mut slot: FetchSlot<u32> = FetchSlot::new();
        assert_eq!(*slot.state(), ViewState::Idle);

        slot.start(async { Ok(ApiOutcome::Ok(5)) });
        assert!(slot.state().is_loading());

        slot.resolve().await;
        assert_eq!(slot.state().ready(), Some(&5));
        assert!(slot.state().error_notice().is_none());
    }

    #[tokio::test]
    async fn test_slot_retains_domain_error() {
        let mut slot: FetchSlot<u32> = FetchSlot::new();
        slot.start(async { Ok(ApiOutcome::Domain(domain_error(404))) });
        slot.resolve().await;

        let notice = slot.state().error_notice().unwrap();
        assert_eq!(notice.kind, ErrorNoticeKind::Domain);
        assert_eq!(notice.code, Some(404));

        slot.dismiss_error();
        assert_eq!(*slot.state(), ViewState::Idle);
    }

    #[tokio::test]
    async fn test_slot_retains_transport_error() {
        let mut slot: FetchSlot<u32> = FetchSlot::new();
        slot.start(async { Err(PeonyAdminError::general("connection refused")) });
        slot.resolve().await;

        let notice = slot.state().error_notice().unwrap();
        assert_eq!(notice.kind, ErrorNoticeKind::Transport);
        assert!(notice.message.contains("connection refused"));
    }

    #[tokio::test]
    async fn test_unmount_before_response_never_mutates_state() {
        let (tx, rx) = oneshot::channel::<()>();
        let mut slot: FetchSlot<u32> = FetchSlot::new();
        slot.start(async move {
            let _ = rx.await;
            Ok(ApiOutcome::Ok(99))
        });

        slot.unmount();
        assert!(slot.state().is_unmounted());

        // The response "arrives" after unmount; resolution is swallowed.
        let _ = tx.send(());
        slot.resolve().await;
        assert!(slot.state().is_unmounted());
        assert!(slot.state().ready().is_none());
    }

    #[tokio::test]
    async fn test_start_after_unmount_is_ignored() {
        let mut slot: FetchSlot<u32> = FetchSlot::new();
        slot.unmount();
        slot.start(async { Ok(ApiOutcome::Ok(1)) });
        assert!(slot.state().is_unmounted());
    }

    #[tokio::test]
    async fn test_restart_cancels_stale_fetch() {
        let (tx, rx) = oneshot::channel::<()>();
        let mut slot: FetchSlot<u32> = FetchSlot::new();

        // Old route's fetch, still pending.
        slot.start(async move {
            let _ = rx.await;
            Ok(ApiOutcome::Ok(1))
        });

        // Route change: new fetch replaces it.
        slot.start(async { Ok(ApiOutcome::Ok(2)) });
        slot.resolve().await;
        assert_eq!(slot.state().ready(), Some(&2));

        // The stale result arrives late and is never applied.
        let _ = tx.send(());
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(slot.state().ready(), Some(&2));
    }

    #[tokio::test]
    async fn test_auth_signal_fires_exactly_once() {
        let session = Arc::new(MemorySessionStore::new());
        session.set_token("stale-token").unwrap();

        let signal = AuthSignal::new(session.clone());
        let mut rx = signal.subscribe();

        let state: ViewState<u32> = ViewState::DomainError(domain_error(401));
        signal.observe(&state, "/settings/users");
        signal.observe(&state, "/somewhere/else");

        assert!(signal.has_fired());
        assert!(*rx.borrow_and_update());

        // Token cleared, first path retained.
        assert!(session.token().is_none());
        assert_eq!(session.login_from().as_deref(), Some("/settings/users"));
    }

    #[tokio::test]
    async fn test_auth_signal_ignores_other_domain_errors() {
        let session = Arc::new(MemorySessionStore::new());
        let signal = AuthSignal::new(session);

        let state: ViewState<u32> = ViewState::DomainError(domain_error(422));
        signal.observe(&state, "/posts");
        assert!(!signal.has_fired());

        let state: ViewState<u32> = ViewState::Ready(3);
        signal.observe(&state, "/posts");
        assert!(!signal.has_fired());
    }

    #[test]
    fn test_login_redirect_target_consumes_return_path() {
        let session = MemorySessionStore::new();
        assert_eq!(login_redirect_target(&session), "/");

        session.set_login_from("/post_tags/tag/abc").unwrap();
        assert_eq!(login_redirect_target(&session), "/post_tags/tag/abc");
        // Consumed: a second login goes to the root.
        assert_eq!(login_redirect_target(&session), "/");
    }
}
