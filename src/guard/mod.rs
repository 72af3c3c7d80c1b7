//! Access guard: gates a protected surface on the current principal.
//!
//! The guard wraps a protected screen/resource and only reports
//! `Authorized` once the session has settled and the principal satisfies
//! the declared requirements. Collaborators are injected through the
//! [`SessionSource`] and [`Navigator`] traits, so the guard owns no global
//! state and every dependency has an explicit lifecycle.
//!
//! State machine per guarded mount:
//!
//! ```text
//! Initializing --(no principal, loading done)--> RecoveringSession
//! RecoveringSession --(recovered)--> Initializing
//! RecoveringSession --(failed / none)--> UnauthorizedRedirecting   [terminal]
//! Initializing --(principal, checks pass)--> Authorized
//! Initializing --(principal, checks fail)--> DeniedRedirecting     [terminal]
//! Authorized --(periodic re-check invalid)--> UnauthorizedRedirecting
//! ```
//!
//! Two timers, both owned by the guard and cancelled on teardown:
//! a one-shot safety timeout that forces a sign-in redirect when
//! initialization has not resolved with no principal present, and a
//! re-validation interval that re-checks the session while authorized.
//! Navigation fires at most once per determination; the latch resets on a
//! path change so a remount can redirect again.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use istudio_config::GuardConfig;
use istudio_core::authz::{AccessDecision, DecisionReason, Permission, Principal, evaluate};
use istudio_core::errors::AppError;

use crate::metrics::track_authorization_check;

/// How often the guard re-reads the collaborator's loading flag while
/// waiting for the session to settle.
const LOADING_POLL_INTERVAL: Duration = Duration::from_millis(25);

/// The session/auth collaborator consumed by the guard.
///
/// The guard never authenticates anyone itself; it only reads the session
/// state this collaborator owns and asks it to re-validate or recover.
pub trait SessionSource: Send + Sync + 'static {
    /// Current principal, if a session is established.
    fn principal(&self) -> Option<Principal>;

    /// Whether the collaborator is still resolving the session.
    fn is_loading(&self) -> bool;

    /// Re-validates the current session. `Ok(false)` means the backend
    /// explicitly reported the session invalid.
    fn check_session(&self) -> impl Future<Output = Result<bool, AppError>> + Send;

    /// Attempts to restore a session (e.g. with a refresh token).
    /// `Ok(true)` means recovery succeeded and a principal update from the
    /// collaborator is expected.
    fn recover_session(&self) -> impl Future<Output = Result<bool, AppError>> + Send;
}

/// The navigation collaborator used for redirects.
pub trait Navigator: Send + Sync + 'static {
    fn push(&self, path: &str);
}

/// Guard lifecycle states for one mount.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardState {
    Initializing,
    RecoveringSession,
    Authorized,
    UnauthorizedRedirecting,
    DeniedRedirecting,
}

/// Authorization gate for one protected mount.
pub struct AccessGuard<S, N> {
    session: Arc<S>,
    navigator: Arc<N>,
    config: GuardConfig,
    admin_only: bool,
    required_permission: Option<Permission>,
    state: GuardState,
    redirected: Arc<AtomicBool>,
    revalidation: Option<JoinHandle<()>>,
}

impl<S: SessionSource, N: Navigator> AccessGuard<S, N> {
    pub fn new(session: Arc<S>, navigator: Arc<N>, config: GuardConfig) -> Self {
        Self {
            session,
            navigator,
            config,
            admin_only: false,
            required_permission: None,
            state: GuardState::Initializing,
            redirected: Arc::new(AtomicBool::new(false)),
            revalidation: None,
        }
    }

    /// Restricts the guarded resource to the admin role.
    pub fn admin_only(mut self) -> Self {
        self.admin_only = true;
        self
    }

    /// Requires a specific permission from the principal.
    pub fn require_permission(mut self, permission: Permission) -> Self {
        self.required_permission = Some(permission);
        self
    }

    pub fn state(&self) -> GuardState {
        self.state
    }

    pub fn is_authorized(&self) -> bool {
        self.state == GuardState::Authorized
    }

    /// Drives the state machine until it settles and returns the decision.
    ///
    /// Terminal denials have already triggered their (single) navigation
    /// by the time this returns. On `Authorized` the periodic
    /// re-validation task is running; it stops on teardown.
    pub async fn resolve(&mut self) -> AccessDecision {
        self.state = GuardState::Initializing;
        let deadline = tokio::time::Instant::now() + self.config.resolve_timeout();

        // Wait out the collaborator's loading phase, bounded by the safety
        // timeout.
        while self.session.is_loading() {
            if tokio::time::Instant::now() >= deadline {
                if self.session.principal().is_some() {
                    break;
                }
                warn!("Session did not resolve within the safety timeout");
                return self.unauthorized();
            }
            tokio::time::sleep(LOADING_POLL_INTERVAL).await;
        }

        if self.session.principal().is_none() {
            self.state = GuardState::RecoveringSession;
            let recovered =
                tokio::time::timeout_at(deadline, self.session.recover_session()).await;
            match recovered {
                Ok(Ok(true)) => {
                    debug!("Session recovered; re-reading principal");
                    self.state = GuardState::Initializing;
                }
                Ok(Ok(false)) => {
                    info!("No recoverable session");
                    return self.unauthorized();
                }
                Ok(Err(e)) => {
                    error!(error = %e.error, "Session recovery failed");
                    return self.unauthorized();
                }
                Err(_) => {
                    warn!("Session recovery did not resolve within the safety timeout");
                    return self.unauthorized();
                }
            }
        }

        let principal = self.session.principal();
        let decision = evaluate(
            principal.as_ref(),
            self.admin_only,
            self.required_permission,
        );
        let role = principal.as_ref().map(|p| p.role.clone()).unwrap_or_default();
        track_authorization_check(decision.allowed, &role);

        match decision.reason {
            DecisionReason::Ok => {
                self.state = GuardState::Authorized;
                self.start_revalidation();
                decision
            }
            DecisionReason::NoSession => self.unauthorized(),
            DecisionReason::InsufficientRole | DecisionReason::InsufficientPermission => {
                info!(reason = ?decision.reason, role = %role, "Access denied");
                self.state = GuardState::DeniedRedirecting;
                self.redirect_once(&self.config.home_path);
                decision
            }
        }
    }

    /// A path change resets the in-flight redirect latch so the next
    /// determination can navigate again. It is not a logical state reset.
    pub fn reset_for_path_change(&mut self) {
        self.redirected.store(false, Ordering::SeqCst);
    }

    /// Cancels the re-validation task. Also runs on drop.
    pub fn teardown(&mut self) {
        if let Some(task) = self.revalidation.take() {
            task.abort();
        }
    }

    fn unauthorized(&mut self) -> AccessDecision {
        self.state = GuardState::UnauthorizedRedirecting;
        self.redirect_once(&self.config.sign_in_path);
        AccessDecision::denied(DecisionReason::NoSession)
    }

    fn redirect_once(&self, path: &str) {
        if !self.redirected.swap(true, Ordering::SeqCst) {
            self.navigator.push(path);
        }
    }

    fn start_revalidation(&mut self) {
        self.teardown();

        let session = Arc::clone(&self.session);
        let navigator = Arc::clone(&self.navigator);
        let redirected = Arc::clone(&self.redirected);
        let sign_in_path = self.config.sign_in_path.clone();
        let interval = self.config.revalidate_interval();

        self.revalidation = Some(tokio::spawn(async move {
            loop {
                tokio::time::sleep(interval).await;
                match session.check_session().await {
                    Ok(true) => debug!("Periodic session check passed"),
                    Ok(false) => {
                        info!("Periodic session check reported an invalid session");
                        if !redirected.swap(true, Ordering::SeqCst) {
                            navigator.push(&sign_in_path);
                        }
                        break;
                    }
                    // A failed check is not an invalid session; keep the
                    // route mounted and retry on the next tick.
                    Err(e) => warn!(error = %e.error, "Periodic session check failed"),
                }
            }
        }));
    }
}

impl<S, N> Drop for AccessGuard<S, N> {
    fn drop(&mut self) {
        if let Some(task) = self.revalidation.take() {
            task.abort();
        }
    }
}
