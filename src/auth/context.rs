//! Process-wide authentication context.
//!
//! The credential token is published through a watch channel. Exactly one
//! [`AuthListener`] writes to it (the identity-provider callback); any number
//! of [`AuthContext`] handles read it. Detaching the listener signs the
//! context out so no reader keeps using a token nobody maintains.

use once_cell::sync::Lazy;
use std::sync::Mutex;
use tokio::sync::watch;
use tracing::{debug, info};

use crate::traits::IdentitySession;

/// Authentication state as seen by readers.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum AuthState {
    /// No identity callback has reported yet
    #[default]
    Unknown,
    SignedOut,
    SignedIn(IdentitySession),
}

impl AuthState {
    pub fn session(&self) -> Option<&IdentitySession> {
        match self {
            AuthState::SignedIn(session) => Some(session),
            _ => None,
        }
    }
}

/// Read-only handle on the authentication state.
#[derive(Debug, Clone)]
pub struct AuthContext {
    rx: watch::Receiver<AuthState>,
}

impl AuthContext {
    /// Current state snapshot.
    pub fn state(&self) -> AuthState {
        self.rx.borrow().clone()
    }

    /// Bearer token of the signed-in user.
    pub fn token(&self) -> Option<String> {
        self.rx.borrow().session().map(|s| s.id_token.clone())
    }

    /// Current session, if signed in.
    pub fn session(&self) -> Option<IdentitySession> {
        self.rx.borrow().session().cloned()
    }

    pub fn is_signed_in(&self) -> bool {
        self.rx.borrow().session().is_some()
    }

    /// Receiver that is notified on every change.
    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.rx.clone()
    }

    /// Wait until the state changes; returns the new state, or `None` once
    /// the listener is gone.
    pub async fn changed(&mut self) -> Option<AuthState> {
        self.rx.changed().await.ok()?;
        Some(self.rx.borrow_and_update().clone())
    }
}

/// Exclusive writer of the authentication state.
#[derive(Debug)]
pub struct AuthListener {
    tx: watch::Sender<AuthState>,
    detached: bool,
}

impl AuthListener {
    /// Create a listener and its first reader.
    pub fn new() -> (AuthListener, AuthContext) {
        let (tx, rx) = watch::channel(AuthState::Unknown);
        (
            AuthListener {
                tx,
                detached: false,
            },
            AuthContext { rx },
        )
    }

    /// Take the process-wide writer. Succeeds once per process.
    pub fn take_global() -> Option<AuthListener> {
        let mut slot = GLOBAL.writer.lock().ok()?;
        slot.take()
    }

    /// Another reader on the same state.
    pub fn context(&self) -> AuthContext {
        AuthContext {
            rx: self.tx.subscribe(),
        }
    }

    /// Publish a signed-in session (also used for token refreshes).
    pub fn signed_in(&self, session: IdentitySession) {
        info!("Auth state: signed in as {}", session.email);
        self.tx.send_replace(AuthState::SignedIn(session));
    }

    /// Publish the signed-out state.
    pub fn signed_out(&self) {
        info!("Auth state: signed out");
        self.tx.send_replace(AuthState::SignedOut);
    }

    /// Tear down: readers see `SignedOut` and the channel closes.
    pub fn detach(mut self) {
        self.teardown();
    }

    fn teardown(&mut self) {
        if !self.detached {
            debug!("Auth listener detached");
            self.tx.send_replace(AuthState::SignedOut);
            self.detached = true;
        }
    }
}

impl Drop for AuthListener {
    fn drop(&mut self) {
        self.teardown();
    }
}

struct Global {
    writer: Mutex<Option<AuthListener>>,
    context: AuthContext,
}

static GLOBAL: Lazy<Global> = Lazy::new(|| {
    let (listener, context) = AuthListener::new();
    Global {
        writer: Mutex::new(Some(listener)),
        context,
    }
});

/// Reader on the process-wide authentication state.
pub fn global() -> AuthContext {
    GLOBAL.context.clone()
}
