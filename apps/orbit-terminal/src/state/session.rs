//! # Session State
//!
//! Owns the register's [`PosSession`]: context, cart and attached customer.
//!
//! ## Thread Safety
//! The session sits behind a `tokio::sync::Mutex` so checkout can hold the
//! lock across the backend append:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  checkout()                         add_to_cart()                       │
//! │     │ lock ◄──────────────────────────── waits                          │
//! │     │ assemble                                                          │
//! │     │ append (await) ──► backend                                        │
//! │     │ clear on success                                                  │
//! │     │ unlock ─────────────────────────► proceeds on an empty cart       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A cart edit can never land between "recorded" and "cleared".

use tokio::sync::{Mutex, MutexGuard};

use orbit_core::{PosSession, SessionContext};

#[derive(Debug)]
pub struct SessionState {
    session: Mutex<PosSession>,
}

impl SessionState {
    pub fn new(context: SessionContext) -> Self {
        SessionState {
            session: Mutex::new(PosSession::new(context)),
        }
    }

    /// Runs `f` with read access to the session.
    pub async fn with_session<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&PosSession) -> R,
    {
        let session = self.session.lock().await;
        f(&session)
    }

    /// Runs `f` with exclusive access to the session.
    pub async fn with_session_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut PosSession) -> R,
    {
        let mut session = self.session.lock().await;
        f(&mut session)
    }

    /// Holds the session for a multi-step operation that awaits in between.
    pub async fn lock(&self) -> MutexGuard<'_, PosSession> {
        self.session.lock().await
    }

    pub async fn snapshot(&self) -> PosSession {
        self.session.lock().await.clone()
    }
}
