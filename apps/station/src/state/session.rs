//! # Session State
//!
//! Owns the scan session for the lifetime of the process.
//!
//! ## Session Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Session State Operations                             │
//! │                                                                         │
//! │  Operator / Camera        Command                 Session Change        │
//! │  ─────────────────        ───────                 ──────────────        │
//! │                                                                         │
//! │  :new-box ───────────────► request_new_box() ───► mode = box scan      │
//! │                                                                         │
//! │  :scan-item ─────────────► request_product_scan()► mode = product scan │
//! │                                                                         │
//! │  decode event ───────────► on_decode() ─────────► box / quantity += 1  │
//! │                                                                         │
//! │  :share / :email ────────► generate_export() ───► (snapshot, read only)│
//! │                                                                         │
//! │  NOTE: Every access takes the lock briefly. Exports clone the packing  │
//! │        list under the lock and format it after releasing it.           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::{Arc, Mutex, PoisonError};

use packlist_core::ScanSession;

/// Shared scan session.
///
/// A poisoned lock is recovered rather than propagated: every session
/// method leaves the session consistent before it can panic.
#[derive(Debug, Clone)]
pub struct SessionState {
    session: Arc<Mutex<ScanSession>>,
}

impl SessionState {
    /// Wraps a session.
    pub fn new(session: ScanSession) -> Self {
        SessionState {
            session: Arc::new(Mutex::new(session)),
        }
    }

    /// Executes a function with read access to the session.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let summary = session_state.with_session(|s| s.summary());
    /// ```
    pub fn with_session<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&ScanSession) -> R,
    {
        let session = self.session.lock().unwrap_or_else(PoisonError::into_inner);
        f(&session)
    }

    /// Executes a function with write access to the session.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let outcome = session_state.with_session_mut(|s| s.on_decode("WB_100"))?;
    /// ```
    pub fn with_session_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut ScanSession) -> R,
    {
        let mut session = self.session.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut session)
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new(ScanSession::new())
    }
}
