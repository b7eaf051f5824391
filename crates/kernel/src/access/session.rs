//! Session state as a source of principal snapshots.

use std::sync::Arc;

use anyhow::{Result, bail};
use async_trait::async_trait;
use tokio::sync::watch;
use tokio_stream::StreamExt;
use tokio_stream::wrappers::WatchStream;

use super::principal::Principal;

/// State of the session as seen by the navigation core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionSnapshot {
    /// Not known yet (e.g. the token is still being validated).
    Pending,
    SignedOut,
    SignedIn(Principal),
}

/// Something that can produce the current principal.
///
/// `Ok(None)` means nobody is signed in. Implementations may wait for the
/// session to settle; callers bound the wait with a timeout.
#[async_trait]
pub trait PrincipalSource: Send + Sync {
    async fn current(&self) -> Result<Option<Principal>>;
}

/// Maps a request's bearer token to a principal source.
pub trait SessionProvider: Send + Sync {
    fn session(&self, token: Option<&str>) -> Arc<dyn PrincipalSource>;
}

/// In-process session backed by a `watch` channel.
///
/// Cloning shares the same underlying session.
#[derive(Clone)]
pub struct SessionState {
    tx: Arc<watch::Sender<SessionSnapshot>>,
}

impl SessionState {
    /// A session that has not settled yet.
    pub fn pending() -> Self {
        let (tx, _rx) = watch::channel(SessionSnapshot::Pending);
        Self { tx: Arc::new(tx) }
    }

    pub fn signed_out() -> Self {
        let state = Self::pending();
        state.sign_out();
        state
    }

    pub fn signed_in(principal: Principal) -> Self {
        let state = Self::pending();
        state.sign_in(principal);
        state
    }

    pub fn sign_in(&self, principal: Principal) {
        self.tx.send_replace(SessionSnapshot::SignedIn(principal));
    }

    pub fn sign_out(&self) {
        self.tx.send_replace(SessionSnapshot::SignedOut);
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.tx.subscribe()
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::pending()
    }
}

#[async_trait]
impl PrincipalSource for SessionState {
    /// First settled value of the session stream.
    async fn current(&self) -> Result<Option<Principal>> {
        let mut stream = WatchStream::new(self.tx.subscribe());

        while let Some(snapshot) = stream.next().await {
            match snapshot {
                SessionSnapshot::Pending => continue,
                SessionSnapshot::SignedOut => return Ok(None),
                SessionSnapshot::SignedIn(principal) => return Ok(Some(principal)),
            }
        }

        bail!("session stream closed before settling")
    }
}

impl std::fmt::Debug for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionState")
            .field("snapshot", &*self.tx.borrow())
            .finish()
    }
}
