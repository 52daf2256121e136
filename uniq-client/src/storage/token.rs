//! Token store - two-tier auth token persistence

use std::io;
use std::sync::Arc;

use super::area::StorageArea;

/// Key under which the token itself is stored.
const TOKEN_KEY: &str = "uniq_auth_token";

/// Key recording which tier currently holds the token. Always written
/// to the durable area so the choice survives a session-area wipe.
const TIER_MARKER_KEY: &str = "user_auth_storage";

/// Marker value for the durable tier.
const TIER_DURABLE: &str = "local";

/// Marker value for the session tier.
const TIER_SESSION: &str = "session";

/// Holds the single auth token in exactly one of two storage tiers,
/// chosen at login time.
///
/// Pure storage indirection: no network access, no token validation.
#[derive(Clone)]
pub struct TokenStore {
    durable: Arc<dyn StorageArea>,
    session: Arc<dyn StorageArea>,
}

impl TokenStore {
    /// Create a token store over a durable and a session area.
    pub fn new(durable: Arc<dyn StorageArea>, session: Arc<dyn StorageArea>) -> Self {
        Self { durable, session }
    }

    /// Write `token` into exactly one tier and record which.
    ///
    /// The other tier's token is cleared so at most one tier ever holds
    /// a live token, and the marker is rewritten so no stale choice
    /// survives.
    pub fn set(&self, token: &str, persist_beyond_session: bool) -> io::Result<()> {
        if persist_beyond_session {
            self.durable.set(TOKEN_KEY, token)?;
            self.durable.set(TIER_MARKER_KEY, TIER_DURABLE)?;
            self.session.remove(TOKEN_KEY)?;
        } else {
            self.session.set(TOKEN_KEY, token)?;
            self.durable.set(TIER_MARKER_KEY, TIER_SESSION)?;
            self.durable.remove(TOKEN_KEY)?;
        }
        tracing::debug!(
            durable = persist_beyond_session,
            "Auth token stored"
        );
        Ok(())
    }

    /// Read the token from the tier the marker points at.
    ///
    /// Without a marker, falls back to the durable tier and then the
    /// session tier, in that order (legacy layouts predating the
    /// marker).
    pub fn get(&self) -> Option<String> {
        match self.durable.get(TIER_MARKER_KEY).as_deref() {
            Some(TIER_DURABLE) => self.durable.get(TOKEN_KEY),
            Some(TIER_SESSION) => self.session.get(TOKEN_KEY),
            _ => self
                .durable
                .get(TOKEN_KEY)
                .or_else(|| self.session.get(TOKEN_KEY)),
        }
    }

    /// Remove the token and the tier marker from both tiers.
    pub fn clear(&self) -> io::Result<()> {
        self.durable.remove(TOKEN_KEY)?;
        self.durable.remove(TIER_MARKER_KEY)?;
        self.session.remove(TOKEN_KEY)?;
        tracing::debug!("Auth token cleared");
        Ok(())
    }
}
