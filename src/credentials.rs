//! Request-signing credentials: ambient (profile/environment chain) or
//! federated (temporary credentials minted by role assumption).

use chrono::{DateTime, Utc};
use std::fmt;

/// Short-lived credentials returned by role assumption. Never persisted and
/// never refreshed; callers mint a new set per invocation.
#[derive(Clone, PartialEq, Eq)]
pub struct TemporaryCredentials {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub session_token: String,
    pub expiration: DateTime<Utc>,
}

impl TemporaryCredentials {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expiration
    }
}

impl fmt::Debug for TemporaryCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TemporaryCredentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"** redacted **")
            .field("session_token", &"** redacted **")
            .field("expiration", &self.expiration)
            .finish()
    }
}

/// Where the engine transport gets its signing credentials from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialSource {
    /// Default provider chain, optionally pinned to a named profile.
    Ambient { profile: Option<String> },
    Federated(TemporaryCredentials),
}

impl CredentialSource {
    pub fn ambient(profile: Option<String>) -> Self {
        CredentialSource::Ambient { profile }
    }

    pub fn is_federated(&self) -> bool {
        matches!(self, CredentialSource::Federated(_))
    }
}
