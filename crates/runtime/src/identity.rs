//! Identity records, access tiers and the services that resolve them.

use std::fmt;

use {
    async_trait::async_trait,
    secrecy::{ExposeSecret, Secret},
    serde::{Deserialize, Serialize},
    serde_json::Value,
};

use crate::event::EventContext;

/// Access secret (session cookie) for privileged remote-API calls.
pub type Credential = Secret<String>;

/// Capability a command requires from the identity it queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessTier {
    /// Any bound identity will do.
    All,
    /// The identity must carry a credential.
    Cookie,
}

impl AccessTier {
    pub const ALL: [AccessTier; 2] = [Self::All, Self::Cookie];

    /// Lookup mode handed to the [`IdentityResolver`] for this tier.
    pub fn lookup_mode(self) -> LookupMode {
        match self {
            Self::All => LookupMode::RoleIndex,
            Self::Cookie => LookupMode::Detail,
        }
    }

    pub(crate) fn index(self) -> usize {
        match self {
            Self::All => 0,
            Self::Cookie => 1,
        }
    }
}

impl fmt::Display for AccessTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::All => "all",
            Self::Cookie => "cookie",
        })
    }
}

/// How strict the identity lookup is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LookupMode {
    /// Public profile queries; a bare uid is enough.
    RoleIndex,
    /// Detailed queries that need a credential-bearing identity.
    Detail,
}

/// Who a request concerns, and the credential they granted, if any.
#[derive(Clone, Default)]
pub struct ResolvedIdentity {
    pub uid: Option<String>,
    pub credential: Option<Credential>,
}

impl ResolvedIdentity {
    pub fn new(uid: impl Into<String>) -> Self {
        Self {
            uid: Some(uid.into()),
            credential: None,
        }
    }

    #[must_use]
    pub fn with_credential(mut self, credential: impl Into<String>) -> Self {
        self.credential = Some(Secret::new(credential.into()));
        self
    }

    /// No uid could be resolved.
    pub fn is_empty(&self) -> bool {
        self.uid.as_deref().is_none_or(str::is_empty)
    }

    /// The uid/credential pair, when both are present and non-empty.
    pub fn usable_credential(&self) -> Option<(&str, &Credential)> {
        let uid = self.uid.as_deref().filter(|u| !u.is_empty())?;
        let credential = self
            .credential
            .as_ref()
            .filter(|c| !c.expose_secret().is_empty())?;
        Some((uid, credential))
    }
}

impl fmt::Debug for ResolvedIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedIdentity")
            .field("uid", &self.uid)
            .field("credential", &self.credential.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

/// Looks up the identity an event refers to.
///
/// Failures are logged by the caller and treated as "no identity".
#[async_trait]
pub trait IdentityResolver: Send + Sync {
    async fn resolve(
        &self,
        event: &EventContext,
        mode: LookupMode,
    ) -> anyhow::Result<ResolvedIdentity>;
}

/// Builds remote-API clients from a verified uid/credential pair.
pub trait ApiClientFactory: Send + Sync {
    type Client;

    fn construct(&self, uid: &str, credential: &Credential, options: &Value) -> Self::Client;
}
