//! Per-event memoization of identity and API-client resolution.

use std::sync::Arc;

use {
    herald_channels::ReplyPayload,
    serde_json::Value,
    tokio::sync::OnceCell,
    tracing::{debug, info, warn},
};

use crate::{
    event::EventContext,
    identity::{AccessTier, ApiClientFactory, Credential, IdentityResolver, ResolvedIdentity},
};

/// Identity records resolved for one event, one slot per [`AccessTier`].
///
/// Slots are filled on first access and never invalidated; the cache is
/// dropped together with the event's runtime.
pub struct SessionResourceCache<F> {
    resolver: Arc<dyn IdentityResolver>,
    clients: Arc<F>,
    slots: [OnceCell<Arc<ResolvedIdentity>>; 2],
}

impl<F: ApiClientFactory> SessionResourceCache<F> {
    pub fn new(resolver: Arc<dyn IdentityResolver>, clients: Arc<F>) -> Self {
        Self {
            resolver,
            clients,
            slots: [OnceCell::new(), OnceCell::new()],
        }
    }

    /// Resolve the identity for `tier`, asking the resolver at most once.
    ///
    /// Resolver errors are cached as an empty identity so the event does not
    /// retry a lookup that already failed.
    pub async fn resolve_identity(
        &self,
        event: &EventContext,
        tier: AccessTier,
    ) -> Arc<ResolvedIdentity> {
        let slot = &self.slots[tier.index()];
        if let Some(cached) = slot.get() {
            debug!(event_id = event.event_id(), %tier, "identity cache hit");
            return Arc::clone(cached);
        }

        let resolved = slot
            .get_or_init(|| async {
                let mode = tier.lookup_mode();
                match self.resolver.resolve(event, mode).await {
                    Ok(identity) => {
                        debug!(
                            event_id = event.event_id(),
                            %tier,
                            ?mode,
                            found = !identity.is_empty(),
                            has_credential = identity.usable_credential().is_some(),
                            "resolved identity"
                        );
                        Arc::new(identity)
                    },
                    Err(e) => {
                        warn!(
                            event_id = event.event_id(),
                            %tier,
                            error = %e,
                            "identity resolution failed, treating as unbound"
                        );
                        Arc::new(ResolvedIdentity::default())
                    },
                }
            })
            .await;
        Arc::clone(resolved)
    }

    /// Build an API client for `tier`, or `None` when the identity lacks a
    /// uid or a credential.
    ///
    /// Clients are rebuilt on every call; only the identity is cached.
    pub async fn resolve_client(
        &self,
        event: &EventContext,
        tier: AccessTier,
        options: &Value,
    ) -> Option<F::Client> {
        let identity = self.resolve_identity(event, tier).await;
        let (uid, credential) = identity.usable_credential()?;
        Some(self.clients.construct(uid, credential, options))
    }

    /// Build a client from a pair the caller has already verified.
    pub fn create_client(&self, uid: &str, credential: &Credential, options: &Value) -> F::Client {
        self.clients.construct(uid, credential, options)
    }

    /// Uid of the user who issued `event`.
    ///
    /// When nobody is bound, the event's reply channel receives `guidance`
    /// once per event.
    pub async fn resolve_requesting_user(
        &self,
        event: &EventContext,
        guidance: &str,
    ) -> Option<String> {
        let identity = self.resolve_identity(event, AccessTier::All).await;
        if let Some(uid) = identity.uid.as_deref().filter(|u| !u.is_empty()) {
            return Some(uid.to_string());
        }

        if event.claim_guidance() {
            info!(
                event_id = event.event_id(),
                chat_id = %event.target().chat_id,
                "no identity bound to sender, sending guidance"
            );
            if let Err(e) = event.reply(ReplyPayload::text(guidance)).await {
                warn!(event_id = event.event_id(), error = %e, "failed to send guidance");
            }
        }
        None
    }
}
