use std::sync::Arc;

use {herald_config::HeraldConfig, serde_json::Value, tracing::debug};

use crate::{
    cache::SessionResourceCache,
    error::Result,
    event::{EventContext, EventUser},
    fs::{Filesystem, LocalFilesystem},
    identity::{AccessTier, ApiClientFactory, Credential, IdentityResolver, ResolvedIdentity},
    render::{RenderEngine, RenderOutcome, RenderPipeline, RenderRequest},
};

/// Collaborators shared by every event. Cheap to clone.
pub struct RuntimeServices<F> {
    identity: Arc<dyn IdentityResolver>,
    clients: Arc<F>,
    render: Arc<RenderPipeline>,
    guidance_message: Arc<str>,
}

impl<F> Clone for RuntimeServices<F> {
    fn clone(&self) -> Self {
        Self {
            identity: Arc::clone(&self.identity),
            clients: Arc::clone(&self.clients),
            render: Arc::clone(&self.render),
            guidance_message: Arc::clone(&self.guidance_message),
        }
    }
}

impl<F: ApiClientFactory> RuntimeServices<F> {
    /// Services backed by the host's real filesystem.
    pub fn new(
        identity: Arc<dyn IdentityResolver>,
        clients: Arc<F>,
        engine: Arc<dyn RenderEngine>,
        config: &HeraldConfig,
    ) -> Self {
        Self::with_filesystem(identity, clients, engine, Arc::new(LocalFilesystem), config)
    }

    pub fn with_filesystem(
        identity: Arc<dyn IdentityResolver>,
        clients: Arc<F>,
        engine: Arc<dyn RenderEngine>,
        fs: Arc<dyn Filesystem>,
        config: &HeraldConfig,
    ) -> Self {
        let render = RenderPipeline::new(
            engine,
            fs,
            config.runtime.data_dir.clone(),
            config.render.clone(),
        );
        Self {
            identity,
            clients,
            render: Arc::new(render),
            guidance_message: Arc::from(config.runtime.guidance_message.as_str()),
        }
    }

    pub fn render_pipeline(&self) -> &RenderPipeline {
        &self.render
    }
}

/// Runtime attached to one inbound event.
///
/// Owns the event's [`SessionResourceCache`]; dropping the runtime drops
/// everything resolved for the event.
pub struct EventRuntime<F> {
    event: Arc<EventContext>,
    cache: SessionResourceCache<F>,
    render: Arc<RenderPipeline>,
    guidance_message: Arc<str>,
}

impl<F: ApiClientFactory> EventRuntime<F> {
    /// Attach a fresh runtime to `event`.
    ///
    /// The sender's bound user is not looked up here. Dispatchers that know it
    /// bind it with [`EventContext::with_user`] before attaching; otherwise
    /// [`user`](Self::user), [`uid`](Self::uid) and
    /// [`has_credential`](Self::has_credential) report nothing.
    pub fn attach(event: Arc<EventContext>, services: &RuntimeServices<F>) -> Self {
        debug!(
            event_id = event.event_id(),
            channel = %event.target().channel_type,
            chat_id = %event.target().chat_id,
            "attached runtime to event"
        );
        Self {
            cache: SessionResourceCache::new(
                Arc::clone(&services.identity),
                Arc::clone(&services.clients),
            ),
            render: Arc::clone(&services.render),
            guidance_message: Arc::clone(&services.guidance_message),
            event,
        }
    }

    pub fn event(&self) -> &EventContext {
        &self.event
    }

    /// User bound to the event's sender.
    pub fn user(&self) -> Option<&EventUser> {
        self.event.user()
    }

    pub fn uid(&self) -> Option<&str> {
        self.user().and_then(|u| u.uid.as_deref())
    }

    pub fn has_credential(&self) -> bool {
        self.user().is_some_and(|u| u.has_credential)
    }

    /// Identity for `tier`; see [`SessionResourceCache::resolve_identity`].
    pub async fn identity(&self, tier: AccessTier) -> Arc<ResolvedIdentity> {
        self.cache.resolve_identity(&self.event, tier).await
    }

    /// API client for `tier`, or `None` without a uid and credential.
    pub async fn client(&self, tier: AccessTier, options: &Value) -> Option<F::Client> {
        self.cache.resolve_client(&self.event, tier, options).await
    }

    pub fn create_client(&self, uid: &str, credential: &Credential, options: &Value) -> F::Client {
        self.cache.create_client(uid, credential, options)
    }

    /// Uid of whoever sent the event, prompting them once to bind one if
    /// none is known.
    pub async fn requesting_uid(&self) -> Option<String> {
        self.cache
            .resolve_requesting_user(&self.event, &self.guidance_message)
            .await
    }

    /// Render a template and answer the event with the image.
    pub async fn render(&self, request: RenderRequest) -> Result<RenderOutcome> {
        self.render
            .render(self.event.reply_channel(), request)
            .await
    }
}
