//! Per-event plugin runtime.
//!
//! A dispatcher builds one [`EventContext`] per inbound message and attaches an
//! [`EventRuntime`] to it. Command handlers then use the runtime to:
//!
//! - **resolve identities** per access tier, memoized for the event
//! - **build API clients** from a resolved uid and credential
//! - **render templates** to images and reply with them
//!
//! # Example
//!
//! ```ignore
//! use herald_runtime::{AccessTier, EventRuntime, RenderRequest, RuntimeServices};
//!
//! let services = RuntimeServices::new(resolver, clients, engine, &config);
//! let runtime = EventRuntime::attach(event, &services);
//!
//! if let Some(api) = runtime.client(AccessTier::Cookie, &serde_json::Value::Null).await {
//!     // privileged queries
//! }
//! runtime.render(RenderRequest::new("genshin", "role/card.html")).await?;
//! ```

pub mod cache;
pub mod error;
pub mod event;
pub mod fs;
pub mod identity;
pub mod render;
pub mod runtime;

pub use {
    cache::SessionResourceCache,
    error::{Error, Result},
    event::{EventContext, EventUser},
    fs::{Filesystem, LocalFilesystem},
    identity::{
        AccessTier, ApiClientFactory, Credential, IdentityResolver, LookupMode, ResolvedIdentity,
    },
    render::{
        RenderData, RenderEngine, RenderOptions, RenderOutcome, RenderPipeline, RenderRequest,
        ResponseMode,
    },
    runtime::{EventRuntime, RuntimeServices},
};
