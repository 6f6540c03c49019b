//! Template-to-image rendering.
//!
//! A render normalizes the template path, provisions
//! `{data_dir}/html/{namespace}/{path}`, assembles the render data, optionally
//! dumps it under `{data_dir}/ViewData/` for template debugging, asks the
//! [`RenderEngine`] for an image and finally delivers or returns it according
//! to the [`ResponseMode`].

pub mod data;
pub mod path;

use std::{
    fmt,
    path::{Path, PathBuf},
    sync::Arc,
};

use {
    async_trait::async_trait,
    herald_channels::{MessageId, ReplyChannel, ReplyPayload},
    herald_config::RenderConfig,
    serde::{Deserialize, Serialize},
    tracing::{debug, info, warn},
};

pub use {
    data::RenderData,
    path::{TemplatePath, resource_root},
};

use crate::{
    error::{Context, Result},
    fs::{Filesystem, provision_dir},
};

/// Headless renderer that turns a template plus data into an image.
#[async_trait]
pub trait RenderEngine: Send + Sync {
    /// Capture `target` (`{namespace}/{path}`) rendered with `data`.
    ///
    /// Returns the base64-encoded image, or `None` when nothing could be
    /// captured (missing template, render timeout).
    async fn capture(&self, target: &str, data: &RenderData) -> anyhow::Result<Option<String>>;
}

/// What the caller wants back from a render.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ResponseMode {
    /// Send the image, report success.
    #[default]
    Default,
    /// Send the image, return the delivered message's ID.
    MessageId,
    /// Do not send; return the encoded image.
    Base64,
}

/// Hook run on the assembled data. Returning `Some` replaces the data
/// wholesale; `None` keeps it.
pub type BeforeRender = Box<dyn FnOnce(&RenderData) -> Option<RenderData> + Send>;

#[derive(Default)]
pub struct RenderOptions {
    pub response_mode: ResponseMode,
    pub before_render: Option<BeforeRender>,
}

impl RenderOptions {
    pub fn mode(response_mode: ResponseMode) -> Self {
        Self {
            response_mode,
            before_render: None,
        }
    }

    #[must_use]
    pub fn before_render(
        mut self,
        hook: impl FnOnce(&RenderData) -> Option<RenderData> + Send + 'static,
    ) -> Self {
        self.before_render = Some(Box::new(hook));
        self
    }
}

impl fmt::Debug for RenderOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderOptions")
            .field("response_mode", &self.response_mode)
            .field("before_render", &self.before_render.is_some())
            .finish()
    }
}

#[derive(Debug)]
pub struct RenderRequest {
    pub namespace: String,
    pub template_path: String,
    pub data: RenderData,
    pub options: RenderOptions,
}

impl RenderRequest {
    pub fn new(namespace: impl Into<String>, template_path: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            template_path: template_path.into(),
            data: RenderData::new(),
            options: RenderOptions::default(),
        }
    }

    #[must_use]
    pub fn with_data(mut self, data: RenderData) -> Self {
        self.data = data;
        self
    }

    #[must_use]
    pub fn with_options(mut self, options: RenderOptions) -> Self {
        self.options = options;
        self
    }
}

/// Result of a render, per [`ResponseMode`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderOutcome {
    /// The image was handed to the reply channel.
    Sent,
    /// The engine produced no image, so nothing was sent.
    NothingToSend,
    /// `MessageId` mode: whatever ID the delivery produced.
    MessageId(Option<MessageId>),
    /// `Base64` mode: the engine output, never sent.
    Image(Option<String>),
}

impl RenderOutcome {
    /// Whether a caller that only checks for success should treat this as one.
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Sent | Self::NothingToSend => true,
            Self::MessageId(id) => id.is_some(),
            Self::Image(image) => image.is_some(),
        }
    }
}

pub struct RenderPipeline {
    engine: Arc<dyn RenderEngine>,
    fs: Arc<dyn Filesystem>,
    data_dir: PathBuf,
    config: RenderConfig,
}

impl RenderPipeline {
    pub fn new(
        engine: Arc<dyn RenderEngine>,
        fs: Arc<dyn Filesystem>,
        data_dir: impl Into<PathBuf>,
        config: RenderConfig,
    ) -> Self {
        Self {
            engine,
            fs,
            data_dir: data_dir.into(),
            config,
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Render `request` and answer through `reply`.
    ///
    /// Only directory provisioning fails the render; engine and delivery
    /// failures degrade to "nothing sent".
    pub async fn render(
        &self,
        reply: &dyn ReplyChannel,
        request: RenderRequest,
    ) -> Result<RenderOutcome> {
        let RenderRequest {
            namespace,
            template_path,
            data: caller_data,
            options,
        } = request;
        let path = TemplatePath::parse(&template_path);

        provision_dir(
            self.fs.as_ref(),
            &self.data_dir,
            &format!("html/{namespace}/{path}"),
        )?;

        let mut data = data::assemble(caller_data, &namespace, &path, &self.config);
        if let Some(hook) = options.before_render
            && let Some(replaced) = hook(&data)
        {
            data = replaced;
        }

        if self.config.debug_capture {
            match self.write_snapshot(&namespace, &path, &data) {
                Ok(file) => debug!(path = %file.display(), "saved render data snapshot"),
                Err(e) => warn!(
                    %namespace,
                    template = %path,
                    error = %e,
                    "failed to save render data snapshot"
                ),
            }
        }

        let target = format!("{namespace}/{path}");
        let image = match self.engine.capture(&target, &data).await {
            Ok(image) => image.filter(|i| !i.is_empty()),
            Err(e) => {
                warn!(%target, error = %e, "render engine failed");
                None
            },
        };

        if options.response_mode == ResponseMode::Base64 {
            return Ok(RenderOutcome::Image(image));
        }

        let Some(image) = image else {
            debug!(%target, "render produced no image, nothing to send");
            return Ok(RenderOutcome::NothingToSend);
        };

        let delivered = match reply.send(ReplyPayload::image(image)).await {
            Ok(id) => {
                info!(%target, message_id = id.as_deref().unwrap_or("-"), "sent rendered image");
                id
            },
            Err(e) => {
                warn!(%target, error = %e, "failed to send rendered image");
                None
            },
        };

        Ok(match options.response_mode {
            ResponseMode::MessageId => RenderOutcome::MessageId(delivered),
            _ => RenderOutcome::Sent,
        })
    }

    /// Dump `data` to `ViewData/{namespace}/{path_with_underscores}.json`,
    /// named after the namespace when the path is empty.
    fn write_snapshot(
        &self,
        namespace: &str,
        path: &TemplatePath,
        data: &RenderData,
    ) -> Result<PathBuf> {
        let dir = provision_dir(
            self.fs.as_ref(),
            &self.data_dir,
            &format!("ViewData/{namespace}"),
        )?;
        let stem = match path.depth() {
            0 => namespace.to_string(),
            _ => path.snapshot_stem(),
        };
        let file = dir.join(format!("{stem}.json"));
        let bytes = serde_json::to_vec(data)?;
        self.fs
            .write_file(&file, &bytes)
            .with_context(|| format!("writing {}", file.display()))?;
        Ok(file)
    }
}
