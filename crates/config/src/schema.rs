/// Config schema for the per-event plugin runtime.
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HeraldConfig {
    pub runtime: RuntimeConfig,
    pub render: RenderConfig,
    pub logging: LoggingConfig,
}

/// Per-event runtime settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Base directory under which `html/` and `ViewData/` are provisioned.
    pub data_dir: PathBuf,
    /// Sent once per event when the requesting user has no bound identity.
    pub guidance_message: String,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data"),
            guidance_message: "Please bind a UID with `#bind <uid>`, or send your cookie in a \
                               private chat to bind it."
                .into(),
        }
    }
}

/// Template-to-image render settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Dump the final render data of every render as JSON under `ViewData/`.
    pub debug_capture: bool,
    /// Upward hops from a zero-depth template to the host root.
    pub resource_root_offset: usize,
    /// Directory, relative to the host root, that holds plugin checkouts.
    pub plugins_dir: String,
    /// Page-load condition handed to the rendering engine.
    pub wait_until: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            debug_capture: false,
            resource_root_offset: 3,
            plugins_dir: "plugins".into(),
            wait_until: "networkidle0".into(),
        }
    }
}

impl RenderConfig {
    /// Process argument that turns on debug capture.
    pub const DEBUG_ARG: &'static str = "web-debug";

    /// Enable debug capture when `web-debug` appears among `args`.
    #[must_use]
    pub fn with_debug_from_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        if args.into_iter().any(|a| a.as_ref() == Self::DEBUG_ARG) {
            self.debug_capture = true;
        }
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            json: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_render_contract() {
        let cfg = HeraldConfig::default();
        assert_eq!(cfg.runtime.data_dir, PathBuf::from("./data"));
        assert_eq!(cfg.render.resource_root_offset, 3);
        assert_eq!(cfg.render.wait_until, "networkidle0");
        assert!(!cfg.render.debug_capture);
    }

    #[test]
    fn web_debug_argument_enables_capture() {
        let render = RenderConfig::default().with_debug_from_args(["bot", "web-debug"]);
        assert!(render.debug_capture);

        let render = RenderConfig::default().with_debug_from_args(["bot", "--web-debug"]);
        assert!(!render.debug_capture);
    }
}
