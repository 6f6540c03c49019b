//! Render data handed to the rendering engine.
//!
//! Key names are part of the template contract and must not change.

use {
    herald_config::RenderConfig,
    serde_json::{Map, Value, json},
};

use super::path::{TemplatePath, resource_root};

/// JSON object passed to templates.
pub type RenderData = Map<String, Value>;

pub const KEY_PLUGIN: &str = "_plugin";
pub const KEY_HTML_PATH: &str = "_htmlPath";
pub const KEY_RESOURCE_ROOT: &str = "pluResPath";
pub const KEY_TEMPLATE_FILE: &str = "tplFile";
pub const KEY_SAVE_ID: &str = "saveId";
pub const KEY_SAVE_ID_LEGACY: &str = "save_id";
pub const KEY_PAGE_GOTO: &str = "pageGotoParams";

/// Merge caller data with the derived fields. Derived fields win.
pub(crate) fn assemble(
    mut data: RenderData,
    namespace: &str,
    path: &TemplatePath,
    config: &RenderConfig,
) -> RenderData {
    let save_id = [KEY_SAVE_ID, KEY_SAVE_ID_LEGACY]
        .iter()
        .filter_map(|key| data.get(*key))
        .find(|v| is_truthy(v))
        .cloned()
        .unwrap_or_else(|| Value::String(path.last_segment().unwrap_or(namespace).to_string()));

    let plugins_dir = &config.plugins_dir;
    data.insert(KEY_PLUGIN.into(), Value::String(namespace.to_string()));
    data.insert(KEY_HTML_PATH.into(), Value::String(path.to_string()));
    data.insert(
        KEY_RESOURCE_ROOT.into(),
        Value::String(resource_root(
            config.resource_root_offset,
            path,
            plugins_dir,
            namespace,
        )),
    );
    data.insert(
        KEY_TEMPLATE_FILE.into(),
        Value::String(format!("./{plugins_dir}/{namespace}/resources/{path}.html")),
    );
    data.insert(KEY_SAVE_ID.into(), save_id);
    data.insert(
        KEY_PAGE_GOTO.into(),
        json!({ "waitUntil": config.wait_until }),
    );
    data
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
