use std::fmt;

/// A template reference reduced to its canonical slash form.
///
/// `"a/b/"`, `"a//b"` and `"a/b.html"` all normalize to `"a/b"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplatePath {
    segments: Vec<String>,
}

impl TemplatePath {
    pub fn parse(raw: &str) -> Self {
        let raw = raw.strip_suffix(".html").unwrap_or(raw);
        Self {
            segments: raw
                .split('/')
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect(),
        }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    pub fn last_segment(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }

    /// File stem for the debug snapshot: separators flattened to `_`.
    pub fn snapshot_stem(&self) -> String {
        self.segments.join("_")
    }
}

impl fmt::Display for TemplatePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("/"))
    }
}

/// Path from a rendered page back to `{plugins_dir}/{namespace}/resources/`.
///
/// The page lives `offset + depth` directories below the host root.
pub fn resource_root(
    offset: usize,
    path: &TemplatePath,
    plugins_dir: &str,
    namespace: &str,
) -> String {
    format!(
        "{}{plugins_dir}/{namespace}/resources/",
        "../".repeat(offset + path.depth())
    )
}
