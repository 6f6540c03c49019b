//! `${VAR}` and `${VAR:-fallback}` expansion for raw config text.

/// Expand placeholders using the process environment.
///
/// Unresolvable variables without a fallback are left as-is.
pub fn substitute_env(input: &str) -> String {
    expand(input, |name| std::env::var(name).ok())
}

fn expand(input: &str, lookup: impl Fn(&str) -> Option<String>) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find('}') else {
            // Unterminated: copy the remainder verbatim.
            out.push_str(&rest[start..]);
            return out;
        };

        let body = &after[..end];
        let (name, fallback) = match body.split_once(":-") {
            Some((name, fallback)) => (name, Some(fallback)),
            None => (body, None),
        };

        match (name.is_empty(), lookup(name), fallback) {
            (false, Some(value), _) => out.push_str(&value),
            (false, None, Some(fallback)) => out.push_str(fallback),
            _ => out.push_str(&rest[start..start + 2 + end + 1]),
        }
        rest = &after[end + 1..];
    }

    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup(name: &str) -> Option<String> {
        (name == "HERALD_TEST_DIR").then(|| "/srv/bot".to_string())
    }

    #[test]
    fn expands_known_variable() {
        assert_eq!(
            expand("data_dir = \"${HERALD_TEST_DIR}/data\"", lookup),
            "data_dir = \"/srv/bot/data\""
        );
    }

    #[test]
    fn unknown_variable_uses_fallback_or_stays() {
        assert_eq!(expand("${HERALD_MISSING:-./data}", lookup), "./data");
        assert_eq!(expand("${HERALD_MISSING}", lookup), "${HERALD_MISSING}");
    }

    #[test]
    fn unterminated_and_empty_placeholders_are_literal() {
        assert_eq!(expand("a ${ b", lookup), "a ${ b");
        assert_eq!(expand("${}", lookup), "${}");
    }
}
