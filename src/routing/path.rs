/// Splits `path?query#fragment` into the path and the (possibly empty) query.
pub fn split_query(raw: &str) -> (&str, Option<&str>) {
    let raw = raw.split('#').next().unwrap_or(raw);
    match raw.split_once('?') {
        Some((path, query)) => (path, Some(query)),
        None => (raw, None),
    }
}

/// Canonical form used for prefix matching: query and fragment dropped,
/// empty segments collapsed, no trailing slash. The root stays `/`.
pub fn normalize_path(raw: &str) -> String {
    let (path, _) = split_query(raw);
    let mut out = String::with_capacity(path.len());
    for segment in path.split('/').filter(|segment| !segment.is_empty()) {
        out.push('/');
        out.push_str(segment);
    }
    if out.is_empty() {
        out.push('/');
    }
    out
}

/// True when `base` is a whole-segment prefix of `path`. Both must be normalized.
pub fn is_under(path: &str, base: &str) -> bool {
    if base == "/" {
        return true;
    }
    path == base
        || path
            .strip_prefix(base)
            .is_some_and(|rest| rest.starts_with('/'))
}

/// Registry keys: absolute, already normalized and not the site root.
pub fn is_registry_path(path: &str) -> bool {
    path != "/" && path.starts_with('/') && normalize_path(path) == path
}

pub fn query_param(query: &str, key: &str) -> Option<String> {
    serde_urlencoded::from_str::<Vec<(String, String)>>(query)
        .ok()?
        .into_iter()
        .find(|(name, _)| name == key)
        .map(|(_, value)| value)
}

/// Appends `?key=value` with form encoding, so `/a/b` becomes `%2Fa%2Fb`.
pub fn with_query_param(path: &str, key: &str, value: &str) -> String {
    match serde_urlencoded::to_string([(key, value)]) {
        Ok(query) => format!("{path}?{query}"),
        Err(err) => {
            tracing::warn!(error = %err, "failed to encode query parameter");
            path.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalization_ignores_query_and_trailing_slash() {
        assert_eq!(normalize_path("/clinic/settings/"), "/clinic/settings");
        assert_eq!(normalize_path("/clinic/settings?tab=2"), "/clinic/settings");
        assert_eq!(normalize_path("/clinic//settings#top"), "/clinic/settings");
        assert_eq!(normalize_path(""), "/");
        assert_eq!(normalize_path("/?next=/x"), "/");
    }

    #[test]
    fn prefix_matching_respects_segments_and_case() {
        assert!(is_under("/clinic", "/clinic"));
        assert!(is_under("/clinic/settings", "/clinic"));
        assert!(!is_under("/clinical", "/clinic"));
        assert!(!is_under("/Clinic", "/clinic"));
        assert!(is_under("/anything", "/"));
    }

    #[test]
    fn split_query_keeps_raw_query() {
        assert_eq!(split_query("/auth/login?next=%2Ffinance"), ("/auth/login", Some("next=%2Ffinance")));
        assert_eq!(split_query("/auth/login"), ("/auth/login", None));
        assert_eq!(split_query("/a?b=1#frag"), ("/a", Some("b=1")));
    }

    #[test]
    fn query_param_decodes_values() {
        assert_eq!(query_param("next=%2Ffinance&x=1", "next").as_deref(), Some("/finance"));
        assert_eq!(query_param("next=/finance", "next").as_deref(), Some("/finance"));
        assert_eq!(query_param("x=1", "next"), None);
    }

    #[test]
    fn with_query_param_encodes_slashes() {
        assert_eq!(
            with_query_param("/auth/login", "next", "/clinic/settings"),
            "/auth/login?next=%2Fclinic%2Fsettings"
        );
    }

    #[test]
    fn registry_paths_must_be_normalized() {
        assert!(is_registry_path("/clinic"));
        assert!(!is_registry_path("/"));
        assert!(!is_registry_path("clinic"));
        assert!(!is_registry_path("/clinic/"));
        assert!(!is_registry_path("//clinic"));
        assert!(!is_registry_path("/clinic?x=1"));
    }
}
