use std::collections::HashSet;

use super::path::{is_registry_path, is_under, normalize_path, split_query};
use super::registry::RouteRegistry;
use crate::errors::ConfigError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegacyRedirect {
    pub from: String,
    pub to: String,
}

impl LegacyRedirect {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }

    /// Rewrites `path` (normalized, under `from`) onto the target, keeping the tail.
    fn rewrite(&self, path: &str) -> String {
        format!("{}{}", self.to, &path[self.from.len()..])
    }
}

/// Retired path prefixes and where they live now.
///
/// Construction rejects chains: no target (or anything beneath it) may be
/// captured by another legacy source, so every redirect is a single hop.
#[derive(Debug, Clone, Default)]
pub struct LegacyRedirectMap {
    entries: Vec<LegacyRedirect>,
}

impl LegacyRedirectMap {
    pub fn new(
        entries: impl IntoIterator<Item = LegacyRedirect>,
        registry: &RouteRegistry,
    ) -> Result<Self, ConfigError> {
        let entries: Vec<LegacyRedirect> = entries.into_iter().collect();

        let mut seen = HashSet::new();
        for entry in &entries {
            if !is_registry_path(&entry.from) {
                return Err(ConfigError::InvalidPath(entry.from.clone()));
            }
            if !seen.insert(entry.from.as_str()) {
                return Err(ConfigError::DuplicateLegacySource(entry.from.clone()));
            }
            if !entry.to.starts_with('/') || normalize_path(&entry.to) != entry.to {
                return Err(ConfigError::InvalidLegacyTarget {
                    from: entry.from.clone(),
                    to: entry.to.clone(),
                });
            }
            if let Some(dashboard) = registry
                .dashboards()
                .iter()
                .find(|dashboard| is_under(&dashboard.base_path, &entry.from))
            {
                return Err(ConfigError::LegacyShadowsDashboard {
                    from: entry.from.clone(),
                    base_path: dashboard.base_path.clone(),
                });
            }
        }

        for entry in &entries {
            let chained = entries
                .iter()
                .find(|other| is_under(&entry.to, &other.from) || is_under(&other.from, &entry.to));
            if let Some(other) = chained {
                return Err(ConfigError::LegacyChain {
                    from: entry.from.clone(),
                    to: entry.to.clone(),
                    next: other.from.clone(),
                });
            }
        }

        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[LegacyRedirect] {
        &self.entries
    }

    pub fn find(&self, path: &str) -> Option<&LegacyRedirect> {
        let path = normalize_path(path);
        self.entries
            .iter()
            .filter(|entry| is_under(&path, &entry.from))
            .max_by_key(|entry| entry.from.len())
    }

    /// Replacement location for a retired URL, query string included.
    pub fn find_legacy_redirect(&self, path_and_query: &str) -> Option<String> {
        let (_, query) = split_query(path_and_query);
        let path = normalize_path(path_and_query);
        let entry = self.find(&path)?;
        let mut target = entry.rewrite(&path);
        if let Some(query) = query.filter(|query| !query.is_empty()) {
            target.push('?');
            target.push_str(query);
        }
        Some(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::catalog;

    fn registry() -> RouteRegistry {
        catalog::route_registry().unwrap()
    }

    fn map(entries: &[(&str, &str)]) -> Result<LegacyRedirectMap, ConfigError> {
        LegacyRedirectMap::new(
            entries.iter().map(|(from, to)| LegacyRedirect::new(*from, *to)),
            &registry(),
        )
    }

    #[test]
    fn exact_and_nested_paths_are_rewritten() {
        let legacy = catalog::legacy_redirects(&registry()).unwrap();
        assert_eq!(legacy.find_legacy_redirect("/dashboard").as_deref(), Some("/affiliates"));
        assert_eq!(
            legacy.find_legacy_redirect("/affiliate/referrals?page=2").as_deref(),
            Some("/affiliates/referrals?page=2")
        );
        assert_eq!(legacy.find_legacy_redirect("/professional/").as_deref(), Some("/clinic"));
        assert_eq!(legacy.find_legacy_redirect("/affiliates"), None);
        assert_eq!(legacy.find_legacy_redirect("/dashboards"), None);
    }

    #[test]
    fn longest_source_wins() {
        let legacy = map(&[("/old", "/clinic"), ("/old/money", "/finance")]).unwrap();
        assert_eq!(legacy.find_legacy_redirect("/old/money/q1").as_deref(), Some("/finance/q1"));
        assert_eq!(legacy.find_legacy_redirect("/old/patients").as_deref(), Some("/clinic/patients"));
    }

    #[test]
    fn root_target_could_loop_and_is_rejected() {
        // "/welcome/welcome" would land back on "/welcome"
        let err = map(&[("/welcome", "/")]).unwrap_err();
        assert!(matches!(err, ConfigError::LegacyChain { .. }));
    }

    #[test]
    fn standard_targets_are_never_sources() {
        let legacy = catalog::legacy_redirects(&registry()).unwrap();
        for entry in legacy.entries() {
            assert!(!legacy.find(&entry.to).is_some(), "{} -> {} chains", entry.from, entry.to);
            let deeper = format!("{}/x", entry.to);
            assert!(!legacy.find(&deeper).is_some());
        }
    }

    #[test]
    fn chains_are_rejected() {
        let err = map(&[("/old", "/older"), ("/older", "/clinic")]).unwrap_err();
        assert!(matches!(err, ConfigError::LegacyChain { .. }));

        let err = map(&[("/old", "/new"), ("/new/deep", "/clinic")]).unwrap_err();
        assert!(matches!(err, ConfigError::LegacyChain { .. }));

        let err = map(&[("/old/x", "/old")]).unwrap_err();
        assert!(matches!(err, ConfigError::LegacyChain { .. }));
    }

    #[test]
    fn invalid_targets_are_rejected() {
        for target in ["https://evil.example", "//evil.example", "clinic", "/clinic/"] {
            let err = map(&[("/old", target)]).unwrap_err();
            assert!(matches!(err, ConfigError::InvalidLegacyTarget { .. }), "{target}");
        }
    }

    #[test]
    fn sources_may_not_shadow_dashboards() {
        let err = map(&[("/clinic", "/finance")]).unwrap_err();
        assert!(matches!(err, ConfigError::LegacyShadowsDashboard { .. }));

        let legacy = map(&[("/clinic/old-settings", "/clinic/settings")]).unwrap();
        assert_eq!(
            legacy.find_legacy_redirect("/clinic/old-settings").as_deref(),
            Some("/clinic/settings")
        );
    }

    #[test]
    fn duplicate_sources_are_rejected() {
        let err = map(&[("/old", "/clinic"), ("/old", "/finance")]).unwrap_err();
        assert_eq!(err, ConfigError::DuplicateLegacySource("/old".into()));
    }
}
