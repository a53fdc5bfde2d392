use super::path::{is_under, normalize_path, with_query_param};

/// Sign-in style pages and the flow pages exempt from logged-in bouncing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthPaths {
    login: String,
    pages: Vec<String>,
    always_reachable: Vec<String>,
}

impl AuthPaths {
    pub fn new<P, R>(login: impl Into<String>, pages: P, always_reachable: R) -> Self
    where
        P: IntoIterator,
        P::Item: Into<String>,
        R: IntoIterator,
        R::Item: Into<String>,
    {
        Self {
            login: login.into(),
            pages: pages.into_iter().map(Into::into).collect(),
            always_reachable: always_reachable.into_iter().map(Into::into).collect(),
        }
    }

    pub fn login(&self) -> &str {
        &self.login
    }

    pub fn pages(&self) -> &[String] {
        &self.pages
    }

    pub fn always_reachable(&self) -> &[String] {
        &self.always_reachable
    }

    /// Login, sign-up and friends; callback, confirmation and error pages excluded.
    pub fn is_auth_page(&self, path: &str) -> bool {
        let path = normalize_path(path);
        if self
            .always_reachable
            .iter()
            .any(|exempt| is_under(&path, exempt))
        {
            return false;
        }
        self.pages.iter().any(|page| is_under(&path, page))
    }

    /// Login URL that returns the caller to `requested` afterwards.
    pub fn login_redirect(&self, requested: &str) -> String {
        with_query_param(&self.login, "next", requested)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::catalog;

    #[test]
    fn flow_pages_are_not_auth_pages() {
        let auth = catalog::auth_paths();
        assert!(auth.is_auth_page("/auth/login"));
        assert!(auth.is_auth_page("/auth/login/?next=/finance"));
        assert!(auth.is_auth_page("/auth/sign-up"));
        assert!(!auth.is_auth_page("/auth/callback"));
        assert!(!auth.is_auth_page("/auth/confirm?token=abc"));
        assert!(!auth.is_auth_page("/auth/error"));
        assert!(!auth.is_auth_page("/auth/logout"));
        assert!(!auth.is_auth_page("/login"));
    }

    #[test]
    fn login_redirect_carries_next() {
        let auth = catalog::auth_paths();
        assert_eq!(
            auth.login_redirect("/clinic/settings"),
            "/auth/login?next=%2Fclinic%2Fsettings"
        );
    }
}
