//! Dashboard paths and the authentication guard.
//!
//! `imagine open <path>` accepts the same paths as the web dashboard and
//! renders the matching screen.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Dashboard,
    Products,
    Product(String),
    Upload,
    Analysis(String),
    Exports,
    Webhooks,
    Organization,
    AbTesting,
    Login,
    Register,
}

impl Route {
    /// Match a path. Query strings, fragments and trailing slashes are
    /// ignored; the empty path is the dashboard.
    #[must_use]
    pub fn resolve(path: &str) -> Option<Self> {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        let route = match segments.as_slice() {
            [] | ["dashboard"] => Self::Dashboard,
            ["products"] => Self::Products,
            ["products", id] => Self::Product((*id).to_string()),
            ["upload"] => Self::Upload,
            ["analysis", image_id] => Self::Analysis((*image_id).to_string()),
            ["exports"] => Self::Exports,
            ["settings", "webhooks"] => Self::Webhooks,
            ["settings", "organization"] => Self::Organization,
            ["admin", "ab-testing"] => Self::AbTesting,
            ["auth"] | ["auth", "login"] => Self::Login,
            ["auth", "register"] => Self::Register,
            _ => return None,
        };
        Some(route)
    }

    /// Everything except the login and register screens needs a session.
    #[must_use]
    pub const fn requires_auth(&self) -> bool {
        !matches!(self, Self::Login | Self::Register)
    }

    /// Where navigating to `path` actually lands.
    ///
    /// Unknown paths go to the dashboard. Guarded screens go to login when
    /// there is no session.
    #[must_use]
    pub fn guard(path: &str, authenticated: bool) -> Self {
        let route = Self::resolve(path).unwrap_or(Self::Dashboard);
        if route.requires_auth() && !authenticated {
            tracing::debug!(path, "unauthenticated; redirecting to login");
            return Self::Login;
        }
        route
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Dashboard => f.write_str("/dashboard"),
            Self::Products => f.write_str("/products"),
            Self::Product(id) => write!(f, "/products/{id}"),
            Self::Upload => f.write_str("/upload"),
            Self::Analysis(image_id) => write!(f, "/analysis/{image_id}"),
            Self::Exports => f.write_str("/exports"),
            Self::Webhooks => f.write_str("/settings/webhooks"),
            Self::Organization => f.write_str("/settings/organization"),
            Self::AbTesting => f.write_str("/admin/ab-testing"),
            Self::Login => f.write_str("/auth/login"),
            Self::Register => f.write_str("/auth/register"),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::Route;

    #[rstest]
    #[case("/", Route::Dashboard)]
    #[case("", Route::Dashboard)]
    #[case("/products/", Route::Products)]
    #[case("/products/p-1?tab=analysis", Route::Product("p-1".into()))]
    #[case("/analysis/img-9", Route::Analysis("img-9".into()))]
    #[case("/settings/webhooks", Route::Webhooks)]
    #[case("/settings/organization", Route::Organization)]
    #[case("/admin/ab-testing", Route::AbTesting)]
    #[case("/auth/register", Route::Register)]
    fn known_paths_resolve(#[case] path: &str, #[case] expected: Route) {
        assert_eq!(Route::resolve(path), Some(expected));
    }

    #[rstest]
    #[case("/settings")]
    #[case("/analysis")]
    #[case("/products/p-1/edit")]
    #[case("/nowhere")]
    fn unknown_paths_do_not_resolve(#[case] path: &str) {
        assert_eq!(Route::resolve(path), None);
    }

    #[test]
    fn unauthenticated_guarded_path_redirects_to_login() {
        assert_eq!(Route::guard("/exports", false), Route::Login);
        assert_eq!(Route::guard("/nowhere", false), Route::Login);
        assert_eq!(Route::guard("/auth/register", false), Route::Register);
    }

    #[test]
    fn unknown_path_redirects_to_dashboard() {
        assert_eq!(Route::guard("/nowhere", true), Route::Dashboard);
        assert_eq!(Route::guard("/products/p-1", true), Route::Product("p-1".into()));
    }

    #[test]
    fn display_round_trips_through_resolve() {
        for route in [
            Route::Product("p-1".into()),
            Route::Webhooks,
            Route::AbTesting,
            Route::Login,
        ] {
            assert_eq!(Route::resolve(&route.to_string()), Some(route));
        }
    }
}
