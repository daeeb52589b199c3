use std::fmt;

use serde::{Deserialize, Serialize};

/// Top-level screens of the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Route {
    #[default]
    Dashboard,
    Auth,
    Profile,
}

impl Route {
    /// Maps a start path to a screen. `/auth...` and `/profile...` select
    /// their screens; every other path lands on the dashboard.
    pub fn resolve(path: &str) -> Self {
        if path.starts_with("/auth") {
            Self::Auth
        } else if path.starts_with("/profile") {
            Self::Profile
        } else {
            Self::Dashboard
        }
    }

    pub fn path(&self) -> &'static str {
        match self {
            Self::Dashboard => "/",
            Self::Auth => "/auth",
            Self::Profile => "/profile",
        }
    }
}

impl fmt::Display for Route {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.path())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn root_and_unknown_paths_are_dashboard() {
        assert_eq!(Route::resolve("/"), Route::Dashboard);
        assert_eq!(Route::resolve(""), Route::Dashboard);
        assert_eq!(Route::resolve("/settings"), Route::Dashboard);
        assert_eq!(Route::resolve("auth"), Route::Dashboard);
    }

    #[test]
    fn auth_prefix_selects_auth() {
        assert_eq!(Route::resolve("/auth"), Route::Auth);
        assert_eq!(Route::resolve("/auth/signup"), Route::Auth);
    }

    #[test]
    fn profile_prefix_selects_profile() {
        assert_eq!(Route::resolve("/profile"), Route::Profile);
        assert_eq!(Route::resolve("/profile?edit=1"), Route::Profile);
    }

    #[test]
    fn path_resolves_back_to_same_route() {
        for route in [Route::Dashboard, Route::Auth, Route::Profile] {
            assert_eq!(Route::resolve(route.path()), route);
        }
    }
}
