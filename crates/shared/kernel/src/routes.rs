use serde::Serialize;
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use strum::{AsRefStr, Display};

/// Values bound by `:name` segments of a route pattern.
pub type RouteParams = BTreeMap<String, String>;

pub type RouteHandler = Arc<dyn Fn(&RouteParams) -> View + Send + Sync>;

/// Who may enter a route.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Display, AsRefStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RouteGuard {
    #[default]
    Public,
    /// Requires an authenticated session.
    Authenticated,
    /// Only reachable without a session (login, sign-up).
    GuestOnly,
}

/// What a handler produces: the screen to present and its arguments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct View {
    pub screen: Cow<'static, str>,
    pub params: RouteParams,
}

impl View {
    #[must_use]
    pub fn new(screen: impl Into<Cow<'static, str>>) -> Self {
        Self { screen: screen.into(), params: RouteParams::new() }
    }

    #[must_use]
    pub fn with_params(mut self, params: RouteParams) -> Self {
        self.params = params;
        self
    }
}

/// A path pattern mapped to a handler.
#[derive(Clone)]
pub struct Route {
    path: Cow<'static, str>,
    guard: RouteGuard,
    handler: RouteHandler,
    owner: Cow<'static, str>,
}

impl Route {
    pub fn new<F>(path: impl Into<Cow<'static, str>>, handler: F) -> Self
    where
        F: Fn(&RouteParams) -> View + Send + Sync + 'static,
    {
        Self {
            path: path.into(),
            guard: RouteGuard::Public,
            handler: Arc::new(handler),
            owner: Cow::Borrowed(""),
        }
    }

    /// A route rendering `screen` with whatever parameters the path bound.
    #[must_use]
    pub fn screen(path: impl Into<Cow<'static, str>>, screen: &'static str) -> Self {
        Self::new(path, move |params| View::new(screen).with_params(params.clone()))
    }

    #[must_use]
    pub const fn guard(mut self, guard: RouteGuard) -> Self {
        self.guard = guard;
        self
    }

    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    #[must_use]
    pub const fn access(&self) -> RouteGuard {
        self.guard
    }

    /// Name of the unit that contributed the route; empty until registered.
    #[must_use]
    pub fn owner(&self) -> &str {
        &self.owner
    }

    #[must_use]
    pub fn render(&self, params: &RouteParams) -> View {
        (self.handler)(params)
    }

    pub(crate) fn with_owner(mut self, owner: &str) -> Self {
        self.owner = Cow::Owned(owner.to_owned());
        self
    }

    /// Binds `path` against this route's pattern.
    fn bind(&self, path: &str) -> Option<RouteParams> {
        let mut pattern = segments(&self.path);
        let mut actual = segments(path);
        let mut params = RouteParams::new();

        loop {
            match (pattern.next(), actual.next()) {
                (None, None) => return Some(params),
                (Some(expected), Some(value)) => {
                    if let Some(name) = expected.strip_prefix(':') {
                        params.insert(name.to_owned(), value.to_owned());
                    } else if expected != value {
                        return None;
                    }
                }
                _ => return None,
            }
        }
    }
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("path", &self.path)
            .field("guard", &self.guard)
            .field("owner", &self.owner)
            .finish_non_exhaustive()
    }
}

fn segments(path: &str) -> impl Iterator<Item = &str> {
    let path = path.split(['?', '#']).next().unwrap_or_default();
    path.split('/').filter(|s| !s.is_empty())
}

/// A route resolved for a concrete path.
#[derive(Debug)]
pub struct RouteMatch<'a> {
    pub route: &'a Route,
    pub params: RouteParams,
}

impl RouteMatch<'_> {
    #[must_use]
    pub fn render(&self) -> View {
        self.route.render(&self.params)
    }
}

/// Path to route mapping aggregated from every unit.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    routes: BTreeMap<String, Route>,
}

impl RouteTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `route`, returning the route previously registered at the same path.
    pub fn insert(&mut self, route: Route) -> Option<Route> {
        self.routes.insert(route.path().to_owned(), route)
    }

    /// Exact pattern lookup.
    #[must_use]
    pub fn get(&self, pattern: &str) -> Option<&Route> {
        self.routes.get(pattern)
    }

    #[must_use]
    pub fn contains(&self, pattern: &str) -> bool {
        self.routes.contains_key(pattern)
    }

    /// Finds the route serving `path`. A literal pattern wins over a parameterized one.
    #[must_use]
    pub fn resolve(&self, path: &str) -> Option<RouteMatch<'_>> {
        if let Some(route) = self.routes.get(path) {
            return Some(RouteMatch { route, params: RouteParams::new() });
        }
        self.routes
            .values()
            .find_map(|route| route.bind(path).map(|params| RouteMatch { route, params }))
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.routes.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Route> {
        self.routes.values()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn binds_named_segments() {
        let route = Route::screen("/users/:id", "user_details");
        let params = route.bind("/users/42").unwrap();
        assert_eq!(params.get("id").map(String::as_str), Some("42"));

        assert!(route.bind("/users").is_none());
        assert!(route.bind("/users/42/edit").is_none());
        assert!(route.bind("/teams/42").is_none());
    }

    #[test]
    fn ignores_trailing_slash_and_query() {
        let route = Route::screen("/settings", "settings");
        assert!(route.bind("/settings/").is_some());
        assert!(route.bind("/settings?tab=theme").is_some());
    }

    #[test]
    fn literal_route_wins_over_parameter() {
        let mut table = RouteTable::new();
        table.insert(Route::screen("/users/:id", "user_details"));
        table.insert(Route::screen("/users/me", "profile"));

        assert_eq!(table.resolve("/users/me").unwrap().render().screen, "profile");

        let matched = table.resolve("/users/7").unwrap();
        assert_eq!(matched.route.path(), "/users/:id");
        assert_eq!(matched.render().params.get("id").map(String::as_str), Some("7"));
    }

    #[test]
    fn root_matches_only_root() {
        let mut table = RouteTable::new();
        table.insert(Route::screen("/", "home"));
        assert!(table.resolve("/").is_some());
        assert!(table.resolve("/missing").is_none());
    }
}
