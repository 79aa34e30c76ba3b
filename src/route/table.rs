use super::Route;
use crate::handler::Handler;
use crate::matcher::PathMatcher;
use crate::middleware::Middleware;
use crate::Error;
use regex::RegexSet;
use std::collections::HashMap;
use std::fmt::{self, Debug, Formatter};
use std::sync::Arc;

/// A route with everything resolved that dispatch needs: its matcher, its handler and its middleware instances.
pub(crate) struct CompiledRoute {
    pub(crate) route: Route,
    pub(crate) matcher: PathMatcher,
    pub(crate) handler: Arc<dyn Handler>,
    pub(crate) middleware: Vec<Arc<dyn Middleware>>,
}

impl Debug for CompiledRoute {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{ route: {:?}, matcher: {:?}, middleware: {} }}",
            self.route,
            self.matcher,
            self.middleware.len()
        )
    }
}

/// The routes of a built router, in registration order. Earlier routes take priority.
///
/// All patterns are also compiled into one [`RegexSet`](https://docs.rs/regex/1/regex/struct.RegexSet.html) so a
/// path is tested against every route in a single pass. Names index the routes for url generation; when two
/// routes share a name the later registration wins.
pub struct RouteTable {
    routes: Vec<CompiledRoute>,
    names: HashMap<String, usize>,
    regex_set: RegexSet,
}

impl RouteTable {
    pub(crate) fn new(routes: Vec<CompiledRoute>) -> crate::Result<RouteTable> {
        let regex_set = RegexSet::new(routes.iter().map(|r| r.matcher.as_str())).map_err(|source| {
            Error::InvalidPattern {
                pattern: "<route set>".to_string(),
                source,
            }
        })?;

        let mut names = HashMap::new();
        for (idx, compiled) in routes.iter().enumerate() {
            if let Some(name) = compiled.route.name() {
                names.insert(name.to_string(), idx);
            }
        }

        Ok(RouteTable {
            routes,
            names,
            regex_set,
        })
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Route> {
        self.routes.iter().map(|r| &r.route)
    }

    /// The pattern of the route registered under `name`.
    pub fn by_name(&self, name: &str) -> crate::Result<&str> {
        self.compiled_by_name(name).map(|r| r.route.pattern())
    }

    pub(crate) fn compiled_by_name(&self, name: &str) -> crate::Result<&CompiledRoute> {
        self.names
            .get(name)
            .map(|idx| &self.routes[*idx])
            .ok_or_else(|| Error::NamedRouteMissing(name.to_string()))
    }

    /// Every route whose pattern matches `path`, in registration order.
    pub(crate) fn matching<'a>(&'a self, path: &str) -> impl Iterator<Item = &'a CompiledRoute> + 'a {
        self.regex_set
            .matches(path)
            .into_iter()
            .map(move |idx| &self.routes[idx])
    }
}

impl Debug for RouteTable {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{{ routes: {:?}, names: {:?} }}", self.routes, self.names)
    }
}
