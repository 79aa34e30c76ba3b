use crate::helpers::{join_namespace, join_path};
use crate::middleware::{IntoMiddlewareList, MiddlewareRef};
use serde::Deserialize;

/// The attributes a group passes down to every route registered inside it.
///
/// Nesting concatenates: prefixes are joined with `/`, namespaces with `::`, and middleware lists are appended
/// parent first.
///
/// # Examples
///
/// ```
/// use switchyard::GroupAttributes;
///
/// let admin = GroupAttributes::new()
///     .prefix("/admin")
///     .namespace("app::admin")
///     .middleware(vec!["auth", "admin"]);
/// # let _ = admin;
/// ```
#[derive(Debug, Clone, Default)]
pub struct GroupAttributes {
    pub(crate) prefix: String,
    pub(crate) namespace: String,
    pub(crate) middleware: Vec<MiddlewareRef>,
}

impl GroupAttributes {
    pub fn new() -> GroupAttributes {
        GroupAttributes::default()
    }

    pub fn prefix<P: Into<String>>(mut self, prefix: P) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn namespace<N: Into<String>>(mut self, namespace: N) -> Self {
        self.namespace = namespace.into();
        self
    }

    pub fn middleware<M: IntoMiddlewareList>(mut self, middleware: M) -> Self {
        self.middleware.extend(middleware.into_middleware_list());
        self
    }

    /// The attributes in effect inside `child` when it is opened within `self`.
    pub(crate) fn nest(&self, child: GroupAttributes) -> GroupAttributes {
        let mut middleware = self.middleware.clone();
        middleware.extend(child.middleware);

        GroupAttributes {
            prefix: join_path([self.prefix.as_str(), child.prefix.as_str()]),
            namespace: join_namespace([self.namespace.as_str(), child.namespace.as_str()]),
            middleware,
        }
    }
}

/// A group descriptor as it appears in configuration: `{ prefix, namespace, middleware }`.
///
/// `middleware` may be a single name or a list of names.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GroupDescriptor {
    pub prefix: String,
    pub namespace: String,
    pub middleware: OneOrMany,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

impl Default for OneOrMany {
    fn default() -> Self {
        OneOrMany::Many(Vec::new())
    }
}

impl From<OneOrMany> for Vec<String> {
    fn from(value: OneOrMany) -> Vec<String> {
        match value {
            OneOrMany::One(name) => vec![name],
            OneOrMany::Many(names) => names,
        }
    }
}

impl From<GroupDescriptor> for GroupAttributes {
    fn from(descriptor: GroupDescriptor) -> GroupAttributes {
        GroupAttributes::new()
            .prefix(descriptor.prefix)
            .namespace(descriptor.namespace)
            .middleware(Vec::<String>::from(descriptor.middleware))
    }
}
