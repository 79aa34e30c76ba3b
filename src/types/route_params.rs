use std::ops::Index;

/// The values captured from the placeholders of the matched route, in left-to-right pattern order.
///
/// Placeholder names are not kept; `/users/{id}/books/{book}` matched against `/users/7/books/dune`
/// yields `["7", "dune"]`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteParams(Vec<String>);

impl RouteParams {
    pub fn new() -> RouteParams {
        RouteParams(Vec::new())
    }

    pub fn get(&self, idx: usize) -> Option<&str> {
        self.0.get(idx).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn into_vec(self) -> Vec<String> {
        self.0
    }
}

impl From<Vec<String>> for RouteParams {
    fn from(values: Vec<String>) -> RouteParams {
        RouteParams(values)
    }
}

impl Index<usize> for RouteParams {
    type Output = str;

    fn index(&self, idx: usize) -> &str {
        &self.0[idx]
    }
}
