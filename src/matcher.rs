use crate::Error;
use lazy_static::lazy_static;
use regex::Regex;
use std::fmt::{self, Debug, Formatter};

lazy_static! {
    static ref PLACEHOLDER_REGEX: Regex = Regex::new(r"\{(.*?)\}").unwrap();
}

// A placeholder matches one or more ASCII word characters or hyphens.
const PLACEHOLDER_CAPTURE: &str = r"(?-u:([\w-]+))";

/// Builds an anchored regex for a route pattern, returning it with the placeholder names in order of appearance.
pub(crate) fn generate_exact_match_regex(pattern: &str) -> crate::Result<(Regex, Vec<String>)> {
    let mut re = String::with_capacity(pattern.len() + 2);
    let mut params = Vec::new();
    let mut last = 0;

    re.push('^');
    for caps in PLACEHOLDER_REGEX.captures_iter(pattern) {
        let Some(whole) = caps.get(0) else { continue };
        re.push_str(&regex::escape(&pattern[last..whole.start()]));
        re.push_str(PLACEHOLDER_CAPTURE);
        params.push(caps[1].to_string());
        last = whole.end();
    }
    re.push_str(&regex::escape(&pattern[last..]));
    re.push('$');

    let regex = Regex::new(&re).map_err(|source| Error::InvalidPattern {
        pattern: pattern.to_string(),
        source,
    })?;

    Ok((regex, params))
}

/// Matches request paths against one route pattern and substitutes values back into it.
///
/// `{name}` placeholders become positional captures; the names themselves are only kept for debugging.
#[derive(Clone)]
pub struct PathMatcher {
    regex: Regex,
    params: Vec<String>,
    // Literal text around the placeholders, always `params.len() + 1` pieces.
    literals: Vec<String>,
}

impl PathMatcher {
    pub fn new(pattern: &str) -> crate::Result<PathMatcher> {
        let (regex, params) = generate_exact_match_regex(pattern)?;
        let literals = PLACEHOLDER_REGEX.split(pattern).map(str::to_string).collect();

        Ok(PathMatcher {
            regex,
            params,
            literals,
        })
    }

    pub(crate) fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    pub fn param_count(&self) -> usize {
        self.params.len()
    }

    pub fn is_match(&self, path: &str) -> bool {
        self.regex.is_match(path)
    }

    /// Returns the captured placeholder values in left-to-right order, or `None` if the path doesn't match.
    pub fn captures(&self, path: &str) -> Option<Vec<String>> {
        let caps = self.regex.captures(path)?;

        // Skip the first group because it's the whole path.
        Some(
            caps.iter()
                .skip(1)
                .map(|m| m.map(|m| m.as_str().to_string()).unwrap_or_default())
                .collect(),
        )
    }

    /// Replaces the placeholders positionally with the given values.
    pub fn substitute<V: AsRef<str>>(&self, values: &[V]) -> crate::Result<String> {
        if values.len() != self.params.len() {
            return Err(Error::ParameterCountMismatch {
                expected: self.params.len(),
                given: values.len(),
            });
        }

        let mut out = String::new();
        for (idx, literal) in self.literals.iter().enumerate() {
            out.push_str(literal);
            if let Some(value) = values.get(idx) {
                out.push_str(value.as_ref());
            }
        }

        Ok(out)
    }
}

impl Debug for PathMatcher {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{{ regex: {:?}, params: {:?} }}", self.regex.as_str(), self.params)
    }
}
