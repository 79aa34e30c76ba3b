use crate::Error;
use percent_encoding::percent_decode_str;
use std::borrow::Cow;

pub(crate) fn percent_decode_request_path(val: &str) -> crate::Result<String> {
    percent_decode_str(val)
        .decode_utf8()
        .map(Cow::into_owned)
        .map_err(|e| Error::InvalidPath(e.to_string()))
}

/// Joins path pieces into `/a/b/c`, dropping empty segments so that repeated and trailing slashes collapse.
/// An empty result is the root `/`.
pub(crate) fn join_path<'a, I>(parts: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let mut out = String::new();
    for segment in parts.into_iter().flat_map(|p| p.split('/')) {
        if segment.is_empty() {
            continue;
        }
        out.push('/');
        out.push_str(segment);
    }

    if out.is_empty() {
        out.push('/');
    }
    out
}

/// Joins `::` separated namespace pieces, trimming and collapsing separators.
pub(crate) fn join_namespace<'a, I>(parts: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    parts
        .into_iter()
        .flat_map(|p| p.split("::"))
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>()
        .join("::")
}

/// Splits a script name like `/blog/index.php` into its directory (`/blog`) and file name (`index.php`).
pub(crate) fn split_script_name(script_name: &str) -> (&str, &str) {
    match script_name.rfind('/') {
        Some(idx) => (&script_name[..idx], &script_name[idx + 1..]),
        None => ("", script_name),
    }
}

/// Derives the application relative path of a request.
///
/// The directory of the script name is stripped, then the query string, then a leading segment equal to the
/// script file itself (`/index.php/users` is `/users`). The remainder is percent decoded and normalized.
pub(crate) fn current_path(script_name: &str, request_uri: &str) -> crate::Result<String> {
    let (dir, file) = split_script_name(script_name);

    let mut path = match request_uri.strip_prefix(dir) {
        Some(rest) if rest.is_empty() || rest.starts_with('/') || rest.starts_with('?') => rest,
        _ => request_uri,
    };
    if let Some(idx) = path.find('?') {
        path = &path[..idx];
    }

    let mut segments = path.split('/').skip_while(|s| s.is_empty()).peekable();
    if !file.is_empty() && segments.peek() == Some(&file) {
        segments.next();
    }

    let rest = segments.collect::<Vec<_>>().join("/");
    let decoded = percent_decode_request_path(&rest)?;

    Ok(join_path([decoded.as_str()]))
}
