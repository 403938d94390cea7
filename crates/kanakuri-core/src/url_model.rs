//! Local file names derived from download URLs.

use percent_encoding::percent_decode_str;

/// Last path segment of `url`, percent-decoded, for use as a file name.
///
/// Returns `None` if the URL cannot be parsed, the path is empty or root, or
/// the decoded segment is not a plain file name (`.`, `..`, or anything
/// containing a path separator or NUL).
pub fn file_name_from_url(url: &str) -> Option<String> {
    let parsed = url::Url::parse(url).ok()?;
    let segment = parsed.path_segments()?.filter(|s| !s.is_empty()).last()?;
    let name = percent_decode_str(segment).decode_utf8_lossy();
    if name == "." || name == ".." || name.contains(['/', '\\', '\0']) {
        return None;
    }
    Some(name.into_owned())
}
