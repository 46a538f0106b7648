//! Text helpers: bounded strings and filename-safe slugs.

use lazy_static::lazy_static;
use regex::Regex;

/// Maximum characters kept in an event title.
pub const MAX_TITLE_CHARS: usize = 500;

/// Maximum characters kept in an event description.
pub const MAX_DESCRIPTION_CHARS: usize = 2000;

/// Slug used when a name has no alphanumeric characters at all.
pub const SLUG_PLACEHOLDER: &str = "channel";

/// Longest channel id, in bytes. Leaves room under the usual 255-byte file
/// name limit for a collision suffix and the `.json` extension.
pub const MAX_ID_BYTES: usize = 128;

lazy_static! {
    static ref NON_ALNUM_RUN: Regex = Regex::new(r"[^a-z0-9]+").unwrap();
    static ref FILENAME_SAFE: Regex = Regex::new(r"^[A-Za-z0-9_-][A-Za-z0-9._-]*$").unwrap();
}

/// Truncate to at most `max` characters (Unicode scalar values, not bytes).
pub fn truncate_chars(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((byte_idx, _)) => s[..byte_idx].to_string(),
        None => s.to_string(),
    }
}

/// Lowercase, collapse every non-alphanumeric run to `-`, trim hyphens,
/// cap at [`MAX_ID_BYTES`].
///
/// # Examples
/// ```
/// use guide_normalizer::normalize::slugify;
/// assert_eq!(slugify("BBC One!"), "bbc-one");
/// assert_eq!(slugify(""), "channel");
/// ```
pub fn slugify(name: &str) -> String {
    let lowered = name.to_lowercase();
    let slug = NON_ALNUM_RUN.replace_all(&lowered, "-");
    let slug = slug.trim_matches('-');
    // ASCII only at this point, so any byte offset is a char boundary.
    let slug = slug[..slug.len().min(MAX_ID_BYTES)].trim_end_matches('-');
    if slug.is_empty() {
        SLUG_PLACEHOLDER.to_string()
    } else {
        slug.to_string()
    }
}

/// True when `id` can be used verbatim as a file stem and URL segment.
pub fn is_filename_safe(id: &str) -> bool {
    id.len() <= MAX_ID_BYTES && FILENAME_SAFE.is_match(id)
}
