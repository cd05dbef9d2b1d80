//! URL slug derivation for news posts.

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Derive a URL slug from a post title.
///
/// Decomposes accented characters and drops the combining marks, so
/// "Bài viết mới" becomes "bai-viet-moi". Anything that is not an ASCII
/// letter or digit after that is dropped or folded into a dash. Returns
/// `None` when nothing usable remains.
pub fn slugify(text: &str) -> Option<String> {
    let stripped: String = text
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_lowercase();

    let mut slug = String::with_capacity(stripped.len());
    let mut last_dash = true; // suppress leading dashes
    for c in stripped.chars() {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            slug.push(c);
            last_dash = false;
        } else if (c.is_whitespace() || c == '-') && !last_dash {
            slug.push('-');
            last_dash = true;
        }
    }

    while slug.ends_with('-') {
        slug.pop();
    }

    if slug.is_empty() { None } else { Some(slug) }
}
