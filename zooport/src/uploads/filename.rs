//! Filename sanitization and the extension allow-list.
//!
//! Uploaded files are written as `<upload dir>/<sanitized name>`, so the sanitized name must never
//! be able to name anything outside that directory. The filter is deliberately small enough to
//! audit by reading it:
//!
//! 1. the name is NFKD-decomposed and non-ASCII characters are dropped, so `é` keeps its `e`
//! 2. `/` becomes whitespace, so directory components turn into plain name fragments
//! 3. whitespace runs collapse to a single `_`
//! 4. anything outside `[A-Za-z0-9_.-]` is removed
//! 5. leading and trailing `.` and `_` are trimmed, which rules out `..` and hidden files
//!
//! `\` is not a separator on POSIX and goes away in step 4 like any other unsafe character.
//!
//! The result may be empty (`"../../"` sanitizes to `""`); callers must check.

use unicode_normalization::UnicodeNormalization;

/// Make a client-supplied filename safe to use as a single path component.
pub fn sanitize_filename(filename: &str) -> String {
    let ascii: String = filename
        .nfkd()
        .filter(char::is_ascii)
        .map(|c| if c == '/' { ' ' } else { c })
        .collect();

    let joined = ascii.split_ascii_whitespace().collect::<Vec<_>>().join("_");

    joined
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
        .collect::<String>()
        .trim_matches(|c| c == '.' || c == '_')
        .to_string()
}

/// Whether `filename` has an extension in `allowed`.
///
/// The extension is whatever follows the last `.`, compared case-insensitively. A name without a
/// `.` is never allowed. `allowed` is expected to hold lowercase extensions without the dot.
pub fn allowed_file<S: AsRef<str>>(filename: &str, allowed: &[S]) -> bool {
    match filename.rsplit_once('.') {
        Some((_, ext)) => {
            let ext = ext.to_ascii_lowercase();
            allowed.iter().any(|candidate| candidate.as_ref() == ext)
        }
        None => false,
    }
}
