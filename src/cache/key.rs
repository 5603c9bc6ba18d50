//! Key composition helpers.

/// Delimiter used by [`create_key`].
pub const DEFAULT_DELIMITER: &str = ":";

/// Joins `parts` with [`DEFAULT_DELIMITER`].
///
/// ```
/// assert_eq!(addcache::create_key(["user", "12"]), "user:12");
/// ```
pub fn create_key<I, S>(parts: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    create_key_with_delimiter(DEFAULT_DELIMITER, parts)
}

/// Joins `parts` with an arbitrary delimiter.
pub fn create_key_with_delimiter<I, S>(delimiter: &str, parts: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut key = String::new();
    for (i, part) in parts.into_iter().enumerate() {
        if i > 0 {
            key.push_str(delimiter);
        }
        key.push_str(part.as_ref());
    }
    key
}
