//! Safe nested lookups into a definition tree.

use serde_json::Value;

/// Walks `keys` down through nested objects.
///
/// Returns `None` as soon as a segment is missing or the current value is not
/// an object, so a missing `custom` block or a scalar where a map was expected
/// never fails the lookup.
pub fn get_path<'a, K>(value: &'a Value, keys: &[K]) -> Option<&'a Value>
where
    K: AsRef<str>,
{
    keys.iter()
        .try_fold(value, |current, key| current.as_object()?.get(key.as_ref()))
}

/// Same as [`get_path`] but yields a string, treating non-strings as absent.
pub fn get_str<'a, K>(value: &'a Value, keys: &[K]) -> Option<&'a str>
where
    K: AsRef<str>,
{
    get_path(value, keys).and_then(Value::as_str)
}
