use std::collections::BTreeMap;

/// Name of the query parameter carrying the request signature.
pub const SIGNATURE_PARAM: &str = "Signature";

/// Parameters of a request, ordered by key byte value.
pub type Params = BTreeMap<String, String>;

/// Percent-encode a query component.
/// Only `A-Z a-z 0-9 - _ . ~` stay as they are, a space becomes `%20`.
pub fn encode(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}

/// Merge caller parameters into the fixed ones.
/// Fixed parameters win every collision. A caller `Signature` is dropped.
/// When the caller repeats a key, the last value wins.
pub fn merge<I, K, V>(fixed: Params, caller: I) -> Params
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut merged: Params = caller
        .into_iter()
        .map(|(key, value)| (key.as_ref().to_string(), value.as_ref().to_string()))
        .filter(|(key, _)| key != SIGNATURE_PARAM)
        .collect();
    merged.extend(fixed);
    merged
}

/// Build the canonical query string: sorted keys, encoded pairs joined by `&`.
pub fn canonical_query(params: &Params) -> String {
    params
        .iter()
        .map(|(k, v)| format!("{}={}", encode(k), encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}
