//! Query-string encoding and decoding.
//!
//! `encode` turns a parameter mapping into an `application/x-www-form-urlencoded`
//! query string, dropping every key whose value is absent. `decode` is the
//! inverse: it splits on `&` and `;`, treats `+` as a space, percent-decodes,
//! and accumulates repeated keys in order.

use std::collections::BTreeMap;

use url::form_urlencoded;

use crate::error_handling::TrackingError;

/// Encoded parameters: unique keys, values never absent.
pub type ParameterSet = BTreeMap<String, String>;

/// Decoded query string: every value seen for a key, in input order.
pub type QueryMap = BTreeMap<String, Vec<String>>;

/// Encodes a parameter mapping into a query string.
///
/// Entries whose value is `None` are dropped before encoding, so the output
/// never contains a key without a value. Keys are emitted in sorted order;
/// when a key appears twice the last value wins.
///
/// # Examples
///
/// ```
/// use kontagent::codec::encode;
///
/// let qs = encode([("s", Some("42")), ("b", None), ("u", Some("a b&c"))]);
/// assert_eq!(qs, "s=42&u=a+b%26c");
/// ```
pub fn encode<K, V>(params: impl IntoIterator<Item = (K, Option<V>)>) -> String
where
    K: Into<String>,
    V: Into<String>,
{
    let filtered: ParameterSet = params
        .into_iter()
        .filter_map(|(k, v)| v.map(|v| (k.into(), v.into())))
        .collect();
    encode_pairs(&filtered)
}

/// Encodes pairs in the order given, keeping duplicate keys.
pub fn encode_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> String
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    form_urlencoded::Serializer::new(String::new())
        .extend_pairs(pairs)
        .finish()
}

/// Encodes a multi-valued map, one `key=value` pair per value.
pub fn encode_multi(params: &QueryMap) -> String {
    encode_pairs(
        params
            .iter()
            .flat_map(|(k, values)| values.iter().map(move |v| (k, v))),
    )
}

/// Joins list members into the single comma-separated value the API expects.
///
/// Returns `None` for an empty list so that the key is omitted entirely.
pub fn join_list<T: AsRef<str>>(items: &[T]) -> Option<String> {
    if items.is_empty() {
        return None;
    }
    Some(
        items
            .iter()
            .map(|s| s.as_ref())
            .collect::<Vec<_>>()
            .join(","),
    )
}

/// Decodes a query string, silently skipping malformed pairs.
///
/// Blank values are dropped unless `keep_blank_values` is set. A pair with
/// no `=` is skipped, or kept with an empty value when `keep_blank_values`
/// is set.
pub fn decode(query: &str, keep_blank_values: bool) -> QueryMap {
    // Non-strict parsing has no failure path.
    collect_map(parse_pairs(query, keep_blank_values, false).unwrap_or_default())
}

/// Decodes a query string, rejecting any pair without `=`.
///
/// Empty segments count as malformed, so an empty query string is rejected
/// too.
///
/// # Errors
///
/// Returns `TrackingError::Format` naming the first malformed field.
pub fn decode_strict(query: &str, keep_blank_values: bool) -> Result<QueryMap, TrackingError> {
    parse_pairs(query, keep_blank_values, true).map(collect_map)
}

/// Decodes a query string into `(name, value)` pairs in input order.
///
/// Used where parameter order must survive, e.g. `links::strip_params`.
pub fn decode_pairs(query: &str, keep_blank_values: bool) -> Vec<(String, String)> {
    parse_pairs(query, keep_blank_values, false).unwrap_or_default()
}

fn collect_map(pairs: Vec<(String, String)>) -> QueryMap {
    let mut map = QueryMap::new();
    for (name, value) in pairs {
        map.entry(name).or_default().push(value);
    }
    map
}

fn parse_pairs(
    query: &str,
    keep_blank_values: bool,
    strict: bool,
) -> Result<Vec<(String, String)>, TrackingError> {
    let mut pairs = Vec::new();

    for segment in query.split(['&', ';']) {
        if segment.is_empty() && !strict {
            continue;
        }

        let Some(eq) = segment.find('=') else {
            if strict {
                return Err(TrackingError::Format(format!(
                    "bad query field: {segment:?}"
                )));
            }
            if keep_blank_values {
                pairs.push((unquote_plus(segment), String::new()));
            }
            continue;
        };

        if eq + 1 == segment.len() && !keep_blank_values {
            continue;
        }

        // The segment holds no '&', so parse() yields exactly one pair split
        // on the first '='.
        if let Some((name, value)) = form_urlencoded::parse(segment.as_bytes()).next() {
            pairs.push((name.into_owned(), value.into_owned()));
        }
    }

    Ok(pairs)
}

fn unquote_plus(raw: &str) -> String {
    form_urlencoded::parse(raw.as_bytes())
        .next()
        .map(|(name, _)| name.into_owned())
        .unwrap_or_default()
}
