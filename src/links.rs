//! Tracking parameters on redirect URLs.
//!
//! Links placed in invites and notifications carry `kt_*` parameters back to
//! the application. When the click is recorded, `strip_params` removes them
//! so a page refresh does not report the same click twice.
//!
//! Only the query component is rewritten. Scheme, host, port, path and
//! fragment are copied through byte for byte, so relative URLs such as
//! `/canvas/invite?foo=bar` work as well as absolute ones. `append_params`
//! re-encodes the query in sorted key order; `strip_params` keeps the
//! surviving parameters in their original order.

use crate::codec::{self, QueryMap};
use crate::config::{DIRECTED_VAL, TRACKING_URL_PARAMS};
use crate::tag::generate_long_tag;

/// A URL split around its query string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct UrlParts<'a> {
    /// Scheme, authority and path, untouched.
    pub head: &'a str,
    /// Raw query string without the leading `?`.
    pub query: &'a str,
    /// Fragment including its leading `#`, or empty.
    pub fragment: &'a str,
}

impl<'a> UrlParts<'a> {
    /// Splits off the fragment first, then the query.
    pub fn split(url: &'a str) -> Self {
        let (rest, fragment) = match url.find('#') {
            Some(i) => url.split_at(i),
            None => (url, ""),
        };
        let (head, query) = rest.split_once('?').unwrap_or((rest, ""));
        Self {
            head,
            query,
            fragment,
        }
    }

    /// Reassembles the URL around a new query string.
    ///
    /// An empty path becomes `/` when `query` is non-empty; an empty `query`
    /// drops the `?` altogether.
    fn join(&self, query: &str) -> String {
        let mut url = String::with_capacity(self.head.len() + query.len() + self.fragment.len() + 2);
        url.push_str(self.head);
        if !query.is_empty() {
            if path_of(self.head).is_empty() {
                url.push('/');
            }
            url.push('?');
            url.push_str(query);
        }
        url.push_str(self.fragment);
        url
    }
}

/// Path component of a query-less, fragment-less URL head.
fn path_of(head: &str) -> &str {
    let rest = match head.split_once(':') {
        Some((scheme, rest)) if is_scheme(scheme) => rest,
        _ => head,
    };
    match rest.strip_prefix("//") {
        Some(authority) => authority.find('/').map_or("", |i| &authority[i..]),
        None => rest,
    }
}

fn is_scheme(candidate: &str) -> bool {
    let mut chars = candidate.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

/// Optional A/B template and subtype values shared by the link helpers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkParams {
    pub template: Option<String>,
    pub subtype1: Option<String>,
    pub subtype2: Option<String>,
    pub subtype3: Option<String>,
}

impl LinkParams {
    fn tracking_pairs(&self) -> [(&'static str, Option<String>); 4] {
        [
            ("kt_t", self.template.clone()),
            ("kt_st1", self.subtype1.clone()),
            ("kt_st2", self.subtype2.clone()),
            ("kt_st3", self.subtype3.clone()),
        ]
    }
}

/// Adds `params` to the query string of `url`.
///
/// Existing parameters are kept; keys present in `params` overwrite them.
/// `None` values are ignored. An empty path becomes `/` when the resulting
/// query string is non-empty.
///
/// # Examples
///
/// ```
/// use kontagent::links::append_params;
///
/// assert_eq!(append_params("http://host", [("x", Some("y"))]), "http://host/?x=y");
/// assert_eq!(
///     append_params("/canvas/invite?foo=bar", [("x", Some("y"))]),
///     "/canvas/invite?foo=bar&x=y"
/// );
/// ```
pub fn append_params<K, V>(url: &str, params: impl IntoIterator<Item = (K, Option<V>)>) -> String
where
    K: Into<String>,
    V: Into<String>,
{
    let parts = UrlParts::split(url);
    let mut merged: QueryMap = codec::decode(parts.query, true);
    for (key, value) in params {
        if let Some(value) = value {
            merged.insert(key.into(), vec![value.into()]);
        }
    }
    parts.join(&codec::encode_multi(&merged))
}

/// Removes the `kt_*` tracking parameters from `url`.
///
/// All other parameters survive in their original order. A URL without
/// tracking parameters only has its query re-encoded.
pub fn strip_params(url: &str) -> String {
    let parts = UrlParts::split(url);
    let kept = codec::decode_pairs(parts.query, true)
        .into_iter()
        .filter(|(key, _)| !TRACKING_URL_PARAMS.contains(&key.as_str()));
    parts.join(&codec::encode_pairs(kept))
}

/// Tags a link placed in the body of an invite.
///
/// Use the same `tracking_tag` for the content and action links of one invite.
pub fn append_invite_content_params(url: &str, tracking_tag: &str, extra: &LinkParams) -> String {
    let mut params = vec![
        ("kt_type", Some("in".to_string())),
        ("kt_ut", Some(tracking_tag.to_string())),
        ("kt_d", Some(DIRECTED_VAL.to_string())),
    ];
    params.extend(extra.tracking_pairs());
    append_params(url, params)
}

/// Tags the page a user lands on after sending an invite.
pub fn append_invite_action_params(url: &str, tracking_tag: &str, extra: &LinkParams) -> String {
    let mut params = vec![
        ("kt_type", Some("ins".to_string())),
        ("kt_ut", Some(tracking_tag.to_string())),
    ];
    params.extend(extra.tracking_pairs());
    append_params(url, params)
}

/// Tags a link inside a notification with a freshly generated tracking tag.
pub fn append_notification_tracking(url: &str, extra: &LinkParams) -> String {
    let mut params = vec![
        ("kt_type", Some("nt".to_string())),
        ("kt_ut", Some(generate_long_tag())),
    ];
    params.extend(extra.tracking_pairs());
    append_params(url, params)
}
