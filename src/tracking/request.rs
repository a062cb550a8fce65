//! Incoming request abstraction.
//!
//! The tracking processor never sees a web framework's request type, only
//! this capability trait. Hosts implement it over whatever they have.

use crate::codec::{self, QueryMap};
use crate::links::UrlParts;

/// The parts of an incoming HTTP request the tracking processor reads.
pub trait IncomingRequest {
    /// First value of query-string parameter `name`.
    fn query_param(&self, name: &str) -> Option<String>;

    /// First value of form-body field `name`.
    fn form_field(&self, name: &str) -> Option<String>;

    /// Every value of the list-valued form field `name` (e.g. `ids[]`).
    fn form_list(&self, name: &str) -> Vec<String>;

    /// The full URL of the request, query string included.
    ///
    /// Absolute URLs and full paths (`/app/?kt_type=nt`) are both accepted.
    fn absolute_url(&self) -> String;
}

/// An `IncomingRequest` built from a URL and a url-encoded form body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BasicRequest {
    url: String,
    query: QueryMap,
    form: QueryMap,
}

impl BasicRequest {
    /// Parses the query string of `url` and the `form_body`.
    ///
    /// `url` may be absolute or a full path such as `/app/?kt_type=nt`.
    pub fn new(url: &str, form_body: &str) -> Self {
        Self {
            url: url.to_string(),
            query: codec::decode(UrlParts::split(url).query, true),
            form: codec::decode(form_body, true),
        }
    }
}

impl IncomingRequest for BasicRequest {
    fn query_param(&self, name: &str) -> Option<String> {
        self.query.get(name).and_then(|v| v.first().cloned())
    }

    fn form_field(&self, name: &str) -> Option<String> {
        self.form.get(name).and_then(|v| v.first().cloned())
    }

    fn form_list(&self, name: &str) -> Vec<String> {
        self.form.get(name).cloned().unwrap_or_default()
    }

    fn absolute_url(&self) -> String {
        self.url.clone()
    }
}
