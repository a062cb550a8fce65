//! Request-driven tracking.
//!
//! `TrackingMiddleware` inspects an incoming canvas request, reports the
//! install, uninstall and click events it implies, and tells the host where
//! to redirect so the `kt_*` parameters disappear from the address bar.
//!
//! The processor is framework-agnostic: it reads requests through
//! `IncomingRequest` and hands back a `Redirect` the host renders however its
//! platform expects.

mod request;

pub use request::{BasicRequest, IncomingRequest};

use log::{debug, warn};

use crate::config::{Config, UCC_LINK_TYPES};
use crate::dispatch::Dispatcher;
use crate::error_handling::TrackingError;
use crate::events::{ApplicationAdded, ClickResponse, EmailResponse, InviteSent, UndirectedClick};
use crate::links::strip_params;
use crate::query::{AnalyticsInterface, QueryDescriptor};
use crate::tag::generate_short_tag;

// Canvas request fields
const FIELD_CANVAS_USER: &str = "fb_sig_canvas_user";
const FIELD_USER: &str = "fb_sig_user";
const FIELD_ADDED: &str = "fb_sig_added";
const FIELD_UNINSTALL: &str = "fb_sig_uninstall";
const FIELD_INVITE_IDS: &str = "ids[]";

// Query parameters
const PARAM_INSTALLED: &str = "installed";
const PARAM_TYPE: &str = "kt_type";
const PARAM_TAG: &str = "kt_ut";
const PARAM_TEMPLATE: &str = "kt_t";
const PARAM_ST1: &str = "kt_st1";
const PARAM_ST2: &str = "kt_st2";
const PARAM_ST3: &str = "kt_st3";

/// Where the host should send the user next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirect {
    pub target: String,
}

/// Queries implied by one request, plus an optional redirect.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackingOutcome {
    pub queries: Vec<QueryDescriptor>,
    pub redirect: Option<Redirect>,
}

/// Tracking parameters carried on a link back to the application.
struct LinkValues {
    tag: Option<String>,
    template: Option<String>,
    st1: Option<String>,
    st2: Option<String>,
    st3: Option<String>,
}

impl LinkValues {
    fn from_request(req: &impl IncomingRequest) -> Self {
        Self {
            tag: req.query_param(PARAM_TAG),
            template: req.query_param(PARAM_TEMPLATE),
            st1: req.query_param(PARAM_ST1),
            st2: req.query_param(PARAM_ST2),
            st3: req.query_param(PARAM_ST3),
        }
    }
}

/// Reports tracking events for incoming requests.
#[derive(Debug, Clone)]
pub struct TrackingMiddleware {
    interface: AnalyticsInterface,
    dispatcher: Dispatcher,
    auto_redirect: bool,
}

impl TrackingMiddleware {
    pub fn new(interface: AnalyticsInterface, dispatcher: Dispatcher, auto_redirect: bool) -> Self {
        Self {
            interface,
            dispatcher,
            auto_redirect,
        }
    }

    /// Builds the interface and dispatcher from `config`.
    ///
    /// # Errors
    ///
    /// Returns `TrackingError::Configuration` for a blank server or key and
    /// `TrackingError::Initialization` if the HTTP client cannot be built.
    pub fn from_config(config: &Config) -> Result<Self, TrackingError> {
        Ok(Self::new(
            AnalyticsInterface::from_config(config)?,
            Dispatcher::new(config)?,
            config.auto_redirect,
        ))
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Sends every query the request implies and returns the redirect, if any.
    ///
    /// Sends are detached, so this never waits on the API server and never
    /// fails because of it. Synchronous hosts without a Tokio runtime can
    /// call it too.
    pub fn process_request(&self, req: &impl IncomingRequest) -> Option<Redirect> {
        let outcome = self.collect_queries(req);
        for query in outcome.queries {
            self.dispatcher.send_detached(query);
        }
        outcome.redirect
    }

    /// Works out the queries and redirect for `req` without sending anything.
    ///
    /// Queries that cannot be built (e.g. a blank user id) are logged and
    /// skipped; the request itself is never rejected.
    pub fn collect_queries(&self, req: &impl IncomingRequest) -> TrackingOutcome {
        let mut outcome = TrackingOutcome::default();
        let mut push = |built: Result<QueryDescriptor, TrackingError>| match built {
            Ok(query) => outcome.queries.push(query),
            Err(e) => warn!("Skipping tracking query: {e}"),
        };

        let uid = user_id(req);
        let installed = req.form_field(FIELD_ADDED).as_deref() == Some("1");
        let link = LinkValues::from_request(req);

        if req.form_field(FIELD_UNINSTALL).as_deref() == Some("1") {
            if let Some(uid) = &uid {
                push(self.interface.application_removed(uid));
            }
        }

        if req.query_param(PARAM_INSTALLED).as_deref() == Some("1") {
            if let (Some(uid), Some(tag)) = (&uid, &link.tag) {
                push(self.interface.application_added(&ApplicationAdded {
                    uid: uid.clone(),
                    tracking_tag: Some(tag.clone()),
                    short_tracking_tag: None,
                }));
            }
        }

        let mut redirect = false;
        let has_installed_param = req.query_param(PARAM_INSTALLED).is_some();
        let has_added_field = req.form_field(FIELD_ADDED).is_some();

        if let Some(kind) = req.query_param(PARAM_TYPE) {
            match (kind.as_str(), &link.tag) {
                ("nt", Some(tag)) if !has_installed_param => {
                    push(self.interface.notification_response(&click(installed, tag, &uid, &link)));
                    redirect = true;
                }
                ("ins", Some(tag)) => {
                    let ids = req.form_list(FIELD_INVITE_IDS);
                    if req.form_field(FIELD_USER).is_some() && !ids.is_empty() {
                        push(self.interface.invite_sent(&InviteSent {
                            uid: uid.clone().unwrap_or_default(),
                            recipients: ids,
                            tracking_tag: Some(tag.clone()),
                            template_id: link.template.clone(),
                            subtype1: link.st1.clone(),
                            subtype2: link.st2.clone(),
                            subtype3: link.st3.clone(),
                        }));
                    }
                }
                ("in", Some(tag)) if has_added_field && !has_installed_param => {
                    push(self.interface.invite_response(&click(installed, tag, &uid, &link)));
                    redirect = true;
                }
                ("nte", Some(tag)) if has_added_field => {
                    push(self.interface.email_response(&EmailResponse {
                        installed,
                        tracking_tag: tag.clone(),
                        recipient_id: uid.clone(),
                        subtype1: link.st1.clone(),
                        subtype2: link.st2.clone(),
                        subtype3: link.st3.clone(),
                    }));
                    redirect = true;
                }
                (kind, _) if UCC_LINK_TYPES.contains(&kind) => {
                    match &uid {
                        Some(uid) => push(self.interface.ucc(&UndirectedClick {
                            uid: uid.clone(),
                            link_type: kind.to_string(),
                            installed,
                            short_tracking_tag: Some(generate_short_tag()),
                            subtype1: link.st1.clone(),
                            subtype2: link.st2.clone(),
                            subtype3: link.st3.clone(),
                        })),
                        None => debug!("No user id on {kind} click; not reported"),
                    }
                    redirect = true;
                }
                (kind, _) => debug!("Ignoring kt_type={kind}"),
            }
        }

        if redirect && self.auto_redirect {
            outcome.redirect = Some(Redirect {
                target: strip_params(&req.absolute_url()),
            });
        }

        outcome
    }
}

fn user_id(req: &impl IncomingRequest) -> Option<String> {
    req.form_field(FIELD_CANVAS_USER)
        .or_else(|| req.form_field(FIELD_USER))
        .filter(|uid| !uid.is_empty())
}

fn click(installed: bool, tag: &str, uid: &Option<String>, link: &LinkValues) -> ClickResponse {
    ClickResponse {
        installed,
        tracking_tag: tag.to_string(),
        template_id: link.template.clone(),
        recipient_id: uid.clone(),
        subtype1: link.st1.clone(),
        subtype2: link.st2.clone(),
        subtype3: link.st3.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn middleware(auto_redirect: bool) -> TrackingMiddleware {
        TrackingMiddleware::new(
            AnalyticsInterface::new("api.x.net", "K"),
            Dispatcher::new(&Config::default()).unwrap(),
            auto_redirect,
        )
    }

    fn types(outcome: &TrackingOutcome) -> Vec<&str> {
        outcome
            .queries
            .iter()
            .filter_map(|q| q.message_type())
            .collect()
    }

    fn first(q: &QueryDescriptor, key: &str) -> Option<String> {
        q.params().get(key).and_then(|v| v.first().cloned())
    }

    #[test]
    fn test_plain_request_reports_nothing() {
        let req = BasicRequest::new("http://apps.x.com/app/?page=2", "fb_sig_user=42");
        let outcome = middleware(true).collect_queries(&req);
        assert!(outcome.queries.is_empty());
        assert!(outcome.redirect.is_none());
    }

    #[test]
    fn test_uninstall() {
        let req = BasicRequest::new(
            "http://apps.x.com/app/",
            "fb_sig_uninstall=1&fb_sig_user=42",
        );
        let outcome = middleware(true).collect_queries(&req);
        assert_eq!(types(&outcome), vec!["apr"]);
        assert_eq!(first(&outcome.queries[0], "s").as_deref(), Some("42"));
    }

    #[test]
    fn test_uninstall_without_user_is_ignored() {
        let req = BasicRequest::new("http://apps.x.com/app/", "fb_sig_uninstall=1");
        assert!(middleware(true).collect_queries(&req).queries.is_empty());
    }

    #[test]
    fn test_application_added() {
        let req = BasicRequest::new(
            "http://apps.x.com/app/?installed=1&kt_ut=TAG1",
            "fb_sig_user=42",
        );
        let outcome = middleware(true).collect_queries(&req);
        assert_eq!(types(&outcome), vec!["apa"]);
        assert_eq!(first(&outcome.queries[0], "u").as_deref(), Some("TAG1"));
        assert!(outcome.redirect.is_none());
    }

    #[test]
    fn test_canvas_user_preferred() {
        let req = BasicRequest::new(
            "http://apps.x.com/app/",
            "fb_sig_uninstall=1&fb_sig_user=42&fb_sig_canvas_user=7",
        );
        let outcome = middleware(true).collect_queries(&req);
        assert_eq!(first(&outcome.queries[0], "s").as_deref(), Some("7"));
    }

    #[test]
    fn test_notification_click_redirects_to_stripped_url() {
        let req = BasicRequest::new(
            "http://apps.x.com/app/?foo=bar&kt_type=nt&kt_ut=TAG2&kt_t=3&kt_st1=a",
            "fb_sig_user=42&fb_sig_added=1",
        );
        let outcome = middleware(true).collect_queries(&req);
        assert_eq!(types(&outcome), vec!["ntr"]);
        let q = &outcome.queries[0];
        assert_eq!(first(q, "i").as_deref(), Some("1"));
        assert_eq!(first(q, "r").as_deref(), Some("42"));
        assert_eq!(first(q, "t").as_deref(), Some("3"));
        assert_eq!(first(q, "st1").as_deref(), Some("a"));
        assert_eq!(
            outcome.redirect,
            Some(Redirect {
                target: "http://apps.x.com/app/?foo=bar".to_string()
            })
        );
    }

    #[test]
    fn test_notification_click_without_redirect() {
        let req = BasicRequest::new("http://apps.x.com/app/?kt_type=nt&kt_ut=TAG2", "");
        let outcome = middleware(false).collect_queries(&req);
        assert_eq!(types(&outcome), vec!["ntr"]);
        assert_eq!(first(&outcome.queries[0], "i").as_deref(), Some("0"));
        assert!(outcome.redirect.is_none());
    }

    #[test]
    fn test_notification_click_after_install_is_ignored() {
        let req = BasicRequest::new(
            "http://apps.x.com/app/?kt_type=nt&kt_ut=TAG2&installed=1",
            "",
        );
        assert!(middleware(true).collect_queries(&req).queries.is_empty());
    }

    #[test]
    fn test_invite_sent() {
        let req = BasicRequest::new(
            "http://apps.x.com/app/sent?kt_type=ins&kt_ut=TAG3&kt_st2=b",
            "fb_sig_user=42&ids%5B%5D=100&ids%5B%5D=200",
        );
        let outcome = middleware(true).collect_queries(&req);
        assert_eq!(types(&outcome), vec!["ins"]);
        let q = &outcome.queries[0];
        assert_eq!(first(q, "r").as_deref(), Some("100,200"));
        assert_eq!(first(q, "u").as_deref(), Some("TAG3"));
        assert_eq!(first(q, "st2").as_deref(), Some("b"));
        assert!(outcome.redirect.is_none());
    }

    #[test]
    fn test_invite_sent_needs_recipients() {
        let req = BasicRequest::new(
            "http://apps.x.com/app/sent?kt_type=ins&kt_ut=TAG3",
            "fb_sig_user=42",
        );
        assert!(middleware(true).collect_queries(&req).queries.is_empty());
    }

    #[test]
    fn test_invite_click() {
        let req = BasicRequest::new(
            "http://apps.x.com/app/?kt_type=in&kt_ut=TAG4&kt_d=d",
            "fb_sig_added=0&fb_sig_user=9",
        );
        let outcome = middleware(true).collect_queries(&req);
        assert_eq!(types(&outcome), vec!["inr"]);
        assert_eq!(first(&outcome.queries[0], "i").as_deref(), Some("0"));
        assert_eq!(
            outcome.redirect.map(|r| r.target).as_deref(),
            Some("http://apps.x.com/app/")
        );
    }

    #[test]
    fn test_invite_click_on_full_path_redirects_to_path() {
        let req = BasicRequest::new(
            "/canvas/app/?foo=bar&kt_type=in&kt_ut=TAG4&kt_d=d",
            "fb_sig_added=1&fb_sig_user=9",
        );
        let outcome = middleware(true).collect_queries(&req);
        assert_eq!(types(&outcome), vec!["inr"]);
        assert_eq!(
            outcome.redirect.map(|r| r.target).as_deref(),
            Some("/canvas/app/?foo=bar")
        );
    }

    #[test]
    fn test_invite_click_requires_added_field() {
        let req = BasicRequest::new("http://apps.x.com/app/?kt_type=in&kt_ut=TAG4", "");
        let outcome = middleware(true).collect_queries(&req);
        assert!(outcome.queries.is_empty());
        assert!(outcome.redirect.is_none());
    }

    #[test]
    fn test_email_click() {
        let req = BasicRequest::new(
            "http://apps.x.com/app/?kt_type=nte&kt_ut=TAG5&kt_st3=c",
            "fb_sig_added=1",
        );
        let outcome = middleware(true).collect_queries(&req);
        assert_eq!(types(&outcome), vec!["nei"]);
        assert_eq!(first(&outcome.queries[0], "st3").as_deref(), Some("c"));
        assert!(outcome.redirect.is_some());
    }

    #[test]
    fn test_undirected_click() {
        for kind in UCC_LINK_TYPES {
            let req = BasicRequest::new(
                &format!("http://apps.x.com/app/?kt_type={kind}&kt_st1=s"),
                "fb_sig_user=42&fb_sig_added=1",
            );
            let outcome = middleware(true).collect_queries(&req);
            assert_eq!(types(&outcome), vec!["ucc"], "{kind}");
            let q = &outcome.queries[0];
            assert_eq!(first(q, "tu").as_deref(), Some(kind));
            assert_eq!(first(q, "i").as_deref(), Some("1"));
            let su = first(q, "su").unwrap();
            assert!((1..=8).contains(&su.len()));
            assert!(outcome.redirect.is_some());
        }
    }

    #[test]
    fn test_unknown_link_type_is_ignored() {
        let req = BasicRequest::new(
            "http://apps.x.com/app/?kt_type=zzz&kt_ut=T",
            "fb_sig_user=42",
        );
        let outcome = middleware(true).collect_queries(&req);
        assert!(outcome.queries.is_empty());
        assert!(outcome.redirect.is_none());
    }
}
