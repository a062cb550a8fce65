//! Configuration constants.
//!
//! Default values, environment variable names, and the fixed wire codes used
//! by the analytics API.

/// Default API version segment in query paths.
pub const DEFAULT_API_VERSION: &str = "v1";

/// Default User-Agent for requests to the API server.
pub const DEFAULT_USER_AGENT: &str = concat!("kontagent-rs/", env!("CARGO_PKG_VERSION"));

/// Whether tracking processors redirect to the stripped URL by default.
pub const DEFAULT_AUTO_REDIRECT: bool = true;

// Environment variables read by `Config::from_env`
pub const ENV_API_SERVER: &str = "KONTAGENT_API_SERVER";
pub const ENV_API_KEY: &str = "KONTAGENT_API_KEY";
pub const ENV_API_VERSION: &str = "KONTAGENT_API_VERSION";
pub const ENV_AUTO_REDIRECT: &str = "KONTAGENT_AUTO_REDIRECT";
pub const ENV_TIMEOUT_SECS: &str = "KONTAGENT_TIMEOUT_SECS";

/// Value of `kt_d` marking an invite as directed at named recipients.
pub const DIRECTED_VAL: &str = "d";

/// URL parameters appended by the link helpers and removed by `strip_params`.
pub const TRACKING_URL_PARAMS: [&str; 7] = [
    "kt_type", "kt_ut", "kt_d", "kt_t", "kt_st1", "kt_st2", "kt_st3",
];

/// `kt_type` values that are reported as undirected communication clicks.
pub const UCC_LINK_TYPES: [&str; 6] = ["fdp", "ad", "prt", "prf", "partner", "profile"];
