//! Refusal to run inside a web server request.
//!
//! The binary typically lives next to the site it generates for. If a web
//! server ever executes it as a CGI script, it answers with a 403 and exits
//! before reading configuration or touching the network.

/// Variables set by web servers for CGI requests.
pub const CGI_ENV_VARS: &[&str] = &["GATEWAY_INTERFACE", "REQUEST_METHOD"];

/// CGI response written to stdout on refusal.
pub const ACCESS_DENIED_RESPONSE: &str =
    "Status: 403 Forbidden\nContent-Type: text/plain; charset=utf-8\n\nAccess denied.\n";

/// Whether the process was started for a web request.
///
/// `is_set` reports whether an environment variable is present.
pub fn is_web_request(is_set: impl Fn(&str) -> bool) -> bool {
    CGI_ENV_VARS.iter().any(|name| is_set(*name))
}

/// [`is_web_request`] against the real process environment.
pub fn process_is_web_request() -> bool {
    is_web_request(|name| std::env::var_os(name).is_some())
}
