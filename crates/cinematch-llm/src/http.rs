//! Shared HTTP client construction for consistent timeout and TLS configuration.

use std::time::Duration;

/// Create a shared HTTP client with standard cinematch configuration.
///
/// Config: caller-supplied connect and request timeouts, rustls TLS,
/// `cinematch/{version}` user-agent, redirect limit 10.
///
/// # Panics
///
/// Panics if the `reqwest` client cannot be constructed (unreachable with these options).
#[must_use]
pub fn default_client(connect_timeout: Duration, request_timeout: Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .connect_timeout(connect_timeout)
        .timeout(request_timeout)
        .user_agent(concat!("cinematch/", env!("CARGO_PKG_VERSION")))
        .redirect(reqwest::redirect::Policy::limited(10))
        .build()
        .expect("default HTTP client construction must not fail")
}
