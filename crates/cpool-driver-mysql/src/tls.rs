//! MySQL TLS options
//!
//! Pooled connections always negotiate TLS but accept any server
//! certificate, matching the `tls=skip-verify` transport flag.

use mysql_async::SslOpts;
use tracing::warn;

/// Build SSL options that encrypt the transport without verifying the server
///
/// Certificate chain and hostname checks are both disabled.
pub fn skip_verify_ssl_opts() -> SslOpts {
    warn!("building MySQL SSL options with certificate verification disabled");

    SslOpts::default()
        .with_danger_accept_invalid_certs(true)
        .with_danger_skip_domain_validation(true)
}
