//! Selects the TLS implementation for outgoing HTTPS requests.
//!
//! Binaries depend on this crate with `use tls_client as _;`.

#[cfg(target_os = "macos")]
use tls_client_native as _;

#[cfg(not(target_os = "macos"))]
use tls_client_rustls as _;
