//! Enables TLS features of the HTTP client crates. Contains no code.

use async_openai as _;
use reqwest as _;
