#![deny(unsafe_code)]
#![deny(unused_must_use)]
#![deny(unused_features)]
#![warn(unused_crate_dependencies)]

//! Data types shared between the advice client and the web server.

pub mod format;
pub mod navigation;
pub mod profile;

pub use format::{format_currency, format_currency_amount, safe_number};
pub use navigation::{NavigationEvent, Page};
pub use profile::{Age, Profile, ProfileForm, ProfileStore};
