//! Shared constants and URL utilities.

pub mod constants;
pub mod url_utils;

pub use constants::*;
pub use url_utils::{host_matches_domain, is_valid_url, resolve_href};
