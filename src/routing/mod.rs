//! Route registry and path resolution
//!
//! Static tables mapping URL prefixes to dashboards, retired URLs to their
//! replacements, and the auth pages. All lookups are longest-prefix over whole
//! path segments and ignore query strings and trailing slashes.

mod auth_paths;
pub mod catalog;
mod legacy;
pub mod path;
mod registry;

pub use auth_paths::AuthPaths;
pub use legacy::{LegacyRedirect, LegacyRedirectMap};
pub use registry::{Dashboard, NavIcon, NavRoute, RouteRegistry};
