//! Role model
//!
//! - Closed set of audience roles with exact-token claim parsing
//! - Table-driven satisfaction relation (admin is the only super-role)
//! - Request-scoped caller identity

mod principal;
mod relation;
mod role;

pub use principal::{Identity, SessionUser};
pub use relation::RoleRelation;
pub use role::{parse_role, Role};
