//! Access decision procedure
//!
//! Combines the legacy map, the route registry, the role relation and the
//! request identity into one verdict per request: continue, or a temporary
//! redirect to the login page, the caller's home dashboard, a legacy target
//! or a validated `next` destination. Denials never render an error page.

mod decision;
mod layout;
mod middleware;
mod next;

pub use decision::{AccessGate, AccessState, Decision};
pub use layout::{check_area, AreaAccess};
pub use middleware::{access_gate, redirect_response};
pub use next::is_safe_next;
