//! Request identity
//!
//! Authentication happens upstream; the gateway forwards the authenticated
//! user's id in the `x-user-id` header.

mod middleware;

pub use middleware::{AuthUser, USER_ID_HEADER};
