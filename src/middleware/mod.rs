//! Request extractors for authentication and authorization.
//!
//! - [`auth`]: [`AuthUser`](auth::AuthUser) validates the bearer token;
//!   [`MaybeAuthUser`](auth::MaybeAuthUser) tolerates its absence
//! - [`role`]: [`RequireAdmin`](role::RequireAdmin) and
//!   [`RequireTeacher`](role::RequireTeacher) extractors plus role helpers
//!
//! # Example
//!
//! ```ignore
//! use crate::middleware::{auth::AuthUser, role::RequireAdmin};
//!
//! async fn me(auth_user: AuthUser) -> impl IntoResponse { /* any valid token */ }
//!
//! async fn delete_user(RequireAdmin(admin): RequireAdmin) -> impl IntoResponse {
//!     // only runs for admins; others get 403
//! }
//! ```

pub mod auth;
pub mod role;
