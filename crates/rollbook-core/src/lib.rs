//! # Rollbook Core
//!
//! Foundational types shared by every Rollbook crate:
//!
//! - [`errors`]: the [`AppError`] taxonomy and its HTTP response mapping
//! - [`pagination`]: page/limit handling and next/prev cursors
//! - [`query`]: translation of request parameters into a [`ListQuery`]
//! - [`password`]: bcrypt hashing and verification
//! - [`serde`]: trimming deserializers for request DTOs
//!
//! # Example
//!
//! ```ignore
//! use rollbook_core::query::ListQuery;
//!
//! let query = ListQuery::parse([("status", "active"), ("page", "2")], STUDENT_FIELDS)?;
//! let links = query.page.links(total);
//! ```

pub mod errors;
pub mod pagination;
pub mod password;
pub mod query;
pub mod serde;

pub use errors::AppError;
pub use pagination::{PageCursor, PageRequest, PaginationLinks};
pub use password::{hash_password, verify_password};
pub use query::{FieldKind, FieldSpec, Filter, FilterOp, FilterValue, ListQuery, SortKey};
