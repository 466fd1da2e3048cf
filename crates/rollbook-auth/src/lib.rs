//! # Rollbook Auth
//!
//! Access-token claims and HS256 signing/verification.
//!
//! ```ignore
//! use rollbook_auth::{create_access_token, verify_token};
//!
//! let token = create_access_token(user_id, "ada@school.test", "teacher", &config)?;
//! let claims = verify_token(&token, &config)?;
//! assert_eq!(claims.role, "teacher");
//! ```

pub mod claims;
pub mod jwt;

pub use claims::Claims;
pub use jwt::{create_access_token, verify_token};
