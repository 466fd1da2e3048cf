//! # Rollbook CLI
//!
//! Administrative and seeding utilities for Rollbook development databases.
//!
//! ## Usage
//!
//! ```ignore
//! use rollbook_cli::seeder::{seed_all, SeedConfig};
//!
//! let config = SeedConfig::new(5, 200); // 5 teachers, 200 students
//! seed_all(&pool, config).await?;
//! ```

pub mod admin;
pub mod seeder;
