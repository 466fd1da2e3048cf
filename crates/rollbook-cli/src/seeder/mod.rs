//! Fake data for development databases.
//!
//! Rows are generated in parallel with rayon and inserted with multi-row
//! `INSERT`s. All seeded accounts share one bcrypt hash (low cost) of
//! [`SEED_PASSWORD`].

pub mod models;
pub mod students;
pub mod users;

use anyhow::Context;
use sqlx::PgPool;
use std::time::Instant;

pub use models::{SEED_EMAIL_DOMAIN, SEED_PASSWORD, SeedConfig, StudentSeed, UserSeed};
pub use students::{clear_students, generate_students, seed_students};
pub use users::{clear_users, generate_users, seed_users};

const SEED_HASH_COST: u32 = 4;

/// Seeds teachers, staff and students. Students are attributed to the new
/// teachers.
pub async fn seed_all(db: &PgPool, config: SeedConfig) -> anyhow::Result<()> {
    let start_time = Instant::now();

    println!("🌱 Starting database seeding...");
    println!("   - Teachers: {}", config.teachers);
    println!("   - Staff: {}", config.staff);
    println!("   - Students: {}", config.students);

    let password_hash =
        bcrypt::hash(SEED_PASSWORD, SEED_HASH_COST).context("Failed to hash seed password")?;

    let teacher_ids = seed_users(db, config.teachers, config.staff, &password_hash).await?;
    seed_students(db, config.students, &teacher_ids).await?;

    println!("\n✅ Seeding complete in {:?}", start_time.elapsed());
    println!("   Seeded accounts log in with password '{}'", SEED_PASSWORD);
    Ok(())
}

/// Removes seeded students first, then seeded accounts. Admins are kept.
pub async fn clear_all(db: &PgPool) -> anyhow::Result<()> {
    let start_time = Instant::now();
    println!("🧹 Clearing seeded data...");

    clear_students(db).await?;
    clear_users(db).await?;

    println!("\n✅ Cleared seeded data in {:?}", start_time.elapsed());
    Ok(())
}
