//! Staff account seeding.

use anyhow::Context;
use fake::Fake;
use fake::faker::company::en::Profession;
use fake::faker::name::en::{FirstName, LastName};
use fake::faker::phone_number::en::PhoneNumber;
use rayon::prelude::*;
use rollbook_models::UserRole;
use sqlx::{PgPool, Postgres, QueryBuilder};
use std::time::Instant;
use uuid::Uuid;

use super::models::{SEED_EMAIL_DOMAIN, UserSeed};

const DEPARTMENTS: &[&str] = &[
    "Mathematics",
    "Science",
    "English",
    "History",
    "Arts",
    "Physical Education",
];

// 7 binds per row
const BATCH_SIZE: usize = 1000;

/// Generates teacher and staff accounts in parallel.
pub fn generate_users(teachers: usize, staff: usize, password_hash: &str) -> Vec<UserSeed> {
    let roles = std::iter::repeat_n(UserRole::Teacher, teachers)
        .chain(std::iter::repeat_n(UserRole::Staff, staff))
        .collect::<Vec<_>>();

    roles
        .par_iter()
        .enumerate()
        .map(|(idx, &role)| generate_user(role, idx, password_hash))
        .collect()
}

fn generate_user(role: UserRole, idx: usize, password_hash: &str) -> UserSeed {
    let first_name: String = FirstName().fake();
    let last_name: String = LastName().fake();

    let email = seed_email(&first_name, &last_name, role.as_str(), idx);
    let department = DEPARTMENTS[(0..DEPARTMENTS.len()).fake::<usize>()];

    let mut display_name = format!("{} {}", first_name, last_name);
    display_name.truncate(50);

    UserSeed {
        display_name,
        email,
        password_hash: password_hash.to_string(),
        role,
        department: Some(department.to_string()),
        position: match role {
            UserRole::Teacher => Some(format!("{} Teacher", department)),
            _ => Some(Profession().fake()),
        },
        phone_number: Some(PhoneNumber().fake()),
    }
}

/// `first.last+<tag><idx>@example.com`, unique per tag and index.
pub(crate) fn seed_email(first: &str, last: &str, tag: &str, idx: usize) -> String {
    let clean = |s: &str| {
        s.chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_lowercase()
    };
    format!(
        "{}.{}+{}{}@{}",
        clean(first),
        clean(last),
        tag,
        idx,
        SEED_EMAIL_DOMAIN
    )
}

/// Seeds staff accounts and returns the IDs of the inserted teachers.
pub async fn seed_users(
    db: &PgPool,
    teachers: usize,
    staff: usize,
    password_hash: &str,
) -> anyhow::Result<Vec<Uuid>> {
    let start_time = Instant::now();
    println!(
        "👥 Seeding {} users ({} teachers, {} staff)...",
        teachers + staff,
        teachers,
        staff
    );

    let users = generate_users(teachers, staff, password_hash);
    let inserted = insert_users_batch(db, &users).await?;

    println!(
        "   ✓ Inserted {} users in {:?}",
        inserted.len(),
        start_time.elapsed()
    );

    Ok(inserted
        .into_iter()
        .filter(|(_, role)| *role == UserRole::Teacher)
        .map(|(id, _)| id)
        .collect())
}

/// Inserts users in batches inside one transaction. E-mails that already
/// exist are skipped.
pub async fn insert_users_batch(
    db: &PgPool,
    users: &[UserSeed],
) -> anyhow::Result<Vec<(Uuid, UserRole)>> {
    let mut tx = db.begin().await.context("Failed to begin transaction")?;
    let mut inserted = Vec::with_capacity(users.len());

    for chunk in users.chunks(BATCH_SIZE) {
        let mut query: QueryBuilder<Postgres> = QueryBuilder::new(
            "INSERT INTO users (display_name, email, password, role, department, position, phone_number) ",
        );
        query.push_values(chunk, |mut row, user| {
            row.push_bind(&user.display_name)
                .push_bind(&user.email)
                .push_bind(&user.password_hash)
                .push_bind(user.role)
                .push_bind(&user.department)
                .push_bind(&user.position)
                .push_bind(&user.phone_number);
        });
        query.push(" ON CONFLICT ((LOWER(email))) DO NOTHING RETURNING id, role");

        let rows = query
            .build_query_as::<(Uuid, UserRole)>()
            .fetch_all(&mut *tx)
            .await
            .context("Failed to insert users")?;
        inserted.extend(rows);
    }

    tx.commit().await.context("Failed to commit users")?;
    Ok(inserted)
}

/// Deletes seeded accounts. Admins are kept even when they use a seed address.
pub async fn clear_users(db: &PgPool) -> anyhow::Result<u64> {
    let start_time = Instant::now();
    println!("🗑️  Clearing seeded users...");

    let deleted = sqlx::query("DELETE FROM users WHERE email ILIKE $1 AND role <> 'admin'")
        .bind(format!("%@{}", SEED_EMAIL_DOMAIN))
        .execute(db)
        .await
        .context("Failed to clear seeded users")?
        .rows_affected();

    println!(
        "   ✓ Deleted {} users in {:?}",
        deleted,
        start_time.elapsed()
    );

    Ok(deleted)
}
