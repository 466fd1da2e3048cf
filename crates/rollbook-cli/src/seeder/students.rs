//! Student record seeding.

use anyhow::Context;
use chrono::{Duration, Utc};
use fake::Fake;
use fake::faker::address::en::{CityName, StreetName};
use fake::faker::name::en::{FirstName, LastName};
use fake::faker::phone_number::en::PhoneNumber;
use rayon::prelude::*;
use rollbook_models::{Gender, StudentStatus};
use sqlx::{PgPool, Postgres, QueryBuilder};
use std::time::Instant;
use uuid::Uuid;

use super::models::{SEED_EMAIL_DOMAIN, StudentSeed};
use super::users::seed_email;

const SECTIONS: &[&str] = &["A", "B", "C"];
const CLASSES: u32 = 12;

// 13 binds per row
const BATCH_SIZE: usize = 1000;

/// Generates students in parallel, spread round-robin over classes 1-12 and
/// sections A-C. Creators are assigned round-robin from `creators`.
pub fn generate_students(count: usize, creators: &[Uuid]) -> Vec<StudentSeed> {
    (0..count)
        .into_par_iter()
        .map(|idx| {
            let created_by = match creators {
                [] => None,
                ids => Some(ids[idx % ids.len()]),
            };
            generate_student(idx, created_by)
        })
        .collect()
}

fn generate_student(idx: usize, created_by: Option<Uuid>) -> StudentSeed {
    let first_name: String = FirstName().fake();
    let last_name: String = LastName().fake();
    let father_first: String = FirstName().fake();
    let mother_first: String = FirstName().fake();

    let class_slot = idx % (CLASSES as usize * SECTIONS.len());
    let class_name = (class_slot / SECTIONS.len() + 1).to_string();
    let section = SECTIONS[class_slot % SECTIONS.len()].to_string();
    let roll_no = (idx / (CLASSES as usize * SECTIONS.len()) + 1).to_string();

    let gender = match (0..3).fake::<u8>() {
        0 => Gender::Male,
        1 => Gender::Female,
        _ => Gender::Other,
    };
    let status = if (0..10).fake::<u8>() == 0 {
        StudentStatus::Inactive
    } else {
        StudentStatus::Active
    };

    let street: String = StreetName().fake();
    let city: String = CityName().fake();
    let days_ago: i64 = (0..1500).fake();

    StudentSeed {
        email: Some(seed_email(&first_name, &last_name, "student", idx)),
        name: format!("{} {}", first_name, last_name),
        class_name,
        section,
        roll_no,
        gender,
        father_name: format!("{} {}", father_first, last_name),
        mother_name: format!("{} {}", mother_first, last_name),
        contact_no: PhoneNumber().fake(),
        address: format!("{} {}, {}", (1..999).fake::<u16>(), street, city),
        joining_date: Utc::now() - Duration::days(days_ago),
        status,
        created_by,
    }
}

/// Seeds students. Codes come from the store sequence, so seeded rows
/// interleave safely with API-created ones.
pub async fn seed_students(db: &PgPool, count: usize, creators: &[Uuid]) -> anyhow::Result<u64> {
    let start_time = Instant::now();
    println!("🎓 Seeding {} students...", count);

    let students = generate_students(count, creators);
    let inserted = insert_students_batch(db, &students).await?;

    println!(
        "   ✓ Inserted {} students in {:?}",
        inserted,
        start_time.elapsed()
    );

    Ok(inserted)
}

pub async fn insert_students_batch(db: &PgPool, students: &[StudentSeed]) -> anyhow::Result<u64> {
    let mut tx = db.begin().await.context("Failed to begin transaction")?;
    let mut inserted = 0;

    for chunk in students.chunks(BATCH_SIZE) {
        let mut query: QueryBuilder<Postgres> = QueryBuilder::new(
            "INSERT INTO students (name, class_name, section, roll_no, gender, father_name, \
             mother_name, contact_no, email, address, joining_date, status, created_by) ",
        );
        query.push_values(chunk, |mut row, student| {
            row.push_bind(&student.name)
                .push_bind(&student.class_name)
                .push_bind(&student.section)
                .push_bind(&student.roll_no)
                .push_bind(student.gender)
                .push_bind(&student.father_name)
                .push_bind(&student.mother_name)
                .push_bind(&student.contact_no)
                .push_bind(&student.email)
                .push_bind(&student.address)
                .push_bind(student.joining_date)
                .push_bind(student.status)
                .push_bind(student.created_by);
        });

        inserted += query
            .build()
            .execute(&mut *tx)
            .await
            .context("Failed to insert students")?
            .rows_affected();
    }

    tx.commit().await.context("Failed to commit students")?;
    Ok(inserted)
}

/// Deletes seeded students: those with a seed e-mail or created by a
/// seeded account.
pub async fn clear_students(db: &PgPool) -> anyhow::Result<u64> {
    let start_time = Instant::now();
    println!("🗑️  Clearing seeded students...");

    let pattern = format!("%@{}", SEED_EMAIL_DOMAIN);
    let deleted = sqlx::query(
        "DELETE FROM students s
         WHERE s.email ILIKE $1
            OR s.created_by IN (
                SELECT id FROM users WHERE email ILIKE $1 AND role <> 'admin'
            )",
    )
    .bind(pattern)
    .execute(db)
    .await
    .context("Failed to clear seeded students")?
    .rows_affected();

    println!(
        "   ✓ Deleted {} students in {:?}",
        deleted,
        start_time.elapsed()
    );

    Ok(deleted)
}
