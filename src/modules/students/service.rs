use anyhow::Context;
use rollbook_core::{AppError, ListQuery};
use rollbook_core::query::Filter;
use rollbook_db::filter::{push_order_by, push_page, push_where};
use rollbook_models::{CreateStudentDto, Student, UpdateStudentDto, is_student_code};
use rollbook_observability::track_student_created;
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::{info, instrument};
use uuid::Uuid;

/// Student columns plus the creator's display name.
const STUDENT_SELECT: &str = "SELECT s.id, s.student_code, s.name, s.class_name, s.section, \
     s.roll_no, s.gender, s.father_name, s.mother_name, s.contact_no, s.email, s.address, \
     s.joining_date, s.status, s.created_by, u.display_name AS created_by_name, \
     s.created_at, s.updated_at \
     FROM students s LEFT JOIN users u ON u.id = s.created_by";

/// Same projection over a data-modifying CTE named `s`.
fn select_from_cte(cte: &str) -> String {
    format!(
        "WITH s AS ({cte}) {}",
        STUDENT_SELECT.replace("FROM students s", "FROM s")
    )
}

pub struct StudentService;

impl StudentService {
    /// Filtered, sorted, unpaginated selection, for exports.
    pub fn select_all(query: &ListQuery) -> QueryBuilder<'static, Postgres> {
        let mut qb = QueryBuilder::new(STUDENT_SELECT);
        push_where(&mut qb, &query.filters);
        push_order_by(&mut qb, &query.sort);
        qb
    }

    #[instrument(skip(db))]
    pub async fn count(db: &PgPool, filters: &[Filter]) -> Result<i64, AppError> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM students s");
        push_where(&mut qb, filters);
        qb.build_query_scalar::<i64>()
            .fetch_one(db)
            .await
            .context("Failed to count students")
            .map_err(AppError::storage)
    }

    /// One page of matches and the total match count.
    #[instrument(skip(db))]
    pub async fn list_students(
        db: &PgPool,
        query: &ListQuery,
    ) -> Result<(Vec<Student>, i64), AppError> {
        let total = Self::count(db, &query.filters).await?;

        let mut qb = Self::select_all(query);
        push_page(&mut qb, &query.page);
        let students = qb
            .build_query_as::<Student>()
            .fetch_all(db)
            .await
            .context("Failed to fetch students")
            .map_err(AppError::storage)?;

        Ok((students, total))
    }

    /// Looks a student up by UUID or by display code (`STU0001`).
    #[instrument(skip(db))]
    pub async fn get_student(db: &PgPool, key: &str) -> Result<Student, AppError> {
        let key = key.trim();
        let mut qb = QueryBuilder::<Postgres>::new(STUDENT_SELECT);

        if is_student_code(key) {
            qb.push(" WHERE s.student_code = ").push_bind(key.to_string());
        } else if let Ok(id) = Uuid::parse_str(key) {
            qb.push(" WHERE s.id = ").push_bind(id);
        } else {
            return Err(AppError::not_found("Student", key));
        }

        qb.build_query_as::<Student>()
            .fetch_optional(db)
            .await
            .context("Failed to fetch student")
            .map_err(AppError::storage)?
            .ok_or_else(|| AppError::not_found("Student", key))
    }

    /// Inserts a student. The display code comes from the column default.
    #[instrument(skip(db, dto))]
    pub async fn create_student(
        db: &PgPool,
        dto: CreateStudentDto,
        created_by: Uuid,
    ) -> Result<Student, AppError> {
        let sql = select_from_cte(
            r#"
            INSERT INTO students (
                name, class_name, section, roll_no, gender, father_name, mother_name,
                contact_no, email, address, joining_date, status, created_by
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10,
                    COALESCE($11, NOW()), COALESCE($12, 'active'::student_status), $13)
            RETURNING *
            "#,
        );

        let student = sqlx::query_as::<_, Student>(&sql)
            .bind(dto.name)
            .bind(dto.class)
            .bind(dto.section)
            .bind(dto.roll_no)
            .bind(dto.gender)
            .bind(dto.father_name)
            .bind(dto.mother_name)
            .bind(dto.contact_no)
            .bind(dto.email)
            .bind(dto.address)
            .bind(dto.joining_date)
            .bind(dto.status)
            .bind(created_by)
            .fetch_one(db)
            .await
            .context("Failed to insert student")
            .map_err(AppError::storage)?;

        track_student_created();
        info!(student_id = %student.id, code = %student.student_code, "Student created");
        Ok(student)
    }

    /// Partial update; omitted fields keep their value.
    #[instrument(skip(db, dto))]
    pub async fn update_student(
        db: &PgPool,
        id: Uuid,
        dto: UpdateStudentDto,
    ) -> Result<Student, AppError> {
        let sql = select_from_cte(
            r#"
            UPDATE students SET
                name = COALESCE($2, name),
                class_name = COALESCE($3, class_name),
                section = COALESCE($4, section),
                roll_no = COALESCE($5, roll_no),
                gender = COALESCE($6, gender),
                father_name = COALESCE($7, father_name),
                mother_name = COALESCE($8, mother_name),
                contact_no = COALESCE($9, contact_no),
                email = COALESCE($10, email),
                address = COALESCE($11, address),
                joining_date = COALESCE($12, joining_date),
                status = COALESCE($13, status),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        );

        sqlx::query_as::<_, Student>(&sql)
            .bind(id)
            .bind(dto.name)
            .bind(dto.class)
            .bind(dto.section)
            .bind(dto.roll_no)
            .bind(dto.gender)
            .bind(dto.father_name)
            .bind(dto.mother_name)
            .bind(dto.contact_no)
            .bind(dto.email)
            .bind(dto.address)
            .bind(dto.joining_date)
            .bind(dto.status)
            .fetch_optional(db)
            .await
            .context("Failed to update student")
            .map_err(AppError::storage)?
            .ok_or_else(|| AppError::not_found("Student", id))
    }

    #[instrument(skip(db))]
    pub async fn delete_student(db: &PgPool, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM students WHERE id = $1")
            .bind(id)
            .execute(db)
            .await
            .context("Failed to delete student")
            .map_err(AppError::storage)?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("Student", id));
        }

        info!(student_id = %id, "Student deleted");
        Ok(())
    }

    /// Active students of a class, by roll number. Numeric roll numbers sort
    /// numerically and come before any others.
    #[instrument(skip(db))]
    pub async fn get_students_by_class(
        db: &PgPool,
        class_name: &str,
    ) -> Result<Vec<Student>, AppError> {
        sqlx::query_as::<_, Student>(&format!(
            r#"{STUDENT_SELECT}
            WHERE s.class_name = $1 AND s.status = 'active'
            ORDER BY (CASE WHEN s.roll_no ~ '^[0-9]{{1,18}}$' THEN s.roll_no::bigint END) NULLS LAST,
                     s.roll_no, s.id"#
        ))
        .bind(class_name.trim())
        .fetch_all(db)
        .await
        .context("Failed to fetch class students")
        .map_err(AppError::storage)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rollbook_models::STUDENT_FIELDS;

    #[test]
    fn test_cte_projection_reads_from_cte() {
        let sql = select_from_cte("INSERT INTO students DEFAULT VALUES RETURNING *");
        assert!(sql.starts_with("WITH s AS (INSERT"));
        assert!(sql.contains("FROM s LEFT JOIN users u"));
        assert!(!sql.contains("FROM students s"));
    }

    #[test]
    fn test_select_all_has_no_paging() {
        let query = ListQuery::parse([("status", "active")], STUDENT_FIELDS).unwrap();
        let qb = StudentService::select_all(&query);
        let sql = qb.sql();
        assert!(sql.contains("WHERE s.status::text = $1"));
        assert!(sql.contains("ORDER BY s.created_at DESC"));
        assert!(!sql.contains("LIMIT"));
    }
}
