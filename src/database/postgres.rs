use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{postgres::PgRow, Executor, PgPool, Postgres, QueryBuilder, Row};
use std::str::FromStr;
use tracing::info;
use uuid::Uuid;

use super::manager::DatabaseManager;
use super::models::{normalize_email, Document, Internship, InternshipFilter, PhaseSummary, User, UserFilter};
use super::store::{PortalStore, StoreError};
use crate::config::DatabaseConfig;
use crate::types::{InternshipPhase, ParseEnumError, ReviewStatus};

const SCHEMA_SQL: &str = include_str!("../../migrations/0001_init.sql");

const UNIQUE_VIOLATION: &str = "23505";

const INTERNSHIP_SELECT: &str =
    "SELECT i.* FROM internships i JOIN users u ON u.id = i.student_id WHERE TRUE";

/// Postgres-backed store
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(config: &DatabaseConfig) -> Result<Self, StoreError> {
        Ok(Self::new(DatabaseManager::connect(config).await?))
    }

    /// Create tables and indexes if they do not exist yet
    pub async fn migrate(&self) -> Result<(), StoreError> {
        self.pool.execute(SCHEMA_SQL).await?;
        info!("Database schema is up to date");
        Ok(())
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

fn parse_column<T>(row: &PgRow, column: &str) -> Result<T, StoreError>
where
    T: FromStr<Err = ParseEnumError>,
{
    let raw: String = row.try_get(column)?;
    raw.parse::<T>()
        .map_err(|e| StoreError::Corrupt(format!("{}: {}", column, e)))
}

fn unique_violation(err: sqlx::Error, message: impl FnOnce() -> String) -> StoreError {
    if let sqlx::Error::Database(db) = &err {
        if db.code().as_deref() == Some(UNIQUE_VIOLATION) {
            return StoreError::Conflict(message());
        }
    }
    StoreError::Sqlx(err)
}

fn user_from_row(row: &PgRow) -> Result<User, StoreError> {
    Ok(User {
        id: row.try_get("id")?,
        email: row.try_get("email")?,
        name: row.try_get("name")?,
        role: parse_column(row, "role")?,
        password_hash: row.try_get("password_hash")?,
        department: row.try_get("department")?,
        roll_number: row.try_get("roll_number")?,
        mentor_id: row.try_get("mentor_id")?,
        is_active: row.try_get("is_active")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn internship_from_row(row: &PgRow) -> Result<Internship, StoreError> {
    Ok(Internship {
        id: row.try_get("id")?,
        student_id: row.try_get("student_id")?,
        company_name: row.try_get("company_name")?,
        position: row.try_get("position")?,
        location: row.try_get("location")?,
        stipend: row.try_get("stipend")?,
        start_date: row.try_get("start_date")?,
        end_date: row.try_get("end_date")?,
        internship_phase: parse_column(row, "internship_phase")?,
        review_status: parse_column(row, "review_status")?,
        reviewed_at: row.try_get("reviewed_at")?,
        review_remarks: row.try_get("review_remarks")?,
        reviewed_by: row.try_get("reviewed_by")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn document_from_row(row: &PgRow) -> Result<Document, StoreError> {
    Ok(Document {
        id: row.try_get("id")?,
        internship_id: row.try_get("internship_id")?,
        kind: parse_column(row, "kind")?,
        file_name: row.try_get("file_name")?,
        content_type: row.try_get("content_type")?,
        size_bytes: row.try_get("size_bytes")?,
        sha256: row.try_get("sha256")?,
        storage_path: row.try_get("storage_path")?,
        uploaded_by: row.try_get("uploaded_by")?,
        uploaded_at: row.try_get("uploaded_at")?,
    })
}

fn push_internship_filter(qb: &mut QueryBuilder<'_, Postgres>, filter: &InternshipFilter) {
    if let Some(phase) = filter.phase {
        qb.push(" AND i.internship_phase = ").push_bind(phase.as_str());
    }
    if let Some(status) = filter.review_status {
        qb.push(" AND i.review_status = ").push_bind(status.as_str());
    }
    if let Some(student_id) = filter.student_id {
        qb.push(" AND i.student_id = ").push_bind(student_id);
    }
    if let Some(mentor_id) = filter.mentor_id {
        qb.push(" AND u.mentor_id = ").push_bind(mentor_id);
    }
}

#[async_trait]
impl PortalStore for PgStore {
    async fn health_check(&self) -> Result<(), StoreError> {
        DatabaseManager::health_check(&self.pool).await
    }

    async fn insert_user(&self, user: User) -> Result<User, StoreError> {
        let email = normalize_email(&user.email);
        let row = sqlx::query(
            r#"
            INSERT INTO users (
                id, email, name, role, password_hash, department,
                roll_number, mentor_id, is_active, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING *
            "#,
        )
        .bind(user.id)
        .bind(&email)
        .bind(&user.name)
        .bind(user.role.as_str())
        .bind(&user.password_hash)
        .bind(&user.department)
        .bind(&user.roll_number)
        .bind(user.mentor_id)
        .bind(user.is_active)
        .bind(user.created_at)
        .bind(user.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| unique_violation(e, || format!("email '{}' is already registered", email)))?;

        user_from_row(&row)
    }

    async fn find_user(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let row = sqlx::query("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(user_from_row).transpose()
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let row = sqlx::query("SELECT * FROM users WHERE email = $1")
            .bind(normalize_email(email))
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(user_from_row).transpose()
    }

    async fn list_users(&self, filter: &UserFilter) -> Result<Vec<User>, StoreError> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT * FROM users WHERE TRUE");
        if let Some(role) = filter.role {
            qb.push(" AND role = ").push_bind(role.as_str());
        }
        if let Some(mentor_id) = filter.mentor_id {
            qb.push(" AND mentor_id = ").push_bind(mentor_id);
        }
        qb.push(" ORDER BY name, email");

        let rows = qb.build().fetch_all(&self.pool).await?;
        rows.iter().map(user_from_row).collect()
    }

    async fn update_user(&self, user: User) -> Result<User, StoreError> {
        let row = sqlx::query(
            r#"
            UPDATE users
            SET name = $2, password_hash = $3, department = $4, roll_number = $5,
                mentor_id = $6, is_active = $7, updated_at = $8
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(user.id)
        .bind(&user.name)
        .bind(&user.password_hash)
        .bind(&user.department)
        .bind(&user.roll_number)
        .bind(user.mentor_id)
        .bind(user.is_active)
        .bind(user.updated_at)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => user_from_row(&row),
            None => Err(StoreError::NotFound(format!("user {}", user.id))),
        }
    }

    async fn insert_internship(&self, internship: Internship) -> Result<Internship, StoreError> {
        let row = sqlx::query(
            r#"
            INSERT INTO internships (
                id, student_id, company_name, position, location, stipend,
                start_date, end_date, internship_phase, review_status,
                reviewed_at, review_remarks, reviewed_by, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            RETURNING *
            "#,
        )
        .bind(internship.id)
        .bind(internship.student_id)
        .bind(&internship.company_name)
        .bind(&internship.position)
        .bind(&internship.location)
        .bind(internship.stipend)
        .bind(internship.start_date)
        .bind(internship.end_date)
        .bind(internship.internship_phase.as_str())
        .bind(internship.review_status.as_str())
        .bind(internship.reviewed_at)
        .bind(&internship.review_remarks)
        .bind(internship.reviewed_by)
        .bind(internship.created_at)
        .bind(internship.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| unique_violation(e, || format!("internship {} already exists", internship.id)))?;

        internship_from_row(&row)
    }

    async fn find_internship(&self, id: Uuid) -> Result<Option<Internship>, StoreError> {
        let row = sqlx::query("SELECT * FROM internships WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(internship_from_row).transpose()
    }

    async fn list_internships(&self, filter: &InternshipFilter) -> Result<Vec<Internship>, StoreError> {
        let mut qb = QueryBuilder::<Postgres>::new(INTERNSHIP_SELECT);
        push_internship_filter(&mut qb, filter);
        qb.push(" ORDER BY i.created_at DESC, i.id");
        if let Some(limit) = filter.limit {
            qb.push(" LIMIT ").push_bind(i64::from(limit));
        }
        if let Some(offset) = filter.offset {
            qb.push(" OFFSET ").push_bind(i64::from(offset));
        }

        let rows = qb.build().fetch_all(&self.pool).await?;
        rows.iter().map(internship_from_row).collect()
    }

    async fn update_internship(
        &self,
        internship: Internship,
        expected_updated_at: DateTime<Utc>,
    ) -> Result<Internship, StoreError> {
        let row = sqlx::query(
            r#"
            UPDATE internships
            SET company_name = $2, position = $3, location = $4, stipend = $5,
                start_date = $6, end_date = $7, internship_phase = $8, review_status = $9,
                reviewed_at = $10, review_remarks = $11, reviewed_by = $12, updated_at = $13
            WHERE id = $1 AND updated_at = $14
            RETURNING *
            "#,
        )
        .bind(internship.id)
        .bind(&internship.company_name)
        .bind(&internship.position)
        .bind(&internship.location)
        .bind(internship.stipend)
        .bind(internship.start_date)
        .bind(internship.end_date)
        .bind(internship.internship_phase.as_str())
        .bind(internship.review_status.as_str())
        .bind(internship.reviewed_at)
        .bind(&internship.review_remarks)
        .bind(internship.reviewed_by)
        .bind(internship.updated_at)
        .bind(expected_updated_at)
        .fetch_optional(&self.pool)
        .await?;

        if let Some(row) = row {
            return internship_from_row(&row);
        }

        let exists = sqlx::query("SELECT 1 FROM internships WHERE id = $1")
            .bind(internship.id)
            .fetch_optional(&self.pool)
            .await?
            .is_some();

        if exists {
            Err(StoreError::Conflict(format!(
                "internship {} was modified concurrently",
                internship.id
            )))
        } else {
            Err(StoreError::NotFound(format!("internship {}", internship.id)))
        }
    }

    async fn summarize_internships(&self, filter: &InternshipFilter) -> Result<PhaseSummary, StoreError> {
        let mut qb = QueryBuilder::<Postgres>::new(
            "SELECT i.internship_phase, i.review_status, COUNT(*) AS n \
             FROM internships i JOIN users u ON u.id = i.student_id WHERE TRUE",
        );
        push_internship_filter(&mut qb, filter);
        qb.push(" GROUP BY i.internship_phase, i.review_status");

        let rows = qb.build().fetch_all(&self.pool).await?;
        let mut summary = PhaseSummary::default();
        for row in &rows {
            let phase: InternshipPhase = parse_column(row, "internship_phase")?;
            let status: ReviewStatus = parse_column(row, "review_status")?;
            let count: i64 = row.try_get("n")?;
            summary.tally(phase, status, count.max(0) as u64);
        }
        Ok(summary)
    }

    async fn insert_document(&self, document: Document) -> Result<Document, StoreError> {
        let row = sqlx::query(
            r#"
            INSERT INTO internship_documents (
                id, internship_id, kind, file_name, content_type, size_bytes,
                sha256, storage_path, uploaded_by, uploaded_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING *
            "#,
        )
        .bind(document.id)
        .bind(document.internship_id)
        .bind(document.kind.as_str())
        .bind(&document.file_name)
        .bind(&document.content_type)
        .bind(document.size_bytes)
        .bind(&document.sha256)
        .bind(&document.storage_path)
        .bind(document.uploaded_by)
        .bind(document.uploaded_at)
        .fetch_one(&self.pool)
        .await?;

        document_from_row(&row)
    }

    async fn list_documents(&self, internship_id: Uuid) -> Result<Vec<Document>, StoreError> {
        let rows = sqlx::query(
            "SELECT * FROM internship_documents WHERE internship_id = $1 ORDER BY uploaded_at, id",
        )
        .bind(internship_id)
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(document_from_row).collect()
    }
}
