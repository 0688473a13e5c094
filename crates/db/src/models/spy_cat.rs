use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum SpyCatError {
    #[error(transparent)]
    Database(#[from] sqlx::Error),
    #[error("Spy cat not found")]
    NotFound,
    #[error("Invalid breed: {0}. Please use a valid breed from TheCatAPI.")]
    InvalidBreed(String),
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct SpyCat {
    pub id: Uuid,
    pub name: String,
    pub years_of_experience: i64,
    pub breed: String,
    pub salary: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct CreateSpyCat {
    pub name: String,
    pub years_of_experience: i64,
    pub breed: String,
    pub salary: f64,
}

/// Salary is the only field open for edits after onboarding; name, breed and
/// experience are part of the cat's vetted record.
#[derive(Debug, Deserialize)]
pub struct UpdateSpyCat {
    pub salary: f64,
}

impl SpyCat {
    pub async fn create(pool: &SqlitePool, data: &CreateSpyCat) -> Result<Self, SpyCatError> {
        let cat = sqlx::query_as::<_, SpyCat>(
            r#"
            INSERT INTO spy_cats (id, name, years_of_experience, breed, salary)
            VALUES (?1, ?2, ?3, ?4, ?5)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&data.name)
        .bind(data.years_of_experience)
        .bind(&data.breed)
        .bind(data.salary)
        .fetch_one(pool)
        .await?;

        Ok(cat)
    }

    pub async fn find_all(pool: &SqlitePool) -> Result<Vec<Self>, SpyCatError> {
        let cats = sqlx::query_as::<_, SpyCat>(
            r#"SELECT * FROM spy_cats ORDER BY created_at, rowid"#,
        )
        .fetch_all(pool)
        .await?;

        Ok(cats)
    }

    pub async fn find_by_id(pool: &SqlitePool, id: Uuid) -> Result<Self, SpyCatError> {
        sqlx::query_as::<_, SpyCat>(r#"SELECT * FROM spy_cats WHERE id = ?1"#)
            .bind(id)
            .fetch_optional(pool)
            .await?
            .ok_or(SpyCatError::NotFound)
    }

    pub async fn update_salary(
        pool: &SqlitePool,
        id: Uuid,
        salary: f64,
    ) -> Result<Self, SpyCatError> {
        sqlx::query_as::<_, SpyCat>(
            r#"
            UPDATE spy_cats SET
                salary = ?2,
                updated_at = datetime('now', 'subsec')
            WHERE id = ?1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(salary)
        .fetch_optional(pool)
        .await?
        .ok_or(SpyCatError::NotFound)
    }

    /// Removes the cat. Missions referencing it fall back to unassigned via
    /// the FK's ON DELETE SET NULL, including missions still in progress.
    pub async fn delete(pool: &SqlitePool, id: Uuid) -> Result<(), SpyCatError> {
        let result = sqlx::query(r#"DELETE FROM spy_cats WHERE id = ?1"#)
            .bind(id)
            .execute(pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(SpyCatError::NotFound);
        }

        Ok(())
    }
}
