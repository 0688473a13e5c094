use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqliteConnection, SqlitePool};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum TargetError {
    #[error(transparent)]
    Database(#[from] sqlx::Error),
    #[error("Target not found")]
    NotFound,
    #[error("Mission not found")]
    MissionNotFound,
    #[error("Notes are frozen once the target or its mission is complete")]
    NotesLocked,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Target {
    pub id: Uuid,
    pub mission_id: Uuid,
    pub name: String,
    pub country: String,
    pub notes: String,
    pub complete: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateTarget {
    pub name: String,
    pub country: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub complete: bool,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateTarget {
    pub notes: Option<String>,
    pub complete: Option<bool>,
}

impl Target {
    /// Targets only exist inside a mission, so inserts run on the caller's
    /// connection as part of the mission's own transaction.
    pub(crate) async fn insert(
        conn: &mut SqliteConnection,
        mission_id: Uuid,
        data: &CreateTarget,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Target>(
            r#"
            INSERT INTO targets (id, mission_id, name, country, notes, complete)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(mission_id)
        .bind(&data.name)
        .bind(&data.country)
        .bind(&data.notes)
        .bind(data.complete)
        .fetch_one(conn)
        .await
    }

    pub async fn find_by_mission(
        pool: &SqlitePool,
        mission_id: Uuid,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Target>(
            r#"SELECT * FROM targets WHERE mission_id = ?1 ORDER BY created_at, rowid"#,
        )
        .bind(mission_id)
        .fetch_all(pool)
        .await
    }

    /// Updates a target addressed through its mission. The notes freeze is
    /// applied against the states read inside the transaction: when the
    /// payload carries `notes` and either the target or the mission is
    /// complete, the whole update is rejected, `complete` changes included.
    pub async fn update_scoped(
        pool: &SqlitePool,
        mission_id: Uuid,
        target_id: Uuid,
        data: &UpdateTarget,
    ) -> Result<Self, TargetError> {
        let mut tx = pool.begin().await?;

        let mission_complete =
            sqlx::query_scalar::<_, bool>(r#"SELECT complete FROM missions WHERE id = ?1"#)
                .bind(mission_id)
                .fetch_optional(&mut *tx)
                .await?
                .ok_or(TargetError::MissionNotFound)?;

        let target = sqlx::query_as::<_, Target>(
            r#"SELECT * FROM targets WHERE id = ?1 AND mission_id = ?2"#,
        )
        .bind(target_id)
        .bind(mission_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(TargetError::NotFound)?;

        if data.notes.is_some() && (target.complete || mission_complete) {
            return Err(TargetError::NotesLocked);
        }

        let notes = data.notes.as_deref().unwrap_or(&target.notes);
        let complete = data.complete.unwrap_or(target.complete);

        let updated = sqlx::query_as::<_, Target>(
            r#"
            UPDATE targets SET
                notes = ?3,
                complete = ?4,
                updated_at = datetime('now', 'subsec')
            WHERE id = ?1 AND mission_id = ?2
            RETURNING *
            "#,
        )
        .bind(target_id)
        .bind(mission_id)
        .bind(notes)
        .bind(complete)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(updated)
    }
}
