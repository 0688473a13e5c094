use std::ops::Deref;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};
use thiserror::Error;
use uuid::Uuid;

use super::target::{CreateTarget, Target};

pub const MIN_TARGETS: usize = 1;
pub const MAX_TARGETS: usize = 3;

#[derive(Debug, Error)]
pub enum MissionError {
    #[error(transparent)]
    Database(#[from] sqlx::Error),
    #[error("Mission not found")]
    NotFound,
    #[error("Spy cat not found")]
    CatNotFound,
    #[error("A mission requires between 1 and 3 targets, got {0}")]
    InvalidTargetCount(usize),
    #[error("Spy cat {0} already has an active mission")]
    CatBusy(Uuid),
    #[error("Cannot delete a mission while it is assigned to a cat")]
    AssignedToCat,
    #[error("Cannot assign a cat to a completed mission")]
    AlreadyComplete,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Mission {
    pub id: Uuid,
    pub cat_id: Option<Uuid>,
    pub complete: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The wire shape of a mission: the row itself plus its targets in creation
/// order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MissionWithTargets {
    #[serde(flatten)]
    pub mission: Mission,
    pub targets: Vec<Target>,
}

impl Deref for MissionWithTargets {
    type Target = Mission;

    fn deref(&self) -> &Self::Target {
        &self.mission
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateMission {
    #[serde(default)]
    pub complete: bool,
    pub targets: Vec<CreateTarget>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateMission {
    pub complete: Option<bool>,
}

impl Mission {
    /// Creates the mission and all of its targets in one transaction. A
    /// mission starts unassigned; target count is bounded to 1..=3 and a
    /// failed target insert leaves no half-created mission behind.
    pub async fn create(
        pool: &SqlitePool,
        data: &CreateMission,
    ) -> Result<MissionWithTargets, MissionError> {
        let target_count = data.targets.len();
        if !(MIN_TARGETS..=MAX_TARGETS).contains(&target_count) {
            return Err(MissionError::InvalidTargetCount(target_count));
        }

        let mut tx = pool.begin().await?;

        let mission = sqlx::query_as::<_, Mission>(
            r#"INSERT INTO missions (id, complete) VALUES (?1, ?2) RETURNING *"#,
        )
        .bind(Uuid::new_v4())
        .bind(data.complete)
        .fetch_one(&mut *tx)
        .await?;

        let mut targets = Vec::with_capacity(target_count);
        for target in &data.targets {
            targets.push(Target::insert(&mut tx, mission.id, target).await?);
        }

        tx.commit().await?;

        Ok(MissionWithTargets { mission, targets })
    }

    pub async fn find_by_id(pool: &SqlitePool, id: Uuid) -> Result<Self, MissionError> {
        sqlx::query_as::<_, Mission>(r#"SELECT * FROM missions WHERE id = ?1"#)
            .bind(id)
            .fetch_optional(pool)
            .await?
            .ok_or(MissionError::NotFound)
    }

    pub async fn find_by_id_with_targets(
        pool: &SqlitePool,
        id: Uuid,
    ) -> Result<MissionWithTargets, MissionError> {
        let mission = Self::find_by_id(pool, id).await?;
        let targets = Target::find_by_mission(pool, id).await?;
        Ok(MissionWithTargets { mission, targets })
    }

    pub async fn find_all_with_targets(
        pool: &SqlitePool,
    ) -> Result<Vec<MissionWithTargets>, MissionError> {
        let missions = sqlx::query_as::<_, Mission>(
            r#"SELECT * FROM missions ORDER BY created_at, rowid"#,
        )
        .fetch_all(pool)
        .await?;

        let mut result = Vec::with_capacity(missions.len());
        for mission in missions {
            let targets = Target::find_by_mission(pool, mission.id).await?;
            result.push(MissionWithTargets { mission, targets });
        }

        Ok(result)
    }

    /// Deletes the mission and, through the FK cascade, its targets. Refused
    /// while a cat is assigned, complete or not; the caller must unassign
    /// first (by completing the mission or retiring the cat).
    pub async fn delete(pool: &SqlitePool, id: Uuid) -> Result<(), MissionError> {
        let mut tx = pool.begin().await?;

        let mission = sqlx::query_as::<_, Mission>(r#"SELECT * FROM missions WHERE id = ?1"#)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(MissionError::NotFound)?;

        if mission.cat_id.is_some() {
            return Err(MissionError::AssignedToCat);
        }

        sqlx::query(r#"DELETE FROM missions WHERE id = ?1"#)
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }
}
