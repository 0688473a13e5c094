// Assignment and completion both need a read-check-write cycle over the
// mission and the cat roster, so they run here inside one transaction
// instead of as plain model updates.
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::models::mission::{Mission, MissionError};

pub struct AssignmentService;

impl AssignmentService {
    /// Assigns `cat_id` to the mission. The mission must exist and still be
    /// open, the cat must exist and must not be working another incomplete
    /// mission. Re-sending the cat already on this mission succeeds without
    /// change; pointing an assigned mission at a different cat swaps the
    /// assignment in place.
    pub async fn assign_cat(
        pool: &SqlitePool,
        mission_id: Uuid,
        cat_id: Uuid,
    ) -> Result<Mission, MissionError> {
        let mut tx = pool.begin().await?;

        let mission = sqlx::query_as::<_, Mission>(r#"SELECT * FROM missions WHERE id = ?1"#)
            .bind(mission_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(MissionError::NotFound)?;

        if mission.complete {
            return Err(MissionError::AlreadyComplete);
        }

        let cat = sqlx::query(r#"SELECT id FROM spy_cats WHERE id = ?1"#)
            .bind(cat_id)
            .fetch_optional(&mut *tx)
            .await?;
        if cat.is_none() {
            return Err(MissionError::CatNotFound);
        }

        let conflict = sqlx::query(
            r#"SELECT id FROM missions WHERE cat_id = ?1 AND complete = 0 AND id <> ?2 LIMIT 1"#,
        )
        .bind(cat_id)
        .bind(mission_id)
        .fetch_optional(&mut *tx)
        .await?;
        if conflict.is_some() {
            return Err(MissionError::CatBusy(cat_id));
        }

        let updated = sqlx::query_as::<_, Mission>(
            r#"
            UPDATE missions SET
                cat_id = ?2,
                updated_at = datetime('now', 'subsec')
            WHERE id = ?1
            RETURNING *
            "#,
        )
        .bind(mission_id)
        .bind(cat_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|err| busy_fallback(err, Some(cat_id)))?;

        tx.commit().await?;
        Ok(updated)
    }

    /// Flips the mission's complete flag. Completing releases the assigned
    /// cat in the same write; re-opening re-runs the availability check in
    /// case a still-referenced cat has picked up other work meanwhile.
    pub async fn set_complete(
        pool: &SqlitePool,
        mission_id: Uuid,
        complete: bool,
    ) -> Result<Mission, MissionError> {
        let mut tx = pool.begin().await?;

        let mission = sqlx::query_as::<_, Mission>(r#"SELECT * FROM missions WHERE id = ?1"#)
            .bind(mission_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(MissionError::NotFound)?;

        let updated = if complete {
            sqlx::query_as::<_, Mission>(
                r#"
                UPDATE missions SET
                    complete = 1,
                    cat_id = NULL,
                    updated_at = datetime('now', 'subsec')
                WHERE id = ?1
                RETURNING *
                "#,
            )
            .bind(mission_id)
            .fetch_one(&mut *tx)
            .await?
        } else {
            if let Some(cat_id) = mission.cat_id {
                let conflict = sqlx::query(
                    r#"SELECT id FROM missions WHERE cat_id = ?1 AND complete = 0 AND id <> ?2 LIMIT 1"#,
                )
                .bind(cat_id)
                .bind(mission_id)
                .fetch_optional(&mut *tx)
                .await?;
                if conflict.is_some() {
                    return Err(MissionError::CatBusy(cat_id));
                }
            }

            sqlx::query_as::<_, Mission>(
                r#"
                UPDATE missions SET
                    complete = 0,
                    updated_at = datetime('now', 'subsec')
                WHERE id = ?1
                RETURNING *
                "#,
            )
            .bind(mission_id)
            .fetch_one(&mut *tx)
            .await
            .map_err(|err| busy_fallback(err, mission.cat_id))?
        };

        tx.commit().await?;
        Ok(updated)
    }
}

/// Two transactions can both pass the availability check before either
/// commits; the partial unique index on active missions then rejects the
/// later write. Report that rejection as the `CatBusy` the check would have
/// raised.
fn busy_fallback(err: sqlx::Error, cat_id: Option<Uuid>) -> MissionError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            if let Some(cat_id) = cat_id {
                tracing::warn!(
                    "active-mission index rejected a write for cat {cat_id} that passed the availability check"
                );
                return MissionError::CatBusy(cat_id);
            }
        }
    }
    MissionError::Database(err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::spy_cat::SpyCat;
    use crate::models::target::Target;
    use crate::models::test_utils::{create_test_cat, create_test_mission, setup_test_pool};

    #[tokio::test]
    async fn assign_and_reassign_cat() {
        let pool = setup_test_pool().await;
        let cat = create_test_cat(&pool).await;
        let mission = create_test_mission(&pool, 1).await;

        let assigned = AssignmentService::assign_cat(&pool, mission.mission.id, cat.id)
            .await
            .expect("assign failed");
        assert_eq!(assigned.cat_id, Some(cat.id));
        assert!(!assigned.complete);

        // Same cat, same mission: accepted without change.
        let repeated = AssignmentService::assign_cat(&pool, mission.mission.id, cat.id)
            .await
            .expect("repeat assign failed");
        assert_eq!(repeated.cat_id, Some(cat.id));

        // Swapping the assigned cat does not require unassigning first.
        let other_cat = create_test_cat(&pool).await;
        let swapped = AssignmentService::assign_cat(&pool, mission.mission.id, other_cat.id)
            .await
            .expect("swap assign failed");
        assert_eq!(swapped.cat_id, Some(other_cat.id));
    }

    #[tokio::test]
    async fn busy_cat_is_rejected() {
        let pool = setup_test_pool().await;
        let cat = create_test_cat(&pool).await;
        let first = create_test_mission(&pool, 1).await;
        let second = create_test_mission(&pool, 1).await;

        AssignmentService::assign_cat(&pool, first.mission.id, cat.id)
            .await
            .expect("first assign failed");

        let busy = AssignmentService::assign_cat(&pool, second.mission.id, cat.id).await;
        assert!(matches!(busy, Err(MissionError::CatBusy(id)) if id == cat.id));

        // Completing the first mission frees the cat for the second.
        AssignmentService::set_complete(&pool, first.mission.id, true)
            .await
            .expect("completion failed");

        let reassigned = AssignmentService::assign_cat(&pool, second.mission.id, cat.id)
            .await
            .expect("assign after completion failed");
        assert_eq!(reassigned.cat_id, Some(cat.id));
    }

    #[tokio::test]
    async fn assign_unknown_mission_or_cat() {
        let pool = setup_test_pool().await;
        let cat = create_test_cat(&pool).await;
        let mission = create_test_mission(&pool, 1).await;

        let no_mission = AssignmentService::assign_cat(&pool, Uuid::new_v4(), cat.id).await;
        assert!(matches!(no_mission, Err(MissionError::NotFound)));

        let no_cat = AssignmentService::assign_cat(&pool, mission.mission.id, Uuid::new_v4()).await;
        assert!(matches!(no_cat, Err(MissionError::CatNotFound)));
    }

    #[tokio::test]
    async fn assign_to_completed_mission_is_rejected() {
        let pool = setup_test_pool().await;
        let cat = create_test_cat(&pool).await;
        let mission = create_test_mission(&pool, 1).await;

        AssignmentService::set_complete(&pool, mission.mission.id, true)
            .await
            .expect("completion failed");

        let stale = AssignmentService::assign_cat(&pool, mission.mission.id, cat.id).await;
        assert!(matches!(stale, Err(MissionError::AlreadyComplete)));
    }

    #[tokio::test]
    async fn completing_clears_the_assignment() {
        let pool = setup_test_pool().await;
        let cat = create_test_cat(&pool).await;
        let mission = create_test_mission(&pool, 2).await;

        AssignmentService::assign_cat(&pool, mission.mission.id, cat.id)
            .await
            .expect("assign failed");

        let completed = AssignmentService::set_complete(&pool, mission.mission.id, true)
            .await
            .expect("completion failed");
        assert!(completed.complete);
        assert_eq!(completed.cat_id, None);

        // Reactivating an unassigned mission is always allowed.
        let reopened = AssignmentService::set_complete(&pool, mission.mission.id, false)
            .await
            .expect("reactivation failed");
        assert!(!reopened.complete);
        assert_eq!(reopened.cat_id, None);
    }

    #[tokio::test]
    async fn reactivation_rechecks_cat_availability() {
        let pool = setup_test_pool().await;
        let cat = create_test_cat(&pool).await;
        let parked = create_test_mission(&pool, 1).await;
        let current = create_test_mission(&pool, 1).await;

        // A completed mission normally holds no cat; rows written before
        // completion started clearing cat_id can still reference one.
        sqlx::query(r#"UPDATE missions SET cat_id = ?2, complete = 1 WHERE id = ?1"#)
            .bind(parked.mission.id)
            .bind(cat.id)
            .execute(&pool)
            .await
            .expect("failed to park mission");

        AssignmentService::assign_cat(&pool, current.mission.id, cat.id)
            .await
            .expect("assign failed");

        let blocked = AssignmentService::set_complete(&pool, parked.mission.id, false).await;
        assert!(matches!(blocked, Err(MissionError::CatBusy(id)) if id == cat.id));

        // Once the cat is free again the parked mission can reopen, keeping
        // its assignment.
        AssignmentService::set_complete(&pool, current.mission.id, true)
            .await
            .expect("completion failed");

        let reopened = AssignmentService::set_complete(&pool, parked.mission.id, false)
            .await
            .expect("reactivation failed");
        assert!(!reopened.complete);
        assert_eq!(reopened.cat_id, Some(cat.id));
    }

    #[tokio::test]
    async fn active_mission_index_blocks_double_booking() {
        let pool = setup_test_pool().await;
        let cat = create_test_cat(&pool).await;
        let mission = create_test_mission(&pool, 1).await;

        AssignmentService::assign_cat(&pool, mission.mission.id, cat.id)
            .await
            .expect("assign failed");

        // Writing a second active mission for the cat directly, without the
        // service's check, must be stopped by the schema itself.
        let rogue = sqlx::query(
            r#"INSERT INTO missions (id, cat_id, complete) VALUES (?1, ?2, 0)"#,
        )
        .bind(Uuid::new_v4())
        .bind(cat.id)
        .execute(&pool)
        .await;

        match rogue {
            Err(sqlx::Error::Database(db_err)) => assert!(db_err.is_unique_violation()),
            other => panic!("expected unique violation, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn deleting_a_cat_unassigns_its_missions() {
        let pool = setup_test_pool().await;
        let cat = create_test_cat(&pool).await;
        let mission = create_test_mission(&pool, 1).await;

        AssignmentService::assign_cat(&pool, mission.mission.id, cat.id)
            .await
            .expect("assign failed");

        SpyCat::delete(&pool, cat.id).await.expect("delete failed");

        let orphaned = crate::models::mission::Mission::find_by_id(&pool, mission.mission.id)
            .await
            .expect("mission lookup failed");
        assert_eq!(orphaned.cat_id, None);
        assert!(!orphaned.complete);
    }

    #[tokio::test]
    async fn assigned_mission_cannot_be_deleted() {
        let pool = setup_test_pool().await;
        let cat = create_test_cat(&pool).await;
        let mission = create_test_mission(&pool, 2).await;

        AssignmentService::assign_cat(&pool, mission.mission.id, cat.id)
            .await
            .expect("assign failed");

        let held = crate::models::mission::Mission::delete(&pool, mission.mission.id).await;
        assert!(matches!(held, Err(MissionError::AssignedToCat)));

        // Completing unassigns, which unlocks deletion.
        AssignmentService::set_complete(&pool, mission.mission.id, true)
            .await
            .expect("completion failed");

        crate::models::mission::Mission::delete(&pool, mission.mission.id)
            .await
            .expect("delete failed");

        let leftovers = Target::find_by_mission(&pool, mission.mission.id)
            .await
            .expect("target lookup failed");
        assert!(leftovers.is_empty());
    }
}
