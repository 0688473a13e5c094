use std::str::FromStr;

use sqlx::{
    SqlitePool,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
};
use uuid::Uuid;

use super::mission::{CreateMission, Mission, MissionWithTargets};
use super::spy_cat::{CreateSpyCat, SpyCat};
use super::target::CreateTarget;
use crate::DBService;

/// One connection, one private in-memory database. Capping the pool at a
/// single connection keeps that database alive for the whole test and keeps
/// tests in the same binary from sharing state.
pub(crate) async fn setup_test_pool() -> SqlitePool {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")
        .expect("invalid sqlite config")
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .expect("failed to open sqlite memory db");

    DBService::run_migrations(&pool)
        .await
        .expect("failed to run migrations");

    pool
}

pub(crate) async fn create_test_cat(pool: &SqlitePool) -> SpyCat {
    SpyCat::create(
        pool,
        &CreateSpyCat {
            name: format!("Agent {}", Uuid::new_v4()),
            years_of_experience: 3,
            breed: "Bombay".into(),
            salary: 5_000.0,
        },
    )
    .await
    .expect("failed to create test cat")
}

pub(crate) async fn create_test_mission(
    pool: &SqlitePool,
    target_count: usize,
) -> MissionWithTargets {
    let targets = (0..target_count)
        .map(|i| CreateTarget {
            name: format!("Target {i}"),
            country: "Norway".into(),
            notes: String::new(),
            complete: false,
        })
        .collect();

    Mission::create(
        pool,
        &CreateMission {
            complete: false,
            targets,
        },
    )
    .await
    .expect("failed to create test mission")
}
