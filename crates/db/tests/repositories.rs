//! Integration tests for the Postgres repositories.
//!
//! These run against `DATABASE_URL` with migrations applied. When the
//! variable is unset the tests return early.

use assert_matches::assert_matches;
use backlog_core::status::StepStatus;
use backlog_core::template::DEFAULT_STEPS;
use backlog_db::models::media_asset::CreateMediaAsset;
use backlog_db::models::progress_note::CreateProgressNote;
use backlog_db::models::project::{CreateProject, UpdateProject};
use backlog_db::repositories::{LikeRepo, MediaAssetRepo, ProgressNoteRepo, ProjectRepo, StepRepo};
use backlog_db::DbPool;

/// Connect and migrate, or skip when no database is configured.
///
/// Connection and migration errors still panic so real regressions are not
/// silently swallowed.
async fn postgres_or_skip() -> Option<DbPool> {
    let Ok(url) = std::env::var("DATABASE_URL") else {
        eprintln!("Skipping PostgreSQL test (DATABASE_URL unset)");
        return None;
    };
    let pool = backlog_db::create_pool(&url)
        .await
        .unwrap_or_else(|e| panic!("PostgreSQL test setup failed: {e}"));
    backlog_db::run_migrations(&pool)
        .await
        .unwrap_or_else(|e| panic!("migrations failed: {e}"));
    Some(pool)
}

fn new_project(title: &str) -> CreateProject {
    CreateProject {
        title: title.to_string(),
        description: Some("repository test".to_string()),
    }
}

// Owner ids are randomised per test so runs against a shared database do not
// see each other's rows.
fn unique_owner() -> i64 {
    (now_nanos() % 1_000_000_000) as i64 + 1_000_000
}

fn now_nanos() -> u128 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default()
}

#[tokio::test]
async fn health_check_succeeds() {
    let Some(pool) = postgres_or_skip().await else {
        return;
    };
    backlog_db::health_check(&pool).await.unwrap();

    let statuses: Vec<(i16, String)> =
        sqlx::query_as("SELECT id, name FROM step_statuses ORDER BY id")
            .fetch_all(&pool)
            .await
            .unwrap();
    assert_eq!(statuses.len(), 3);
    assert_eq!(statuses[2], (StepStatus::Done.id(), "done".to_string()));
}

#[tokio::test]
async fn create_with_steps_inserts_template_in_order() {
    let Some(pool) = postgres_or_skip().await else {
        return;
    };
    let owner = unique_owner();
    let (project, steps) =
        ProjectRepo::create_with_steps(&pool, owner, &new_project("Space Marine"), DEFAULT_STEPS)
            .await
            .unwrap();

    assert_eq!(project.owner_id, owner);
    assert!(!project.is_public);
    let names: Vec<&str> = steps.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, DEFAULT_STEPS);
    let orders: Vec<i32> = steps.iter().map(|s| s.order_index).collect();
    assert_eq!(orders, vec![0, 1, 2, 3, 4]);
    assert!(steps.iter().all(|s| s.status() == StepStatus::Todo));

    ProjectRepo::delete_cascade(&pool, project.id, &[]).await.unwrap();
}

#[tokio::test]
async fn update_applies_only_provided_fields() {
    let Some(pool) = postgres_or_skip().await else {
        return;
    };
    let (project, _) =
        ProjectRepo::create_with_steps(&pool, unique_owner(), &new_project("Ork"), DEFAULT_STEPS)
            .await
            .unwrap();

    let updated = ProjectRepo::update(
        &pool,
        project.id,
        &UpdateProject {
            is_public: Some(true),
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(updated.title, "Ork");
    assert!(updated.is_public);
    assert!(ProjectRepo::find_public_by_id(&pool, project.id)
        .await
        .unwrap()
        .is_some());

    ProjectRepo::delete_cascade(&pool, project.id, &[]).await.unwrap();
}

#[tokio::test]
async fn apply_statuses_writes_full_set() {
    let Some(pool) = postgres_or_skip().await else {
        return;
    };
    let (project, steps) =
        ProjectRepo::create_with_steps(&pool, unique_owner(), &new_project("Tau"), DEFAULT_STEPS)
            .await
            .unwrap();

    let ids: Vec<i64> = steps.iter().map(|s| s.id).collect();
    let statuses: Vec<i16> = steps
        .iter()
        .map(|s| {
            if s.order_index <= 2 {
                StepStatus::Done.id()
            } else {
                StepStatus::Todo.id()
            }
        })
        .collect();
    let after = StepRepo::apply_statuses(&pool, project.id, &ids, &statuses)
        .await
        .unwrap()
        .unwrap();
    let done: Vec<bool> = after.iter().map(|s| s.status() == StepStatus::Done).collect();
    assert_eq!(done, vec![true, true, true, false, false]);

    ProjectRepo::delete_cascade(&pool, project.id, &[]).await.unwrap();
    assert_matches!(
        StepRepo::apply_statuses(&pool, project.id, &ids, &statuses).await,
        Ok(None)
    );
}

#[tokio::test]
async fn delete_cascade_removes_dependents_and_is_not_repeatable() {
    let Some(pool) = postgres_or_skip().await else {
        return;
    };
    let owner = unique_owner();
    let (project, _) =
        ProjectRepo::create_with_steps(&pool, owner, &new_project("Eldar"), DEFAULT_STEPS)
            .await
            .unwrap();
    let note = ProgressNoteRepo::create(
        &pool,
        owner,
        &CreateProgressNote {
            project_id: project.id,
            content: "base coat done".to_string(),
            is_public: Some(true),
        },
    )
    .await
    .unwrap();
    let key = format!("users/{owner}/{}.png", "0b6f5a3e-2c1d-4e8f-9a7b-1c2d3e4f5a6b");
    MediaAssetRepo::create(
        &pool,
        &CreateMediaAsset {
            note_id: note.id,
            object_key: key.clone(),
            filename: "0b6f5a3e-2c1d-4e8f-9a7b-1c2d3e4f5a6b.png".to_string(),
            content_type: "image/png".to_string(),
        },
    )
    .await
    .unwrap();
    assert!(LikeRepo::toggle(&pool, owner + 1, project.id).await.unwrap());

    assert!(ProjectRepo::delete_cascade(&pool, project.id, &[note.id])
        .await
        .unwrap());

    assert!(StepRepo::list_by_project(&pool, project.id)
        .await
        .unwrap()
        .is_empty());
    assert!(ProgressNoteRepo::list_by_project(&pool, project.id)
        .await
        .unwrap()
        .is_empty());
    assert!(MediaAssetRepo::list_by_notes(&pool, &[note.id])
        .await
        .unwrap()
        .is_empty());
    assert_eq!(LikeRepo::count_by_project(&pool, project.id).await.unwrap(), 0);

    assert!(!ProjectRepo::delete_cascade(&pool, project.id, &[note.id])
        .await
        .unwrap());
}

#[tokio::test]
async fn like_toggle_round_trip() {
    let Some(pool) = postgres_or_skip().await else {
        return;
    };
    let owner = unique_owner();
    let (project, _) =
        ProjectRepo::create_with_steps(&pool, owner, &new_project("Necron"), DEFAULT_STEPS)
            .await
            .unwrap();

    assert!(LikeRepo::toggle(&pool, owner, project.id).await.unwrap());
    assert_eq!(
        LikeRepo::liked_project_ids(&pool, owner, &[project.id])
            .await
            .unwrap(),
        vec![project.id]
    );
    assert!(!LikeRepo::toggle(&pool, owner, project.id).await.unwrap());
    assert_eq!(LikeRepo::count_by_project(&pool, project.id).await.unwrap(), 0);

    ProjectRepo::delete_cascade(&pool, project.id, &[]).await.unwrap();
}
