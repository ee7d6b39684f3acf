use bpi_processor::{
    database::{
        db::{DbClient, DbError},
        db_structs::{BpiUpdate, Song, UserScore}
    },
    model::{bpi::BpiCalculator, scoring::recalculate_bpi, structures::grade::Grade},
    utils::test_utils::{generate_song, test_timestamp}
};
use serial_test::serial;

use super::test_helpers::TestDatabase;

fn test_songs() -> Vec<Song> {
    vec![generate_song(1, 1241, 2178, 2472), generate_song(2, 1000, 1800, 1950)]
}

fn stored_score(song_id: i32, score: i32, bpi: f64) -> UserScore {
    UserScore {
        user_id: 1,
        song_id,
        grade: Grade::AA,
        score: Some(score),
        bpi: Some(bpi),
        achieved_at: test_timestamp()
    }
}

fn update(song_id: i32, bpi: f64, changed: bool) -> BpiUpdate {
    BpiUpdate {
        user_id: 1,
        song_id,
        bpi: Some(bpi),
        changed
    }
}

async fn seeded_database() -> Option<TestDatabase> {
    let test_db = TestDatabase::start(&test_songs()).await?;
    test_db
        .seed_scores(&[stored_score(1, 2300, 10.0), stored_score(2, 1900, 20.0)])
        .await
        .expect("Failed to seed scores");

    Some(test_db)
}

#[tokio::test]
#[serial]
async fn test_save_commits_changed_rows_only() {
    let Some(test_db) = seeded_database().await else {
        return;
    };
    let client = DbClient::connect(&test_db.connection_string)
        .await
        .expect("Failed to connect");

    let saved = client
        .save_bpi_updates(&[update(1, 55.5, true), update(2, 99.0, false)])
        .await
        .expect("Failed to save updates");

    assert_eq!(saved, 1);
    assert_eq!(test_db.stored_bpi(1, 1).await.unwrap(), Some(55.5));
    assert_eq!(test_db.stored_bpi(1, 2).await.unwrap(), Some(20.0));
}

#[tokio::test]
#[serial]
async fn test_save_without_changes_is_a_no_op() {
    let Some(test_db) = seeded_database().await else {
        return;
    };
    let client = DbClient::connect(&test_db.connection_string)
        .await
        .expect("Failed to connect");

    let saved = client
        .save_bpi_updates(&[update(1, 55.5, false)])
        .await
        .expect("Failed to save updates");

    assert_eq!(saved, 0);
    assert_eq!(test_db.stored_bpi(1, 1).await.unwrap(), Some(10.0));
}

#[tokio::test]
#[serial]
async fn test_failed_update_rolls_back_whole_batch() {
    let Some(test_db) = seeded_database().await else {
        return;
    };
    let client = DbClient::connect(&test_db.connection_string)
        .await
        .expect("Failed to connect");

    // The second row violates the finite-BPI constraint after the first was written
    let result = client
        .save_bpi_updates(&[update(1, 55.5, true), update(2, f64::INFINITY, true)])
        .await;

    assert!(matches!(result, Err(DbError::Postgres(_))));
    assert_eq!(test_db.stored_bpi(1, 1).await.unwrap(), Some(10.0));
    assert_eq!(test_db.stored_bpi(1, 2).await.unwrap(), Some(20.0));

    // The session left the aborted transaction and accepts new work
    let saved = client
        .save_bpi_updates(&[update(1, 60.0, true)])
        .await
        .expect("Client unusable after rollback");
    assert_eq!(saved, 1);
    assert_eq!(test_db.stored_bpi(1, 1).await.unwrap(), Some(60.0));
}

#[tokio::test]
#[serial]
async fn test_recalculated_scores_are_persisted() {
    let Some(test_db) = seeded_database().await else {
        return;
    };
    let client = DbClient::connect(&test_db.connection_string)
        .await
        .expect("Failed to connect");

    let songs = client.get_songs(None).await.unwrap();
    let scores = client.get_user_scores(Some(1)).await.unwrap();
    let updates = recalculate_bpi(&songs, &scores, &BpiCalculator::default());

    let saved = client.save_bpi_updates(&updates).await.unwrap();
    assert_eq!(saved, 2);

    // A second pass over the saved rows finds nothing to change
    let rescored = client.get_user_scores(Some(1)).await.unwrap();
    let again = recalculate_bpi(&songs, &rescored, &BpiCalculator::default());
    assert!(again.iter().all(|u| !u.changed));
}
