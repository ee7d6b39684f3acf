use super::db_structs::{BpiUpdate, Song, UserScore};
use crate::{
    model::structures::{difficulty::Difficulty, grade::Grade},
    utils::progress_utils::progress_bar
};
use postgres_types::ToSql;
use std::{str::FromStr, sync::Arc};
use thiserror::Error;
use tokio_postgres::{Client, NoTls, Row};
use tracing::{error, info};

#[derive(Debug, Error)]
pub enum DbError {
    #[error("database error: {0}")]
    Postgres(#[from] tokio_postgres::Error),

    #[error("invalid value {value:?} in column {column}")]
    InvalidColumn { column: &'static str, value: String }
}

/// Client over the catalog and score tables:
///
/// - `songs(id, title, difficulty, level, notes, bpm, wr, avg, coef)`, unique on `(title, difficulty)`
/// - `user_scores(user_id, song_id, grade, score, bpi, achieved_at)`, unique on `(user_id, song_id)`
///
/// `coef` and `bpi` are `double precision`; a `NULL` bpi means the index was not computable.
#[derive(Clone)]
pub struct DbClient {
    client: Arc<Client>
}

impl DbClient {
    // Connect to the database and return a DbClient instance
    pub async fn connect(connection_str: &str) -> Result<Self, DbError> {
        let (client, connection) = tokio_postgres::connect(connection_str, NoTls).await?;

        // Spawn the connection object to run in the background
        tokio::spawn(async move {
            if let Err(e) = connection.await {
                error!("connection error: {}", e);
            }
        });

        Ok(DbClient {
            client: Arc::new(client)
        })
    }

    /// Fetches the catalog ordered by level, then title.
    pub async fn get_songs(&self, level: Option<i32>) -> Result<Vec<Song>, DbError> {
        info!("Fetching songs...");
        let rows = self
            .client
            .query(
                "SELECT id, title, difficulty, level, notes, bpm, wr, avg, coef FROM songs \
                WHERE $1::INT IS NULL OR level = $1 \
                ORDER BY level, title",
                &[&level]
            )
            .await?;

        let songs = rows.iter().map(Self::song_from_row).collect::<Result<Vec<_>, _>>()?;

        info!("Fetched {} songs", songs.len());
        Ok(songs)
    }

    /// Fetches stored scores, for one user or for everyone.
    pub async fn get_user_scores(&self, user_id: Option<i32>) -> Result<Vec<UserScore>, DbError> {
        info!("Fetching user scores...");
        let rows = self
            .client
            .query(
                "SELECT user_id, song_id, grade, score, bpi, achieved_at FROM user_scores \
                WHERE $1::INT IS NULL OR user_id = $1 \
                ORDER BY user_id, song_id",
                &[&user_id]
            )
            .await?;

        let scores = rows.iter().map(Self::score_from_row).collect::<Result<Vec<_>, _>>()?;

        info!("Fetched {} user scores", scores.len());
        Ok(scores)
    }

    /// Inserts the score or replaces the existing one for the same (user, song).
    pub async fn upsert_user_score(&self, score: &UserScore) -> Result<(), DbError> {
        let query = "INSERT INTO user_scores (user_id, song_id, grade, score, bpi, achieved_at) \
            VALUES ($1, $2, $3, $4, $5, $6) \
            ON CONFLICT (user_id, song_id) DO UPDATE SET \
            grade = EXCLUDED.grade, score = EXCLUDED.score, bpi = EXCLUDED.bpi, achieved_at = EXCLUDED.achieved_at";
        let grade = score.grade.to_string();
        let values: &[&(dyn ToSql + Sync)] = &[
            &score.user_id,
            &score.song_id,
            &grade,
            &score.score,
            &score.bpi,
            &score.achieved_at
        ];

        self.client.execute(query, values).await?;
        Ok(())
    }

    /// Returns whether a score was deleted.
    pub async fn delete_user_score(&self, user_id: i32, song_id: i32) -> Result<bool, DbError> {
        let deleted = self
            .client
            .execute(
                "DELETE FROM user_scores WHERE user_id = $1 AND song_id = $2",
                &[&user_id, &song_id]
            )
            .await?;

        Ok(deleted > 0)
    }

    /// Writes every changed BPI in a single transaction.
    pub async fn save_bpi_updates(&self, updates: &[BpiUpdate]) -> Result<u64, DbError> {
        let changed = updates.iter().filter(|u| u.changed).collect::<Vec<_>>();
        if changed.is_empty() {
            info!("No BPI changes to save");
            return Ok(0);
        }

        let p_bar = progress_bar(changed.len() as u64, "Saving BPI updates".to_string());

        self.client.batch_execute("BEGIN").await?;
        let result = match self.execute_updates(&changed, &p_bar).await {
            Ok(count) => self.client.batch_execute("COMMIT").await.map(|_| count).map_err(DbError::from),
            Err(e) => Err(e)
        };

        match result {
            Ok(count) => {
                p_bar.finish_with_message("BPI updates saved");
                info!("Saved {} BPI updates", count);
                Ok(count)
            }
            Err(e) => {
                error!("Failed to save BPI updates, rolling back: {}", e);
                // Keep the original failure, the session only needs to leave the transaction
                if let Err(rollback_err) = self.client.batch_execute("ROLLBACK").await {
                    error!("Rollback failed: {}", rollback_err);
                }
                p_bar.abandon();
                Err(e)
            }
        }
    }

    async fn execute_updates(&self, updates: &[&BpiUpdate], p_bar: &indicatif::ProgressBar) -> Result<u64, DbError> {
        let statement = self
            .client
            .prepare("UPDATE user_scores SET bpi = $1 WHERE user_id = $2 AND song_id = $3")
            .await?;

        let mut count = 0;
        for update in updates {
            count += self
                .client
                .execute(&statement, &[&update.bpi, &update.user_id, &update.song_id])
                .await?;
            p_bar.inc(1);
        }

        Ok(count)
    }

    fn song_from_row(row: &Row) -> Result<Song, DbError> {
        let difficulty: String = row.try_get("difficulty")?;

        Ok(Song {
            id: row.try_get("id")?,
            title: row.try_get("title")?,
            difficulty: Difficulty::from_str(&difficulty).map_err(|_| DbError::InvalidColumn {
                column: "difficulty",
                value: difficulty.clone()
            })?,
            level: row.try_get("level")?,
            notes: row.try_get("notes")?,
            bpm: row.try_get("bpm")?,
            wr: row.try_get("wr")?,
            avg: row.try_get("avg")?,
            coefficient: row.try_get("coef")?
        })
    }

    fn score_from_row(row: &Row) -> Result<UserScore, DbError> {
        let grade: String = row.try_get("grade")?;

        Ok(UserScore {
            user_id: row.try_get("user_id")?,
            song_id: row.try_get("song_id")?,
            grade: Grade::from_str(&grade).map_err(|_| DbError::InvalidColumn {
                column: "grade",
                value: grade.clone()
            })?,
            score: row.try_get("score")?,
            bpi: row.try_get("bpi")?,
            achieved_at: row.try_get("achieved_at")?
        })
    }
}
