use bpi_processor::database::db_structs::{Song, UserScore};
use lazy_static::lazy_static;
use std::{
    process::{Command, Stdio},
    sync::Arc,
    time::Duration
};
use testcontainers::{clients::Cli, Container};
use testcontainers_modules::postgres::Postgres;
use tokio_postgres::{Client, NoTls};

pub struct TestDatabase {
    pub connection_string: String,
    _container: Container<'static, Postgres>
}

/// Docker is required for these tests; without it they return early.
pub fn docker_available() -> bool {
    Command::new("docker")
        .arg("info")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|status| status.success())
        .unwrap_or(false)
}

impl TestDatabase {
    pub async fn new() -> Result<Self, Box<dyn std::error::Error>> {
        lazy_static! {
            static ref DOCKER: Arc<Cli> = Arc::new(Cli::default());
        }

        let container = DOCKER.run(Postgres::default());
        let port = container.get_host_port_ipv4(5432);

        let connection_string = format!(
            "host=localhost port={} user=postgres password=postgres dbname=postgres",
            port
        );

        let test_db = TestDatabase {
            connection_string,
            _container: container
        };

        let client = test_db.get_client().await?;
        client.batch_execute(include_str!("schema.sql")).await?;

        Ok(test_db)
    }

    /// Starts a database seeded with `songs`, or `None` when Docker is unavailable
    pub async fn start(songs: &[Song]) -> Option<TestDatabase> {
        if !docker_available() {
            eprintln!("Docker is not available, skipping database test");
            return None;
        }

        let test_db = TestDatabase::new().await.expect("Failed to create test database");
        test_db.seed_songs(songs).await.expect("Failed to seed songs");

        Some(test_db)
    }

    /// Opens a separate session, retrying while the server finishes starting up
    pub async fn get_client(&self) -> Result<Client, Box<dyn std::error::Error>> {
        let mut attempts = 0;
        let (client, connection) = loop {
            match tokio_postgres::connect(&self.connection_string, NoTls).await {
                Ok(pair) => break pair,
                Err(_) if attempts < 20 => {
                    attempts += 1;
                    tokio::time::sleep(Duration::from_millis(250)).await;
                }
                Err(e) => return Err(e.into())
            }
        };

        tokio::spawn(async move {
            if let Err(e) = connection.await {
                eprintln!("Database connection error: {}", e);
            }
        });

        Ok(client)
    }

    pub async fn seed_songs(&self, songs: &[Song]) -> Result<(), Box<dyn std::error::Error>> {
        let client = self.get_client().await?;

        for song in songs {
            client
                .execute(
                    "INSERT INTO songs (id, title, difficulty, level, notes, bpm, wr, avg, coef) \
                     VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
                    &[
                        &song.id,
                        &song.title,
                        &song.difficulty.to_string(),
                        &song.level,
                        &song.notes,
                        &song.bpm,
                        &song.wr,
                        &song.avg,
                        &song.coefficient
                    ]
                )
                .await?;
        }

        Ok(())
    }

    pub async fn seed_scores(&self, scores: &[UserScore]) -> Result<(), Box<dyn std::error::Error>> {
        let client = self.get_client().await?;

        for score in scores {
            client
                .execute(
                    "INSERT INTO user_scores (user_id, song_id, grade, score, bpi, achieved_at) \
                     VALUES ($1, $2, $3, $4, $5, $6)",
                    &[
                        &score.user_id,
                        &score.song_id,
                        &score.grade.to_string(),
                        &score.score,
                        &score.bpi,
                        &score.achieved_at
                    ]
                )
                .await?;
        }

        Ok(())
    }

    /// Reads a stored BPI directly, bypassing `DbClient`
    pub async fn stored_bpi(&self, user_id: i32, song_id: i32) -> Result<Option<f64>, Box<dyn std::error::Error>> {
        let client = self.get_client().await?;
        let row = client
            .query_one(
                "SELECT bpi FROM user_scores WHERE user_id = $1 AND song_id = $2",
                &[&user_id, &song_id]
            )
            .await?;

        Ok(row.get(0))
    }
}
