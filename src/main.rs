use bpi_processor::{
    args::{Args, Command},
    database::db::{DbClient, DbError},
    model::{
        bpi::{BpiCalculator, BpiConfig},
        catalog::{rank_songs, SongFilter, SortOrder},
        scoring::{evaluate_submission, recalculate_bpi, ScoringError},
        stats::StatsOverview,
        structures::score_submission::ScoreSubmission
    }
};
use chrono::Utc;
use clap::Parser;
use std::{collections::HashSet, process::exit};
use thiserror::Error;
use tracing::{error, info, warn};
use tracing_indicatif::IndicatifLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Debug, Error)]
enum AppError {
    #[error("CONNECTION_STRING environment variable must be set")]
    MissingConnectionString,

    #[error(transparent)]
    Database(#[from] DbError),

    #[error("song {0} is not in the catalog")]
    UnknownSong(i32),

    #[error(transparent)]
    Scoring(#[from] ScoringError),

    #[error("Failed to serialize output: {0}")]
    Serialization(#[from] serde_json::Error)
}

#[tokio::main]
async fn main() {
    // Load .env before parsing so env fallbacks can see it
    dotenv::dotenv().ok();
    let args = Args::parse();

    init_tracing(&args.log_level);

    if let Err(e) = run(args).await {
        error!("{}", e);
        exit(1);
    }
}

fn init_tracing(log_level: &str) {
    let indicatif_layer = IndicatifLayer::new();

    tracing_subscriber::registry()
        .with(EnvFilter::new(log_level))
        .with(tracing_subscriber::fmt::layer().with_writer(indicatif_layer.get_stderr_writer()))
        .with(indicatif_layer)
        .init();
}

async fn run(args: Args) -> Result<(), AppError> {
    let connection_string = args.connection_string.as_deref().ok_or(AppError::MissingConnectionString)?;
    let client = connect(connection_string).await?;

    let calculator = BpiCalculator::new(BpiConfig {
        default_coefficient: args.default_coefficient
    });
    let songs = client.get_songs(args.level).await?;

    match args.command {
        Command::Recalculate { user_id, dry_run } => {
            let song_ids: HashSet<i32> = songs.iter().map(|s| s.id).collect();
            let mut scores = client.get_user_scores(user_id).await?;
            scores.retain(|s| song_ids.contains(&s.song_id));

            let updates = recalculate_bpi(&songs, &scores, &calculator);

            if dry_run {
                let changed = updates.iter().filter(|u| u.changed).count();
                info!("Dry run, {} BPI updates not saved", changed);
            } else {
                client.save_bpi_updates(&updates).await?;
            }
        }
        Command::Ranking { search, ascending } => {
            let filter = SongFilter {
                level: args.level,
                search
            };
            let order = if ascending {
                SortOrder::Ascending
            } else {
                SortOrder::Descending
            };

            let rankings = rank_songs(&songs, &filter, order, &calculator);
            println!("{}", serde_json::to_string_pretty(&rankings)?);
        }
        Command::Stats { user_id } => {
            let scores = client.get_user_scores(Some(user_id)).await?;
            let stats = StatsOverview::new(&songs, &scores);

            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
        Command::Submit {
            user_id,
            song_id,
            score,
            grade
        } => {
            let song = songs
                .iter()
                .find(|s| s.id == song_id)
                .ok_or(AppError::UnknownSong(song_id))?;
            let submission = ScoreSubmission {
                user_id,
                song_id,
                grade,
                score
            };

            let user_score = evaluate_submission(&submission, song, &calculator, Utc::now().into())?;
            client.upsert_user_score(&user_score).await?;

            info!("Saved score for user {} on song {}", user_id, song_id);
            println!("{}", serde_json::to_string_pretty(&user_score)?);
        }
        Command::Delete { user_id, song_id } => {
            if client.delete_user_score(user_id, song_id).await? {
                info!("Deleted score for user {} on song {}", user_id, song_id);
            } else {
                warn!("No score stored for user {} on song {}", user_id, song_id);
            }
        }
    }

    Ok(())
}

async fn connect(connection_string: &str) -> Result<DbClient, AppError> {
    match DbClient::connect(connection_string).await {
        Ok(client) => {
            info!("Connected to database");
            Ok(client)
        }
        Err(e) => {
            error!("Failed to connect to database: {}", e);
            error!("Application cannot start without a valid database connection");
            Err(e.into())
        }
    }
}
