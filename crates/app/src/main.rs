mod db;

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use quiz_core::model::{ApiSettingsDraft, CategoryId, Difficulty, TopicId, UserId};
use services::difficulty_filter::DifficultySource;
use services::{AppServices, Clock};

/// Track quiz performance per topic and pick the next difficulty.
#[derive(Debug, Parser)]
#[command(name = "quizctl", version, about)]
struct Cli {
    /// SQLite database (path or sqlite: URL)
    #[arg(long = "db", env = "QUIZ_DB_URL", default_value = "sqlite://quiz.sqlite3", global = true)]
    db_url: String,

    #[command(flatten)]
    api: ApiArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Args)]
struct ApiArgs {
    /// Base URL of the quiz backend
    #[arg(long, env = "QUIZ_API_URL", global = true)]
    api_url: Option<String>,

    /// Bearer token for the quiz backend
    #[arg(long, env = "QUIZ_API_TOKEN", global = true, hide_env_values = true)]
    api_token: Option<String>,

    /// Request timeout in seconds
    #[arg(long, env = "QUIZ_API_TIMEOUT_SECS", global = true)]
    api_timeout_secs: Option<u64>,

    /// Never contact the backend; use local history only
    #[arg(long, global = true)]
    offline: bool,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Record a completed quiz
    Record {
        #[arg(long)]
        topic: TopicId,
        #[arg(long)]
        score: f64,
        #[arg(long)]
        difficulty: Difficulty,
        /// Seconds left on the timer when the quiz was submitted
        #[arg(long, default_value_t = 0)]
        time_left: u32,
    },
    /// Recommend the difficulty of the next quiz on a topic
    Recommend {
        #[arg(long)]
        topic: TopicId,
        /// Backend category used for the remote recommendation
        #[arg(long)]
        category: Option<CategoryId>,
    },
    /// Show tracked topic performance
    Stats {
        #[arg(long)]
        topic: Option<TopicId>,
    },
    /// Show streak, totals and achievements
    Progress,
    /// List content the backend suggests for a learner
    Suggest {
        #[arg(long)]
        user: UserId,
        /// Only suggest content at this difficulty
        #[arg(long)]
        difficulty: Option<Difficulty>,
    },
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}

async fn build_services(cli: &Cli) -> Result<AppServices> {
    let db_url = db::normalize_sqlite_url(&cli.db_url);
    db::prepare_sqlite_file(&db_url)?;

    let api = if cli.api.offline {
        None
    } else {
        let settings = ApiSettingsDraft {
            base_url: cli.api.api_url.clone(),
            token: cli.api.api_token.clone(),
            timeout_secs: cli.api.api_timeout_secs,
        }
        .validate()
        .context("invalid backend settings")?;
        Some(settings)
    };

    info!(db = %db_url, remote = api.is_some(), "opening quiz store");
    AppServices::new_sqlite(&db_url, Clock::default(), api)
        .await
        .with_context(|| format!("opening {db_url}"))
}

async fn run(cli: Cli) -> Result<()> {
    let services = build_services(&cli).await?;

    match cli.command {
        Command::Record {
            topic,
            score,
            difficulty,
            time_left,
        } => {
            let outcome = services
                .quiz_completion()
                .complete(&topic, difficulty, score, time_left)
                .await?;
            println!(
                "{topic}: {} ({} attempts, average {:.1})",
                if outcome.passed { "passed" } else { "keep practicing" },
                outcome.performance.attempts(),
                outcome.performance.average_score(),
            );
            for unlocked in &outcome.unlocked {
                let achievement = unlocked.achievement();
                println!("unlocked: {} - {}", achievement.title, achievement.description);
            }
            println!("next difficulty: {}", outcome.next_difficulty);
        }
        Command::Recommend { topic, category } => {
            let selection = services
                .difficulty_filter()
                .resolve(category, &topic)
                .await?;
            let source = match selection.source {
                DifficultySource::Local => "local history",
                DifficultySource::Remote => "backend recommendation",
                DifficultySource::Manual => "manual choice",
            };
            println!("{} ({source})", selection.difficulty);
            if let Some(remote) = selection.remote {
                println!(
                    "backend suggested {} with confidence {:.2}: {}",
                    remote.recommended_difficulty, remote.confidence, remote.reason
                );
            }
        }
        Command::Stats { topic } => {
            let tracker = services.tracker();
            let rows = match topic {
                Some(topic) => tracker
                    .current_performance(&topic)
                    .await?
                    .map(|perf| vec![(topic, perf)])
                    .unwrap_or_default(),
                None => tracker.all_performance().await?,
            };
            if rows.is_empty() {
                println!("no quizzes recorded");
            }
            for (topic, perf) in rows {
                println!(
                    "{topic}\tattempts={}\taverage={:.1}\tlast={}",
                    perf.attempts(),
                    perf.average_score(),
                    perf.last_difficulty()
                );
            }
        }
        Command::Suggest { user, difficulty } => {
            let Some(client) = services.recommendations() else {
                bail!("content suggestions need the backend; drop --offline");
            };
            let suggestions = client.nlp_recommendations(user, difficulty).await?;
            if suggestions.is_empty() {
                println!("no suggestions");
            }
            for rec in suggestions {
                println!(
                    "{}\t{}\t{}\tconfidence={:.2}\t{}",
                    rec.content_id, rec.title, rec.difficulty, rec.confidence, rec.reason
                );
            }
        }
        Command::Progress => {
            let progress = services.progress().load().await?;
            println!(
                "streak {} | quizzes {} | average {:.1}",
                progress.streak(),
                progress.total_quizzes(),
                progress.average_score()
            );
            for unlocked in progress.achievements() {
                println!(
                    "{}\t{}",
                    unlocked.achievement().title,
                    unlocked.unlocked_at.to_rfc3339()
                );
            }
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    run(Cli::parse()).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_record_command() {
        let cli = Cli::try_parse_from([
            "quizctl",
            "--offline",
            "record",
            "--topic",
            "42",
            "--score",
            "91.5",
            "--difficulty",
            "Intermediate",
        ])
        .unwrap();
        assert!(cli.api.offline);
        match cli.command {
            Command::Record {
                topic,
                score,
                difficulty,
                time_left,
            } => {
                assert_eq!(topic.as_str(), "42");
                assert!((score - 91.5).abs() < f64::EPSILON);
                assert_eq!(difficulty, Difficulty::Intermediate);
                assert_eq!(time_left, 0);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn parses_suggest_command() {
        let cli = Cli::try_parse_from([
            "quizctl", "suggest", "--user", "3", "--difficulty", "advanced",
        ])
        .unwrap();
        match cli.command {
            Command::Suggest { user, difficulty } => {
                assert_eq!(user, UserId::new(3));
                assert_eq!(difficulty, Some(Difficulty::Advanced));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn rejects_unknown_difficulty_and_blank_topic() {
        assert!(Cli::try_parse_from([
            "quizctl", "record", "--topic", "42", "--score", "10", "--difficulty", "expert",
        ])
        .is_err());
        assert!(Cli::try_parse_from(["quizctl", "recommend", "--topic", "  "]).is_err());
    }
}
