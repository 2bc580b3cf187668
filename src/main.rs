use clap::{ArgGroup, Parser};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use thing_archiver::config::{
    self, DEFAULT_API_BASE, DEFAULT_THROTTLE_SECONDS, ENV_API_BASE_NAME, ENV_TOKEN_NAME,
};
use thing_archiver::utils::ensure_dir;
use thing_archiver::{Archiver, Config, Error, ThingId, run_until_interrupted};

#[derive(Parser, Debug)]
#[command(name = "thing-archiver", version)]
#[command(about = "Archive Things from Thingiverse with all their files, images and metadata")]
#[command(after_help = "Examples:
  thing-archiver --thing 11190
  thing-archiver --user tbuser
  thing-archiver --thing 11190 --output ./downloads
  thing-archiver --thing 11190 --force              # Re-fetch even if unchanged
  thing-archiver --user tbuser --output ./downloads --throttle 2.0")]
#[command(group(ArgGroup::new("target").required(true).args(["thing", "user"])))]
struct Cli {
    /// Archive a specific thing by ID
    #[arg(short, long, value_name = "ID")]
    thing: Option<String>,

    /// Archive all published things of a user
    #[arg(short, long, value_name = "USERNAME")]
    user: Option<String>,

    /// Output directory
    #[arg(short, long, value_name = "DIR", default_value = ".")]
    output: PathBuf,

    /// Seconds to wait between listing pages and between things
    #[arg(long, value_name = "SECONDS", default_value_t = DEFAULT_THROTTLE_SECONDS)]
    throttle: f64,

    /// Re-fetch everything even if the thing is unchanged
    #[arg(short, long)]
    force: bool,

    /// Thingiverse API token (or set THINGIVERSE_TOKEN)
    #[arg(long, value_name = "TOKEN")]
    token: Option<String>,

    /// API base URL
    #[arg(long, value_name = "URL", env = ENV_API_BASE_NAME, default_value = DEFAULT_API_BASE)]
    api_base: String,

    /// Retries for transient network failures
    #[arg(long, value_name = "N")]
    retries: Option<u32>,
}

/// Initialize tracing with output to stderr so stdout only carries results
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("thing_archiver=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing();

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("Error: could not start async runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(run(cli)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            match &e {
                Error::Interrupted => eprintln!("\nArchive interrupted by user"),
                _ => eprintln!("Error: {e}"),
            }
            ExitCode::from(e.exit_code())
        }
    }
}

async fn run(cli: Cli) -> thing_archiver::Result<()> {
    let token = config::resolve_token(cli.token.as_deref())?;
    let source = if cli.token.is_some() { "--token" } else { ENV_TOKEN_NAME };
    tracing::debug!(source, "Using API token");

    let mut config = Config::default();
    config.api.base_url = cli.api_base;
    config.api.token = Some(token);
    if let Some(retries) = cli.retries {
        config.retry.max_attempts = retries;
    }

    let output_dir = cli.output;
    let throttle = config::throttle_from_secs(cli.throttle)?;
    let force = cli.force;

    let archiver = Archiver::new(config)?;
    ensure_dir(&output_dir).await?;

    if let Some(thing) = cli.thing {
        let Ok(id) = thing.parse::<ThingId>();
        let report =
            run_until_interrupted(archiver.archive_thing(&id, &output_dir, force)).await?;
        if report.unchanged {
            println!("Thing unchanged since last archive: {}", report.output_dir.display());
        } else {
            println!("\nDone! Thing archived to: {}", report.output_dir.display());
        }
    } else if let Some(user) = cli.user {
        let report =
            run_until_interrupted(archiver.archive_user(&user, &output_dir, throttle, force))
                .await?;
        if report.attempted == 0 {
            println!("No things found for user: {user}");
        }
        println!(
            "\nCompleted: Downloaded {} of {} things",
            report.succeeded(),
            report.attempted
        );
    }

    Ok(())
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn thing_and_user_are_mutually_exclusive() {
        assert!(Cli::try_parse_from(["thing-archiver", "--thing", "1", "--user", "x"]).is_err());
        assert!(Cli::try_parse_from(["thing-archiver"]).is_err());
    }

    #[test]
    fn defaults_match_documented_values() {
        let cli = Cli::try_parse_from(["thing-archiver", "-t", "11190"]).unwrap();
        assert_eq!(cli.thing.as_deref(), Some("11190"));
        assert_eq!(cli.output, PathBuf::from("."));
        assert!((cli.throttle - 5.0).abs() < f64::EPSILON);
        assert!(!cli.force);
        assert!(cli.retries.is_none());
    }

    #[test]
    fn short_flags_parse() {
        let cli = Cli::try_parse_from([
            "thing-archiver", "-u", "tbuser", "-o", "out", "-f", "--throttle", "0.5",
        ])
        .unwrap();
        assert_eq!(cli.user.as_deref(), Some("tbuser"));
        assert_eq!(cli.output, PathBuf::from("out"));
        assert!(cli.force);
        assert!((cli.throttle - 0.5).abs() < f64::EPSILON);
    }
}
