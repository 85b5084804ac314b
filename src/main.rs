use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;

use steadfast::adapters::{FsProfileStore, InMemoryProfileStore, ModelRouter, TracingLogger};
use steadfast::application::{
    AgentContext, CrisisTranslator, Invocation, MediateMessageCommand, MediateMessageHandler,
    PersonalizationResolver, ProactiveCoach, TranslateMessageCommand, TranslateMessageHandler,
};
use steadfast::config::{AppConfig, ProfileBackend};
use steadfast::domain::agents::{CoachingInput, CrisisInput, MediationInput};
use steadfast::domain::foundation::StressLevel;
use steadfast::ports::ProfileStore;

/// Steadfast - calm, structured guidance for hard messages.
#[derive(Parser, Debug)]
#[command(name = "steadfast")]
#[command(version)]
#[command(about = "Structured guidance for emotionally charged messages.", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Turn a message into a step-by-step communication plan
    Translate {
        /// The message you are struggling to get across
        #[arg(short, long)]
        message: String,

        /// Stress level on the 1-5 scale
        #[arg(short, long, default_value_t = 3)]
        stress: u8,

        /// Profile id used for personalization
        #[arg(long)]
        profile: Option<String>,
    },

    /// Translate a distressed message into calm guidance
    Crisis {
        #[arg(short, long)]
        message: String,

        /// Stress level on the 1-10 scale
        #[arg(short, long)]
        stress: u8,
    },

    /// Rephrase a heated message before sending it
    Mediate {
        #[arg(short, long)]
        message: String,

        /// Earlier messages, oldest first (repeatable)
        #[arg(long = "history")]
        history: Vec<String>,

        /// What you want the conversation to achieve
        #[arg(long)]
        goal: Option<String>,

        #[arg(long)]
        profile: Option<String>,
    },

    /// Predict rising stress from a JSON coaching input
    Coach {
        /// Path to the input JSON (reads stdin when omitted)
        #[arg(short, long)]
        input: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = AppConfig::load().context("failed to load configuration")?;
    config.validate().context("invalid configuration")?;
    init_tracing(&config)?;

    let client = ModelRouter::client_for(&config.ai).context("no language model available")?;
    let logger = Arc::new(TracingLogger::new());
    let context = AgentContext::new(client).with_logger(logger.clone());

    let store: Arc<dyn ProfileStore> = match config.profiles.backend {
        ProfileBackend::Filesystem => Arc::new(FsProfileStore::new(&config.profiles.base_dir)),
        ProfileBackend::Memory => Arc::new(InMemoryProfileStore::new()),
    };
    let resolver = PersonalizationResolver::new(store).with_logger(logger);

    match cli.command {
        Commands::Translate {
            message,
            stress,
            profile,
        } => {
            let handler = TranslateMessageHandler::new(context, resolver);
            let result = handler
                .handle(TranslateMessageCommand {
                    raw_message: message,
                    stress_level: stress,
                    profile_id: profile,
                })
                .await?;
            print_json(&result)
        }
        Commands::Crisis { message, stress } => {
            let input = CrisisInput::new(StressLevel::new(stress)?, message);
            let output = CrisisTranslator::new()
                .translate(&input, Invocation::new(context))
                .await?;
            print_json(&output)
        }
        Commands::Mediate {
            message,
            history,
            goal,
            profile,
        } => {
            let mut input = MediationInput::new(message).with_history(history);
            if let Some(goal) = goal {
                input = input.with_goal(goal);
            }
            let handler = MediateMessageHandler::new(context, resolver);
            let result = handler
                .handle(MediateMessageCommand {
                    input,
                    profile_id: profile,
                })
                .await?;
            print_json(&result)
        }
        Commands::Coach { input } => {
            let input = read_coaching_input(input)?;
            let output = ProactiveCoach::new()
                .coach(&input, Invocation::new(context))
                .await?;
            print_json(&output)
        }
    }
}

fn init_tracing(config: &AppConfig) -> Result<()> {
    let filter = config.logging.env_filter()?;
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if config.logging.use_json(config.environment) {
        builder.json().init();
    } else {
        builder.init();
    }
    Ok(())
}

fn read_coaching_input(path: Option<PathBuf>) -> Result<CoachingInput> {
    let raw = match path {
        Some(path) => std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read stdin")?;
            buf
        }
    };
    serde_json::from_str(&raw).context("coaching input is not valid JSON")
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
