//! Application orchestration and command routing.
//!
//! Handles command-line argument parsing and delegates to appropriate command handlers.

use crate::commands;
use crate::logging;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use std::io;
use three_play::ThreePlayApi;

/// Command-line client for the 3Play Media API
#[derive(Parser)]
#[command(name = "three-play")]
#[command(version)]
#[command(
    long_about = "Command-line client for the 3Play Media API (v3).\n\nResults are printed to stdout as JSON.\n\nEXAMPLES:\n    # Media files whose name contains \"Testing\"\n    $ three-play media list --name-partial Testing\n    \n    # Latest media file for a YouTube video\n    $ three-play media latest abc123\n    \n    # SRT captions for a transcript, trimmed by 32 seconds\n    $ three-play transcript text 5550001 --start-seconds 32.012\n    \n    # Order a rush transcript\n    $ three-play order transcription abc123 \"Product Demo\" --turnaround rush"
)]
#[command(
    after_help = "CONFIGURATION:\n    API key:            $3PLAY_API_KEY (or [api] api_key in the config file)\n    Config file:        ~/.config/three-play/three-play.toml\n    Logs:               ~/.local/state/three-play/three-play.log.*"
)]
struct Cli {
    /// API key for this invocation, instead of $3PLAY_API_KEY
    #[arg(long, global = true)]
    api_key: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Media files
    #[command(subcommand)]
    Media(MediaCommand),

    /// List transcripts for a video
    ///
    /// Fails when the video has no transcripts matching the filters.
    Transcripts {
        /// Video id on the integrated platform
        video_id: String,

        /// Only transcripts with this status (in_progress, pending, complete, cancelled)
        #[arg(long)]
        status: Option<String>,

        /// Only default transcripts
        #[arg(long = "default")]
        default_only: bool,

        /// Newest first
        #[arg(long)]
        latest_first: bool,

        /// Only the transcripts currently shown as captions
        #[arg(long, conflicts_with_all = ["status", "default_only"])]
        active: bool,
    },

    /// A single transcript
    #[command(subcommand)]
    Transcript(TranscriptCommand),

    /// Languages supported by 3Play
    Languages {
        /// Substring match on the language name
        #[arg(long)]
        name_partial: Option<String>,
    },

    /// Turnaround levels
    Turnarounds {
        /// Hide prices
        #[arg(long)]
        no_prices: bool,

        /// Show the built-in levels instead of asking 3Play
        #[arg(long)]
        local: bool,
    },

    /// Video platform integrations on the account
    Integrations,

    /// Order captions for a video
    #[command(subcommand)]
    Order(OrderCommand),

    /// Open configuration file in your preferred editor
    ///
    /// Creates the file from a template first if it doesn't exist.
    /// Uses $EDITOR environment variable or falls back to nano/vi.
    #[command(visible_alias = "c")]
    Config,

    /// Show recent log entries from the application
    ///
    /// Display the last 50 lines of the most recent log file.
    Logs,

    /// Generate shell completion script
    ///
    /// Examples:
    ///   three-play completions bash > three-play.bash
    ///   three-play completions zsh > _three-play
    Completions {
        /// The shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum MediaCommand {
    /// List media files
    List {
        /// Exact name
        #[arg(long)]
        name: Option<String>,

        /// Substring match on the name
        #[arg(long)]
        name_partial: Option<String>,

        /// Video id on the integrated platform
        #[arg(long)]
        video_id: Option<String>,

        /// Newest first
        #[arg(long)]
        latest_first: bool,

        /// Page size
        #[arg(long)]
        per_page: Option<u32>,
    },

    /// Show a media file
    Get { media_file_id: u64 },

    /// Latest media file for a video
    Latest { video_id: String },

    /// Archive media files
    Archive {
        #[arg(required = true)]
        media_file_ids: Vec<u64>,
    },
}

#[derive(Subcommand)]
pub enum TranscriptCommand {
    /// Print SRT captions for a transcript
    Text {
        transcript_id: u64,

        /// Seconds to trim from the start, e.g. 32.012
        #[arg(long)]
        start_seconds: Option<String>,

        /// Cut out the dialogue from this timestamp (HH:mm:ss,SSS)...
        #[arg(long, requires = "cut_to")]
        cut_from: Option<String>,

        /// ...up to this timestamp
        #[arg(long, requires = "cut_from")]
        cut_to: Option<String>,
    },

    /// Expiring edit link for a transcript, or the latest one of a video
    EditUrl {
        /// Transcript id
        #[arg(long, conflicts_with = "video_id", required_unless_present = "video_id")]
        id: Option<u64>,

        /// Video id on the integrated platform
        #[arg(long)]
        video_id: Option<String>,

        /// Hours until the link expires
        #[arg(long, default_value_t = 24)]
        hours: u32,
    },

    /// Cancel pending and in-progress transcripts of a video
    Cancel { video_id: String },
}

#[derive(Subcommand)]
pub enum OrderCommand {
    /// Automated Speech Recognition
    Asr {
        video_id: String,
        video_name: String,

        /// Language spoken in the video
        #[arg(long, default_value = "English")]
        language: String,

        /// URL notified when the order completes
        #[arg(long)]
        callback: Option<String>,
    },

    /// Professional transcription
    Transcription {
        video_id: String,
        video_name: String,

        /// Language spoken in the video
        #[arg(long, default_value = "English")]
        language: String,

        /// Turnaround level, e.g. "standard", "rush", "same day"
        #[arg(long)]
        turnaround: Option<String>,

        /// URL notified when the order completes
        #[arg(long)]
        callback: Option<String>,
    },
}

/// Runs the main application based on command-line arguments.
///
/// # Errors
/// - If logging initialization fails
/// - If the configuration cannot be loaded
/// - If a 3Play request fails
pub async fn run() -> Result<(), anyhow::Error> {
    let cli = Cli::parse();

    // Handle commands that don't need logging or the API client
    match &cli.command {
        Commands::Completions { shell } => {
            generate(*shell, &mut Cli::command(), "three-play", &mut io::stdout());
            return Ok(());
        }
        Commands::Logs => return commands::handle_logs(),
        _ => {}
    }

    logging::init_logging()?;

    if let Commands::Config = cli.command {
        return commands::handle_config();
    }

    if let Some(api_key) = cli.api_key {
        three_play::configure(api_key);
    }
    let api = ThreePlayApi::from_env()?;
    tracing::debug!("Using config: {:?}", api.config());

    match cli.command {
        Commands::Media(command) => commands::handle_media(&api, command).await?,
        Commands::Transcripts {
            video_id,
            status,
            default_only,
            latest_first,
            active,
        } => {
            if active {
                commands::handle_active_transcripts(&api, &video_id).await?;
            } else {
                commands::handle_transcripts(&api, &video_id, status.as_deref(), default_only, latest_first)
                    .await?;
            }
        }
        Commands::Transcript(command) => commands::handle_transcript(&api, command).await?,
        Commands::Languages { name_partial } => commands::handle_languages(&api, name_partial).await?,
        Commands::Turnarounds { no_prices, local } => {
            commands::handle_turnarounds(&api, !no_prices, local).await?
        }
        Commands::Integrations => commands::handle_integrations(&api).await?,
        Commands::Order(command) => commands::handle_order(&api, command).await?,
        Commands::Config | Commands::Logs | Commands::Completions { .. } => {
            unreachable!("These commands are handled earlier")
        }
    }

    Ok(())
}
