use clap::{ArgGroup, Parser, Subcommand};
use friday_core::FeedbackCategory;
use std::path::PathBuf;

/// CLI arguments for friday-cli
#[derive(Debug, Parser)]
#[command(
    name = "friday",
    version,
    about = "Drive the Friday waitlist client from the terminal"
)]
pub struct CliArgs {
    /// JSON config file; `FRIDAY_*` environment variables still override it
    #[arg(short = 'c', long = "config", env = "FRIDAY_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Durable store file (geo cache, banner flag). Overrides `store_path`
    #[arg(short = 's', long = "store", global = true)]
    pub store: Option<PathBuf>,

    /// Print machine-readable JSON instead of text
    #[arg(long = "json", global = true)]
    pub json: bool,

    /// More logging (-v debug, -vv trace). Ignored when RUST_LOG is set
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Type a query into the city search, one keystroke at a time
    Search {
        /// What the visitor types (e.g. "Seattle")
        query: String,

        /// Delay between simulated keystrokes, in milliseconds
        #[arg(long = "keystroke-ms", default_value_t = 80)]
        keystroke_ms: u64,
    },

    /// Resolve the visitor's region and show the gate decision
    Geo {
        /// Drop the cached resolution first
        #[arg(long)]
        refresh: bool,
    },

    /// Join the waitlist (gated on region)
    #[command(group(ArgGroup::new("place").required(true).args(["city_id", "city"])))]
    Signup {
        #[arg(long)]
        name: String,

        #[arg(long)]
        email: String,

        /// Id of a city picked from search results
        #[arg(long = "city-id")]
        city_id: Option<u64>,

        /// Free-text city when the list has no match ("Other")
        #[arg(long)]
        city: Option<String>,

        /// State / region code
        #[arg(long)]
        state: Option<String>,
    },

    /// Send a message through the contact form
    Feedback {
        #[arg(long, default_value = "")]
        name: String,

        #[arg(long)]
        email: String,

        #[arg(long, default_value_t = FeedbackCategory::General)]
        category: FeedbackCategory,

        message: String,
    },

    /// Inspect or change the "not in your region" banner flag
    Banner {
        #[command(subcommand)]
        action: BannerAction,
    },
}

#[derive(Debug, Clone, Copy, Subcommand)]
pub enum BannerAction {
    /// Whether the banner would show right now
    Status,
    /// Remember that the visitor closed it
    Dismiss,
    /// Forget the dismissal
    Reset,
}
