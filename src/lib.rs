//! spotvibe library
//!
//! Personal Spotify statistics: this library authenticates against the Spotify
//! Web API, extracts the user's top tracks per listening window into a local
//! SQLite cache, derives genre distributions from them and looks up song
//! suggestions. The same building blocks back the `spotvibe` command-line
//! interface and the local web dashboard.
//!
//! # Modules
//!
//! - `api` - HTTP handlers of the dashboard and the OAuth callback
//! - `cli` - Command-line interface implementations
//! - `config` - Configuration management and environment variables
//! - `error` - Error types shared across the crate
//! - `management` - Token cache and the SQLite track store
//! - `server` - Router and shared state of the local HTTP server
//! - `spotify` - Spotify Web API client implementation
//! - `stats` - Top-track extraction, genre statistics and suggestions
//! - `types` - Data structures and type definitions
//! - `utils` - Utility functions and helpers
//!
//! # Example
//!
//! ```
//! use spotvibe::{config, cli};
//!
//! #[tokio::main]
//! async fn main() -> spotvibe::Res<()> {
//!     config::load_env().await?;
//!     // Use CLI functions...
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod management;
pub mod server;
pub mod spotify;
pub mod stats;
pub mod types;
pub mod utils;

/// A convenient Result type alias for operations that may fail.
///
/// Used at the edges of the application (CLI commands, server start-up) where
/// errors of different concerns meet and are only reported, never matched on.
///
/// # Example
///
/// ```
/// use spotvibe::Res;
///
/// async fn fetch_data() -> Res<String> {
///     Ok("data".to_string())
/// }
/// ```
pub type Res<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Prints an informational message with a blue bullet point.
///
/// # Example
///
/// ```
/// info!("Fetching top tracks for {}...", term);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success message with a green checkmark.
///
/// # Example
///
/// ```
/// success!("Stored {} tracks", count);
/// ```
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error message with a red exclamation mark and exits the program.
///
/// Only the command-line front end uses this macro. Handlers of the web
/// dashboard report failures through [`warning!`] and an error page instead,
/// because terminating the process there would take the dashboard down.
///
/// # Example
///
/// ```
/// error!("Failed to load token. Please run spotvibe auth");
/// // Program exits here - code after this will not execute
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning message with a yellow exclamation mark.
///
/// Degraded lookups (an artist without genre data, a seed track that cannot
/// be validated) are reported through this macro while processing goes on.
///
/// # Example
///
/// ```
/// warning!("Error fetching genres for artist {}: {}", artist_id, err);
/// ```
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
