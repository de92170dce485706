//! Fragments CLI Library
//!
//! This library provides a typed client for the fragments microservice
//! together with the collaborators a front end needs around it: sign-in
//! against the hosted identity provider, a local session cache, format
//! helpers and the command-line layer.
//!
//! # Modules
//!
//! - `api` - HTTP endpoints of the local sign-in callback server
//! - `cli` - Command-line interface implementations
//! - `config` - Configuration management and environment variables
//! - `formats` - Conversion options and content validation per fragment type
//! - `fragments` - Fragments microservice client
//! - `identity` - Sign-in, sign-out and the signed-in user
//! - `management` - Session cache on disk
//! - `server` - Local HTTP server for OAuth callbacks
//! - `types` - Data structures and type definitions
//! - `utils` - Utility functions and helpers
//!
//! # Example
//!
//! ```
//! use fragcli::{config, fragments::{BearerCredential, FragmentsClient}};
//!
//! #[tokio::main]
//! async fn main() -> fragcli::Res<()> {
//!     config::load_env().await?;
//!     let client = FragmentsClient::from_env();
//!     let listing = client.list_fragments(&BearerCredential::new("eyJ...")).await;
//!     println!("{} fragments", listing.fragments.len());
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod formats;
pub mod fragments;
pub mod identity;
pub mod management;
pub mod server;
pub mod types;
pub mod utils;

/// A convenient Result type alias for operations that may fail.
///
/// Used by the CLI and identity plumbing where errors are only ever shown
/// to the user. The fragments client has its own typed error,
/// [`fragments::FragmentsError`].
pub type Res<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Prints an informational message with a blue bullet point.
///
/// # Example
///
/// ```
/// info!("Opening browser for sign-in...");
/// info!("Found {} fragments", count);
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
/// success!("Fragment {} deleted", id);
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
/// Only for the CLI edge. Library code returns errors instead.
///
/// # Example
///
/// ```
/// error!("Not signed in. Run fragcli auth");
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
/// # Example
///
/// ```
/// warning!("Unable to list fragments: {}", err);
/// ```
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a dimmed tracing line to stderr when `FRAGCLI_DEBUG` is set.
///
/// Keeps stdout clean for command output such as fragment bodies piped to
/// another program.
///
/// # Example
///
/// ```
/// debug!("Requesting fragment {}...", id);
/// ```
#[macro_export]
macro_rules! debug {
  ($($arg:tt)*) => ({
    if $crate::config::debug_enabled() {
      use colored::Colorize;
      eprintln!("[{}] {}", "~".dimmed(), std::format_args!($($arg)*));
    }
  })
}
