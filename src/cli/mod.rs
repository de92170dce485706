//! # CLI Module
//!
//! Command implementations for `fragcli`. Each command loads the signed-in
//! user, calls the fragments client and reports the outcome with the
//! crate's output macros. Failures end the process with a non-zero exit
//! code and leave local state as it was.
//!
//! ## Command Categories
//!
//! ### Authentication
//!
//! - [`auth`] - Signs in through the Cognito hosted UI
//! - [`logout`] - Drops the cached session and opens the hosted UI logout page
//! - [`whoami`] - Shows the cached user
//!
//! ### Fragment Operations
//!
//! - [`list`] - Table of the user's fragments
//! - [`create`] - Uploads text, a file or an image as a new fragment
//! - [`get`] - Prints a fragment's data
//! - [`update`] - Replaces a fragment's data, keeping its type
//! - [`delete`] - Removes a fragment
//!
//! ### Conversion
//!
//! - [`convert`] - Fetches a fragment in another format
//! - [`formats`] - Lists supported types or the conversions for one type
//!
//! ## Usage Patterns
//!
//! ```bash
//! fragcli auth
//! fragcli create --data "# Hello" --type text/markdown
//! fragcli list
//! fragcli convert <id> html
//! fragcli update <id> --file notes.md
//! fragcli delete <id>
//! ```

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use crate::{error, identity};

mod auth;
mod convert;
mod fragments;

pub use auth::auth;
pub use auth::logout;
pub use auth::whoami;
pub use convert::convert;
pub use convert::formats;
pub use fragments::create;
pub use fragments::delete;
pub use fragments::get;
pub use fragments::list;
pub use fragments::update;

/// Where the content of a create or update comes from.
#[derive(Debug, Clone)]
pub enum ContentSource {
    File(std::path::PathBuf),
    Inline(String),
}

fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    if let Ok(style) = ProgressStyle::with_template("{spinner:.blue} {msg}") {
        pb.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"));
    }
    pb
}

async fn signed_in_user() -> identity::User {
    match identity::current_user().await {
        Ok(user) => user,
        Err(e) => error!("{}", e),
    }
}
