use std::{path::PathBuf, sync::Arc};

use clap::{
    Args, CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};

use fragcli::{
    cli::{self, ContentSource},
    config, error,
    types::PkceSession,
};
use tokio::sync::Mutex;

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::White.on_default() | Effects::BOLD)
        .usage(AnsiColor::White.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightBlue.on_default())
        .placeholder(AnsiColor::BrightGreen.on_default())
}

#[derive(Parser, Debug, Clone)]
#[clap(
  version = env!("CARGO_PKG_VERSION"),
  name=env!("CARGO_PKG_NAME"),
  bin_name=env!("CARGO_PKG_NAME"),
  author=env!("CARGO_PKG_AUTHORS"),
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Sign in through the hosted identity provider
    Auth,

    /// Sign out and forget the cached session
    Logout,

    /// Show the signed-in user
    Whoami,

    /// List your fragments
    List(ListOptions),

    /// Create a fragment from text or a file
    Create(CreateOptions),

    /// Print a fragment's data
    Get(FragmentId),

    /// Replace a fragment's data (the type cannot change)
    Update(UpdateOptions),

    /// Delete a fragment
    Delete(FragmentId),

    /// Fetch a fragment converted to another format
    Convert(ConvertOptions),

    /// Show supported types, or the conversions for one type
    Formats(FormatsOptions),

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct ListOptions {
    /// Fail instead of showing an empty list when the service is unreachable
    #[clap(long)]
    pub strict: bool,
}

#[derive(Args, Debug, Clone)]
#[group(required = true, multiple = false)]
pub struct ContentArgs {
    /// Read content from a file
    #[clap(long)]
    pub file: Option<PathBuf>,

    /// Use the given text as content
    #[clap(long)]
    pub data: Option<String>,
}

impl ContentArgs {
    fn source(self) -> ContentSource {
        match (self.file, self.data) {
            (Some(path), _) => ContentSource::File(path),
            (None, data) => ContentSource::Inline(data.unwrap_or_default()),
        }
    }
}

#[derive(Parser, Debug, Clone)]
pub struct CreateOptions {
    #[command(flatten)]
    pub content: ContentArgs,

    /// Content type; detected from the file extension when omitted
    #[clap(long = "type")]
    pub content_type: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct UpdateOptions {
    pub id: String,

    #[command(flatten)]
    pub content: ContentArgs,

    /// Must equal the fragment's current type
    #[clap(long = "type")]
    pub content_type: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct FragmentId {
    pub id: String,
}

#[derive(Parser, Debug, Clone)]
pub struct ConvertOptions {
    pub id: String,

    /// Target extension, e.g. html, txt, json, png
    pub extension: String,

    /// Write the result to this file
    #[clap(long, short)]
    pub output: Option<PathBuf>,
}

#[derive(Parser, Debug, Clone)]
pub struct FormatsOptions {
    /// Fragment content type, e.g. text/markdown
    pub content_type: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

#[tokio::main]
async fn main() {
    if let Err(e) = config::load_env().await {
        error!("Cannot load environment. Err: {}", e);
    }

    let cli = Cli::parse();

    match cli.command {
        Command::Auth => {
            let pkce_state: Arc<Mutex<Option<PkceSession>>> = Arc::new(Mutex::new(None));
            cli::auth(Arc::clone(&pkce_state)).await;
        }
        Command::Logout => cli::logout().await,
        Command::Whoami => cli::whoami().await,
        Command::List(opt) => cli::list(opt.strict).await,
        Command::Create(opt) => cli::create(opt.content.source(), opt.content_type).await,
        Command::Get(opt) => cli::get(opt.id).await,
        Command::Update(opt) => {
            cli::update(opt.id, opt.content.source(), opt.content_type).await
        }
        Command::Delete(opt) => cli::delete(opt.id).await,
        Command::Convert(opt) => cli::convert(opt.id, opt.extension, opt.output).await,
        Command::Formats(opt) => cli::formats(opt.content_type),
        Command::Completions(opt) => {
            let mut cmd = Cli::command_for_update();
            let name = cmd.get_name().to_string();
            generate(opt.shell, &mut cmd, name, &mut std::io::stdout())
        }
    }
}
