use clap::{
    Args, CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};

use spotvibe::{
    cli,
    config::{self, Settings},
    error,
    stats::genres::Grouping,
    types::Term,
};

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
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Authorize with Spotify API
    Auth,

    /// Run the web dashboard
    Serve,

    /// Fetch top tracks from Spotify into the local database
    Refresh(RefreshOptions),

    /// Show stored top tracks
    Tracks(TermOption),

    /// Show the genre distribution and how it changed compared to all time
    Genres(GenresOptions),

    /// Suggest songs based on your top tracks
    Suggest(TermOption),

    /// Show tables and the first rows of the local database
    Db,

    /// Remove the cached Spotify token
    Logout,

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct RefreshOptions {
    /// Refresh only this term (short_term, medium_term or long_term)
    #[clap(long)]
    term: Option<Term>,
}

#[derive(Parser, Debug, Clone)]
pub struct TermOption {
    /// Listening window: short_term, medium_term or long_term
    #[clap(long, default_value = "short_term")]
    term: Term,
}

#[derive(Parser, Debug, Clone)]
pub struct GenresOptions {
    /// Listening window: short_term, medium_term or long_term
    #[clap(long, default_value = "short_term")]
    term: Term,

    #[command(flatten)]
    grouping: GroupingOptions,
}

#[derive(Args, Debug, Clone)]
#[group(multiple = false)]
pub struct GroupingOptions {
    /// Show the N most frequent genres, the rest as "Other"
    #[clap(long, value_name = "N")]
    top: Option<usize>,

    /// Show genres above P percent, the rest as "Other"
    #[clap(long, value_name = "P", value_parser = parse_percentage)]
    threshold: Option<f64>,

    /// Show every genre
    #[clap(long)]
    all: bool,
}

impl GroupingOptions {
    fn grouping(&self) -> Option<Grouping> {
        if self.all {
            Some(Grouping::None)
        } else if let Some(n) = self.top {
            Some(Grouping::TopN(n))
        } else {
            self.threshold.map(Grouping::Threshold)
        }
    }
}

fn parse_percentage(value: &str) -> Result<f64, String> {
    match value.parse::<f64>() {
        Ok(pct) if (0.0..=100.0).contains(&pct) => Ok(pct),
        _ => Err(format!("{} is not a percentage between 0 and 100", value)),
    }
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

    if let Command::Completions(opt) = &cli.command {
        let mut cmd = Cli::command();
        let name = cmd.get_name().to_string();
        generate(opt.shell, &mut cmd, name, &mut std::io::stdout());
        return;
    }

    let settings = match Settings::from_env() {
        Ok(settings) => settings,
        Err(e) => error!("{}", e),
    };

    match cli.command {
        Command::Auth => cli::auth(settings).await,
        Command::Serve => cli::serve(settings).await,
        Command::Refresh(opt) => cli::refresh(settings, opt.term).await,
        Command::Tracks(opt) => cli::tracks(settings, opt.term).await,
        Command::Genres(opt) => cli::genres(settings, opt.term, opt.grouping.grouping()).await,
        Command::Suggest(opt) => cli::suggest(settings, opt.term).await,
        Command::Db => cli::db(settings).await,
        Command::Logout => cli::logout(settings).await,
        Command::Completions(_) => {}
    }
}
