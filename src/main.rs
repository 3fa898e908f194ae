use clap::{
    CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};

use statify::{cli, config, error, spotify::stats::MAX_LIMIT, types::TimeRange};

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::White.on_default() | Effects::BOLD)
        .usage(AnsiColor::White.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightGreen.on_default())
        .placeholder(AnsiColor::BrightBlue.on_default())
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
    /// Print request timings and other debug output
    #[clap(long, short, global = true)]
    verbose: bool,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Connect your Spotify account
    Auth,

    /// Forget the stored session
    Logout,

    /// Show the logged-in user
    Whoami,

    /// Your most played tracks
    Tracks(TopOptions),

    /// Your most played artists
    Artists(TopOptions),

    /// Genre breakdown of your top artists
    Genres(GenreOptions),

    #[clap(about = "Create a playlist from your top tracks")]
    Playlist(PlaylistOptions),

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct TopOptions {
    /// Statistics period
    #[clap(long, value_enum, default_value_t = TimeRange::MediumTerm)]
    pub time_range: TimeRange,

    /// Number of entries to show
    #[clap(long, default_value_t = MAX_LIMIT, value_parser = clap::value_parser!(u32).range(1..=MAX_LIMIT as i64))]
    pub limit: u32,
}

#[derive(Parser, Debug, Clone)]
pub struct GenreOptions {
    /// Statistics period
    #[clap(long, value_enum, default_value_t = TimeRange::MediumTerm)]
    pub time_range: TimeRange,
}

#[derive(Parser, Debug, Clone)]
pub struct PlaylistOptions {
    /// Period the top tracks are taken from
    #[clap(long, value_enum, default_value_t = TimeRange::MediumTerm)]
    pub time_range: TimeRange,

    /// Playlist name (defaults to "My Top Tracks - <period> - <date>")
    #[clap(long)]
    pub name: Option<String>,

    /// Make the playlist public
    #[clap(long)]
    pub public: bool,
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
    if cli.verbose {
        config::set_verbose(true);
    }

    match cli.command {
        Command::Auth => cli::auth().await,
        Command::Logout => cli::logout().await,
        Command::Whoami => cli::whoami().await,
        Command::Tracks(opt) => cli::top_tracks(opt.time_range, opt.limit).await,
        Command::Artists(opt) => cli::top_artists(opt.time_range, opt.limit).await,
        Command::Genres(opt) => cli::genres(opt.time_range).await,
        Command::Playlist(opt) => cli::playlist(opt.time_range, opt.name, opt.public).await,
        Command::Completions(opt) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(opt.shell, &mut cmd, name, &mut std::io::stdout())
        }
    }
}
