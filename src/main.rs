use std::sync::Arc;

use clap::{
    CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};

use playlistsmith::{
    cli,
    config::{self, Config},
    error,
    sorter::{Criterion, Direction},
    types::PkceToken,
    utils,
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
    /// Authorize with Spotify API
    Auth,

    /// List your playlists
    Playlists(PlaylistsOptions),

    /// Show a playlist and its tracks
    Show(ShowOptions),

    /// Sort the tracks of a playlist and save the new order
    Sort(SortOptions),

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct PlaylistsOptions {
    /// Only show playlists whose name contains this text
    #[clap(long)]
    pub search: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct ShowOptions {
    /// Playlist id, spotify:playlist: URI or open.spotify.com link
    #[clap(value_parser = utils::parse_playlist_id)]
    pub playlist: String,
}

#[derive(Parser, Debug, Clone)]
pub struct SortOptions {
    /// Playlist id, spotify:playlist: URI or open.spotify.com link
    #[clap(value_parser = utils::parse_playlist_id)]
    pub playlist: String,

    /// Sort key: artist, release-date, duration or popularity
    #[clap(long)]
    pub by: Criterion,

    /// Sort direction: asc or desc
    #[clap(long, default_value = "asc")]
    pub order: Direction,

    /// Print the new order without changing the playlist
    #[clap(long)]
    pub dry_run: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

fn load_config() -> Config {
    match Config::from_env() {
        Ok(config) => config,
        Err(e) => error!(
            "Invalid configuration: {}\nSee {}",
            e,
            config::data_dir().join(".env.example").display()
        ),
    }
}

#[tokio::main]
async fn main() {
    if let Err(e) = config::load_env().await {
        error!("Cannot load environment. Err: {}", e);
    }

    let cli = Cli::parse();

    match cli.command {
        Command::Auth => {
            let oauth_result: Arc<Mutex<Option<PkceToken>>> = Arc::new(Mutex::new(None));
            cli::auth(Arc::new(load_config()), Arc::clone(&oauth_result)).await;
        }
        Command::Playlists(opt) => cli::list_playlists(&load_config(), opt.search).await,
        Command::Show(opt) => cli::show(&load_config(), opt.playlist).await,
        Command::Sort(opt) => {
            cli::sort(&load_config(), opt.playlist, opt.by, opt.order, opt.dry_run).await
        }
        Command::Completions(opt) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(opt.shell, &mut cmd, name, &mut std::io::stdout())
        }
    }
}
