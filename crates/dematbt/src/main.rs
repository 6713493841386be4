use crate::prelude::*;
use clap::Parser;
use dematbt_core::extract::{ExtractOptions, DEFAULT_ADDRESS_WINDOW};

mod cache;
mod cards;
mod error;
mod extract;
mod output;
mod prelude;
mod view;

#[derive(Debug, clap::Parser)]
#[command(
    author,
    version,
    about,
    long_about = "Split a day's work-order PDF into tickets (BT) and the documents attached to each"
)]
pub struct App {
    #[command(subcommand)]
    pub command: SubCommands,

    #[clap(flatten)]
    global: Global,
}

#[derive(Debug, Clone, clap::Args)]
pub struct Global {
    /// Whether to display additional information.
    #[clap(long, env = "DEMATBT_VERBOSE", global = true, default_value = "false")]
    verbose: bool,

    /// Characters kept from the street number when capturing an address
    #[clap(long, env = "DEMATBT_ADDRESS_WINDOW", global = true, default_value_t = DEFAULT_ADDRESS_WINDOW)]
    address_window: usize,

    /// Do not read or write the local result cache
    #[clap(long, env = "DEMATBT_NO_CACHE", global = true, default_value = "false")]
    no_cache: bool,
}

impl Global {
    pub fn extract_options(&self) -> ExtractOptions {
        ExtractOptions {
            address_window: self.address_window,
        }
    }
}

#[derive(Debug, clap::Parser)]
pub enum SubCommands {
    /// Extract tickets and their documents from a day's PDF
    Extract(crate::extract::Options),

    /// Show the cards of the last extraction
    Cards(crate::cards::Options),

    /// Print one page of a PDF as text
    View(crate::view::Options),

    /// Manage the local result cache
    Cache(crate::cache::App),
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    color_eyre::install()?;

    let app = App::parse();

    match app.command {
        SubCommands::Extract(options) => crate::extract::run(options, app.global).await,
        SubCommands::Cards(options) => crate::cards::run(options, app.global).await,
        SubCommands::View(options) => crate::view::run(options, app.global).await,
        SubCommands::Cache(sub_app) => crate::cache::run(sub_app, app.global).await,
    }
    .map_err(|err: color_eyre::eyre::Report| eyre!(err))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        App::command().debug_assert();
    }

    #[test]
    fn test_global_defaults() {
        let app = App::try_parse_from(["dematbt", "cards"]).unwrap();
        assert!(!app.global.no_cache);
        assert_eq!(app.global.extract_options(), ExtractOptions::default());
    }

    #[test]
    fn test_address_window_flag() {
        let app =
            App::try_parse_from(["dematbt", "extract", "day.pdf", "--address-window", "80"]).unwrap();
        assert_eq!(app.global.extract_options().address_window, 80);
        assert!(matches!(app.command, SubCommands::Extract(_)));
    }
}
