use colored::Colorize;
use dematbt_core::card::{cards, day_summary};
use dematbt_core::session::Session;

use crate::cache;
use crate::output::{self, CardsOutput};
use crate::prelude::{eprintln, println, *};

#[derive(Debug, Clone, clap::Args)]
pub struct Options {
    /// Output the summary and cards as JSON
    #[arg(long)]
    pub json: bool,
}

/// Session rebuilt from the cache, empty when nothing was cached.
fn restore_session(global: &crate::Global) -> Result<(Session, Option<cache::CacheEntry>)> {
    let mut session = Session::new();
    if global.no_cache {
        return Ok((session, None));
    }

    let entry = cache::load()?;
    if let Some(entry) = &entry {
        session.restore(entry.file_name.clone(), entry.result.clone());
    }
    Ok((session, entry))
}

pub async fn run(options: Options, global: crate::Global) -> Result<()> {
    let (session, entry) = restore_session(&global)?;

    let summary = day_summary(session.day(), session.result());
    let ticket_cards = session.result().map(cards).unwrap_or_default();

    if options.json {
        return output::print_json(&CardsOutput {
            file_name: entry.as_ref().map(|e| e.file_name.as_str()),
            summary: &summary,
            cards: &ticket_cards,
        });
    }

    if let Some(entry) = &entry {
        println!(
            "{} {}",
            entry.file_name.bold(),
            f!("(extrait le {})", entry.extracted_at.format("%Y-%m-%d %H:%M UTC")).dimmed()
        );
        println!();
    } else if global.verbose {
        eprintln!("{}", Error::NothingCached.to_string().yellow());
    }

    output::print_summary(&summary);
    output::print_cards(&ticket_cards);

    Ok(())
}
