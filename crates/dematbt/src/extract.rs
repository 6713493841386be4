use std::path::PathBuf;

use colored::Colorize;
use dematbt_core::card::{cards, day_summary};
use dematbt_core::session::{Session, SessionError};
use indicatif::{ProgressBar, ProgressStyle};
use pdf::PdfDocument;

use crate::cache::{self, CacheEntry};
use crate::output;
use crate::prelude::{println, *};

#[derive(Debug, Clone, clap::Args)]
pub struct Options {
    /// Path to the day's PDF (e.g. JOURNEE_2024-03-07_site.pdf)
    pub path: PathBuf,

    /// Output the extraction result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Name the session knows the file by; the day is read from it.
fn file_name_of(path: &std::path::Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn progress_bar() -> ProgressBar {
    let bar = ProgressBar::new(0);
    bar.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.cyan} [{bar:30.cyan/blue}] {msg}")
            .unwrap()
            .progress_chars("=> "),
    );
    bar
}

/// Read, segment and return the session holding the result.
///
/// Runs on a blocking thread: the PDF walk is synchronous.
async fn extract_session(
    path: PathBuf,
    options: dematbt_core::extract::ExtractOptions,
    bar: ProgressBar,
) -> Result<Session> {
    let bytes = std::fs::read(&path).wrap_err_with(|| f!("Failed to read {}", path.display()))?;
    let file_name = file_name_of(&path);

    tokio::task::spawn_blocking(move || -> Result<Session> {
        let mut session = Session::new();
        session.select_file(file_name, bytes);

        session
            .extract(PdfDocument::from_bytes, &options, |p| {
                bar.set_length(p.total as u64);
                bar.set_position(p.page as u64);
                bar.set_message(f!("Analyse page {}/{}…", p.page, p.total));
            })
            .map_err(|e| match e {
                SessionError::NoFileSelected => eyre!(Error::NoPdfSelected),
                SessionError::Source(e) => {
                    eyre!(e).wrap_err(f!("Failed to extract {}", path.display()))
                }
            })?;

        Ok(session)
    })
    .await?
}

pub async fn run(options: Options, global: crate::Global) -> Result<()> {
    let extract_options = global.extract_options();

    if global.verbose {
        println!("File: {}", options.path.display());
        println!("Address window: {}", extract_options.address_window);
        println!();
    }

    let bar = progress_bar();
    let session = extract_session(options.path.clone(), extract_options, bar.clone()).await;
    bar.finish_and_clear();
    let session = session?;

    let result = session.result().ok_or_else(|| eyre!(Error::NoPdfSelected))?;

    if !global.no_cache {
        cache::store(&CacheEntry::new(session.file_name(), result.clone()));
    }

    if options.json {
        return output::print_json(result);
    }

    output::print_summary(&day_summary(session.day(), Some(result)));
    output::print_cards(&cards(result));

    if result.tickets.is_empty() {
        println!();
        println!("{}", "Aucun BT détecté dans ce PDF.".yellow());
    }

    Ok(())
}
