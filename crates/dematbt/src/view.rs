use std::path::PathBuf;

use colored::Colorize;
use dematbt_core::view::RenderRequest;
use pdf::{PdfDocument, RenderedPage};

use crate::prelude::{eprintln, println, *};

#[derive(Debug, Clone, clap::Args)]
pub struct Options {
    /// Path to the PDF
    pub path: PathBuf,

    /// 1-based page number; clamped to the document
    pub page: u32,

    /// Header title, defaults to the file name
    #[arg(long)]
    pub title: Option<String>,
}

fn header(page: &RenderedPage) -> String {
    f!("{} — Page {} / {}", page.title, page.page, page.page_count)
}

/// Set when the requested page was clamped.
fn clamp_note(requested: u32, page: &RenderedPage) -> Option<String> {
    (requested != page.page)
        .then(|| f!("Page {} is out of range, showing page {}", requested, page.page))
}

pub async fn run(options: Options, global: crate::Global) -> Result<()> {
    let title = options.title.clone().unwrap_or_else(|| {
        options
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    });
    let request = RenderRequest::new(options.page, title);

    let rendered = tokio::task::spawn_blocking({
        let path = options.path.clone();
        move || -> Result<RenderedPage> {
            let doc = PdfDocument::open(&path)
                .map_err(|e| eyre!(e).wrap_err(f!("Failed to open {}", path.display())))?;
            if doc.page_count() == 0 {
                return Err(eyre!(Error::EmptyDocument(path)));
            }
            Ok(doc.render(&request)?)
        }
    })
    .await??;

    if let Some(note) = clamp_note(options.page, &rendered) {
        if global.verbose {
            eprintln!("{}", note.yellow());
        }
    }

    println!("{}", header(&rendered).bold());
    println!();
    if rendered.text.is_empty() {
        println!("{}", "(page sans texte)".dimmed());
    } else {
        println!("{}", rendered.text);
    }

    Ok(())
}
