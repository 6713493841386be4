use colored::Colorize;
use dematbt_core::card::{Card, DaySummary};
use serde::Serialize;

use crate::prelude::{println, *};

/// JSON shape of `dematbt cards --json`.
#[derive(Debug, Serialize)]
pub struct CardsOutput<'a> {
    pub file_name: Option<&'a str>,
    pub summary: &'a DaySummary,
    pub cards: &'a [Card],
}

pub fn print_summary(summary: &DaySummary) {
    let mut table = new_table();
    table.add_row(prettytable::row![
        "Journée".bold().cyan(),
        "BT".bold().cyan(),
        "Docs".bold().cyan()
    ]);
    table.add_row(prettytable::row![
        summary.day.bright_white(),
        summary.tickets.bright_yellow(),
        summary.documents.bright_magenta()
    ]);
    table.printstd();

    println!();
    println!("{}", summary.subtitle.dimmed());
}

pub fn print_cards(cards: &[Card]) {
    for card in cards {
        println!();
        print_card(card);
    }
}

fn print_card(card: &Card) {
    let badges = card
        .badges
        .iter()
        .map(|b| f!("[{}]", b))
        .collect::<Vec<_>>()
        .join(" ");
    println!("{} {}", card.title.bold().bright_yellow(), badges.bright_blue());

    if card.fields.is_empty() {
        if let Some(hint) = &card.hint {
            println!("  {}", hint.dimmed());
        }
    } else {
        let mut table = new_table();
        for field in &card.fields {
            table.add_row(prettytable::row![field.label.bold().cyan(), field.value]);
        }
        table.printstd();
    }

    let chips = card
        .chips
        .iter()
        .map(|c| c.label.green().to_string())
        .collect::<Vec<_>>()
        .join("  ");
    println!("  {}", chips);
}

/// Pretty-printed JSON on stdout.
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| eyre!("Failed to serialize output: {}", e))?;
    println!("{}", json);
    Ok(())
}
