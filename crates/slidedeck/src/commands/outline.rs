use std::path::Path;

use anyhow::Result;
use colored::Colorize;

use crate::deck::{self, Deck};

pub fn run(file: &Path) -> Result<()> {
    let deck = deck::load(file)?;

    if let Some(title) = &deck.meta().title {
        println!("{}", title.bold());
    }
    if let Some(author) = &deck.meta().author {
        println!("{}", author.dimmed());
    }

    let width = deck.len().to_string().len();
    for entry in entries(&deck) {
        let number = format!("{:>width$}.", entry.number);
        let marker = if entry.has_notes {
            " [notes]".yellow().to_string()
        } else {
            String::new()
        };
        println!("  {} {}{marker}", number.dimmed(), entry.title);
    }

    let with_notes = deck.slides().filter(|s| s.has_notes()).count();
    println!();
    println!(
        "{} slide(s), {} with speaker notes",
        deck.len().to_string().green().bold(),
        with_notes
    );
    Ok(())
}

struct Entry<'a> {
    number: usize,
    title: &'a str,
    has_notes: bool,
}

fn entries(deck: &Deck) -> Vec<Entry<'_>> {
    deck.slides()
        .enumerate()
        .map(|(i, slide)| Entry {
            number: i + 1,
            title: &slide.title,
            has_notes: slide.has_notes(),
        })
        .collect()
}
