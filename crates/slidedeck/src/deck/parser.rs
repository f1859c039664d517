use std::sync::LazyLock;

use regex::Regex;

use super::{Deck, DeckError, DeckMeta, Slide, splitter};

static HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#{1,3}\s+(.+?)\s*#*\s*$").expect("valid heading regex"));

static LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]]+)\]\([^)]*\)").expect("valid link regex"));

static EMPHASIS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*|__|`").expect("valid emphasis regex"));

/// Lines that open the speaker notes section of a slide.
static NOTES_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?i:notes?:|\?\?\?)\s*$").expect("valid notes regex"));

/// Build a deck from markdown source.
pub fn parse(content: &str) -> Result<Deck, DeckError> {
    let (meta, body) = extract_frontmatter(content)?;
    let slides: Vec<Slide> = splitter::split(body)
        .iter()
        .enumerate()
        .map(|(i, raw)| parse_slide(raw, i))
        .collect();
    tracing::debug!(slides = slides.len(), "parsed deck source");
    Deck::with_meta(meta, slides)
}

/// Split a leading `---` YAML block off the document.
fn extract_frontmatter(content: &str) -> Result<(DeckMeta, &str), DeckError> {
    let trimmed = content.trim_start_matches('\u{feff}');
    let Some(rest) = trimmed
        .strip_prefix("---\n")
        .or_else(|| trimmed.strip_prefix("---\r\n"))
    else {
        return Ok((DeckMeta::default(), trimmed));
    };

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == "---" {
            let yaml = &rest[..offset];
            let body = &rest[offset + line.len()..];
            let meta = if yaml.trim().is_empty() {
                DeckMeta::default()
            } else {
                serde_yaml::from_str(yaml)?
            };
            return Ok((meta, body));
        }
        offset += line.len();
    }

    // No closing fence: treat the whole thing as body.
    Ok((DeckMeta::default(), trimmed))
}

fn parse_slide(raw: &str, index: usize) -> Slide {
    let mut content_lines = Vec::new();
    let mut notes_lines = Vec::new();
    let mut in_notes = false;
    let mut in_fence = false;

    for line in raw.lines() {
        let trimmed = line.trim();
        if trimmed.starts_with("```") || trimmed.starts_with("~~~") {
            in_fence = !in_fence;
        }
        if !in_notes && !in_fence && NOTES_MARKER.is_match(trimmed) {
            in_notes = true;
            continue;
        }
        if in_notes {
            notes_lines.push(line);
        } else {
            content_lines.push(line);
        }
    }

    let content = content_lines.join("\n").trim().to_string();
    let title = slide_title(&content).unwrap_or_else(|| format!("Slide {}", index + 1));
    Slide::new(title, content).with_notes(notes_lines.join("\n").trim())
}

/// First heading text, else the first non-empty line.
fn slide_title(content: &str) -> Option<String> {
    let heading = content
        .lines()
        .find_map(|line| HEADING.captures(line.trim()))
        .map(|caps| plain_text(&caps[1]));
    heading.or_else(|| {
        content
            .lines()
            .map(str::trim)
            .find(|l| !l.is_empty())
            .map(plain_text)
    })
}

/// Drop link targets and emphasis markers, keeping the visible text.
pub fn plain_text(text: &str) -> String {
    let text = LINK.replace_all(text, "$1");
    EMPHASIS.replace_all(&text, "").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_titles_from_headings() {
        let deck = parse("# Welcome\n\nHello\n\n# The Challenge\n\n- one\n- two").unwrap();
        assert_eq!(deck.len(), 2);
        assert_eq!(deck.slide_at(0).unwrap().title, "Welcome");
        assert_eq!(deck.slide_at(1).unwrap().title, "The Challenge");
    }

    #[test]
    fn test_h2_title_and_closing_hashes() {
        let deck = parse("## Architecture ##\n\nLayers").unwrap();
        assert_eq!(deck.slide_at(0).unwrap().title, "Architecture");
    }

    #[test]
    fn test_title_falls_back_to_first_line() {
        let deck = parse("\"How do you get a global view?\"").unwrap();
        assert_eq!(
            deck.slide_at(0).unwrap().title,
            "\"How do you get a global view?\""
        );
    }

    #[test]
    fn test_title_drops_inline_markup() {
        let deck = parse("# The **Challenge** of [Nostr](https://nostr.com)").unwrap();
        assert_eq!(deck.slide_at(0).unwrap().title, "The Challenge of Nostr");
    }

    #[test]
    fn test_plain_text() {
        assert_eq!(
            plain_text("Events on **hundreds** of `relays`, see [docs](https://x.y)"),
            "Events on hundreds of relays, see docs"
        );
    }

    #[test]
    fn test_notes_section() {
        let src = "# Nostr\n\nRelays and keys\n\nNotes:\nUsers are their keys.\nNo accounts.";
        let deck = parse(src).unwrap();
        let slide = deck.slide_at(0).unwrap();
        assert_eq!(slide.content, "# Nostr\n\nRelays and keys");
        assert_eq!(
            slide.notes.as_deref(),
            Some("Users are their keys.\nNo accounts.")
        );
    }

    #[test]
    fn test_question_mark_notes_marker() {
        let deck = parse("# A\n\nbody\n\n???\nspeaker text").unwrap();
        assert_eq!(
            deck.slide_at(0).unwrap().notes.as_deref(),
            Some("speaker text")
        );
    }

    #[test]
    fn test_empty_notes_are_absent() {
        let deck = parse("# A\n\nbody\n\nNote:\n").unwrap();
        assert!(!deck.slide_at(0).unwrap().has_notes());
    }

    #[test]
    fn test_notes_marker_inside_code_is_content() {
        let deck = parse("# Code\n\n```\nNote:\n```").unwrap();
        let slide = deck.slide_at(0).unwrap();
        assert!(slide.notes.is_none());
        assert!(slide.content.contains("Note:"));
    }

    #[test]
    fn test_frontmatter() {
        let src = "---\ntitle: BigBrotr\ntheme: dark\nboundary: wrap\n---\n# One\n\n---\n\n# Two";
        let deck = parse(src).unwrap();
        assert_eq!(deck.meta().title.as_deref(), Some("BigBrotr"));
        assert_eq!(deck.meta().theme.as_deref(), Some("dark"));
        assert_eq!(deck.meta().boundary.as_deref(), Some("wrap"));
        assert_eq!(deck.len(), 2);
    }

    #[test]
    fn test_invalid_frontmatter() {
        let err = parse("---\ntitle: [unclosed\n---\n# One").unwrap_err();
        assert!(matches!(err, DeckError::Frontmatter(_)));
    }

    #[test]
    fn test_unclosed_frontmatter_is_body() {
        let deck = parse("---\n\n# Only").unwrap();
        assert_eq!(deck.len(), 1);
        assert_eq!(deck.slide_at(0).unwrap().title, "Only");
    }

    #[test]
    fn test_empty_source_is_empty_deck() {
        assert!(matches!(parse("\n\n   \n"), Err(DeckError::Empty)));
        assert!(matches!(parse("---\ntitle: x\n---\n"), Err(DeckError::Empty)));
    }
}
