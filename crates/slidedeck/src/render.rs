use eframe::egui;

use crate::deck::parser::plain_text as inline_text;
use crate::theme::Theme;

/// A slide content line, classified for drawing.
#[derive(Debug, Clone, PartialEq)]
pub enum TextLine {
    Heading { level: u8, text: String },
    Bullet { depth: usize, text: String },
    Code(String),
    Paragraph(String),
    Blank,
}

/// Classify markdown-ish slide content. The heading that supplied the
/// slide title is dropped since the header already shows it.
pub fn classify(content: &str, title: &str) -> Vec<TextLine> {
    let mut lines = Vec::new();
    let mut title_seen = false;
    let mut in_fence = false;

    for raw in content.lines() {
        let trimmed = raw.trim();
        if trimmed.starts_with("```") || trimmed.starts_with("~~~") {
            in_fence = !in_fence;
            continue;
        }
        if in_fence {
            lines.push(TextLine::Code(raw.to_string()));
            continue;
        }
        if trimmed.is_empty() {
            if !matches!(lines.last(), None | Some(TextLine::Blank)) {
                lines.push(TextLine::Blank);
            }
            continue;
        }

        let hashes = trimmed.chars().take_while(|&c| c == '#').count();
        if (1..=6).contains(&hashes) && trimmed[hashes..].starts_with(' ') {
            let text = inline_text(trimmed[hashes..].trim().trim_end_matches('#').trim());
            if !title_seen && text == title {
                title_seen = true;
                continue;
            }
            lines.push(TextLine::Heading {
                level: hashes as u8,
                text,
            });
            continue;
        }

        let indent = raw.len() - raw.trim_start().len();
        if let Some(item) = trimmed
            .strip_prefix("- ")
            .or_else(|| trimmed.strip_prefix("* "))
            .or_else(|| trimmed.strip_prefix("+ "))
        {
            lines.push(TextLine::Bullet {
                depth: indent / 2,
                text: inline_text(item),
            });
            continue;
        }

        lines.push(TextLine::Paragraph(inline_text(trimmed)));
    }

    while matches!(lines.last(), Some(TextLine::Blank)) {
        lines.pop();
    }
    lines
}

pub fn compute_scale(rect: egui::Rect) -> f32 {
    (rect.width() / 1280.0).min(rect.height() / 720.0).max(0.5)
}

pub fn draw_content(ui: &mut egui::Ui, lines: &[TextLine], theme: &Theme, scale: f32) {
    for line in lines {
        match line {
            TextLine::Heading { level, text } => {
                ui.label(
                    egui::RichText::new(text)
                        .size(theme.heading_size(*level) * scale)
                        .color(theme.heading_color)
                        .strong(),
                );
            }
            TextLine::Bullet { depth, text } => {
                ui.horizontal_wrapped(|ui| {
                    ui.add_space(24.0 * scale * (*depth as f32 + 1.0));
                    ui.label(
                        egui::RichText::new(format!("\u{2022}  {text}"))
                            .size(theme.body_size * scale)
                            .color(theme.foreground),
                    );
                });
            }
            TextLine::Code(code) => {
                ui.label(
                    egui::RichText::new(code)
                        .monospace()
                        .size(theme.body_size * 0.75 * scale)
                        .color(theme.foreground),
                );
            }
            TextLine::Paragraph(text) => {
                ui.label(
                    egui::RichText::new(text)
                        .size(theme.body_size * scale)
                        .color(theme.foreground),
                );
            }
            TextLine::Blank => ui.add_space(theme.body_size * 0.5 * scale),
        }
    }
}

pub fn draw_notes(ui: &mut egui::Ui, notes: &str, theme: &Theme, scale: f32) {
    ui.label(
        egui::RichText::new("Speaker Notes")
            .size(theme.notes_size * 1.25 * scale)
            .color(theme.notes_heading)
            .strong(),
    );
    ui.add_space(12.0 * scale);
    egui::ScrollArea::vertical().show(ui, |ui| {
        for paragraph in notes.split("\n\n") {
            ui.label(
                egui::RichText::new(inline_text(paragraph.trim()))
                    .size(theme.notes_size * scale)
                    .color(theme.notes_foreground),
            );
            ui.add_space(8.0 * scale);
        }
    });
}
