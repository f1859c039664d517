use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use eframe::egui;

use crate::config::Config;
use crate::deck::{self, Deck};
use crate::input::{Bindings, Key, KeyDown};
use crate::nav::{BoundaryPolicy, Command};
use crate::render;
use crate::session::{Session, SessionOptions};
use crate::theme::Theme;
use crate::view::Marker;

const NOTES_PANEL_WIDTH: f32 = 320.0;
const MARKER_SIZE: f32 = 10.0;
const DOUBLE_TAP_SECS: f32 = 1.0;

/// Command-line choices that override config and frontmatter.
#[derive(Debug, Clone, Default)]
pub struct LaunchOptions {
    pub windowed: bool,
    /// 1-indexed
    pub slide: Option<usize>,
    pub boundary: Option<BoundaryPolicy>,
    pub bindings: Option<Bindings>,
    pub theme: Option<String>,
}

/// Effective session settings after layering CLI, frontmatter and config.
#[derive(Debug, Clone)]
pub struct Settings {
    pub session: SessionOptions,
    pub theme: String,
}

pub fn resolve_settings(deck: &Deck, config: &Config, launch: &LaunchOptions) -> anyhow::Result<Settings> {
    let frontmatter_policy = deck
        .meta()
        .boundary
        .as_deref()
        .map(str::parse::<BoundaryPolicy>)
        .transpose()
        .context("Invalid `boundary` in frontmatter")?;
    let policy = launch
        .boundary
        .or(frontmatter_policy)
        .or(config.boundary())
        .unwrap_or_default();

    let bindings = launch.bindings.unwrap_or_else(|| config.bindings());
    let keymap = config
        .keymap(bindings)
        .context("Invalid key binding in config")?;

    let theme = launch
        .theme
        .clone()
        .or_else(|| deck.meta().theme.clone())
        .or_else(|| config.theme().map(String::from))
        .unwrap_or_else(|| "dark".to_string());

    tracing::debug!(%policy, bindings = bindings.name(), %theme, "resolved settings");
    Ok(Settings {
        session: SessionOptions {
            policy,
            keymap,
            start: launch.slide.map(|s| s.saturating_sub(1)),
        },
        theme,
    })
}

struct Toast {
    message: String,
    start: Instant,
}

impl Toast {
    fn new(message: String) -> Self {
        Self {
            message,
            start: Instant::now(),
        }
    }

    fn opacity(&self) -> f32 {
        let elapsed = self.start.elapsed().as_secs_f32();
        let duration = 1.5;
        let fade_start = 1.0;
        if elapsed < fade_start {
            1.0
        } else if elapsed < duration {
            1.0 - (elapsed - fade_start) / (duration - fade_start)
        } else {
            0.0
        }
    }

    fn is_expired(&self) -> bool {
        self.start.elapsed().as_secs_f32() >= 1.5
    }
}

/// Pointer actions collected while painting a frame.
enum Click {
    Previous,
    Next,
    Marker(usize),
    Notes,
}

struct PresentationApp {
    session: Session,
    theme: Theme,
    title: String,
    toast: Option<Toast>,
    last_esc: Option<Instant>,
}

impl PresentationApp {
    fn new(session: Session, theme: Theme, title: String) -> Self {
        Self {
            session,
            theme,
            title,
            toast: None,
            last_esc: None,
        }
    }

    /// Release the keyboard before the window goes away.
    fn end_session(&mut self) {
        if self.session.is_listening() {
            self.session.end();
        }
    }

    fn window_title(&self) -> String {
        format!("{} \u{2014} {}", self.title, self.session.progress().summary())
    }

    /// Route key presses through the session. Keys the router claims are
    /// consumed so no egui widget reacts to them; the rest may trigger
    /// window-level shortcuts.
    fn handle_keyboard(&mut self, ctx: &egui::Context) -> (bool, Vec<egui::ViewportCommand>) {
        let (pressed, fullscreen) = ctx.input(|i| {
            let keys: Vec<egui::Key> = i
                .events
                .iter()
                .filter_map(|event| match event {
                    egui::Event::Key {
                        key,
                        pressed: true,
                        modifiers,
                        ..
                    } if !(modifiers.ctrl || modifiers.alt || modifiers.command) => Some(*key),
                    _ => None,
                })
                .collect();
            (keys, i.viewport().fullscreen.unwrap_or(false))
        });

        let mut changed = false;
        let mut viewport_cmds = Vec::new();
        for key in pressed {
            if let Some(mapped) = key_from_egui(key) {
                let mut event = KeyDown::new(mapped);
                changed |= self.session.key_down(&mut event);
                if event.default_prevented() {
                    ctx.input_mut(|i| i.consume_key(egui::Modifiers::NONE, key));
                    continue;
                }
            }
            self.handle_window_key(key, fullscreen, &mut viewport_cmds);
        }
        (changed, viewport_cmds)
    }

    fn handle_window_key(
        &mut self,
        key: egui::Key,
        fullscreen: bool,
        viewport_cmds: &mut Vec<egui::ViewportCommand>,
    ) {
        match key {
            egui::Key::Q => viewport_cmds.push(egui::ViewportCommand::Close),
            egui::Key::F => viewport_cmds.push(egui::ViewportCommand::Fullscreen(!fullscreen)),
            egui::Key::D => {
                self.theme = self.theme.toggled();
                self.toast = Some(Toast::new(format!("Theme: {}", self.theme.name)));
            }
            egui::Key::Escape => {
                if let Some(last) = self.last_esc {
                    if last.elapsed().as_secs_f32() < DOUBLE_TAP_SECS {
                        viewport_cmds.push(egui::ViewportCommand::Close);
                        return;
                    }
                }
                self.last_esc = Some(Instant::now());
                self.toast = Some(Toast::new("Press Esc again to exit".to_string()));
            }
            _ => {}
        }
    }

    /// Paint one frame. Returns the clicks to apply once painting is done.
    fn draw(&self, ctx: &egui::Context) -> Vec<Click> {
        let mut clicks = Vec::new();
        let theme = &self.theme;
        let scale = render::compute_scale(ctx.input(|i| i.content_rect()));
        let display = self.session.display();
        let progress = self.session.progress();

        egui::TopBottomPanel::bottom("progress")
            .frame(
                egui::Frame::new()
                    .fill(theme.bar_background)
                    .inner_margin(egui::Margin::symmetric(16, 8)),
            )
            .show(ctx, |ui| {
                ui.add(
                    egui::ProgressBar::new(progress.fraction())
                        .desired_height(3.0 * scale)
                        .fill(theme.accent),
                );
                ui.add_space(4.0);
                ui.horizontal(|ui| {
                    let prev = egui::Button::new("\u{25C0} Prev");
                    if ui
                        .add_enabled(self.session.can_go_previous(), prev)
                        .clicked()
                    {
                        clicks.push(Click::Previous);
                    }
                    ui.add_space(12.0);
                    for marker in &progress.markers {
                        if draw_marker(ui, marker, theme, scale).clicked() {
                            clicks.push(Click::Marker(marker.index));
                        }
                    }
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        let next = egui::Button::new("Next \u{25B6}");
                        if ui.add_enabled(self.session.can_go_next(), next).clicked() {
                            clicks.push(Click::Next);
                        }
                    });
                });
            });

        if let Some(notes) = display.notes {
            egui::SidePanel::right("notes")
                .exact_width(NOTES_PANEL_WIDTH * scale)
                .resizable(false)
                .frame(
                    egui::Frame::new()
                        .fill(theme.notes_background)
                        .inner_margin(egui::Margin::same(16)),
                )
                .show(ctx, |ui| render::draw_notes(ui, notes, theme, scale));
        }

        egui::CentralPanel::default()
            .frame(
                egui::Frame::new()
                    .fill(theme.background)
                    .inner_margin(egui::Margin::same(32)),
            )
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.label(
                        egui::RichText::new(&display.slide.title)
                            .size(theme.h2_size * scale)
                            .color(theme.heading_color)
                            .strong(),
                    );
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        ui.label(
                            egui::RichText::new(&display.position)
                                .monospace()
                                .size(14.0 * scale)
                                .color(Theme::with_opacity(theme.foreground, 0.5)),
                        );
                        let hint = if display.notes_available() {
                            "Toggle speaker notes"
                        } else {
                            "No speaker notes on this slide"
                        };
                        let button = egui::Button::new("Notes")
                            .selected(self.session.state().notes_visible());
                        if ui.add(button).on_hover_text(hint).clicked() {
                            clicks.push(Click::Notes);
                        }
                    });
                });
                ui.add_space(16.0 * scale);
                let lines = render::classify(&display.slide.content, &display.slide.title);
                egui::ScrollArea::vertical().show(ui, |ui| {
                    render::draw_content(ui, &lines, theme, scale);
                });
            });

        if let Some(toast) = &self.toast {
            draw_toast(ctx, toast, theme);
        }

        clicks
    }
}

impl eframe::App for PresentationApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Viewport commands are sent after the input closures to avoid
        // re-entering the context lock.
        let (mut changed, viewport_cmds) = self.handle_keyboard(ctx);
        let closing = viewport_cmds
            .iter()
            .any(|cmd| matches!(cmd, egui::ViewportCommand::Close))
            || ctx.input(|i| i.viewport().close_requested());
        if closing {
            self.end_session();
        }
        for cmd in viewport_cmds {
            ctx.send_viewport_cmd(cmd);
        }

        let clicks = self.draw(ctx);
        for click in clicks {
            changed |= match click {
                Click::Previous => self.session.issue(Command::Previous),
                Click::Next => self.session.issue(Command::Next),
                Click::Marker(index) => self.session.select_marker(index),
                Click::Notes => self.session.toggle_notes(),
            };
        }

        if changed {
            ctx.send_viewport_cmd(egui::ViewportCommand::Title(self.window_title()));
            ctx.request_repaint();
        }

        if self.toast.as_ref().is_some_and(Toast::is_expired) {
            self.toast = None;
        }
        if self.toast.is_some() {
            ctx.request_repaint();
        }
    }
}

fn draw_marker(ui: &mut egui::Ui, marker: &Marker, theme: &Theme, scale: f32) -> egui::Response {
    let side = MARKER_SIZE * scale * 1.6;
    let (rect, response) = ui.allocate_exact_size(egui::vec2(side, side), egui::Sense::click());
    let (radius, color) = if marker.is_current {
        (MARKER_SIZE * scale * 0.625, theme.accent)
    } else if response.hovered() {
        (MARKER_SIZE * scale * 0.55, Theme::with_opacity(theme.accent, 0.6))
    } else {
        (MARKER_SIZE * scale * 0.5, theme.muted)
    };
    ui.painter().circle_filled(rect.center(), radius, color);
    response.on_hover_text(format!("Go to slide {}", marker.index + 1))
}

fn draw_toast(ctx: &egui::Context, toast: &Toast, theme: &Theme) {
    let opacity = toast.opacity();
    let painter = ctx.layer_painter(egui::LayerId::new(
        egui::Order::Foreground,
        egui::Id::new("toast"),
    ));
    let screen = ctx.input(|i| i.content_rect());
    let color = Theme::with_opacity(theme.foreground, opacity);
    let galley = painter.layout_no_wrap(
        toast.message.clone(),
        egui::FontId::proportional(18.0),
        color,
    );
    let pos = egui::pos2(
        screen.center().x - galley.rect.width() / 2.0,
        screen.top() + 24.0,
    );
    let bg = egui::Rect::from_min_size(pos, galley.rect.size()).expand(10.0);
    painter.rect_filled(bg, 6.0, Theme::with_opacity(theme.bar_background, 0.9 * opacity));
    painter.galley(pos, galley, color);
}

/// Map an egui key onto the presenter's key set.
fn key_from_egui(key: egui::Key) -> Option<Key> {
    use egui::Key as E;
    let mapped = match key {
        E::ArrowRight => Key::ArrowRight,
        E::ArrowLeft => Key::ArrowLeft,
        E::ArrowUp => Key::ArrowUp,
        E::ArrowDown => Key::ArrowDown,
        E::Space => Key::Space,
        E::PageUp => Key::PageUp,
        E::PageDown => Key::PageDown,
        E::Home => Key::Home,
        E::End => Key::End,
        E::Enter => Key::Enter,
        E::Escape => Key::Escape,
        other => {
            let mut chars = other.name().chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) if c.is_ascii_alphanumeric() => Key::Char(c.to_ascii_lowercase()),
                _ => return None,
            }
        }
    };
    Some(mapped)
}

pub fn run(file: PathBuf, launch: LaunchOptions) -> anyhow::Result<()> {
    let deck = deck::load(&file)?;
    let config = Config::load_or_default();
    let settings = resolve_settings(&deck, &config, &launch)?;

    let title = deck.meta().title.clone().unwrap_or_else(|| {
        file.file_stem()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string()
    });

    let viewport = if launch.windowed {
        egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 720.0])
            .with_title(&title)
    } else {
        egui::ViewportBuilder::default()
            .with_fullscreen(true)
            .with_title(&title)
    };

    let options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };

    let window_title = title.clone();
    eframe::run_native(
        &window_title,
        options,
        Box::new(move |_cc| {
            let session = Session::init(deck, settings.session);
            let theme = Theme::from_name(&settings.theme);
            let app = PresentationApp::new(session, theme, title);
            Ok(Box::new(app))
        }),
    )
    .map_err(|e| anyhow::anyhow!("{e}"))
}
