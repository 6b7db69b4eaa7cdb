use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::app::{App, InputMode};
use crate::input::commands::{completion, find_command, matching_commands};
use crate::listing::FilterDef;
use crate::theme;

/// One entry of the hint row above the prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hint {
    pub key: String,
    pub detail: String,
    /// Tab would complete to this entry.
    pub primary: bool,
}

impl Hint {
    fn new(key: impl Into<String>, detail: impl Into<String>, primary: bool) -> Self {
        Self {
            key: key.into(),
            detail: detail.into(),
            primary,
        }
    }
}

/// The prompt line: `/` search for the active resource or `:` command.
pub fn render(app: &App, frame: &mut Frame, area: Rect) {
    let mut spans = match app.input_mode {
        InputMode::Search => search_prompt(app),
        InputMode::Command => {
            let mut spans = vec![
                Span::styled(":", Style::default().fg(theme::YELLOW)),
                Span::styled(app.input_buffer.as_str(), Style::default().fg(theme::TEXT)),
            ];
            if let Some(rest) = completion(app.active_view().filters().defs(), &app.input_buffer) {
                spans.push(Span::styled(rest, Style::default().fg(theme::TEXT_MUTED)));
            }
            spans
        }
        _ => return,
    };
    spans.push(Span::styled("▏", Style::default().fg(theme::ACCENT)));

    let widget = Paragraph::new(Line::from(spans)).style(Style::default().bg(theme::BG_SURFACE));
    frame.render_widget(widget, area);
}

fn search_prompt(app: &App) -> Vec<Span<'_>> {
    let filters = app.active_view().filters();
    let mut spans = vec![
        Span::styled(
            format!(" {} ", app.active.label()),
            Style::default()
                .fg(theme::BG_DARK)
                .bg(theme::GREEN)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(" / ", Style::default().fg(theme::GREEN)),
        Span::styled(app.input_buffer.as_str(), Style::default().fg(theme::TEXT)),
    ];
    if filters.has_pending_search() {
        spans.push(Span::styled(" …", Style::default().fg(theme::YELLOW)));
    }
    if !filters.search().is_empty() && filters.search() != app.input_buffer.trim() {
        spans.push(Span::styled(
            format!("  (applied: {})", filters.search()),
            Style::default().fg(theme::TEXT_MUTED),
        ));
    }
    spans
}

/// The hint row above the prompt.
pub fn render_suggestions(app: &App, frame: &mut Frame, area: Rect) {
    let hints = match app.input_mode {
        InputMode::Search => vec![
            Hint::new("Enter", "apply now", false),
            Hint::new("Esc", "discard", false),
            Hint::new("", "an empty search clears it", false),
        ],
        InputMode::Command => command_hints(
            app.active_view().filters().defs(),
            &app.input_buffer,
            &app.location_uri(),
        ),
        _ => return,
    };

    let mut spans: Vec<Span> = vec![Span::raw(" ")];
    if hints.is_empty() {
        spans.push(Span::styled(
            "No matching commands",
            Style::default().fg(theme::TEXT_MUTED),
        ));
    }
    for hint in hints {
        let key_style = if hint.primary {
            Style::default().fg(theme::ACCENT).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme::TEXT_DIM)
        };
        if !hint.key.is_empty() {
            spans.push(Span::styled(hint.key, key_style));
            spans.push(Span::raw(" "));
        }
        spans.push(Span::styled(hint.detail, Style::default().fg(theme::TEXT_MUTED)));
        spans.push(Span::raw("   "));
    }

    let widget = Paragraph::new(Line::from(spans)).style(Style::default().bg(theme::BG_BAR));
    frame.render_widget(widget, area);
}

/// Hints for a partially typed command. Once a command word is complete,
/// its arguments are described instead.
pub fn command_hints(defs: &[FilterDef], buffer: &str, location: &str) -> Vec<Hint> {
    let Some((word, args)) = buffer.split_once(' ') else {
        return matching_commands(buffer)
            .into_iter()
            .enumerate()
            .map(|(i, cmd)| Hint::new(format!(":{}", cmd.name), cmd.description, i == 0))
            .collect();
    };

    let Some(cmd) = find_command(word) else {
        return vec![];
    };
    match cmd.name {
        "filter" => filter_hints(defs, args.trim_start()),
        "open" => vec![Hint::new("now", location, false)],
        "page" => vec![Hint::new("<n>", "1-based page number", false)],
        "size" => vec![Hint::new("<n>", "rows per page", false)],
        _ => vec![Hint::new(format!(":{}", cmd.name), cmd.description, false)],
    }
}

fn filter_hints(defs: &[FilterDef], args: &str) -> Vec<Hint> {
    match args.split_once(' ') {
        // Name given, describe the value it takes.
        Some((name, _)) => match defs.iter().find(|def| def.name == name) {
            Some(def) => vec![Hint::new(
                def.label,
                format!("{}, empty clears", def.kind.expected()),
                false,
            )],
            None => vec![],
        },
        None => {
            let mut first = true;
            defs.iter()
                .filter(|def| def.name.starts_with(args))
                .map(|def| {
                    let hint = Hint::new(def.name, def.kind.expected(), first);
                    first = false;
                    hint
                })
                .collect()
        }
    }
}
