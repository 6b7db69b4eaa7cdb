use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::app::{App, InputMode, Overlay};
use crate::kinds::{kind_spec, KindId};
use crate::theme;

pub fn render(app: &App, frame: &mut Frame, area: Rect) {
    let hints = match (&app.overlay, &app.input_mode) {
        (Overlay::Confirm(_), _) => vec![hint("y", "confirm"), hint("n", "cancel")],
        (Overlay::WorkgroupPicker, _) => vec![
            hint("j/k", "nav"),
            hint("Enter", "select"),
            hint("Esc", "cancel"),
        ],
        (Overlay::Help, _) => vec![hint("?", "close")],
        (Overlay::None, InputMode::Command) => {
            vec![hint("Esc", "cancel"), hint("Tab", "complete"), hint("Enter", "execute")]
        }
        (Overlay::None, InputMode::Search) => vec![hint("Esc", "cancel"), hint("Enter", "apply")],
        (Overlay::None, InputMode::PendingG) => vec![hint("g", "top")],
        (Overlay::None, InputMode::Normal) => list_hints(app.active),
    };

    let mut spans: Vec<Span> = vec![Span::raw(" ")];
    for (i, (key, desc)) in hints.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw("  "));
        }
        spans.push(Span::styled(key.as_str(), Style::default().fg(theme::ACCENT)));
        spans.push(Span::styled(
            format!(":{}", desc),
            Style::default().fg(theme::TEXT_MUTED),
        ));
    }

    let widget = Paragraph::new(Line::from(spans)).style(Style::default().bg(theme::BG_SURFACE));
    frame.render_widget(widget, area);
}

fn hint(key: &str, desc: &str) -> (String, String) {
    (key.to_string(), desc.to_string())
}

fn list_hints(kind: KindId) -> Vec<(String, String)> {
    let spec = kind_spec(kind);
    let mut hints = vec![
        hint("j/k", "nav"),
        hint("[/]", "page"),
        hint("+/-", "size"),
        hint("/", "search"),
    ];
    if spec.filters.iter().any(|def| def.name == "workgroup") {
        hints.push(hint("w", "workgroup"));
    }
    hints.push(hint("x", "reset"));
    hints.extend(
        spec.operations
            .iter()
            .map(|op| (op.key.to_string(), op.label.to_string())),
    );
    hints.push(hint(":", "cmd"));
    hints.push(hint("?", "help"));
    hints.push(hint("q", "quit"));
    hints
}
