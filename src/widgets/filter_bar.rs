use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::app::App;
use crate::listing::FilterKind;
use crate::theme;

/// Active filters and search of the current list, or a hint when none are set.
pub fn render(app: &App, frame: &mut Frame, area: Rect) {
    let filters = app.active_view().filters();
    let mut spans: Vec<Span> = vec![Span::styled(
        " Filters ",
        Style::default()
            .fg(theme::TEXT_DIM)
            .add_modifier(Modifier::BOLD),
    )];

    if filters.is_empty() {
        let names: Vec<_> = filters.defs().iter().map(|def| def.name).collect();
        spans.push(Span::styled(
            format!("none  (:filter {} <value>)", names.join("|")),
            Style::default().fg(theme::TEXT_MUTED),
        ));
    }

    for def in filters.defs() {
        let Some(value) = filters.get(def.name) else {
            continue;
        };
        let shown = match def.kind {
            FilterKind::Id if def.name == "workgroup" => workgroup_name(app, value),
            _ => def.kind.label_for(value).to_string(),
        };
        spans.push(Span::styled(
            format!("{}:", def.label),
            Style::default().fg(theme::TEXT_DIM),
        ));
        spans.push(Span::styled(shown, Style::default().fg(theme::ACCENT)));
        spans.push(Span::raw("  "));
    }

    if !filters.search().is_empty() {
        spans.push(Span::styled("/", Style::default().fg(theme::GREEN)));
        spans.push(Span::styled(
            filters.search().to_string(),
            Style::default().fg(theme::TEXT),
        ));
    }
    if filters.has_pending_search() {
        spans.push(Span::styled(" …", Style::default().fg(theme::YELLOW)));
    }

    let widget = Paragraph::new(Line::from(spans)).style(Style::default().bg(theme::BG_SURFACE));
    frame.render_widget(widget, area);
}

fn workgroup_name(app: &App, id: &str) -> String {
    app.workgroups
        .data()
        .and_then(|groups| groups.iter().find(|group| group.id == id))
        .map(|group| group.name.clone())
        .unwrap_or_else(|| format!("#{}", id))
}
