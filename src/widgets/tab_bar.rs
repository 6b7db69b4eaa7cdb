use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::app::App;
use crate::kinds::KindId;
use crate::theme;

pub fn render(app: &App, frame: &mut Frame, area: Rect) {
    let mut left_spans: Vec<Span> = vec![
        Span::styled(
            " safta-admin ",
            Style::default()
                .fg(theme::ACCENT)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled("| ", Style::default().fg(theme::TEXT_MUTED)),
    ];

    for (i, kind) in KindId::ALL.iter().enumerate() {
        let style = if *kind == app.active {
            Style::default()
                .fg(theme::BG_DARK)
                .bg(theme::ACCENT)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme::TEXT_DIM)
        };
        left_spans.push(Span::styled(format!(" {} {} ", i + 1, kind.label()), style));
        left_spans.push(Span::raw(" "));
    }

    let mut right_spans: Vec<Span> = Vec::new();
    right_spans.push(Span::styled(
        app.location_uri(),
        Style::default().fg(theme::TEXT_MUTED),
    ));
    right_spans.push(Span::styled(
        format!("  {}", app.user_label),
        Style::default().fg(theme::BLUE),
    ));
    right_spans.push(Span::raw(" "));

    let left_width: usize = left_spans.iter().map(|s| s.width()).sum();
    let right_width: usize = right_spans.iter().map(|s| s.width()).sum();
    let gap = (area.width as usize).saturating_sub(left_width + right_width);

    let mut spans = left_spans;
    spans.push(Span::raw(" ".repeat(gap)));
    spans.extend(right_spans);

    let widget = Paragraph::new(Line::from(spans)).style(Style::default().bg(theme::BG_BAR));
    frame.render_widget(widget, area);
}
