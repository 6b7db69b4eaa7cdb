use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::app::App;
use crate::listing::PageButton;
use crate::theme;

pub fn render(app: &App, frame: &mut Frame, area: Rect) {
    let view = app.active_view();
    let pager = view.pager();

    let mut left_spans = vec![Span::styled(
        format!(" {}", pager.results_label()),
        Style::default().fg(theme::TEXT_DIM),
    )];
    if view.fetch().is_loading() {
        left_spans.push(Span::styled("  ◌ loading", Style::default().fg(theme::YELLOW)));
    }

    let nav_style = |enabled: bool| {
        if enabled {
            Style::default().fg(theme::TEXT)
        } else {
            Style::default().fg(theme::TEXT_MUTED)
        }
    };

    let mut right_spans = vec![Span::styled("‹ ", nav_style(pager.can_go_back()))];
    for button in pager.buttons() {
        match button {
            PageButton::Page { index, active } => {
                let label = format!(" {} ", index + 1);
                let style = if active {
                    Style::default()
                        .fg(theme::BG_DARK)
                        .bg(theme::ACCENT)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(theme::TEXT_DIM)
                };
                right_spans.push(Span::styled(label, style));
            }
            PageButton::Gap => {
                right_spans.push(Span::styled(" … ", Style::default().fg(theme::TEXT_MUTED)))
            }
        }
    }
    right_spans.push(Span::styled(" ›", nav_style(pager.can_go_forward())));
    right_spans.push(Span::styled(
        format!("   {} / page ", view.page_size()),
        Style::default().fg(theme::TEXT_MUTED),
    ));

    let left_width: usize = left_spans.iter().map(|s| s.width()).sum();
    let right_width: usize = right_spans.iter().map(|s| s.width()).sum();
    let gap = (area.width as usize).saturating_sub(left_width + right_width);

    let mut spans = left_spans;
    spans.push(Span::raw(" ".repeat(gap)));
    spans.extend(right_spans);

    let widget = Paragraph::new(Line::from(spans)).style(Style::default().bg(theme::BG_BAR));
    frame.render_widget(widget, area);
}
