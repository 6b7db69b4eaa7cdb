use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::app::App;
use crate::theme;

pub fn render(app: &App, frame: &mut Frame, area: Rect) {
    let toast = match (&app.last_error, &app.last_notice) {
        (Some((msg, _)), _) => Some((" ERROR ", msg, theme::RED)),
        (None, Some((msg, _))) => Some((" OK ", msg, theme::GREEN)),
        (None, None) => None,
    };
    let Some((tag, msg, color)) = toast else {
        return;
    };

    let toast_area = Rect {
        x: area.x,
        y: area.y + area.height.saturating_sub(3),
        width: area.width,
        height: 1,
    };

    let line = Line::from(vec![
        Span::styled(tag, Style::default().fg(Color::White).bg(color)),
        Span::styled(format!(" {}", msg), Style::default().fg(color)),
    ]);

    frame.render_widget(Paragraph::new(line).style(Style::default().bg(theme::BG_DARK)), toast_area);
}
