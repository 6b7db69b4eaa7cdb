use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table};
use ratatui::Frame;

use super::centered_rect;
use crate::app::{App, LoadState};
use crate::theme;

pub fn render(app: &mut App, frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::ACCENT))
        .title(" Workgroup (Enter to select, Esc to cancel) ");

    let groups = match &app.workgroups {
        LoadState::Loaded(groups) => groups,
        LoadState::Error(msg) => {
            let modal_area = centered_rect(40, 3, area);
            frame.render_widget(Clear, modal_area);
            let msg = Paragraph::new(format!(" {}", msg))
                .style(Style::default().fg(theme::RED))
                .block(block);
            frame.render_widget(msg, modal_area);
            return;
        }
        LoadState::NotLoaded | LoadState::Loading => {
            let modal_area = centered_rect(40, 3, area);
            frame.render_widget(Clear, modal_area);
            let msg = Paragraph::new(" Loading workgroups...")
                .style(Style::default().fg(theme::TEXT_MUTED))
                .block(block);
            frame.render_widget(msg, modal_area);
            return;
        }
    };

    let current = app.active_view().filters().get("workgroup");
    let indicator = |selected: bool| if selected { "* " } else { "  " };

    let mut rows: Vec<Row> = vec![Row::new(vec![Cell::from(format!(
        "{}All workgroups",
        indicator(current.is_none())
    ))])];
    rows.extend(groups.iter().map(|group| {
        Row::new(vec![Cell::from(format!(
            "{}{}",
            indicator(current == Some(group.id.as_str())),
            group.name
        ))])
    }));

    let height = (rows.len() as u16 + 2).min(area.height.saturating_sub(4));
    let modal_area = centered_rect(40, height, area);
    frame.render_widget(Clear, modal_area);

    let table = Table::new(rows, [Constraint::Fill(1)])
        .block(block)
        .row_highlight_style(
            Style::default()
                .bg(theme::BG_HIGHLIGHT)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("▸ ");

    frame.render_stateful_widget(table, modal_area, &mut app.workgroup_picker_state);
}
