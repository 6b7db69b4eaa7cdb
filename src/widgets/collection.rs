use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState};
use ratatui::Frame;

use crate::app::App;
use crate::kinds::collection_spec;
use crate::theme;

pub struct CollectionTable {
    pub header: Row<'static>,
    pub rows: Vec<Row<'static>>,
    pub widths: Vec<Constraint>,
    /// Shown instead of the table when there are no rows.
    pub placeholder: Placeholder,
}

pub enum Placeholder {
    Loading(&'static str),
    Empty(&'static str),
    Error(String),
}

pub fn render_collection(
    frame: &mut Frame,
    area: Rect,
    state: &mut TableState,
    table: CollectionTable,
) {
    if table.rows.is_empty() {
        let placeholder = match table.placeholder {
            Placeholder::Loading(label) | Placeholder::Empty(label) => {
                Paragraph::new(label).style(Style::default().fg(theme::TEXT_MUTED))
            }
            Placeholder::Error(msg) => {
                Paragraph::new(format!(" {}", msg)).style(Style::default().fg(theme::RED))
            }
        };
        frame.render_widget(placeholder, area);
        return;
    }

    let table = Table::new(table.rows, table.widths)
        .header(table.header)
        .block(Block::default().borders(Borders::NONE))
        .row_highlight_style(
            Style::default()
                .bg(theme::BG_HIGHLIGHT)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("▸ ");

    frame.render_stateful_widget(table, area, state);
}

pub fn header_row(labels: &[&'static str]) -> Row<'static> {
    Row::new(
        labels
            .iter()
            .map(|label| Cell::from(*label))
            .collect::<Vec<_>>(),
    )
    .style(
        Style::default()
            .fg(theme::TEXT_DIM)
            .add_modifier(Modifier::BOLD),
    )
    .height(1)
}

/// Renders the active list. The "#" column counts across pages.
pub fn render(app: &mut App, frame: &mut Frame, area: Rect) {
    let kind = app.active;
    let spec = collection_spec(kind);
    let view = app.active_view();
    let offset = view.pager().offset();

    let rows = view
        .rows()
        .iter()
        .enumerate()
        .map(|(idx, record)| (spec.row)(offset + idx as u64 + 1, record))
        .collect();

    let fetch = view.fetch();
    let placeholder = if fetch.is_loading() {
        Placeholder::Loading(spec.loading_label)
    } else if let Some(err) = fetch.error() {
        Placeholder::Error(err.to_string())
    } else {
        Placeholder::Empty(spec.empty_label)
    };

    let table = CollectionTable {
        header: header_row(spec.header),
        rows,
        widths: (spec.widths)(),
        placeholder,
    };
    render_collection(frame, area, app.table_state_mut(), table);
}
