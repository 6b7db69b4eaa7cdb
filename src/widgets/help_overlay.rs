use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;

use super::centered_rect;
use crate::kinds::{kind_spec, KindId};
use crate::theme;

pub fn render(kind: KindId, frame: &mut Frame, area: Rect) {
    let spec = kind_spec(kind);
    let filter_help: Vec<(String, String)> = spec
        .filters
        .iter()
        .map(|def| {
            (
                format!(":filter {}", def.name),
                format!("{} ({})", def.label, def.kind.expected()),
            )
        })
        .collect();
    let mut lines = vec![];

    lines.push(Line::from(""));
    lines.push(section("Navigation"));
    lines.push(binding("j / k / Up / Down", "Move selection"));
    lines.push(binding("gg / G", "First / last row"));
    lines.push(binding("1-4 / Tab", "Documents, Members, Users, Links"));
    lines.push(binding("Esc", "Back to previous filters"));

    lines.push(Line::from(""));
    lines.push(section("Pages"));
    lines.push(binding("] / [", "Next / previous page"));
    lines.push(binding("} / {", "Last / first page"));
    lines.push(binding("+ / -", "Rows per page (10, 20, 30)"));
    lines.push(binding(":page <n>", "Jump to page"));

    lines.push(Line::from(""));
    lines.push(section("Filters"));
    lines.push(binding("/ (slash)", "Search"));
    if spec.filters.iter().any(|def| def.name == "workgroup") {
        lines.push(binding("w", "Pick workgroup"));
    }
    lines.push(binding("x", "Reset filters"));
    for (key, desc) in &filter_help {
        lines.push(binding(key, desc));
    }

    if !spec.operations.is_empty() {
        lines.push(Line::from(""));
        lines.push(section("Actions"));
        for op in spec.operations {
            lines.push(Line::from(vec![
                Span::styled(
                    format!("    {:<22}", op.key),
                    Style::default().fg(theme::YELLOW),
                ),
                Span::styled(op.label, Style::default().fg(theme::TEXT)),
            ]));
        }
    }

    lines.push(Line::from(""));
    lines.push(section("General"));
    lines.push(binding(": (colon)", "Command mode"));
    lines.push(binding(":open <link>", "Open a safta:// link"));
    lines.push(binding("Ctrl+R", "Refresh"));
    lines.push(binding(":logout", "Sign out"));
    lines.push(binding("?", "Toggle this help"));

    let height = (lines.len() as u16 + 2).min(area.height.saturating_sub(2));
    let modal_area = centered_rect(60, height, area);
    frame.render_widget(Clear, modal_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::ACCENT))
        .title(format!(" {} help (? to close) ", spec.label));

    let paragraph = Paragraph::new(lines).block(block);
    frame.render_widget(paragraph, modal_area);
}

fn section(title: &str) -> Line<'_> {
    Line::from(Span::styled(
        format!("  {}", title),
        Style::default()
            .fg(theme::ACCENT)
            .add_modifier(Modifier::BOLD),
    ))
}

fn binding<'a>(key: &'a str, desc: &'a str) -> Line<'a> {
    Line::from(vec![
        Span::styled(format!("    {:<22}", key), Style::default().fg(theme::YELLOW)),
        Span::styled(desc, Style::default().fg(theme::TEXT)),
    ])
}
