pub mod collection;
pub mod command_input;
pub mod confirm_modal;
pub mod error_toast;
pub mod filter_bar;
pub mod footer;
pub mod help_overlay;
pub mod pagination;
pub mod tab_bar;
pub mod workgroup_picker;

use ratatui::layout::{Constraint, Flex, Layout, Rect};

/// A `height`-row box centered in `area`, `percent_x` of its width.
pub(crate) fn centered_rect(percent_x: u16, height: u16, area: Rect) -> Rect {
    let vertical = Layout::vertical([Constraint::Length(height)])
        .flex(Flex::Center)
        .split(area);
    let horizontal = Layout::horizontal([Constraint::Percentage(percent_x)])
        .flex(Flex::Center)
        .split(vertical[0]);
    horizontal[0]
}
