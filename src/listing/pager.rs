/// Page counts up to this size render one button per page.
pub const MAX_UNWINDOWED_PAGES: usize = 9;

const EDGE: usize = 1;
const AROUND_CURRENT: usize = 2;

pub fn total_pages(total_count: u64, page_size: u32) -> usize {
    let page_size = u64::from(page_size.max(1));
    total_count.div_ceil(page_size) as usize
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageButton {
    Page { index: usize, active: bool },
    Gap,
}

impl PageButton {
    /// 1-based number shown to the user.
    pub fn label(&self) -> Option<String> {
        match self {
            Self::Page { index, .. } => Some((index + 1).to_string()),
            Self::Gap => None,
        }
    }
}

/// Pagination view model. `current` is the 0-based page index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pager {
    pub total_count: u64,
    pub page_size: u32,
    pub current: usize,
}

impl Pager {
    pub fn new(total_count: u64, page_size: u32, current: usize) -> Self {
        Self {
            total_count,
            page_size: page_size.max(1),
            current,
        }
    }

    pub fn total_pages(&self) -> usize {
        total_pages(self.total_count, self.page_size)
    }

    pub fn can_go_back(&self) -> bool {
        self.current > 0
    }

    pub fn can_go_forward(&self) -> bool {
        self.current + 1 < self.total_pages()
    }

    pub fn last_index(&self) -> Option<usize> {
        self.total_pages().checked_sub(1)
    }

    pub fn contains(&self, index: usize) -> bool {
        index < self.total_pages()
    }

    /// Nearest valid index; `0` when there are no pages.
    pub fn clamp(&self, index: usize) -> usize {
        match self.last_index() {
            Some(last) => index.min(last),
            None => 0,
        }
    }

    /// Number of rows preceding the current page, for serial numbers.
    pub fn offset(&self) -> u64 {
        self.current as u64 * u64::from(self.page_size)
    }

    pub fn buttons(&self) -> Vec<PageButton> {
        let total = self.total_pages();
        let page = |index: usize| PageButton::Page {
            index,
            active: index == self.current,
        };

        if total <= MAX_UNWINDOWED_PAGES {
            return (0..total).map(page).collect();
        }

        let last = total - 1;
        let current = self.current.min(last);
        let mut buttons = Vec::new();

        let left_end = EDGE.min(total);
        buttons.extend((0..left_end).map(page));

        let mid_start = left_end.max(current.saturating_sub(AROUND_CURRENT));
        let mid_end = (current + AROUND_CURRENT + 1).min(total);
        if mid_start > left_end {
            buttons.push(PageButton::Gap);
        }
        buttons.extend((mid_start..mid_end).map(page));

        let right_start = mid_end.max(total - EDGE);
        if right_start > mid_end {
            buttons.push(PageButton::Gap);
        }
        buttons.extend((right_start..total).map(page));

        buttons
    }

    pub fn results_label(&self) -> String {
        if self.total_count == 0 {
            return "No results".to_string();
        }
        let from = self.offset() + 1;
        if from > self.total_count {
            return format!("Page {} of {}", self.current + 1, self.total_pages());
        }
        let to = (self.offset() + u64::from(self.page_size)).min(self.total_count);
        format!("Showing {}-{} of {} results", from, to, self.total_count)
    }
}
