use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use super::controller::{FetchController, FetchError, PageResult, RequestToken, Settlement, Ticket};
use super::filters::{FilterDef, FilterError, FilterStore};
use super::pager::Pager;
use super::query::{build, PageRequest, RequestDescriptor};

/// Result of handing a fetch outcome back to a [`ListView`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettleOutcome {
    pub settlement: Settlement,
    /// Issued when the applied page turned out to be past the end.
    pub follow_up: Option<Ticket>,
}

/// One server-backed list: filters, paging and fetch state for an endpoint.
#[derive(Debug, Clone)]
pub struct ListView<T> {
    path: &'static str,
    filters: FilterStore,
    fetch: FetchController<T>,
    page: usize,
    page_size: u32,
}

impl<T> ListView<T> {
    pub fn new(
        path: &'static str,
        filters: &'static [FilterDef],
        page_size: u32,
        debounce: Duration,
    ) -> Self {
        Self {
            path,
            filters: FilterStore::new(filters, debounce),
            fetch: FetchController::new(),
            page: 0,
            page_size: page_size.max(1),
        }
    }

    pub fn path(&self) -> &'static str {
        self.path
    }

    pub fn filters(&self) -> &FilterStore {
        &self.filters
    }

    pub fn fetch(&self) -> &FetchController<T> {
        &self.fetch
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn rows(&self) -> &[T] {
        self.fetch.rows()
    }

    pub fn pager(&self) -> Pager {
        Pager::new(self.fetch.total_count(), self.page_size, self.page)
    }

    pub fn page_request(&self) -> PageRequest {
        PageRequest {
            page: self.page,
            page_size: self.page_size,
            filters: self.filters.filters().clone(),
            search: self.filters.search().to_string(),
        }
    }

    pub fn descriptor(&self, request: &PageRequest) -> RequestDescriptor {
        build(self.path, request)
    }

    /// Issues a fetch if the visible inputs differ from the last request.
    pub fn sync(&mut self) -> Option<Ticket> {
        self.fetch.request(self.page_request())
    }

    pub fn refetch(&mut self) -> Option<Ticket> {
        match self.fetch.refetch() {
            Some(ticket) => Some(ticket),
            None => self.sync(),
        }
    }

    /// Moves to a 0-based page. Pages past the last known total are
    /// rejected without touching the network; before any page has loaded
    /// only the first page is reachable.
    pub fn set_page(&mut self, index: usize) -> Result<Option<Ticket>, FetchError> {
        let pager = self.pager();
        if index != 0 && !pager.contains(index) {
            return Err(FetchError::Validation(format!(
                "page {} is out of range (1-{})",
                index + 1,
                pager.total_pages().max(1)
            )));
        }
        self.page = index;
        Ok(self.sync())
    }

    pub fn next_page(&mut self) -> Option<Ticket> {
        if !self.pager().can_go_forward() {
            return None;
        }
        self.page += 1;
        self.sync()
    }

    pub fn prev_page(&mut self) -> Option<Ticket> {
        if !self.pager().can_go_back() {
            return None;
        }
        self.page -= 1;
        self.sync()
    }

    pub fn first_page(&mut self) -> Option<Ticket> {
        self.page = 0;
        self.sync()
    }

    pub fn last_page(&mut self) -> Option<Ticket> {
        self.page = self.pager().last_index()?;
        self.sync()
    }

    /// Changing the page size always returns to the first page.
    pub fn set_page_size(&mut self, page_size: u32) -> Option<Ticket> {
        self.page_size = page_size.max(1);
        self.page = 0;
        self.sync()
    }

    pub fn set_filter(&mut self, name: &str, value: &str) -> Result<Option<Ticket>, FilterError> {
        if self.filters.set_filter(name, value)? {
            self.page = 0;
        }
        Ok(self.sync())
    }

    pub fn type_search(&mut self, value: &str, now: Instant) {
        self.filters.type_search(value, now);
    }

    pub fn cancel_search(&mut self) {
        self.filters.cancel_search();
    }

    /// Commits a debounced search once its window has passed.
    pub fn poll_search(&mut self, now: Instant) -> Option<Ticket> {
        if !self.filters.poll_search(now) {
            return None;
        }
        self.page = 0;
        self.sync()
    }

    pub fn submit_search(&mut self, value: &str) -> Option<Ticket> {
        if self.filters.submit_search(value) {
            self.page = 0;
        }
        self.sync()
    }

    pub fn reset_filters(&mut self) -> Option<Ticket> {
        self.filters.reset();
        self.page = 0;
        self.sync()
    }

    /// Restores filters and search from location parameters.
    pub fn hydrate(&mut self, params: &BTreeMap<String, String>) -> Option<Ticket> {
        if self.filters.hydrate(params) {
            self.page = 0;
        }
        self.sync()
    }

    pub fn location_params(&self) -> BTreeMap<String, String> {
        self.filters.to_params()
    }

    /// Applies a fetch outcome. When the applied page lies past the end
    /// (rows deleted underneath it) the view clamps to the last valid page
    /// and asks for exactly one follow-up fetch.
    pub fn settle(
        &mut self,
        token: RequestToken,
        outcome: Result<PageResult<T>, FetchError>,
    ) -> SettleOutcome {
        let settlement = self.fetch.settle(token, outcome);
        let mut follow_up = None;

        if settlement == Settlement::Applied && self.fetch.error().is_none() {
            if let Some(reported) = self.fetch.page().map(PageResult::page_index) {
                if reported != self.page {
                    tracing::warn!(
                        path = self.path,
                        requested = self.page,
                        reported,
                        "backend answered with a different page"
                    );
                }
            }
            let pager = self.pager();
            if !pager.contains(self.page) && self.page > 0 {
                let clamped = pager.clamp(self.page);
                tracing::debug!(
                    path = self.path,
                    from = self.page,
                    to = clamped,
                    "page out of range, clamping"
                );
                self.page = clamped;
                follow_up = self.sync();
            }
        }

        SettleOutcome {
            settlement,
            follow_up,
        }
    }

    pub fn clear(&mut self) {
        self.fetch.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listing::filters::FilterKind;

    static STATUS: &[(&str, &str)] = &[("1", "Pending"), ("2", "Approved")];

    static DEFS: &[FilterDef] = &[
        FilterDef {
            name: "status",
            label: "Status",
            kind: FilterKind::Choice(STATUS),
        },
        FilterDef {
            name: "workgroup",
            label: "Workgroup",
            kind: FilterKind::Id,
        },
    ];

    fn view() -> ListView<u32> {
        ListView::new("/links", DEFS, 10, Duration::from_millis(300))
    }

    fn page_of(view: &ListView<u32>, rows: u32, total: u64) -> PageResult<u32> {
        PageResult {
            rows: (0..rows).collect(),
            total_count: total,
            current_page: (view.page() + 1) as u32,
            page_size: view.page_size(),
        }
    }

    fn loaded(total: u64) -> ListView<u32> {
        let mut view = view();
        let ticket = view.sync().unwrap();
        let page = page_of(&view, 10.min(total as u32), total);
        view.settle(ticket.token, Ok(page));
        view
    }

    #[test]
    fn page_three_of_twenty_three() {
        let mut view = loaded(23);
        let ticket = view.set_page(2).unwrap().unwrap();
        assert_eq!(view.descriptor(&ticket.request).param("page"), Some("3"));

        let page = page_of(&view, 3, 23);
        view.settle(ticket.token, Ok(page));
        assert_eq!(view.rows().len(), 3);
        assert_eq!(view.pager().total_pages(), 3);
    }

    #[test]
    fn page_four_of_three_is_rejected_locally() {
        let mut view = loaded(23);
        let before = view.fetch().latest_token();
        let err = view.set_page(3).unwrap_err();
        assert!(matches!(err, FetchError::Validation(_)));
        assert_eq!(view.page(), 0);
        assert_eq!(view.fetch().latest_token(), before);
    }

    #[test]
    fn page_jump_before_any_load_is_rejected() {
        let mut view = view();
        let first = view.sync().unwrap();
        view.settle(first.token, Err(FetchError::Transport("offline".into())));
        assert!(view.fetch().page().is_none());

        let before = view.fetch().latest_token();
        let err = view.set_page(5).unwrap_err();
        assert!(matches!(err, FetchError::Validation(ref m) if m == "page 6 is out of range (1-1)"));
        assert_eq!(view.page(), 0);
        assert_eq!(view.fetch().latest_token(), before);

        // The first page stays reachable so a retry can still go out.
        assert!(view.set_page(0).is_ok());
    }

    #[test]
    fn page_size_change_resets_page() {
        for start in [0usize, 1, 2] {
            let mut view = loaded(23);
            if start > 0 {
                view.set_page(start).unwrap();
            }
            let ticket = view.set_page_size(20).unwrap();
            assert_eq!(view.page(), 0);
            assert_eq!(ticket.request.page, 0);
            assert_eq!(ticket.request.page_size, 20);
        }
    }

    #[test]
    fn reset_filters_leaves_only_paging_params() {
        let mut view = loaded(23);
        view.set_filter("status", "2").unwrap();
        view.set_filter("workgroup", "5").unwrap();

        let ticket = view.reset_filters().unwrap();
        let descriptor = view.descriptor(&ticket.request);
        assert_eq!(descriptor.keys(), vec!["page", "size"]);
        assert_eq!(descriptor.param("page"), Some("1"));
    }

    #[test]
    fn filter_change_returns_to_first_page() {
        let mut view = loaded(23);
        view.set_page(2).unwrap();
        let ticket = view.set_filter("status", "1").unwrap().unwrap();
        assert_eq!(ticket.request.page, 0);
    }

    #[test]
    fn invalid_filter_issues_nothing() {
        let mut view = loaded(23);
        let before = view.fetch().latest_token();
        assert!(view.set_filter("workgroup", "five").is_err());
        assert_eq!(view.fetch().latest_token(), before);
    }

    #[test]
    fn refetch_after_delete_replaces_rows_and_clamps() {
        let mut view = loaded(21);
        let ticket = view.set_page(2).unwrap().unwrap();
        let page = page_of(&view, 1, 21);
        view.settle(ticket.token, Ok(page));

        // Last row on page 3 deleted elsewhere, refetch the same request.
        let again = view.refetch().unwrap();
        assert_eq!(again.request, ticket.request);

        let outcome = view.settle(
            again.token,
            Ok(PageResult {
                rows: vec![],
                total_count: 20,
                current_page: 3,
                page_size: 10,
            }),
        );
        assert_eq!(outcome.settlement, Settlement::Applied);
        assert_eq!(view.fetch().total_count(), 20);
        assert_eq!(view.page(), 1);
        let follow_up = outcome.follow_up.expect("clamped fetch");
        assert_eq!(follow_up.request.page, 1);
    }

    #[test]
    fn emptied_list_stays_on_first_page() {
        let mut view = loaded(1);
        let again = view.refetch().unwrap();
        let outcome = view.settle(again.token, Ok(PageResult::empty(10)));
        assert!(outcome.follow_up.is_none());
        assert_eq!(view.page(), 0);
        assert!(view.rows().is_empty());
    }

    #[test]
    fn debounced_search_issues_one_fetch() {
        let mut view = loaded(23);
        let start = Instant::now();
        view.type_search("a", start);
        view.type_search("an", start + Duration::from_millis(100));
        assert!(view.poll_search(start + Duration::from_millis(200)).is_none());

        let ticket = view.poll_search(start + Duration::from_millis(450)).unwrap();
        assert_eq!(ticket.request.search, "an");
        assert!(view.poll_search(start + Duration::from_millis(900)).is_none());
    }
}
