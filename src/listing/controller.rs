use thiserror::Error;

use super::query::{from_wire_page, PageRequest};

/// Generation marker minted for every issued fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestToken(u64);

impl std::fmt::Display for RequestToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One fetched page plus the backend's pagination metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageResult<T> {
    pub rows: Vec<T>,
    pub total_count: u64,
    /// 1-based, as reported by the backend.
    pub current_page: u32,
    pub page_size: u32,
}

impl<T> PageResult<T> {
    pub fn empty(page_size: u32) -> Self {
        Self {
            rows: Vec::new(),
            total_count: 0,
            current_page: 1,
            page_size,
        }
    }

    /// Computed from `total_count`, never from the number of rows.
    pub fn total_pages(&self) -> usize {
        super::pager::total_pages(self.total_count, self.page_size)
    }

    pub fn page_index(&self) -> usize {
        from_wire_page(self.current_page)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("{0}")]
    Validation(String),
    #[error("network error: {0}")]
    Transport(String),
    #[error("not authorized: {0}")]
    Auth(String),
    #[error("{message}")]
    Server { status: u16, message: String },
}

impl FetchError {
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::Auth(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchStatus {
    Idle,
    Loading,
    Success,
    Error(FetchError),
}

/// A fetch the caller must now perform exactly once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    pub token: RequestToken,
    pub request: PageRequest,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settlement {
    Applied,
    Stale,
}

/// Tracks in-flight fetches for one list and owns the visible page.
///
/// The controller performs no I/O. Callers turn each [`Ticket`] into a
/// request and hand the outcome back through [`FetchController::settle`];
/// only the outcome for the most recently minted token mutates state.
#[derive(Debug, Clone)]
pub struct FetchController<T> {
    status: FetchStatus,
    next_token: u64,
    latest: Option<RequestToken>,
    last_request: Option<PageRequest>,
    page: Option<PageResult<T>>,
}

impl<T> Default for FetchController<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> FetchController<T> {
    pub fn new() -> Self {
        Self {
            status: FetchStatus::Idle,
            next_token: 0,
            latest: None,
            last_request: None,
            page: None,
        }
    }

    pub fn status(&self) -> &FetchStatus {
        &self.status
    }

    pub fn is_loading(&self) -> bool {
        self.status == FetchStatus::Loading
    }

    pub fn error(&self) -> Option<&FetchError> {
        match self.status {
            FetchStatus::Error(ref err) => Some(err),
            _ => None,
        }
    }

    pub fn latest_token(&self) -> Option<RequestToken> {
        self.latest
    }

    pub fn last_request(&self) -> Option<&PageRequest> {
        self.last_request.as_ref()
    }

    /// Last successfully applied page.
    pub fn page(&self) -> Option<&PageResult<T>> {
        self.page.as_ref()
    }

    pub fn rows(&self) -> &[T] {
        self.page.as_ref().map(|p| p.rows.as_slice()).unwrap_or(&[])
    }

    pub fn total_count(&self) -> u64 {
        self.page.as_ref().map(|p| p.total_count).unwrap_or(0)
    }

    /// Starts a fetch when `request` differs from the last one issued.
    pub fn request(&mut self, request: PageRequest) -> Option<Ticket> {
        if self.last_request.as_ref() == Some(&request) {
            return None;
        }
        Some(self.issue(request))
    }

    /// Re-issues the last request verbatim.
    pub fn refetch(&mut self) -> Option<Ticket> {
        let request = self.last_request.clone()?;
        Some(self.issue(request))
    }

    fn issue(&mut self, request: PageRequest) -> Ticket {
        self.next_token += 1;
        let token = RequestToken(self.next_token);
        self.latest = Some(token);
        self.last_request = Some(request.clone());
        self.status = FetchStatus::Loading;
        Ticket { token, request }
    }

    pub fn settle(
        &mut self,
        token: RequestToken,
        outcome: Result<PageResult<T>, FetchError>,
    ) -> Settlement {
        if self.latest != Some(token) || self.status != FetchStatus::Loading {
            tracing::debug!(%token, latest = ?self.latest, "discarding stale page");
            return Settlement::Stale;
        }

        match outcome {
            Ok(page) => {
                self.page = Some(page);
                self.status = FetchStatus::Success;
            }
            Err(err) => {
                // Previous rows stay visible.
                self.status = FetchStatus::Error(err);
            }
        }
        Settlement::Applied
    }

    /// Drops the visible page and forgets the last request.
    pub fn clear(&mut self) {
        self.page = None;
        self.last_request = None;
        self.latest = None;
        self.status = FetchStatus::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(rows: Vec<u32>, total: u64, current: u32) -> PageResult<u32> {
        PageResult {
            rows,
            total_count: total,
            current_page: current,
            page_size: 10,
        }
    }

    #[test]
    fn request_mints_increasing_tokens() {
        let mut ctl: FetchController<u32> = FetchController::new();
        assert_eq!(ctl.status(), &FetchStatus::Idle);

        let a = ctl.request(PageRequest::new(0, 10)).unwrap();
        let b = ctl.request(PageRequest::new(1, 10)).unwrap();
        assert!(b.token > a.token);
        assert!(ctl.is_loading());
        assert_eq!(ctl.latest_token(), Some(b.token));
    }

    #[test]
    fn identical_request_is_not_reissued() {
        let mut ctl: FetchController<u32> = FetchController::new();
        assert!(ctl.request(PageRequest::new(0, 10)).is_some());
        assert!(ctl.request(PageRequest::new(0, 10)).is_none());
    }

    #[test]
    fn late_result_of_superseded_request_is_discarded() {
        let mut ctl = FetchController::new();
        let a = ctl.request(PageRequest::new(0, 10)).unwrap();
        let b = ctl.request(PageRequest::new(1, 10)).unwrap();

        assert_eq!(
            ctl.settle(b.token, Ok(page(vec![11, 12], 12, 2))),
            Settlement::Applied
        );
        assert_eq!(
            ctl.settle(a.token, Ok(page(vec![1, 2, 3], 12, 1))),
            Settlement::Stale
        );

        assert_eq!(ctl.rows(), &[11, 12]);
        assert_eq!(ctl.status(), &FetchStatus::Success);
    }

    #[test]
    fn stale_error_does_not_flip_status() {
        let mut ctl = FetchController::new();
        let a = ctl.request(PageRequest::new(0, 10)).unwrap();
        let b = ctl.request(PageRequest::new(1, 10)).unwrap();
        ctl.settle(b.token, Ok(page(vec![1], 11, 2)));

        let outcome = ctl.settle(a.token, Err(FetchError::Transport("reset".into())));
        assert_eq!(outcome, Settlement::Stale);
        assert!(ctl.error().is_none());
    }

    #[test]
    fn error_keeps_previous_rows_visible() {
        let mut ctl = FetchController::new();
        let a = ctl.request(PageRequest::new(0, 10)).unwrap();
        ctl.settle(a.token, Ok(page(vec![1, 2], 2, 1)));

        let b = ctl.request(PageRequest::new(1, 10)).unwrap();
        ctl.settle(
            b.token,
            Err(FetchError::Server {
                status: 500,
                message: "boom".into(),
            }),
        );

        assert_eq!(ctl.rows(), &[1, 2]);
        assert_eq!(ctl.total_count(), 2);
        assert!(matches!(ctl.error(), Some(FetchError::Server { status: 500, .. })));
    }

    #[test]
    fn refetch_reissues_last_request_verbatim() {
        let mut ctl: FetchController<u32> = FetchController::new();
        assert!(ctl.refetch().is_none());

        let mut req = PageRequest::new(2, 10);
        req.filters.insert("status".into(), "2".into());
        let first = ctl.request(req.clone()).unwrap();
        ctl.settle(first.token, Ok(page(vec![], 30, 3)));

        let again = ctl.refetch().unwrap();
        assert_eq!(again.request, req);
        assert!(again.token > first.token);
        assert!(ctl.is_loading());
    }

    #[test]
    fn refetch_after_error_recovers() {
        let mut ctl = FetchController::new();
        let a = ctl.request(PageRequest::new(0, 10)).unwrap();
        ctl.settle(a.token, Err(FetchError::Auth("expired".into())));
        assert!(ctl.error().unwrap().is_auth());

        let b = ctl.refetch().unwrap();
        assert_eq!(ctl.settle(b.token, Ok(page(vec![4], 1, 1))), Settlement::Applied);
        assert_eq!(ctl.status(), &FetchStatus::Success);
    }

    #[test]
    fn clear_drops_rows() {
        let mut ctl = FetchController::new();
        let a = ctl.request(PageRequest::new(0, 10)).unwrap();
        ctl.settle(a.token, Ok(page(vec![1], 1, 1)));
        ctl.clear();
        assert!(ctl.rows().is_empty());
        assert!(ctl.page().is_none());
        assert_eq!(ctl.status(), &FetchStatus::Idle);
    }

    #[test]
    fn total_pages_uses_total_count() {
        let p = page(vec![21, 22, 23], 23, 3);
        assert_eq!(p.total_pages(), 3);
        assert_eq!(p.page_index(), 2);
    }
}
