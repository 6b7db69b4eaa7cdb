use std::time::{Duration, Instant};

use ratatui::widgets::TableState;

use crate::action::Action;
use crate::domain::{Record, RecordRef, Workgroup};
use crate::kinds::{kind_spec, operation_spec, KindId, OperationId};
use crate::listing::{
    FetchError, ListView, PageResult, Pager, RequestDescriptor, RequestToken, SettleOutcome,
    Settlement, Ticket,
};
use crate::nav::{format_deep_link, parse_deep_link, Location, Navigator};

/// Page sizes offered by `+`/`-`.
pub const PAGE_SIZE_OPTIONS: &[u32] = &[10, 20, 30];

const WORKGROUP_FILTER: &str = "workgroup";
const TOAST_TTL: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Command,
    Search,
    PendingG,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Overlay {
    None,
    Help,
    WorkgroupPicker,
    Confirm(ConfirmAction),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmAction {
    pub kind: KindId,
    pub op: OperationId,
    pub target: RecordRef,
}

#[derive(Debug, Clone)]
pub enum LoadState<T> {
    NotLoaded,
    Loading,
    Loaded(T),
    Error(String),
}

impl<T> LoadState<T> {
    pub fn data(&self) -> Option<&T> {
        match self {
            Self::Loaded(data) => Some(data),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    FetchPage {
        kind: KindId,
        token: RequestToken,
        descriptor: RequestDescriptor,
    },
    LoadWorkgroups,
    DeleteRecord(RecordRef),
    ClearSession,
    Quit,
}

pub struct App {
    pub active: KindId,
    pub input_mode: InputMode,
    pub overlay: Overlay,

    // One list per resource, indexed by `KindId::position`.
    pub views: [ListView<Record>; 4],
    pub table_states: [TableState; 4],
    pub navigator: Navigator,

    pub workgroups: LoadState<Vec<Workgroup>>,
    pub workgroup_picker_state: TableState,

    pub input_buffer: String,
    pub user_label: String,

    pub should_quit: bool,
    /// Printed after the terminal is restored.
    pub exit_message: Option<String>,
    pub last_error: Option<(String, Instant)>,
    pub last_notice: Option<(String, Instant)>,
}

impl App {
    pub fn new(page_size: u32, search_debounce: Duration, user_label: String) -> Self {
        let views = KindId::ALL.map(|kind| {
            let spec = kind_spec(kind);
            ListView::new(spec.path, spec.filters, page_size, search_debounce)
        });
        Self {
            active: KindId::Documents,
            input_mode: InputMode::Normal,
            overlay: Overlay::None,

            views,
            table_states: Default::default(),
            navigator: Navigator::new(Location::root(KindId::Documents)),

            workgroups: LoadState::NotLoaded,
            workgroup_picker_state: TableState::default(),

            input_buffer: String::new(),
            user_label,

            should_quit: false,
            exit_message: None,
            last_error: None,
            last_notice: None,
        }
    }

    /// First fetch, optionally starting from a deep link.
    pub fn start(&mut self, open: Option<Location>) -> Vec<Effect> {
        match open {
            Some(location) => {
                self.navigator.replace(location.clone());
                self.show_location(location)
            }
            None => {
                let ticket = self.view_mut(self.active).sync();
                self.fetch_effects(self.active, ticket)
            }
        }
    }

    pub fn view(&self, kind: KindId) -> &ListView<Record> {
        &self.views[kind.position()]
    }

    fn view_mut(&mut self, kind: KindId) -> &mut ListView<Record> {
        &mut self.views[kind.position()]
    }

    pub fn active_view(&self) -> &ListView<Record> {
        self.view(self.active)
    }

    pub fn pager(&self) -> Pager {
        self.active_view().pager()
    }

    pub fn table_state_mut(&mut self) -> &mut TableState {
        &mut self.table_states[self.active.position()]
    }

    pub fn location(&self) -> Location {
        Location::new(self.active, self.active_view().location_params())
    }

    pub fn location_uri(&self) -> String {
        format_deep_link(&self.location())
    }

    pub fn selected_record(&self) -> Option<&Record> {
        let idx = self.table_states[self.active.position()].selected()?;
        self.active_view().rows().get(idx)
    }

    pub fn update(&mut self, action: Action) -> Vec<Effect> {
        self.update_at(action, Instant::now())
    }

    /// Reducer with an explicit clock, used by the debounced search.
    pub fn update_at(&mut self, action: Action, now: Instant) -> Vec<Effect> {
        self.expire_toasts(now);

        match action {
            Action::NavigateUp => {
                if self.overlay == Overlay::WorkgroupPicker {
                    self.workgroup_picker_state.select_previous();
                } else {
                    self.table_state_mut().select_previous();
                }
                vec![]
            }
            Action::NavigateDown => {
                if self.overlay == Overlay::WorkgroupPicker {
                    let len = self.picker_len();
                    if self.workgroup_picker_state.selected().unwrap_or(0) + 1 < len {
                        self.workgroup_picker_state.select_next();
                    }
                } else {
                    let len = self.active_view().rows().len();
                    let state = self.table_state_mut();
                    if state.selected().map(|idx| idx + 1 < len).unwrap_or(len > 0) {
                        state.select_next();
                    }
                }
                vec![]
            }
            Action::NavigateTop => {
                self.input_mode = InputMode::Normal;
                self.table_state_mut().select_first();
                vec![]
            }
            Action::NavigateBottom => {
                let len = self.active_view().rows().len();
                if len > 0 {
                    self.table_state_mut().select(Some(len - 1));
                }
                vec![]
            }
            Action::Select => self.handle_select(now),
            Action::Back => self.handle_back(),

            Action::EnterPendingG => {
                self.input_mode = InputMode::PendingG;
                vec![]
            }

            // Paging
            Action::NextPage => {
                let ticket = self.view_mut(self.active).next_page();
                self.fetch_effects(self.active, ticket)
            }
            Action::PrevPage => {
                let ticket = self.view_mut(self.active).prev_page();
                self.fetch_effects(self.active, ticket)
            }
            Action::FirstPage => {
                let ticket = self.view_mut(self.active).first_page();
                self.fetch_effects(self.active, ticket)
            }
            Action::LastPage => {
                let ticket = self.view_mut(self.active).last_page();
                self.fetch_effects(self.active, ticket)
            }
            Action::GoToPage(index) => match self.view_mut(self.active).set_page(index) {
                Ok(ticket) => self.fetch_effects(self.active, ticket),
                Err(err) => {
                    self.show_error(err.to_string(), now);
                    vec![]
                }
            },
            Action::SetPageSize(size) => {
                if size == 0 {
                    self.show_error("page size must be at least 1".to_string(), now);
                    return vec![];
                }
                let ticket = self.view_mut(self.active).set_page_size(size);
                self.fetch_effects(self.active, ticket)
            }
            Action::CyclePageSize { forward } => {
                let size = next_page_size(self.active_view().page_size(), forward);
                self.update_at(Action::SetPageSize(size), now)
            }

            // Filters
            Action::SetFilter { name, value } => self.set_filter(&name, &value, now),
            Action::ResetFilters => {
                let ticket = self.view_mut(self.active).reset_filters();
                self.navigator.push(self.location());
                self.fetch_effects(self.active, ticket)
            }
            Action::OpenWorkgroupPicker => {
                if self.active_view().filters().def(WORKGROUP_FILTER).is_none() {
                    self.show_error(
                        format!("{} cannot be filtered by workgroup", self.active.label()),
                        now,
                    );
                    return vec![];
                }
                self.overlay = Overlay::WorkgroupPicker;
                self.workgroup_picker_state.select_first();
                match self.workgroups {
                    LoadState::NotLoaded | LoadState::Error(_) => {
                        self.workgroups = LoadState::Loading;
                        vec![Effect::LoadWorkgroups]
                    }
                    _ => vec![],
                }
            }

            // View switching
            Action::SwitchView(kind) => {
                if kind != self.active {
                    self.active = kind;
                    self.navigator.push(self.location());
                }
                let ticket = self.view_mut(kind).sync();
                self.fetch_effects(kind, ticket)
            }
            Action::NextView => self.update_at(Action::SwitchView(self.active.next()), now),
            Action::OpenLocation(location) => {
                let effects = self.show_location(location);
                self.navigator.push(self.location());
                effects
            }

            // Operations
            Action::RunOperation(op_id) => self.run_operation(op_id, now),
            Action::ConfirmOperation => {
                let Overlay::Confirm(confirm) = std::mem::replace(&mut self.overlay, Overlay::None)
                else {
                    return vec![];
                };
                match confirm.op {
                    OperationId::Delete => vec![Effect::DeleteRecord(confirm.target)],
                }
            }

            // UI
            Action::OpenCommandInput => {
                self.input_mode = InputMode::Command;
                self.input_buffer.clear();
                vec![]
            }
            Action::OpenSearch => {
                self.input_mode = InputMode::Search;
                self.input_buffer = self.active_view().filters().search().to_string();
                vec![]
            }
            Action::CloseOverlay => {
                if self.overlay != Overlay::None {
                    self.overlay = Overlay::None;
                } else if self.input_mode != InputMode::Normal {
                    if self.input_mode == InputMode::Search {
                        self.view_mut(self.active).cancel_search();
                    }
                    self.input_mode = InputMode::Normal;
                    self.input_buffer.clear();
                }
                vec![]
            }
            Action::SubmitCommandInput(cmd) => {
                self.input_mode = InputMode::Normal;
                self.input_buffer.clear();
                self.execute_command(&cmd, now)
            }
            Action::SubmitSearch(query) => {
                self.input_mode = InputMode::Normal;
                self.input_buffer.clear();
                let ticket = self.view_mut(self.active).submit_search(&query);
                self.navigator.replace(self.location());
                self.fetch_effects(self.active, ticket)
            }
            Action::UpdateInputBuffer(buf) => {
                if self.input_mode == InputMode::Search {
                    self.view_mut(self.active).type_search(&buf, now);
                }
                self.input_buffer = buf;
                vec![]
            }
            Action::ToggleHelp => {
                self.overlay = if self.overlay == Overlay::Help {
                    Overlay::None
                } else {
                    Overlay::Help
                };
                vec![]
            }

            // Data responses
            Action::PageLoaded {
                kind,
                token,
                result,
            } => self.apply_page(kind, token, result, now),
            Action::WorkgroupsLoaded(workgroups) => {
                self.workgroups = LoadState::Loaded(workgroups);
                if self.workgroup_picker_state.selected().is_none() {
                    self.workgroup_picker_state.select_first();
                }
                vec![]
            }
            Action::WorkgroupsFailed(msg) => {
                self.workgroups = LoadState::Error(msg.clone());
                self.show_error(format!("failed to load workgroups: {}", msg), now);
                vec![]
            }
            Action::RecordDeleted(target) => {
                tracing::info!(kind = ?target.kind, id = target.id, "refetching after delete");
                self.last_notice = Some((format!("Deleted {:?}", target.title), now));
                let ticket = self.view_mut(target.kind).refetch();
                self.fetch_effects(target.kind, ticket)
            }
            Action::SessionExpired => {
                tracing::warn!("session expired, signing out");
                self.should_quit = true;
                self.exit_message = Some(
                    "Your session has expired. Run `safta-admin login` to sign in again."
                        .to_string(),
                );
                vec![Effect::ClearSession, Effect::Quit]
            }

            // App control
            Action::Refresh => {
                let ticket = self.view_mut(self.active).refetch();
                self.fetch_effects(self.active, ticket)
            }
            Action::Logout => {
                self.should_quit = true;
                self.exit_message = Some("Signed out.".to_string());
                vec![Effect::ClearSession, Effect::Quit]
            }
            Action::Quit => {
                self.should_quit = true;
                vec![Effect::Quit]
            }
            Action::Tick => self.poll_searches(now),
            Action::Error(msg) => {
                self.show_error(msg, now);
                vec![]
            }
            Action::ClearError => {
                self.last_error = None;
                vec![]
            }
        }
    }

    fn fetch_effects(&self, kind: KindId, ticket: Option<Ticket>) -> Vec<Effect> {
        let Some(ticket) = ticket else {
            return vec![];
        };
        let descriptor = self.view(kind).descriptor(&ticket.request);
        tracing::debug!(?kind, token = %ticket.token, request = %descriptor, "issuing fetch");
        vec![Effect::FetchPage {
            kind,
            token: ticket.token,
            descriptor,
        }]
    }

    fn apply_page(
        &mut self,
        kind: KindId,
        token: RequestToken,
        result: Result<PageResult<Record>, FetchError>,
        now: Instant,
    ) -> Vec<Effect> {
        let SettleOutcome {
            settlement,
            follow_up,
        } = self.view_mut(kind).settle(token, result);

        if settlement == Settlement::Stale {
            return vec![];
        }

        let message = match self.view(kind).fetch().error() {
            Some(err) if !err.is_auth() => Some(err.to_string()),
            _ => None,
        };
        if let Some(message) = message {
            self.show_error(message, now);
        }

        let len = self.view(kind).rows().len();
        let state = &mut self.table_states[kind.position()];
        match state.selected() {
            _ if len == 0 => state.select(None),
            Some(idx) if idx >= len => state.select(Some(len - 1)),
            None => state.select_first(),
            _ => {}
        }

        self.fetch_effects(kind, follow_up)
    }

    fn set_filter(&mut self, name: &str, value: &str, now: Instant) -> Vec<Effect> {
        if self.active_view().filters().def(name).is_none() {
            let names: Vec<_> = self
                .active_view()
                .filters()
                .defs()
                .iter()
                .map(|def| def.name)
                .collect();
            self.show_error(
                format!("unknown filter {:?} (available: {})", name, names.join(", ")),
                now,
            );
            return vec![];
        }

        match self.view_mut(self.active).set_filter(name, value) {
            Ok(ticket) => {
                self.navigator.push(self.location());
                self.fetch_effects(self.active, ticket)
            }
            Err(err) => {
                self.show_error(err.to_string(), now);
                vec![]
            }
        }
    }

    fn poll_searches(&mut self, now: Instant) -> Vec<Effect> {
        let mut effects = Vec::new();
        for kind in KindId::ALL {
            let ticket = self.view_mut(kind).poll_search(now);
            if ticket.is_some() && kind == self.active {
                self.navigator.replace(self.location());
            }
            effects.extend(self.fetch_effects(kind, ticket));
        }
        effects
    }

    fn show_location(&mut self, location: Location) -> Vec<Effect> {
        self.active = location.kind;
        let ticket = self.view_mut(location.kind).hydrate(&location.params);
        self.fetch_effects(location.kind, ticket)
    }

    fn handle_select(&mut self, now: Instant) -> Vec<Effect> {
        if self.overlay != Overlay::WorkgroupPicker {
            return vec![];
        }
        self.overlay = Overlay::None;

        // Row 0 is "All workgroups".
        let idx = self.workgroup_picker_state.selected().unwrap_or(0);
        let value = match idx.checked_sub(1) {
            None => String::new(),
            Some(i) => match self.workgroups.data().and_then(|groups| groups.get(i)) {
                Some(group) => group.id.clone(),
                None => return vec![],
            },
        };
        self.set_filter(WORKGROUP_FILTER, &value, now)
    }

    fn handle_back(&mut self) -> Vec<Effect> {
        if self.input_mode == InputMode::PendingG {
            self.input_mode = InputMode::Normal;
            return vec![];
        }
        let Some(location) = self.navigator.back().cloned() else {
            return vec![];
        };
        self.show_location(location)
    }

    fn picker_len(&self) -> usize {
        self.workgroups.data().map(Vec::len).unwrap_or(0) + 1
    }

    fn run_operation(&mut self, op_id: OperationId, now: Instant) -> Vec<Effect> {
        let kind = self.active;
        let Some(spec) = operation_spec(kind, op_id) else {
            return vec![];
        };
        let Some(record) = self.selected_record() else {
            self.show_error("no row selected".to_string(), now);
            return vec![];
        };
        let target = record.to_ref();

        if spec.requires_confirm {
            self.overlay = Overlay::Confirm(ConfirmAction {
                kind,
                op: op_id,
                target,
            });
            return vec![];
        }
        match op_id {
            OperationId::Delete => vec![Effect::DeleteRecord(target)],
        }
    }

    fn execute_command(&mut self, cmd: &str, now: Instant) -> Vec<Effect> {
        let mut parts = cmd.trim().splitn(2, ' ');
        let command = parts.next().unwrap_or("").to_lowercase();
        let args = parts.next().map(str::trim).filter(|s| !s.is_empty());

        match command.as_str() {
            "documents" | "docs" => self.update_at(Action::SwitchView(KindId::Documents), now),
            "members" | "mem" => self.update_at(Action::SwitchView(KindId::Members), now),
            "users" | "usr" => self.update_at(Action::SwitchView(KindId::Users), now),
            "links" | "ln" => self.update_at(Action::SwitchView(KindId::Links), now),
            "filter" | "f" => {
                let Some(args) = args else {
                    self.show_error("usage: :filter <name> [value]".to_string(), now);
                    return vec![];
                };
                let mut args = args.splitn(2, ' ');
                let name = args.next().unwrap_or("").to_string();
                let value = args.next().unwrap_or("").trim().to_string();
                self.update_at(Action::SetFilter { name, value }, now)
            }
            "reset" => self.update_at(Action::ResetFilters, now),
            "page" | "p" => match args.and_then(|a| a.parse::<usize>().ok()) {
                Some(n) if n >= 1 => self.update_at(Action::GoToPage(n - 1), now),
                _ => {
                    self.show_error("usage: :page <number>".to_string(), now);
                    vec![]
                }
            },
            "size" => match args.and_then(|a| a.parse::<u32>().ok()) {
                Some(size) => self.update_at(Action::SetPageSize(size), now),
                None => {
                    self.show_error("usage: :size <rows per page>".to_string(), now);
                    vec![]
                }
            },
            "open" | "goto" => {
                let Some(uri) = args else {
                    self.show_error("usage: :open safta://admin/<resource>?...".to_string(), now);
                    return vec![];
                };
                match parse_deep_link(uri) {
                    Ok(location) => self.update_at(Action::OpenLocation(location), now),
                    Err(err) => {
                        self.show_error(format!("invalid link: {}", err), now);
                        vec![]
                    }
                }
            }
            "refresh" | "r" => self.update_at(Action::Refresh, now),
            "logout" => self.update_at(Action::Logout, now),
            "help" | "h" => {
                self.overlay = Overlay::Help;
                vec![]
            }
            "quit" | "q" => self.update_at(Action::Quit, now),
            "" => vec![],
            _ => {
                self.show_error(format!("unknown command: {}", command), now);
                vec![]
            }
        }
    }

    fn show_error(&mut self, msg: String, now: Instant) {
        tracing::debug!(%msg, "showing error");
        self.last_error = Some((msg, now));
    }

    fn expire_toasts(&mut self, now: Instant) {
        if let Some((_, at)) = &self.last_error {
            if now.saturating_duration_since(*at) > TOAST_TTL {
                self.last_error = None;
            }
        }
        if let Some((_, at)) = &self.last_notice {
            if now.saturating_duration_since(*at) > TOAST_TTL {
                self.last_notice = None;
            }
        }
    }
}

fn next_page_size(current: u32, forward: bool) -> u32 {
    let Some(pos) = PAGE_SIZE_OPTIONS.iter().position(|&size| size == current) else {
        return PAGE_SIZE_OPTIONS[0];
    };
    let len = PAGE_SIZE_OPTIONS.len();
    let next = if forward {
        (pos + 1) % len
    } else {
        (pos + len - 1) % len
    };
    PAGE_SIZE_OPTIONS[next]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Link;

    const DEBOUNCE: Duration = Duration::from_millis(300);

    fn app() -> App {
        App::new(10, DEBOUNCE, "Admin".into())
    }

    fn link(id: u64) -> Record {
        Record::Link(Link {
            id,
            title: format!("Link {}", id),
            link: format!("https://example.org/{}", id),
            created_at: "2024-03-05".into(),
            creator_name: "Huda".into(),
            status: 2,
            public_at: None,
        })
    }

    fn only_fetch(effects: &[Effect]) -> (KindId, RequestToken, RequestDescriptor) {
        match effects {
            [Effect::FetchPage {
                kind,
                token,
                descriptor,
            }] => (*kind, *token, descriptor.clone()),
            other => panic!("expected exactly one fetch, got {:?}", other),
        }
    }

    fn page(rows: std::ops::Range<u64>, total: u64, current: u32) -> PageResult<Record> {
        PageResult {
            rows: rows.map(link).collect(),
            total_count: total,
            current_page: current,
            page_size: 10,
        }
    }

    /// Links view with page 1 of `total` rows loaded.
    fn links_loaded(total: u64) -> App {
        let mut app = app();
        let (kind, token, _) = only_fetch(&app.update(Action::SwitchView(KindId::Links)));
        let effects = app.update(Action::PageLoaded {
            kind,
            token,
            result: Ok(page(0..total.min(10), total, 1)),
        });
        assert!(effects.is_empty());
        app
    }

    #[test]
    fn start_fetches_first_documents_page() {
        let mut app = app();
        let (kind, _, descriptor) = only_fetch(&app.start(None));
        assert_eq!(kind, KindId::Documents);
        assert_eq!(descriptor.to_string(), "/documents?page=1&size=10");
    }

    #[test]
    fn start_from_deep_link_hydrates_filters() {
        let mut app = app();
        let location = parse_deep_link("safta://admin/links?status=2&workgroup=5").unwrap();
        let (kind, _, descriptor) = only_fetch(&app.start(Some(location)));
        assert_eq!(kind, KindId::Links);
        assert_eq!(app.active, KindId::Links);
        assert_eq!(descriptor.param("status"), Some("2"));
        assert_eq!(descriptor.param("workgroup"), Some("5"));
        assert_eq!(descriptor.param("page"), Some("1"));
    }

    #[test]
    fn late_response_for_superseded_page_is_ignored() {
        let mut app = links_loaded(23);
        let (_, second, _) = only_fetch(&app.update(Action::NextPage));
        let (_, third, _) = only_fetch(&app.update(Action::NextPage));

        app.update(Action::PageLoaded {
            kind: KindId::Links,
            token: third,
            result: Ok(page(20..23, 23, 3)),
        });
        app.update(Action::PageLoaded {
            kind: KindId::Links,
            token: second,
            result: Ok(page(10..20, 23, 2)),
        });

        let ids: Vec<_> = app.active_view().rows().iter().map(Record::id).collect();
        assert_eq!(ids, vec![20, 21, 22]);
        assert_eq!(app.pager().results_label(), "Showing 21-23 of 23 results");
    }

    #[test]
    fn page_past_the_end_is_rejected_without_fetch() {
        let mut app = links_loaded(23);
        let effects = app.update(Action::SubmitCommandInput("page 4".into()));
        assert!(effects.is_empty());
        assert!(app.last_error.is_some());
        assert_eq!(app.active_view().page(), 0);
    }

    #[test]
    fn reset_filters_sends_only_paging() {
        let mut app = links_loaded(23);
        app.update(Action::SetFilter {
            name: "status".into(),
            value: "2".into(),
        });
        app.update(Action::SetFilter {
            name: "workgroup".into(),
            value: "5".into(),
        });

        let (_, _, descriptor) = only_fetch(&app.update(Action::SubmitCommandInput("reset".into())));
        assert_eq!(descriptor.to_string(), "/links?page=1&size=10");
        assert_eq!(app.location_uri(), "safta://admin/links");
    }

    #[test]
    fn invalid_filter_value_shows_error_and_sends_nothing() {
        let mut app = links_loaded(23);
        let effects = app.update(Action::SubmitCommandInput("filter workgroup abc".into()));
        assert!(effects.is_empty());
        assert!(app.last_error.is_some());

        let effects = app.update(Action::SubmitCommandInput("filter sector 1".into()));
        assert!(effects.is_empty());
    }

    #[test]
    fn page_size_cycle_resets_to_first_page() {
        let mut app = links_loaded(45);
        let (_, token, _) = only_fetch(&app.update(Action::GoToPage(2)));
        app.update(Action::PageLoaded {
            kind: KindId::Links,
            token,
            result: Ok(page(20..30, 45, 3)),
        });

        let (_, _, descriptor) = only_fetch(&app.update(Action::CyclePageSize { forward: true }));
        assert_eq!(descriptor.param("page"), Some("1"));
        assert_eq!(descriptor.param("size"), Some("20"));

        assert_eq!(next_page_size(10, false), 30);
        assert_eq!(next_page_size(50, true), 10);
    }

    #[test]
    fn typing_search_fetches_once_after_debounce() {
        let mut app = links_loaded(23);
        let t0 = Instant::now();
        app.update_at(Action::OpenSearch, t0);
        for (i, text) in ["a", "an", "ann"].iter().enumerate() {
            let at = t0 + Duration::from_millis(100 * i as u64);
            assert!(app
                .update_at(Action::UpdateInputBuffer(text.to_string()), at)
                .is_empty());
            assert!(app.update_at(Action::Tick, at).is_empty());
        }

        let effects = app.update_at(Action::Tick, t0 + Duration::from_millis(600));
        let (_, _, descriptor) = only_fetch(&effects);
        assert_eq!(descriptor.param("search"), Some("ann"));
        assert_eq!(descriptor.param("page"), Some("1"));
        assert!(app
            .update_at(Action::Tick, t0 + Duration::from_millis(1200))
            .is_empty());
        // Search commits replace the history entry.
        assert_eq!(app.navigator.depth(), 1);
    }

    #[test]
    fn escape_discards_uncommitted_search() {
        let mut app = links_loaded(23);
        let t0 = Instant::now();
        app.update_at(Action::OpenSearch, t0);
        app.update_at(Action::UpdateInputBuffer("draft".into()), t0);
        app.update_at(Action::CloseOverlay, t0);
        assert!(app
            .update_at(Action::Tick, t0 + Duration::from_secs(1))
            .is_empty());
        assert_eq!(app.input_mode, InputMode::Normal);
    }

    #[test]
    fn delete_confirms_then_refetches_same_request() {
        let mut app = links_loaded(23);
        app.update(Action::NavigateDown);
        assert!(app.update(Action::RunOperation(OperationId::Delete)).is_empty());
        let Overlay::Confirm(ref confirm) = app.overlay else {
            panic!("expected confirm overlay");
        };
        assert_eq!(confirm.target.id, 1);

        let effects = app.update(Action::ConfirmOperation);
        let [Effect::DeleteRecord(target)] = effects.as_slice() else {
            panic!("expected delete, got {:?}", effects);
        };
        assert_eq!(app.overlay, Overlay::None);

        let (kind, _, descriptor) = only_fetch(&app.update(Action::RecordDeleted(target.clone())));
        assert_eq!(kind, KindId::Links);
        assert_eq!(descriptor.to_string(), "/links?page=1&size=10");
    }

    #[test]
    fn users_have_no_delete() {
        let mut app = app();
        app.active = KindId::Users;
        assert!(app.update(Action::RunOperation(OperationId::Delete)).is_empty());
        assert_eq!(app.overlay, Overlay::None);
    }

    #[test]
    fn deleting_last_row_of_last_page_clamps_with_one_follow_up() {
        let mut app = links_loaded(21);
        let (_, token, _) = only_fetch(&app.update(Action::LastPage));
        app.update(Action::PageLoaded {
            kind: KindId::Links,
            token,
            result: Ok(page(20..21, 21, 3)),
        });

        let (_, again, _) = only_fetch(&app.update(Action::Refresh));
        let effects = app.update(Action::PageLoaded {
            kind: KindId::Links,
            token: again,
            result: Ok(page(0..0, 20, 3)),
        });
        let (_, _, descriptor) = only_fetch(&effects);
        assert_eq!(descriptor.param("page"), Some("2"));
        assert_eq!(app.active_view().page(), 1);
    }

    #[test]
    fn back_restores_previous_filters() {
        let mut app = links_loaded(23);
        app.update(Action::SetFilter {
            name: "status".into(),
            value: "1".into(),
        });
        app.update(Action::SwitchView(KindId::Members));
        assert_eq!(app.active, KindId::Members);

        app.update(Action::Back);
        assert_eq!(app.active, KindId::Links);
        assert_eq!(app.active_view().filters().get("status"), Some("1"));

        app.update(Action::Back);
        assert_eq!(app.active_view().filters().get("status"), None);
    }

    #[test]
    fn fetch_error_keeps_rows_and_shows_toast() {
        let mut app = links_loaded(23);
        let (_, token, _) = only_fetch(&app.update(Action::NextPage));
        app.update(Action::PageLoaded {
            kind: KindId::Links,
            token,
            result: Err(FetchError::Server {
                status: 500,
                message: "An unexpected error occurred.".into(),
            }),
        });
        assert_eq!(app.active_view().rows().len(), 10);
        assert_eq!(
            app.last_error.as_ref().map(|(m, _)| m.as_str()),
            Some("An unexpected error occurred.")
        );
    }

    #[test]
    fn session_expiry_clears_session_and_quits() {
        let mut app = app();
        let effects = app.update(Action::SessionExpired);
        assert_eq!(effects, vec![Effect::ClearSession, Effect::Quit]);
        assert!(app.should_quit);
        assert!(app.exit_message.is_some());
    }

    #[test]
    fn workgroup_picker_applies_filter() {
        let mut app = links_loaded(23);
        assert_eq!(
            app.update(Action::OpenWorkgroupPicker),
            vec![Effect::LoadWorkgroups]
        );
        app.update(Action::WorkgroupsLoaded(vec![
            Workgroup {
                id: "4".into(),
                name: "AI Ethics".into(),
            },
            Workgroup {
                id: "7".into(),
                name: "Open Data".into(),
            },
        ]));
        app.update(Action::NavigateDown);
        app.update(Action::NavigateDown);
        let (_, _, descriptor) = only_fetch(&app.update(Action::Select));
        assert_eq!(descriptor.param("workgroup"), Some("7"));
        assert_eq!(app.overlay, Overlay::None);

        // Already loaded, no second request.
        assert!(app.update(Action::OpenWorkgroupPicker).is_empty());
    }

    #[test]
    fn unrelated_error_leaves_workgroup_load_pending() {
        let mut app = links_loaded(23);
        assert_eq!(
            app.update(Action::OpenWorkgroupPicker),
            vec![Effect::LoadWorkgroups]
        );
        app.update(Action::Error("failed to delete \"Charter\": gone".into()));
        assert!(app.workgroups.is_loading());

        app.update(Action::WorkgroupsFailed("Maintenance".into()));
        assert!(matches!(app.workgroups, LoadState::Error(ref msg) if msg == "Maintenance"));

        // A failed load is retried on the next open.
        assert_eq!(
            app.update(Action::OpenWorkgroupPicker),
            vec![Effect::LoadWorkgroups]
        );
    }

    #[test]
    fn members_have_no_workgroup_picker() {
        let mut app = app();
        app.active = KindId::Members;
        assert!(app.update(Action::OpenWorkgroupPicker).is_empty());
        assert_eq!(app.overlay, Overlay::None);
        assert!(app.last_error.is_some());
    }

    #[test]
    fn open_command_switches_and_pushes_history() {
        let mut app = links_loaded(23);
        let (kind, _, descriptor) = only_fetch(
            &app.update(Action::SubmitCommandInput(
                "open safta://admin/members?sector=2".into(),
            )),
        );
        assert_eq!(kind, KindId::Members);
        assert_eq!(descriptor.param("sector"), Some("2"));
        assert_eq!(app.location_uri(), "safta://admin/members?sector=2");

        assert!(app
            .update(Action::SubmitCommandInput("open http://nope".into()))
            .is_empty());
        assert!(app.last_error.is_some());
    }

    #[test]
    fn toasts_expire() {
        let mut app = app();
        let t0 = Instant::now();
        app.update_at(Action::Error("boom".into()), t0);
        app.update_at(Action::Tick, t0 + Duration::from_secs(1));
        assert!(app.last_error.is_some());
        app.update_at(Action::Tick, t0 + Duration::from_secs(6));
        assert!(app.last_error.is_none());
    }
}
