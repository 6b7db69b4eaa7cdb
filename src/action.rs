use crate::domain::{Record, RecordRef, Workgroup};
use crate::kinds::{KindId, OperationId};
use crate::listing::{FetchError, PageResult, RequestToken};
use crate::nav::Location;

#[derive(Debug, Clone)]
pub enum Action {
    // Row navigation
    NavigateUp,
    NavigateDown,
    NavigateTop,
    NavigateBottom,
    Select,
    Back,

    // Vim chord
    EnterPendingG,

    // Paging
    NextPage,
    PrevPage,
    FirstPage,
    LastPage,
    /// 0-based page index.
    GoToPage(usize),
    SetPageSize(u32),
    CyclePageSize { forward: bool },

    // Filters
    SetFilter { name: String, value: String },
    ResetFilters,
    OpenWorkgroupPicker,

    // View switching
    SwitchView(KindId),
    NextView,
    OpenLocation(Location),

    // Operations
    RunOperation(OperationId),
    ConfirmOperation,

    // UI
    OpenCommandInput,
    OpenSearch,
    CloseOverlay,
    SubmitCommandInput(String),
    SubmitSearch(String),
    UpdateInputBuffer(String),
    ToggleHelp,

    // Data responses
    PageLoaded {
        kind: KindId,
        token: RequestToken,
        result: Result<PageResult<Record>, FetchError>,
    },
    WorkgroupsLoaded(Vec<Workgroup>),
    WorkgroupsFailed(String),
    RecordDeleted(RecordRef),
    SessionExpired,

    // App control
    Refresh,
    Logout,
    Quit,
    Tick,
    Error(String),
    ClearError,
}
