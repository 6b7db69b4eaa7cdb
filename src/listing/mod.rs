//! Server-backed list views: filter state, query building, fetch tracking
//! and pagination math, independent of any particular resource or transport.

pub mod controller;
pub mod filters;
pub mod pager;
pub mod query;
pub mod view;

pub use controller::{
    FetchController, FetchError, FetchStatus, PageResult, RequestToken, Settlement, Ticket,
};
pub use filters::{FilterDef, FilterError, FilterKind, FilterSet, FilterStore, SEARCH_PARAM};
pub use pager::{PageButton, Pager};
pub use query::{build, from_wire_page, to_wire_page, PageRequest, RequestDescriptor};
pub use view::{ListView, SettleOutcome};
