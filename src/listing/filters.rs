use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use chrono::NaiveDate;
use thiserror::Error;

/// Location parameter carrying the committed free-text search.
pub const SEARCH_PARAM: &str = "q";

pub const DEFAULT_SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

/// Non-empty filter values keyed by filter name, iterated alphabetically.
pub type FilterSet = BTreeMap<String, String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterKind {
    /// Positive integer identifier (workgroup id, document id).
    Id,
    /// Calendar date in `YYYY-MM-DD` form.
    Date,
    /// One of a fixed set of `(value, label)` pairs.
    Choice(&'static [(&'static str, &'static str)]),
    Text,
}

impl FilterKind {
    /// Normalizes a non-empty raw value, or `None` when it is malformed.
    pub fn normalize(&self, raw: &str) -> Option<String> {
        let value = raw.trim();
        if value.is_empty() {
            return None;
        }
        match self {
            Self::Id => value
                .parse::<u64>()
                .ok()
                .filter(|id| *id > 0)
                .map(|id| id.to_string()),
            Self::Date => NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .ok()
                .map(|date| date.format("%Y-%m-%d").to_string()),
            Self::Choice(options) => options
                .iter()
                .find(|(option, _)| *option == value)
                .map(|(option, _)| option.to_string()),
            Self::Text => Some(value.to_string()),
        }
    }

    pub fn expected(&self) -> String {
        match self {
            Self::Id => "a positive integer".to_string(),
            Self::Date => "a date (YYYY-MM-DD)".to_string(),
            Self::Choice(options) => {
                let values: Vec<&str> = options.iter().map(|(value, _)| *value).collect();
                format!("one of {}", values.join(", "))
            }
            Self::Text => "text".to_string(),
        }
    }

    /// Display label for a stored value (choice labels, raw otherwise).
    pub fn label_for<'a>(&self, value: &'a str) -> &'a str {
        if let Self::Choice(options) = self {
            if let Some((_, label)) = options.iter().find(|(option, _)| *option == value) {
                return label;
            }
        }
        value
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FilterDef {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FilterKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterError {
    #[error("invalid value {value:?} for {name}: expected {expected}")]
    InvalidValue {
        name: String,
        value: String,
        expected: String,
    },
}

#[derive(Debug, Clone)]
struct PendingSearch {
    value: String,
    deadline: Instant,
}

/// Single writer of a list view's filters and committed search.
#[derive(Debug, Clone)]
pub struct FilterStore {
    defs: &'static [FilterDef],
    filters: FilterSet,
    search: String,
    pending: Option<PendingSearch>,
    debounce: Duration,
}

impl FilterStore {
    pub fn new(defs: &'static [FilterDef], debounce: Duration) -> Self {
        Self {
            defs,
            filters: FilterSet::new(),
            search: String::new(),
            pending: None,
            debounce,
        }
    }

    pub fn defs(&self) -> &'static [FilterDef] {
        self.defs
    }

    pub fn def(&self, name: &str) -> Option<&'static FilterDef> {
        self.defs.iter().find(|def| def.name == name)
    }

    pub fn filters(&self) -> &FilterSet {
        &self.filters
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.filters.get(name).map(String::as_str)
    }

    /// Committed search text.
    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn has_pending_search(&self) -> bool {
        self.pending.is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty() && self.search.is_empty()
    }

    /// Stores a discrete filter value; an empty value removes the key.
    ///
    /// Returns whether the committed filter set changed. Passing a name that
    /// the view does not declare is a programming error: it trips a debug
    /// assertion and is otherwise ignored.
    pub fn set_filter(&mut self, name: &str, value: &str) -> Result<bool, FilterError> {
        let Some(def) = self.def(name) else {
            debug_assert!(false, "unknown filter {name:?}");
            tracing::error!(filter = name, "ignoring unknown filter");
            return Ok(false);
        };

        if value.trim().is_empty() {
            return Ok(self.filters.remove(name).is_some());
        }

        let normalized = def.kind.normalize(value).ok_or_else(|| FilterError::InvalidValue {
            name: name.to_string(),
            value: value.to_string(),
            expected: def.kind.expected(),
        })?;

        if self.filters.get(name) == Some(&normalized) {
            return Ok(false);
        }
        self.filters.insert(name.to_string(), normalized);
        Ok(true)
    }

    /// Records an uncommitted search edit; it commits once the debounce
    /// window elapses without further typing.
    pub fn type_search(&mut self, value: &str, now: Instant) {
        self.pending = Some(PendingSearch {
            value: value.to_string(),
            deadline: now + self.debounce,
        });
    }

    /// Commits a pending search whose deadline has passed. Returns whether
    /// the committed search changed.
    pub fn poll_search(&mut self, now: Instant) -> bool {
        match self.pending {
            Some(ref pending) if pending.deadline <= now => {}
            _ => return false,
        }
        let Some(pending) = self.pending.take() else {
            return false;
        };
        self.commit_search(&pending.value)
    }

    /// Commits a search immediately, discarding any pending edit.
    pub fn submit_search(&mut self, value: &str) -> bool {
        self.pending = None;
        self.commit_search(value)
    }

    pub fn cancel_search(&mut self) {
        self.pending = None;
    }

    fn commit_search(&mut self, value: &str) -> bool {
        let value = value.trim();
        if self.search == value {
            return false;
        }
        self.search = value.to_string();
        true
    }

    /// Clears every filter and the search. Returns whether anything changed.
    pub fn reset(&mut self) -> bool {
        self.pending = None;
        let changed = !self.is_empty();
        self.filters.clear();
        self.search.clear();
        changed
    }

    /// Replaces the store content from location parameters. Unknown keys are
    /// ignored and malformed values are treated as absent.
    pub fn hydrate(&mut self, params: &BTreeMap<String, String>) -> bool {
        let mut filters = FilterSet::new();
        for def in self.defs {
            let Some(raw) = params.get(def.name) else {
                continue;
            };
            match def.kind.normalize(raw) {
                Some(value) => {
                    filters.insert(def.name.to_string(), value);
                }
                None => {
                    tracing::debug!(filter = def.name, value = %raw, "dropping malformed filter");
                }
            }
        }
        let search = params
            .get(SEARCH_PARAM)
            .map(|s| s.trim().to_string())
            .unwrap_or_default();

        self.pending = None;
        let changed = filters != self.filters || search != self.search;
        self.filters = filters;
        self.search = search;
        changed
    }

    /// Serialized form written into the view's location.
    pub fn to_params(&self) -> BTreeMap<String, String> {
        let mut params = self.filters.clone();
        if !self.search.is_empty() {
            params.insert(SEARCH_PARAM.to_string(), self.search.clone());
        }
        params
    }
}
