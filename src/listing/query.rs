use super::filters::FilterSet;

/// Wire parameter names owned by the query builder.
pub const PAGE_PARAM: &str = "page";
pub const SIZE_PARAM: &str = "size";
pub const SEARCH_KEY: &str = "search";

/// What a list view wants to see: a 0-based page of filtered rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub page: usize,
    pub page_size: u32,
    pub filters: FilterSet,
    pub search: String,
}

impl PageRequest {
    pub fn new(page: usize, page_size: u32) -> Self {
        Self {
            page,
            page_size: page_size.max(1),
            filters: FilterSet::new(),
            search: String::new(),
        }
    }
}

/// Normalized GET request handed to the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestDescriptor {
    pub path: String,
    pub params: Vec<(String, String)>,
}

impl RequestDescriptor {
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn keys(&self) -> Vec<&str> {
        self.params.iter().map(|(k, _)| k.as_str()).collect()
    }

    pub fn query_string(&self) -> String {
        self.params
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join("&")
    }
}

impl std::fmt::Display for RequestDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.params.is_empty() {
            write!(f, "{}", self.path)
        } else {
            write!(f, "{}?{}", self.path, self.query_string())
        }
    }
}

/// 0-based UI page index to the backend's 1-based page number. This is the
/// only place the conversion happens.
pub fn to_wire_page(index: usize) -> u32 {
    u32::try_from(index).unwrap_or(u32::MAX - 1).saturating_add(1)
}

/// Backend page number back to a 0-based index; `0` is read as the first page.
pub fn from_wire_page(page: u32) -> usize {
    page.saturating_sub(1) as usize
}

pub fn build(path: &str, request: &PageRequest) -> RequestDescriptor {
    let mut params: Vec<(String, String)> = vec![
        (PAGE_PARAM.to_string(), to_wire_page(request.page).to_string()),
        (SIZE_PARAM.to_string(), request.page_size.max(1).to_string()),
    ];

    for (key, value) in &request.filters {
        let value = value.trim();
        if !value.is_empty() {
            params.push((key.clone(), value.to_string()));
        }
    }

    let search = request.search.trim();
    if !search.is_empty() {
        params.push((SEARCH_KEY.to_string(), search.to_string()));
    }

    params.sort_by(|a, b| a.0.cmp(&b.0));

    RequestDescriptor {
        path: path.to_string(),
        params,
    }
}
