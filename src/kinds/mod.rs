use ratatui::layout::Constraint;
use ratatui::style::Style;
use ratatui::widgets::{Cell, Row};

use crate::domain::{display_date, Record, RecordRef, Tone, INVITE_STATUSES, LINK_STATUSES, SECTORS};
use crate::listing::{FilterDef, FilterKind};
use crate::theme;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum KindId {
    Documents,
    Members,
    Users,
    Links,
}

impl KindId {
    pub const ALL: [KindId; 4] = [Self::Documents, Self::Members, Self::Users, Self::Links];

    pub fn label(&self) -> &'static str {
        kind_spec(*self).label
    }

    /// Path segment used in deep links.
    pub fn slug(&self) -> &'static str {
        match self {
            Self::Documents => "documents",
            Self::Members => "members",
            Self::Users => "users",
            Self::Links => "links",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.slug() == slug)
    }

    pub fn position(&self) -> usize {
        Self::ALL.iter().position(|kind| kind == self).unwrap_or(0)
    }

    pub fn next(&self) -> Self {
        Self::ALL[(self.position() + 1) % Self::ALL.len()]
    }
}

#[derive(Debug, Clone)]
pub struct KindSpec {
    pub id: KindId,
    pub label: &'static str,
    /// Endpoint path under the API base URL.
    pub path: &'static str,
    /// Key of the row array inside the response `data` object.
    pub collection_key: &'static str,
    pub filters: &'static [FilterDef],
    pub collection: &'static CollectionSpec,
    pub operations: &'static [OperationSpec],
    pub delete_path: Option<fn(&RecordRef) -> Option<String>>,
}

#[derive(Debug, Clone, Copy)]
pub struct CollectionSpec {
    pub header: &'static [&'static str],
    pub widths: fn() -> Vec<Constraint>,
    /// Builds a table row from its 1-based serial number and record.
    pub row: fn(u64, &Record) -> Row<'static>,
    pub loading_label: &'static str,
    pub empty_label: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationId {
    Delete,
}

#[derive(Debug, Clone, Copy)]
pub struct OperationSpec {
    pub id: OperationId,
    pub label: &'static str,
    pub key: char,
    pub requires_confirm: bool,
}

static KIND_SPECS: &[KindSpec] = &[
    KindSpec {
        id: KindId::Documents,
        label: "Documents",
        path: "/documents",
        collection_key: "documents",
        filters: DOCUMENT_FILTERS,
        collection: &DOCUMENT_COLLECTION,
        operations: DELETE_OPS,
        delete_path: Some(document_delete_path),
    },
    KindSpec {
        id: KindId::Members,
        label: "Members",
        path: "/members",
        collection_key: "members",
        filters: MEMBER_FILTERS,
        collection: &MEMBER_COLLECTION,
        operations: DELETE_OPS,
        delete_path: Some(member_delete_path),
    },
    KindSpec {
        id: KindId::Users,
        label: "Users",
        path: "/member-users",
        collection_key: "memberUsers",
        filters: USER_FILTERS,
        collection: &USER_COLLECTION,
        operations: &[],
        delete_path: None,
    },
    KindSpec {
        id: KindId::Links,
        label: "Links",
        path: "/links",
        collection_key: "links",
        filters: LINK_FILTERS,
        collection: &LINK_COLLECTION,
        operations: DELETE_OPS,
        delete_path: Some(link_delete_path),
    },
];

pub fn registry() -> &'static [KindSpec] {
    KIND_SPECS
}

pub fn kind_spec(kind: KindId) -> &'static KindSpec {
    // KIND_SPECS lists every KindId in declaration order.
    &KIND_SPECS[kind.position()]
}

pub fn collection_spec(kind: KindId) -> &'static CollectionSpec {
    kind_spec(kind).collection
}

pub fn operation_for_key(kind: KindId, key: char) -> Option<OperationId> {
    kind_spec(kind)
        .operations
        .iter()
        .find(|op| op.key == key)
        .map(|op| op.id)
}

pub fn operation_spec(kind: KindId, op_id: OperationId) -> Option<&'static OperationSpec> {
    kind_spec(kind).operations.iter().find(|op| op.id == op_id)
}

/// Endpoint that deletes `target`, if its kind supports deletion.
pub fn delete_path(target: &RecordRef) -> Option<String> {
    kind_spec(target.kind).delete_path.and_then(|path| path(target))
}

static DELETE_OPS: &[OperationSpec] = &[OperationSpec {
    id: OperationId::Delete,
    label: "delete",
    key: 'd',
    requires_confirm: true,
}];

static DOCUMENT_STATUSES: &[(&str, &str)] = &[
    ("approved", "Approved"),
    ("pending", "Pending"),
    ("rejected", "Rejected"),
];

static DOCUMENT_FILTERS: &[FilterDef] = &[
    FilterDef {
        name: "workgroup",
        label: "Workgroup",
        kind: FilterKind::Id,
    },
    FilterDef {
        name: "document_id",
        label: "Document",
        kind: FilterKind::Id,
    },
    FilterDef {
        name: "status",
        label: "Status",
        kind: FilterKind::Choice(DOCUMENT_STATUSES),
    },
    FilterDef {
        name: "uploaded_at",
        label: "Uploaded",
        kind: FilterKind::Date,
    },
];

static MEMBER_FILTERS: &[FilterDef] = &[
    FilterDef {
        name: "sector",
        label: "Sector",
        kind: FilterKind::Choice(SECTORS),
    },
    FilterDef {
        name: "joined_from",
        label: "Joined from",
        kind: FilterKind::Date,
    },
    FilterDef {
        name: "joined_to",
        label: "Joined to",
        kind: FilterKind::Date,
    },
];

static USER_FILTERS: &[FilterDef] = &[
    FilterDef {
        name: "member",
        label: "Member",
        kind: FilterKind::Text,
    },
    FilterDef {
        name: "workgroup",
        label: "Workgroup",
        kind: FilterKind::Id,
    },
    FilterDef {
        name: "status",
        label: "Status",
        kind: FilterKind::Choice(INVITE_STATUSES),
    },
];

static LINK_FILTERS: &[FilterDef] = &[
    FilterDef {
        name: "start_date",
        label: "From",
        kind: FilterKind::Date,
    },
    FilterDef {
        name: "end_date",
        label: "To",
        kind: FilterKind::Date,
    },
    FilterDef {
        name: "workgroup",
        label: "Workgroup",
        kind: FilterKind::Id,
    },
    FilterDef {
        name: "status",
        label: "Status",
        kind: FilterKind::Choice(LINK_STATUSES),
    },
];

static DOCUMENT_COLLECTION: CollectionSpec = CollectionSpec {
    header: &[" #", "Title", "Working Group", "Uploaded", "Uploaded By", "Status", "Public"],
    widths: document_widths,
    row: document_row,
    loading_label: " Loading documents...",
    empty_label: " No documents found",
};

static MEMBER_COLLECTION: CollectionSpec = CollectionSpec {
    header: &[" #", "Name", "Email", "Phone", "Sector", "Joined", "Users"],
    widths: member_widths,
    row: member_row,
    loading_label: " Loading members...",
    empty_label: " No members found",
};

static USER_COLLECTION: CollectionSpec = CollectionSpec {
    header: &[" #", "Name", "Member", "Email", "Phone", "Workgroups", "Status"],
    widths: user_widths,
    row: user_row,
    loading_label: " Loading users...",
    empty_label: " No users found",
};

static LINK_COLLECTION: CollectionSpec = CollectionSpec {
    header: &[" #", "Title", "Link", "Public", "Status"],
    widths: link_widths,
    row: link_row,
    loading_label: " Loading links...",
    empty_label: " No links found",
};

fn serial_cell(serial: u64) -> Cell<'static> {
    Cell::from(format!(" {}", serial)).style(Style::default().fg(theme::TEXT_MUTED))
}

fn tone_style(tone: Tone) -> Style {
    match tone {
        Tone::Positive => Style::default().fg(theme::GREEN),
        Tone::Pending => Style::default().fg(theme::ORANGE),
        Tone::Negative => Style::default().fg(theme::RED),
    }
}

fn yes_no(flag: bool) -> Cell<'static> {
    if flag {
        Cell::from("✓ Yes").style(Style::default().fg(theme::GREEN))
    } else {
        Cell::from("✗ No").style(Style::default().fg(theme::RED))
    }
}

fn document_row(serial: u64, record: &Record) -> Row<'static> {
    let Record::Document(doc) = record else {
        return Row::new(vec![serial_cell(serial)]);
    };
    Row::new(vec![
        serial_cell(serial),
        Cell::from(doc.title.clone()),
        Cell::from(doc.workgroup_name.clone()),
        Cell::from(display_date(&doc.created_at)),
        Cell::from(doc.creator_name.clone()),
        Cell::from(doc.status.clone()).style(tone_style(doc.status_tone())),
        yes_no(doc.is_public()),
    ])
}

fn member_row(serial: u64, record: &Record) -> Row<'static> {
    let Record::Member(member) = record else {
        return Row::new(vec![serial_cell(serial)]);
    };
    Row::new(vec![
        serial_cell(serial),
        Cell::from(member.name.clone()),
        Cell::from(member.email.clone().unwrap_or_else(|| "-".to_string())),
        Cell::from(member.phone_number.clone().unwrap_or_else(|| "-".to_string())),
        Cell::from(member.sector_label()),
        Cell::from(display_date(&member.joined_at)),
        Cell::from(member.total_users.to_string()),
    ])
}

fn user_row(serial: u64, record: &Record) -> Row<'static> {
    let Record::MemberUser(user) = record else {
        return Row::new(vec![serial_cell(serial)]);
    };
    let status = user.invite_status();
    Row::new(vec![
        serial_cell(serial),
        Cell::from(user.first_name.clone()),
        Cell::from(user.member_name.clone()),
        Cell::from(user.email.clone()),
        Cell::from(user.phone_number.clone().unwrap_or_else(|| "-".to_string())),
        Cell::from(user.total_workgroups.clone()),
        Cell::from(status.as_str()).style(tone_style(status.tone())),
    ])
}

fn link_row(serial: u64, record: &Record) -> Row<'static> {
    let Record::Link(link) = record else {
        return Row::new(vec![serial_cell(serial)]);
    };
    let status = link.link_status();
    Row::new(vec![
        serial_cell(serial),
        Cell::from(link.title.clone()),
        Cell::from(format!("🔗 {}", link.link)),
        yes_no(link.is_public()),
        Cell::from(status.as_str()).style(tone_style(status.tone())),
    ])
}

fn document_widths() -> Vec<Constraint> {
    vec![
        Constraint::Length(6),
        Constraint::Percentage(30),
        Constraint::Percentage(20),
        Constraint::Length(13),
        Constraint::Percentage(15),
        Constraint::Length(10),
        Constraint::Length(7),
    ]
}

fn member_widths() -> Vec<Constraint> {
    vec![
        Constraint::Length(6),
        Constraint::Percentage(25),
        Constraint::Percentage(25),
        Constraint::Length(16),
        Constraint::Length(20),
        Constraint::Length(13),
        Constraint::Length(6),
    ]
}

fn user_widths() -> Vec<Constraint> {
    vec![
        Constraint::Length(6),
        Constraint::Percentage(18),
        Constraint::Percentage(20),
        Constraint::Percentage(25),
        Constraint::Length(16),
        Constraint::Length(11),
        Constraint::Length(10),
    ]
}

fn link_widths() -> Vec<Constraint> {
    vec![
        Constraint::Length(6),
        Constraint::Percentage(30),
        Constraint::Percentage(45),
        Constraint::Length(7),
        Constraint::Length(10),
    ]
}

fn document_delete_path(target: &RecordRef) -> Option<String> {
    let workgroup_id = target.workgroup_id?;
    Some(format!("/workgroups/{}/documents/{}", workgroup_id, target.id))
}

fn member_delete_path(target: &RecordRef) -> Option<String> {
    Some(format!("/members/{}", target.id))
}

fn link_delete_path(target: &RecordRef) -> Option<String> {
    Some(format!("/links/{}", target.id))
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::listing::filters::DEFAULT_SEARCH_DEBOUNCE;
    use crate::listing::{build, FilterStore, PageRequest};

    #[test]
    fn registry_is_in_kind_order() {
        for (idx, spec) in registry().iter().enumerate() {
            assert_eq!(spec.id, KindId::ALL[idx]);
            assert_eq!(kind_spec(spec.id).path, spec.path);
        }
    }

    #[test]
    fn slugs_round_trip() {
        for kind in KindId::ALL {
            assert_eq!(KindId::from_slug(kind.slug()), Some(kind));
        }
        assert_eq!(KindId::from_slug("meetings"), None);
    }

    #[test]
    fn filter_names_are_unique_and_not_search() {
        for spec in registry() {
            let mut names: Vec<_> = spec.filters.iter().map(|f| f.name).collect();
            names.sort_unstable();
            names.dedup();
            assert_eq!(names.len(), spec.filters.len(), "{}", spec.label);
            assert!(!names.contains(&crate::listing::SEARCH_PARAM));
        }
    }

    #[test]
    fn document_id_filter_reaches_the_request() {
        let spec = kind_spec(KindId::Documents);
        let mut store = FilterStore::new(spec.filters, DEFAULT_SEARCH_DEBOUNCE);
        let params: BTreeMap<String, String> = [("document_id", "42"), ("workgroup", "3")]
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        store.hydrate(&params);
        assert_eq!(store.get("document_id"), Some("42"));

        let mut request = PageRequest::new(0, 10);
        request.filters = store.filters().clone();
        let descriptor = build(spec.path, &request);
        assert_eq!(
            descriptor.to_string(),
            "/documents?document_id=42&page=1&size=10&workgroup=3"
        );

        assert!(store.set_filter("document_id", "abc").is_err());
        assert_eq!(store.to_params(), params);
    }

    #[test]
    fn delete_paths() {
        let doc = RecordRef {
            kind: KindId::Documents,
            id: 7,
            workgroup_id: Some(3),
            title: "Charter".into(),
        };
        assert_eq!(delete_path(&doc).as_deref(), Some("/workgroups/3/documents/7"));

        let member = RecordRef {
            kind: KindId::Members,
            id: 12,
            workgroup_id: None,
            title: "Acme".into(),
        };
        assert_eq!(delete_path(&member).as_deref(), Some("/members/12"));

        let user = RecordRef {
            kind: KindId::Users,
            id: 1,
            workgroup_id: None,
            title: "Sara".into(),
        };
        assert_eq!(delete_path(&user), None);
        assert_eq!(operation_for_key(KindId::Users, 'd'), None);
        assert_eq!(operation_for_key(KindId::Links, 'd'), Some(OperationId::Delete));
    }
}
