use crate::kinds::KindId;

use super::{Document, Link, Member, MemberUser};

/// Row type shared by every list view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Record {
    Document(Document),
    Member(Member),
    MemberUser(MemberUser),
    Link(Link),
}

impl Record {
    /// Decodes one row of a `kind` list response.
    pub fn decode(kind: KindId, raw: serde_json::Value) -> serde_json::Result<Self> {
        Ok(match kind {
            KindId::Documents => Self::Document(serde_json::from_value(raw)?),
            KindId::Members => Self::Member(serde_json::from_value(raw)?),
            KindId::Users => Self::MemberUser(serde_json::from_value(raw)?),
            KindId::Links => Self::Link(serde_json::from_value(raw)?),
        })
    }

    pub fn kind(&self) -> KindId {
        match self {
            Self::Document(_) => KindId::Documents,
            Self::Member(_) => KindId::Members,
            Self::MemberUser(_) => KindId::Users,
            Self::Link(_) => KindId::Links,
        }
    }

    pub fn id(&self) -> u64 {
        match self {
            Self::Document(doc) => doc.id,
            Self::Member(member) => member.id,
            Self::MemberUser(user) => user.id,
            Self::Link(link) => link.id,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Self::Document(doc) => &doc.title,
            Self::Member(member) => &member.name,
            Self::MemberUser(user) => &user.first_name,
            Self::Link(link) => &link.title,
        }
    }

    pub fn to_ref(&self) -> RecordRef {
        RecordRef {
            kind: self.kind(),
            id: self.id(),
            workgroup_id: match self {
                Self::Document(doc) => Some(doc.workgroup_id),
                _ => None,
            },
            title: self.title().to_string(),
        }
    }
}

/// Identifies a record for a mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordRef {
    pub kind: KindId,
    pub id: u64,
    /// Documents are addressed through their workgroup.
    pub workgroup_id: Option<u64>,
    pub title: String,
}
