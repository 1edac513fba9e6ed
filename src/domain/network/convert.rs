//! Conversion: TreeNodeResponse → MemberRecord.

use super::wire::{ChildRef, TreeNodeResponse};
use super::{Member, MemberRecord};
use crate::shared::Username;

impl From<TreeNodeResponse> for MemberRecord {
    fn from(source: TreeNodeResponse) -> Self {
        MemberRecord {
            member: Member {
                username: source.username,
                placement_code: source.placement_id.unwrap_or_default(),
                status: source.status,
            },
            left: child_username(source.left),
            right: child_username(source.right),
        }
    }
}

/// A child stub with a missing or blank username counts as "no child".
fn child_username(child: Option<ChildRef>) -> Option<Username> {
    child
        .and_then(|c| c.username)
        .filter(|name| !name.is_blank())
}
