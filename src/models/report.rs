use serde::{Deserialize, Serialize};

use super::{EntityId, Post};

/// Escalation record for a reported post.
///
/// `post` is a snapshot taken at the first report and is never refreshed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportedPost {
    pub id: EntityId,
    pub report_count: u32,
    pub post: Post,
}

impl ReportedPost {
    pub fn first_report(post: Post) -> Self {
        Self {
            id: EntityId::new(),
            report_count: 1,
            post,
        }
    }

    pub fn post_id(&self) -> EntityId {
        self.post.id
    }
}
