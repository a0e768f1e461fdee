use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::EntityId;

/// Which of a comment's two reaction sets a user joins
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommentReaction {
    Like,
    Dislike,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: EntityId,
    pub post_id: EntityId,
    pub author_id: EntityId,
    pub content: String,
    /// Disjoint from `disliked_by`
    #[serde(default)]
    pub liked_by: Vec<EntityId>,
    #[serde(default)]
    pub disliked_by: Vec<EntityId>,
    pub created_at: DateTime<Utc>,
}

impl Comment {
    pub fn new(post_id: EntityId, author_id: EntityId, content: String) -> Self {
        Self {
            id: EntityId::new(),
            post_id,
            author_id,
            content,
            liked_by: Vec::new(),
            disliked_by: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Adds the user to one set and removes it from the other.
    /// Both halves are idempotent.
    pub fn apply_reaction(&mut self, user_id: EntityId, reaction: CommentReaction) {
        let (join, leave) = match reaction {
            CommentReaction::Like => (&mut self.liked_by, &mut self.disliked_by),
            CommentReaction::Dislike => (&mut self.disliked_by, &mut self.liked_by),
        };
        if !join.contains(&user_id) {
            join.push(user_id);
        }
        leave.retain(|id| id != &user_id);
    }

    pub fn likes(&self) -> usize {
        self.liked_by.len()
    }

    pub fn dislikes(&self) -> usize {
        self.disliked_by.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn comment() -> Comment {
        Comment::new(EntityId::new(), EntityId::new(), "nice".into())
    }

    #[test]
    fn test_like_is_idempotent() {
        let user = EntityId::new();
        let mut c = comment();
        c.apply_reaction(user, CommentReaction::Like);
        let once = c.clone();
        c.apply_reaction(user, CommentReaction::Like);
        assert_eq!(c, once);
        assert_eq!(c.likes(), 1);
    }

    #[test]
    fn test_sets_stay_disjoint() {
        let user = EntityId::new();
        let mut c = comment();
        c.apply_reaction(user, CommentReaction::Like);
        c.apply_reaction(user, CommentReaction::Dislike);
        assert!(c.disliked_by.contains(&user));
        assert!(!c.liked_by.contains(&user));

        c.apply_reaction(user, CommentReaction::Like);
        assert!(c.liked_by.contains(&user));
        assert!(!c.disliked_by.contains(&user));
    }
}
