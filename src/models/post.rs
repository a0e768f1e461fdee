use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{EntityId, MovieRef};

/// A user's reaction to a post. At most one per user per post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reaction {
    pub user_id: EntityId,
    pub liked: bool,
    pub disliked: bool,
}

/// A post about a movie
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: EntityId,
    pub author_id: EntityId,
    pub movie: MovieRef,
    pub content: String,
    /// Not exposed directly; callers read counts through [`ReactionSummary`]
    #[serde(default, skip_serializing)]
    pub reactions: Vec<Reaction>,
    pub created_at: DateTime<Utc>,
}

impl Post {
    pub fn new(author_id: EntityId, movie: MovieRef, content: String) -> Self {
        Self {
            id: EntityId::new(),
            author_id,
            movie,
            content,
            reactions: Vec::new(),
            created_at: Utc::now(),
        }
    }
}

/// Aggregate like/dislike counts plus the viewer's own state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReactionSummary {
    pub likes: usize,
    pub dislikes: usize,
    pub liked: bool,
    pub disliked: bool,
}

impl ReactionSummary {
    /// Folds a reaction collection into counts, resolving the viewer's state if given
    pub fn tally(reactions: &[Reaction], viewer: Option<&EntityId>) -> Self {
        reactions.iter().fold(Self::default(), |mut acc, reaction| {
            if reaction.liked {
                acc.likes += 1;
            }
            if reaction.disliked {
                acc.dislikes += 1;
            }
            if viewer == Some(&reaction.user_id) {
                acc.liked = reaction.liked;
                acc.disliked = reaction.disliked;
            }
            acc
        })
    }
}

/// A post enriched with reaction counts for a particular viewer
#[derive(Debug, Clone, Serialize)]
pub struct PostView {
    pub post: Post,
    #[serde(flatten)]
    pub reactions: ReactionSummary,
}

impl PostView {
    pub fn new(post: Post, viewer: Option<&EntityId>) -> Self {
        let reactions = ReactionSummary::tally(&post.reactions, viewer);
        Self { post, reactions }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reaction(user_id: EntityId, liked: bool, disliked: bool) -> Reaction {
        Reaction {
            user_id,
            liked,
            disliked,
        }
    }

    #[test]
    fn test_tally_counts_and_viewer_state() {
        let me = EntityId::new();
        let reactions = vec![
            reaction(EntityId::new(), true, false),
            reaction(me, false, true),
            reaction(EntityId::new(), true, false),
        ];

        let summary = ReactionSummary::tally(&reactions, Some(&me));
        assert_eq!(summary.likes, 2);
        assert_eq!(summary.dislikes, 1);
        assert!(!summary.liked);
        assert!(summary.disliked);
    }

    #[test]
    fn test_tally_anonymous_viewer() {
        let reactions = vec![reaction(EntityId::new(), true, false)];
        let summary = ReactionSummary::tally(&reactions, None);
        assert_eq!(summary.likes, 1);
        assert!(!summary.liked && !summary.disliked);
    }

    #[test]
    fn test_post_view_flattens_counts() {
        let post = Post::new(EntityId::new(), MovieRef::with_id(603), "Great".into());
        let view = PostView::new(post, None);
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["likes"], 0);
        assert_eq!(json["post"]["content"], "Great");
        assert!(json["post"].get("reactions").is_none());
    }
}
