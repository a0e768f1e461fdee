//! Persistence contract for the engagement subsystem
//!
//! Each method is a single operation against a single document (row), so it is
//! atomic on its own. Nothing here spans documents: callers that need two
//! updates (reaction replace, follow/unfollow) issue them in sequence and live
//! with the gap between them.
//!
//! Mutations return the number of documents they matched. Zero means the target
//! id did not resolve; callers turn that into `NotFound`.

use crate::{
    error::AppResult,
    models::{
        Comment, CommentReaction, EntityId, MovieList, Poll, Post, Reaction, ReportedPost,
        SocialEdge, User,
    },
};

#[async_trait::async_trait]
pub trait Store: Send + Sync {
    // Posts

    async fn get_post(&self, id: &EntityId) -> AppResult<Post>;

    async fn insert_post(&self, post: &Post) -> AppResult<()>;

    async fn delete_post(&self, id: &EntityId) -> AppResult<u64>;

    /// Removes the user's reaction entry, if any
    async fn pull_reaction(&self, post_id: &EntityId, user_id: &EntityId) -> AppResult<u64>;

    /// Appends a reaction entry without checking for an existing one
    async fn push_reaction(&self, post_id: &EntityId, reaction: &Reaction) -> AppResult<u64>;

    // Comments

    async fn get_comment(&self, id: &EntityId) -> AppResult<Comment>;

    async fn insert_comment(&self, comment: &Comment) -> AppResult<()>;

    /// Comments on a post, oldest first
    async fn comments_for_post(&self, post_id: &EntityId) -> AppResult<Vec<Comment>>;

    async fn update_comment_content(&self, id: &EntityId, content: &str) -> AppResult<u64>;

    async fn delete_comment(&self, id: &EntityId) -> AppResult<u64>;

    /// Adds the user to the chosen set (if absent) and removes it from the other (if present)
    async fn apply_comment_reaction(
        &self,
        comment_id: &EntityId,
        user_id: &EntityId,
        reaction: CommentReaction,
    ) -> AppResult<u64>;

    // Reported posts

    async fn find_report_by_post(&self, post_id: &EntityId) -> AppResult<Option<ReportedPost>>;

    async fn insert_report(&self, report: &ReportedPost) -> AppResult<()>;

    async fn increment_report(&self, post_id: &EntityId) -> AppResult<u64>;

    async fn delete_report(&self, post_id: &EntityId) -> AppResult<u64>;

    /// Reports ordered by `report_count`, highest first
    async fn list_reports(&self, limit: usize) -> AppResult<Vec<ReportedPost>>;

    // Polls

    async fn get_poll(&self, id: &EntityId) -> AppResult<Poll>;

    async fn insert_poll(&self, poll: &Poll) -> AppResult<()>;

    async fn polls_for_movie(&self, movie_id: &str) -> AppResult<Vec<Poll>>;

    /// Increments the first option whose id matches.
    /// Returns zero when the poll or the option is absent.
    async fn increment_option_vote(&self, poll_id: &EntityId, option_id: &str) -> AppResult<u64>;

    // Users

    async fn get_user(&self, id: &EntityId) -> AppResult<User>;

    async fn insert_user(&self, user: &User) -> AppResult<()>;

    /// Set-add on `user.following` or `user.followers`
    async fn add_edge(&self, user_id: &EntityId, edge: SocialEdge, other: &EntityId)
        -> AppResult<u64>;

    /// Set-remove on `user.following` or `user.followers`
    async fn remove_edge(
        &self,
        user_id: &EntityId,
        edge: SocialEdge,
        other: &EntityId,
    ) -> AppResult<u64>;

    /// Appends the movie to the end of the list unless it is already there
    async fn push_movie(&self, user_id: &EntityId, list: MovieList, movie_id: &str)
        -> AppResult<u64>;

    async fn pull_movie(&self, user_id: &EntityId, list: MovieList, movie_id: &str)
        -> AppResult<u64>;

    /// Releases any held connections
    async fn close(&self) {}

    /// Backend name for logging
    fn name(&self) -> &'static str;
}
