use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::{
    db::Store,
    error::{AppError, AppResult},
    models::{
        Comment, CommentReaction, EntityId, MovieList, Poll, Post, Reaction, ReportedPost,
        SocialEdge, User,
    },
};

/// In-process store. Every operation takes the write lock for exactly one
/// document update, which matches the single-document atomicity of `PgStore`.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<MemoryInner>>,
}

#[derive(Default)]
struct MemoryInner {
    posts: HashMap<EntityId, Post>,
    comments: HashMap<EntityId, Comment>,
    /// Keyed by the reported post's id
    reports: HashMap<EntityId, ReportedPost>,
    polls: HashMap<EntityId, Poll>,
    users: HashMap<EntityId, User>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn matched(found: bool) -> u64 {
    u64::from(found)
}

#[async_trait::async_trait]
impl Store for MemoryStore {
    async fn get_post(&self, id: &EntityId) -> AppResult<Post> {
        let inner = self.inner.read().await;
        inner
            .posts
            .get(id)
            .cloned()
            .ok_or_else(|| AppError::not_found("post", id))
    }

    async fn insert_post(&self, post: &Post) -> AppResult<()> {
        let mut inner = self.inner.write().await;
        inner.posts.insert(post.id, post.clone());
        Ok(())
    }

    async fn delete_post(&self, id: &EntityId) -> AppResult<u64> {
        let mut inner = self.inner.write().await;
        Ok(matched(inner.posts.remove(id).is_some()))
    }

    async fn pull_reaction(&self, post_id: &EntityId, user_id: &EntityId) -> AppResult<u64> {
        let mut inner = self.inner.write().await;
        Ok(match inner.posts.get_mut(post_id) {
            Some(post) => {
                post.reactions.retain(|r| &r.user_id != user_id);
                1
            }
            None => 0,
        })
    }

    async fn push_reaction(&self, post_id: &EntityId, reaction: &Reaction) -> AppResult<u64> {
        let mut inner = self.inner.write().await;
        Ok(match inner.posts.get_mut(post_id) {
            Some(post) => {
                post.reactions.push(reaction.clone());
                1
            }
            None => 0,
        })
    }

    async fn get_comment(&self, id: &EntityId) -> AppResult<Comment> {
        let inner = self.inner.read().await;
        inner
            .comments
            .get(id)
            .cloned()
            .ok_or_else(|| AppError::not_found("comment", id))
    }

    async fn insert_comment(&self, comment: &Comment) -> AppResult<()> {
        let mut inner = self.inner.write().await;
        inner.comments.insert(comment.id, comment.clone());
        Ok(())
    }

    async fn comments_for_post(&self, post_id: &EntityId) -> AppResult<Vec<Comment>> {
        let inner = self.inner.read().await;
        let mut comments: Vec<Comment> = inner
            .comments
            .values()
            .filter(|c| &c.post_id == post_id)
            .cloned()
            .collect();
        comments.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(comments)
    }

    async fn update_comment_content(&self, id: &EntityId, content: &str) -> AppResult<u64> {
        let mut inner = self.inner.write().await;
        Ok(match inner.comments.get_mut(id) {
            Some(comment) => {
                comment.content = content.to_string();
                1
            }
            None => 0,
        })
    }

    async fn delete_comment(&self, id: &EntityId) -> AppResult<u64> {
        let mut inner = self.inner.write().await;
        Ok(matched(inner.comments.remove(id).is_some()))
    }

    async fn apply_comment_reaction(
        &self,
        comment_id: &EntityId,
        user_id: &EntityId,
        reaction: CommentReaction,
    ) -> AppResult<u64> {
        let mut inner = self.inner.write().await;
        Ok(match inner.comments.get_mut(comment_id) {
            Some(comment) => {
                comment.apply_reaction(*user_id, reaction);
                1
            }
            None => 0,
        })
    }

    async fn find_report_by_post(&self, post_id: &EntityId) -> AppResult<Option<ReportedPost>> {
        let inner = self.inner.read().await;
        Ok(inner.reports.get(post_id).cloned())
    }

    async fn insert_report(&self, report: &ReportedPost) -> AppResult<()> {
        let mut inner = self.inner.write().await;
        let post_id = report.post_id();
        if inner.reports.contains_key(&post_id) {
            return Err(AppError::Internal(format!(
                "duplicate report record for post {}",
                post_id
            )));
        }
        inner.reports.insert(post_id, report.clone());
        Ok(())
    }

    async fn increment_report(&self, post_id: &EntityId) -> AppResult<u64> {
        let mut inner = self.inner.write().await;
        Ok(match inner.reports.get_mut(post_id) {
            Some(report) => {
                report.report_count += 1;
                1
            }
            None => 0,
        })
    }

    async fn delete_report(&self, post_id: &EntityId) -> AppResult<u64> {
        let mut inner = self.inner.write().await;
        Ok(matched(inner.reports.remove(post_id).is_some()))
    }

    async fn list_reports(&self, limit: usize) -> AppResult<Vec<ReportedPost>> {
        let inner = self.inner.read().await;
        let mut reports: Vec<ReportedPost> = inner.reports.values().cloned().collect();
        reports.sort_by(|a, b| b.report_count.cmp(&a.report_count));
        reports.truncate(limit);
        Ok(reports)
    }

    async fn get_poll(&self, id: &EntityId) -> AppResult<Poll> {
        let inner = self.inner.read().await;
        inner
            .polls
            .get(id)
            .cloned()
            .ok_or_else(|| AppError::not_found("poll", id))
    }

    async fn insert_poll(&self, poll: &Poll) -> AppResult<()> {
        let mut inner = self.inner.write().await;
        inner.polls.insert(poll.id, poll.clone());
        Ok(())
    }

    async fn polls_for_movie(&self, movie_id: &str) -> AppResult<Vec<Poll>> {
        let inner = self.inner.read().await;
        let mut polls: Vec<Poll> = inner
            .polls
            .values()
            .filter(|p| p.movie_id == movie_id)
            .cloned()
            .collect();
        polls.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(polls)
    }

    async fn increment_option_vote(&self, poll_id: &EntityId, option_id: &str) -> AppResult<u64> {
        let mut inner = self.inner.write().await;
        Ok(match inner.polls.get_mut(poll_id) {
            Some(poll) => matched(poll.record_vote(option_id)),
            None => 0,
        })
    }

    async fn get_user(&self, id: &EntityId) -> AppResult<User> {
        let inner = self.inner.read().await;
        inner
            .users
            .get(id)
            .cloned()
            .ok_or_else(|| AppError::not_found("user", id))
    }

    async fn insert_user(&self, user: &User) -> AppResult<()> {
        let mut inner = self.inner.write().await;
        inner.users.insert(user.id, user.clone());
        Ok(())
    }

    async fn add_edge(
        &self,
        user_id: &EntityId,
        edge: SocialEdge,
        other: &EntityId,
    ) -> AppResult<u64> {
        let mut inner = self.inner.write().await;
        Ok(match inner.users.get_mut(user_id) {
            Some(user) => {
                let edges = user.edges_mut(edge);
                if !edges.contains(other) {
                    edges.push(*other);
                }
                1
            }
            None => 0,
        })
    }

    async fn remove_edge(
        &self,
        user_id: &EntityId,
        edge: SocialEdge,
        other: &EntityId,
    ) -> AppResult<u64> {
        let mut inner = self.inner.write().await;
        Ok(match inner.users.get_mut(user_id) {
            Some(user) => {
                user.edges_mut(edge).retain(|id| id != other);
                1
            }
            None => 0,
        })
    }

    async fn push_movie(
        &self,
        user_id: &EntityId,
        list: MovieList,
        movie_id: &str,
    ) -> AppResult<u64> {
        let mut inner = self.inner.write().await;
        Ok(match inner.users.get_mut(user_id) {
            Some(user) => {
                let movies = user.movies_mut(list);
                if !movies.iter().any(|m| m == movie_id) {
                    movies.push(movie_id.to_string());
                }
                1
            }
            None => 0,
        })
    }

    async fn pull_movie(
        &self,
        user_id: &EntityId,
        list: MovieList,
        movie_id: &str,
    ) -> AppResult<u64> {
        let mut inner = self.inner.write().await;
        Ok(match inner.users.get_mut(user_id) {
            Some(user) => {
                user.movies_mut(list).retain(|m| m != movie_id);
                1
            }
            None => 0,
        })
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
