use serde::Serialize;

use crate::{
    db::Store,
    error::{AppError, AppResult},
    models::{Comment, CommentReaction, EntityId},
};

/// A comment with counts derived from its two reaction sets
#[derive(Debug, Clone, Serialize)]
pub struct CommentView {
    #[serde(flatten)]
    pub comment: Comment,
    pub likes: usize,
    pub dislikes: usize,
}

impl From<Comment> for CommentView {
    fn from(comment: Comment) -> Self {
        Self {
            likes: comment.likes(),
            dislikes: comment.dislikes(),
            comment,
        }
    }
}

pub async fn like_comment(
    store: &dyn Store,
    comment_id: &EntityId,
    user_id: &EntityId,
) -> AppResult<CommentView> {
    react(store, comment_id, user_id, CommentReaction::Like).await
}

pub async fn dislike_comment(
    store: &dyn Store,
    comment_id: &EntityId,
    user_id: &EntityId,
) -> AppResult<CommentView> {
    react(store, comment_id, user_id, CommentReaction::Dislike).await
}

/// Joins one reaction set and leaves the other in a single update.
/// Repeating the same reaction changes nothing.
async fn react(
    store: &dyn Store,
    comment_id: &EntityId,
    user_id: &EntityId,
    reaction: CommentReaction,
) -> AppResult<CommentView> {
    if store
        .apply_comment_reaction(comment_id, user_id, reaction)
        .await?
        == 0
    {
        return Err(AppError::not_found("comment", comment_id));
    }

    tracing::debug!(comment_id = %comment_id, user_id = %user_id, ?reaction, "Comment reaction applied");

    Ok(store.get_comment(comment_id).await?.into())
}

pub async fn create_comment(
    store: &dyn Store,
    post_id: &EntityId,
    author_id: &EntityId,
    content: &str,
) -> AppResult<CommentView> {
    let content = content.trim();
    if content.is_empty() {
        return Err(AppError::InvalidInput(
            "Comment content cannot be empty".to_string(),
        ));
    }

    // Existence check only; the comment does not embed the post
    store.get_post(post_id).await?;

    let comment = Comment::new(*post_id, *author_id, content.to_string());
    store.insert_comment(&comment).await?;

    tracing::info!(comment_id = %comment.id, post_id = %post_id, author_id = %author_id, "Comment created");

    Ok(comment.into())
}

/// Comments on a post with their reaction counts, oldest first
pub async fn comments_for_post(
    store: &dyn Store,
    post_id: &EntityId,
) -> AppResult<Vec<CommentView>> {
    store.get_post(post_id).await?;
    let comments = store.comments_for_post(post_id).await?;
    Ok(comments.into_iter().map(CommentView::from).collect())
}

/// Replaces the text of a comment. Only its author may do this; reactions are kept.
pub async fn update_comment(
    store: &dyn Store,
    comment_id: &EntityId,
    caller: &EntityId,
    content: &str,
) -> AppResult<CommentView> {
    let content = content.trim();
    if content.is_empty() {
        return Err(AppError::InvalidInput(
            "Comment content cannot be empty".to_string(),
        ));
    }

    ensure_author(store, comment_id, caller, "edit").await?;

    if store.update_comment_content(comment_id, content).await? == 0 {
        return Err(AppError::not_found("comment", comment_id));
    }

    tracing::info!(comment_id = %comment_id, author_id = %caller, "Comment updated");

    Ok(store.get_comment(comment_id).await?.into())
}

pub async fn delete_comment(
    store: &dyn Store,
    comment_id: &EntityId,
    caller: &EntityId,
) -> AppResult<()> {
    ensure_author(store, comment_id, caller, "delete").await?;

    if store.delete_comment(comment_id).await? == 0 {
        return Err(AppError::not_found("comment", comment_id));
    }

    tracing::info!(comment_id = %comment_id, author_id = %caller, "Comment deleted");
    Ok(())
}

async fn ensure_author(
    store: &dyn Store,
    comment_id: &EntityId,
    caller: &EntityId,
    action: &str,
) -> AppResult<()> {
    let comment = store.get_comment(comment_id).await?;
    if &comment.author_id != caller {
        return Err(AppError::Forbidden(format!(
            "Only the author can {} a comment",
            action
        )));
    }
    Ok(())
}
