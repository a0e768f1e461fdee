use crate::{
    db::Store,
    error::{AppError, AppResult},
    models::{EntityId, MovieRef, Post, PostView, Reaction, ReactionSummary},
};

/// Replaces the user's reaction to a post
///
/// The previous entry is pulled first and a fresh one pushed only when the
/// user still reacts, so the post never holds two entries for the same user.
/// Both flags set at once is rejected rather than resolved by precedence.
pub async fn set_post_reaction(
    store: &dyn Store,
    post_id: &EntityId,
    user_id: &EntityId,
    liked: bool,
    disliked: bool,
) -> AppResult<ReactionSummary> {
    if liked && disliked {
        return Err(AppError::InvalidInput(
            "A post cannot be liked and disliked at the same time".to_string(),
        ));
    }

    if store.pull_reaction(post_id, user_id).await? == 0 {
        return Err(AppError::not_found("post", post_id));
    }

    if liked || disliked {
        let reaction = Reaction {
            user_id: *user_id,
            liked,
            disliked,
        };

        match store.push_reaction(post_id, &reaction).await {
            Ok(0) => {
                // Post vanished between the two updates; the old reaction is gone
                tracing::error!(
                    inconsistent = true,
                    post_id = %post_id,
                    user_id = %user_id,
                    "Post deleted while replacing reaction"
                );
                return Err(AppError::not_found("post", post_id));
            }
            Ok(_) => {}
            Err(e) => {
                tracing::error!(
                    inconsistent = true,
                    post_id = %post_id,
                    user_id = %user_id,
                    error = %e,
                    "Reaction removed but replacement failed"
                );
                return Err(e);
            }
        }
    }

    tracing::debug!(post_id = %post_id, user_id = %user_id, liked, disliked, "Reaction set");

    get_post_reaction_counts(store, post_id, Some(user_id)).await
}

/// Like/dislike counts of a post, with the viewer's own state when known
pub async fn get_post_reaction_counts(
    store: &dyn Store,
    post_id: &EntityId,
    viewer: Option<&EntityId>,
) -> AppResult<ReactionSummary> {
    let post = store.get_post(post_id).await?;
    Ok(ReactionSummary::tally(&post.reactions, viewer))
}

pub async fn get_post_view(
    store: &dyn Store,
    post_id: &EntityId,
    viewer: Option<&EntityId>,
) -> AppResult<PostView> {
    let post = store.get_post(post_id).await?;
    Ok(PostView::new(post, viewer))
}

pub async fn create_post(
    store: &dyn Store,
    author_id: &EntityId,
    movie: MovieRef,
    content: &str,
) -> AppResult<Post> {
    let content = content.trim();
    if content.is_empty() {
        return Err(AppError::InvalidInput(
            "Post content cannot be empty".to_string(),
        ));
    }

    let post = Post::new(*author_id, movie, content.to_string());
    store.insert_post(&post).await?;

    tracing::info!(post_id = %post.id, author_id = %author_id, movie_id = post.movie.id, "Post created");

    Ok(post)
}

/// Deletes a post on behalf of its author or an administrator
///
/// Any escalation record for the post goes with it.
pub async fn delete_post(
    store: &dyn Store,
    post_id: &EntityId,
    caller: &EntityId,
    caller_is_admin: bool,
) -> AppResult<()> {
    let post = store.get_post(post_id).await?;
    if &post.author_id != caller && !caller_is_admin {
        return Err(AppError::Forbidden(
            "Only the author or an administrator can delete a post".to_string(),
        ));
    }

    if store.delete_post(post_id).await? == 0 {
        return Err(AppError::not_found("post", post_id));
    }

    // Zero matched just means the post was never reported
    if let Err(e) = store.delete_report(post_id).await {
        tracing::error!(
            inconsistent = true,
            post_id = %post_id,
            error = %e,
            "Post deleted but its report record was not"
        );
        return Err(e);
    }

    tracing::info!(post_id = %post_id, deleted_by = %caller, "Post deleted");
    Ok(())
}
