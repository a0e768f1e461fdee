use crate::{
    db::Store,
    error::{AppError, AppResult},
    models::{EntityId, Poll},
};

/// Creates a poll on a movie with its options fixed up front
///
/// Option ids are generated here; callers only supply the texts.
pub async fn create_poll(
    store: &dyn Store,
    movie_id: &str,
    question: &str,
    options: &[String],
) -> AppResult<Poll> {
    let question = question.trim();
    if question.is_empty() {
        return Err(AppError::InvalidInput(
            "Poll question cannot be empty".to_string(),
        ));
    }
    if options.iter().any(|text| text.trim().is_empty()) {
        return Err(AppError::InvalidInput(
            "Poll options cannot be empty".to_string(),
        ));
    }

    let mut poll = Poll::new(movie_id.to_string(), question.to_string());
    for text in options {
        poll.add_option(text.trim().to_string());
    }

    store.insert_poll(&poll).await?;

    tracing::info!(poll_id = %poll.id, movie_id = %movie_id, options = poll.options.len(), "Poll created");

    Ok(poll)
}

/// Adds one vote to a single option
///
/// A poll or option id that does not resolve is `NotFound`; no counter changes.
pub async fn cast_poll_vote(
    store: &dyn Store,
    poll_id: &EntityId,
    option_id: &str,
) -> AppResult<Poll> {
    if store.increment_option_vote(poll_id, option_id).await? == 0 {
        return Err(AppError::NotFound(format!(
            "option {} in poll {}",
            option_id, poll_id
        )));
    }

    tracing::debug!(poll_id = %poll_id, option_id = %option_id, "Vote recorded");

    store.get_poll(poll_id).await
}

pub async fn polls_for_movie(store: &dyn Store, movie_id: &str) -> AppResult<Vec<Poll>> {
    store.polls_for_movie(movie_id).await
}
