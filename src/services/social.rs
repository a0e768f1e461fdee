use crate::{
    db::Store,
    error::{AppError, AppResult},
    models::{EntityId, MovieList, SocialEdge, User},
    services::providers::MovieProvider,
};

/// Direction of a follow-graph change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EdgeChange {
    Add,
    Remove,
}

async fn change_edge(
    store: &dyn Store,
    user_id: &EntityId,
    edge: SocialEdge,
    other: &EntityId,
    change: EdgeChange,
) -> AppResult<u64> {
    match change {
        EdgeChange::Add => store.add_edge(user_id, edge, other).await,
        EdgeChange::Remove => store.remove_edge(user_id, edge, other).await,
    }
}

/// Updates `caller.following` and then `target.followers`
///
/// The two updates are independent. If the second one fails the graph is left
/// asymmetric; that is logged for operators and the error returned.
async fn update_follow(
    store: &dyn Store,
    caller: &EntityId,
    target: &EntityId,
    change: EdgeChange,
) -> AppResult<()> {
    if caller == target {
        return Err(AppError::InvalidInput(
            "Users cannot follow themselves".to_string(),
        ));
    }

    store.get_user(target).await?;

    if change_edge(store, caller, SocialEdge::Following, target, change).await? == 0 {
        return Err(AppError::not_found("user", caller));
    }

    let result = change_edge(store, target, SocialEdge::Followers, caller, change).await;
    match result {
        Ok(0) => {
            tracing::error!(
                inconsistent = true,
                follower = %caller,
                followee = %target,
                ?change,
                "Followee vanished after follower was updated"
            );
            Err(AppError::not_found("user", target))
        }
        Ok(_) => {
            tracing::info!(follower = %caller, followee = %target, ?change, "Follow graph updated");
            Ok(())
        }
        Err(e) => {
            tracing::error!(
                inconsistent = true,
                follower = %caller,
                followee = %target,
                ?change,
                error = %e,
                "Follower updated but followee update failed"
            );
            Err(e)
        }
    }
}

pub async fn follow(store: &dyn Store, caller: &EntityId, target: &EntityId) -> AppResult<()> {
    update_follow(store, caller, target, EdgeChange::Add).await
}

pub async fn unfollow(store: &dyn Store, caller: &EntityId, target: &EntityId) -> AppResult<()> {
    update_follow(store, caller, target, EdgeChange::Remove).await
}

/// Appends a provider-validated movie to the end of one of the caller's lists
///
/// The end of the list is what recommendations seed from, so a movie already
/// present keeps its original position.
pub async fn add_to_list(
    store: &dyn Store,
    provider: &dyn MovieProvider,
    caller: &EntityId,
    list: MovieList,
    movie_id: &str,
) -> AppResult<User> {
    let movie_id = movie_id.trim();
    if !provider.movie_exists(movie_id).await? {
        return Err(AppError::InvalidInput(format!(
            "Unknown movie id {}",
            movie_id
        )));
    }

    if store.push_movie(caller, list, movie_id).await? == 0 {
        return Err(AppError::not_found("user", caller));
    }

    tracing::info!(user_id = %caller, ?list, movie_id = %movie_id, "Movie added to list");

    store.get_user(caller).await
}

pub async fn remove_from_list(
    store: &dyn Store,
    caller: &EntityId,
    list: MovieList,
    movie_id: &str,
) -> AppResult<User> {
    if store.pull_movie(caller, list, movie_id).await? == 0 {
        return Err(AppError::not_found("user", caller));
    }

    tracing::info!(user_id = %caller, ?list, movie_id = %movie_id, "Movie removed from list");

    store.get_user(caller).await
}
