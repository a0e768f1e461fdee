//! Recommendation generator
//!
//! Two shapes of recommendation:
//!
//! * **History**: the most recently added movie of the caller's watched list or
//!   watchlist seeds one similarity lookup, returned as-is.
//! * **Graph**: the caller's following or followers set is walked in stored
//!   order. Each neighbor's latest watched movie seeds one similarity lookup and
//!   the results are merged into a single deduplicated list, in neighbor order
//!   then provider order.
//!
//! In a large neighborhood each neighbor may only contribute a couple of new
//! ids so one very active neighbor cannot fill the list. Small neighborhoods
//! are uncapped so they still produce a useful list. This is a heuristic, not
//! a relevance ranking.

use std::collections::HashSet;
use std::str::FromStr;

use crate::{
    db::Store,
    error::{AppError, AppResult},
    models::{EntityId, MovieList, SimilarMovie, SocialEdge},
    services::providers::MovieProvider,
};

/// Neighbors visited per graph recommendation, taken from the front of the set
pub const MAX_GRAPH_NEIGHBORS: usize = 6;

/// New ids a single neighbor may add once the neighbor set exceeds
/// [`MAX_GRAPH_NEIGHBORS`]
pub const PER_NEIGHBOR_CAP: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecommendationSource {
    OwnWatched,
    OwnWatchlist,
    Following,
    Followers,
}

impl RecommendationSource {
    /// Path segment naming this source
    pub fn as_str(&self) -> &'static str {
        match self {
            RecommendationSource::OwnWatched => "watched",
            RecommendationSource::OwnWatchlist => "watchlist",
            RecommendationSource::Following => "following",
            RecommendationSource::Followers => "followers",
        }
    }
}

impl FromStr for RecommendationSource {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "watched" => Ok(RecommendationSource::OwnWatched),
            "watchlist" => Ok(RecommendationSource::OwnWatchlist),
            "following" => Ok(RecommendationSource::Following),
            "followers" => Ok(RecommendationSource::Followers),
            other => Err(AppError::InvalidInput(format!(
                "Unknown recommendation source: {}",
                other
            ))),
        }
    }
}

/// Similar movies to the most recent entry of one of the user's own lists
///
/// Fails with `EmptyHistory` when the list is empty.
pub async fn recommend_from_history(
    store: &dyn Store,
    provider: &dyn MovieProvider,
    user_id: &EntityId,
    list: MovieList,
) -> AppResult<Vec<SimilarMovie>> {
    let user = store.get_user(user_id).await?;

    let Some(seed) = user.latest(list) else {
        return Err(AppError::EmptyHistory(format!(
            "{:?} list of user {} is empty",
            list, user_id
        )));
    };

    let movies = provider.similar_movies(seed).await?;

    tracing::info!(
        user_id = %user_id,
        ?list,
        seed = %seed,
        results = movies.len(),
        provider = provider.name(),
        "History recommendations generated"
    );

    Ok(movies)
}

/// Merged similarity results of the user's first neighbors
///
/// Neighbors whose account no longer exists or whose watched list is empty are
/// skipped and count toward nothing. Any other store or provider failure fails
/// the whole call.
pub async fn recommend_from_graph(
    store: &dyn Store,
    provider: &dyn MovieProvider,
    user_id: &EntityId,
    edge: SocialEdge,
) -> AppResult<Vec<String>> {
    let user = store.get_user(user_id).await?;
    let neighbors = user.edges(edge);
    let capped = neighbors.len() > MAX_GRAPH_NEIGHBORS;

    let mut output: Vec<String> = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();
    let mut visited = 0usize;

    for neighbor_id in neighbors.iter().take(MAX_GRAPH_NEIGHBORS) {
        let neighbor = match store.get_user(neighbor_id).await {
            Ok(neighbor) => neighbor,
            Err(AppError::NotFound(_)) => {
                tracing::debug!(user_id = %user_id, neighbor_id = %neighbor_id, "Skipping missing neighbor");
                continue;
            }
            Err(e) => return Err(e),
        };

        let Some(seed) = neighbor.latest(MovieList::Watched) else {
            continue;
        };
        visited += 1;

        let candidates = provider.similar_movies(seed).await?;

        let mut contributed = 0usize;
        for candidate in candidates {
            if capped && contributed >= PER_NEIGHBOR_CAP {
                break;
            }
            let id = candidate.canonical_id();
            if seen.insert(id.clone()) {
                output.push(id);
                contributed += 1;
            }
        }
    }

    tracing::info!(
        user_id = %user_id,
        ?edge,
        neighbors = neighbors.len(),
        visited,
        capped,
        results = output.len(),
        provider = provider.name(),
        "Graph recommendations generated"
    );

    Ok(output)
}

/// Recommended movie ids for any source
pub async fn recommend_for(
    store: &dyn Store,
    provider: &dyn MovieProvider,
    user_id: &EntityId,
    source: RecommendationSource,
) -> AppResult<Vec<String>> {
    match source {
        RecommendationSource::OwnWatched | RecommendationSource::OwnWatchlist => {
            let list = match source {
                RecommendationSource::OwnWatched => MovieList::Watched,
                _ => MovieList::Watchlist,
            };
            let movies = recommend_from_history(store, provider, user_id, list).await?;
            Ok(movies.iter().map(SimilarMovie::canonical_id).collect())
        }
        RecommendationSource::Following => {
            recommend_from_graph(store, provider, user_id, SocialEdge::Following).await
        }
        RecommendationSource::Followers => {
            recommend_from_graph(store, provider, user_id, SocialEdge::Followers).await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;
    use crate::models::User;
    use crate::services::providers::MockMovieProvider;
    use mockall::predicate::eq;
    use std::collections::HashMap;

    fn movie(id: u64) -> SimilarMovie {
        SimilarMovie {
            id,
            title: format!("Movie {}", id),
            poster_path: None,
            overview: None,
        }
    }

    /// Provider answering from a fixed seed → results table
    fn provider_with(table: Vec<(&str, Vec<u64>)>) -> MockMovieProvider {
        let table: HashMap<String, Vec<u64>> = table
            .into_iter()
            .map(|(seed, ids)| (seed.to_string(), ids))
            .collect();

        let mut provider = MockMovieProvider::new();
        provider.expect_similar_movies().returning(move |seed| {
            Ok(table
                .get(seed)
                .map(|ids| ids.iter().copied().map(movie).collect())
                .unwrap_or_default())
        });
        provider.expect_name().return_const("mock");
        provider
    }

    /// Inserts a caller following `watched_lists.len()` users, each with the
    /// given watched list
    async fn caller_following(store: &MemoryStore, watched_lists: Vec<Vec<&str>>) -> User {
        let mut caller = User::new("caller");
        for (i, watched) in watched_lists.into_iter().enumerate() {
            let mut neighbor = User::new(format!("neighbor{}", i));
            neighbor.watched = watched.iter().map(|m| m.to_string()).collect();
            neighbor.followers.push(caller.id);
            store.insert_user(&neighbor).await.unwrap();
            caller.following.push(neighbor.id);
        }
        store.insert_user(&caller).await.unwrap();
        caller
    }

    /// Inserts a caller whose followers are given in order. `None` stands for a
    /// follower whose account no longer exists.
    async fn caller_followed_by(store: &MemoryStore, watched_lists: Vec<Option<Vec<&str>>>) -> User {
        let mut caller = User::new("caller");
        for (i, watched) in watched_lists.into_iter().enumerate() {
            let Some(watched) = watched else {
                caller.followers.push(EntityId::new());
                continue;
            };
            let mut fan = User::new(format!("fan{}", i));
            fan.watched = watched.iter().map(|m| m.to_string()).collect();
            fan.following.push(caller.id);
            store.insert_user(&fan).await.unwrap();
            caller.followers.push(fan.id);
        }
        store.insert_user(&caller).await.unwrap();
        caller
    }

    #[tokio::test]
    async fn test_small_graph_is_uncapped() {
        let store = MemoryStore::new();
        let caller = caller_following(&store, vec![vec!["100"]]).await;
        let provider = provider_with(vec![("100", vec![200, 201, 300])]);

        let ids = recommend_for(&store, &provider, &caller.id, RecommendationSource::Following)
            .await
            .unwrap();

        assert_eq!(ids, vec!["200", "201", "300"]);
    }

    #[tokio::test]
    async fn test_large_graph_caps_each_neighbor() {
        let store = MemoryStore::new();
        // Seven neighbors, only the first has watched anything
        let mut lists = vec![vec!["100"]];
        lists.extend(std::iter::repeat(Vec::new()).take(6));
        let caller = caller_following(&store, lists).await;
        let provider = provider_with(vec![("100", vec![200, 201, 300])]);

        let ids = recommend_for(&store, &provider, &caller.id, RecommendationSource::Following)
            .await
            .unwrap();

        assert_eq!(ids, vec!["200", "201"]);
    }

    #[tokio::test]
    async fn test_exactly_six_neighbors_is_uncapped() {
        let store = MemoryStore::new();
        let mut lists = vec![vec!["100"]];
        lists.extend(std::iter::repeat(Vec::new()).take(5));
        let caller = caller_following(&store, lists).await;
        let provider = provider_with(vec![("100", vec![200, 201, 300])]);

        let ids = recommend_from_graph(&store, &provider, &caller.id, SocialEdge::Following)
            .await
            .unwrap();

        assert_eq!(ids.len(), 3);
    }

    #[tokio::test]
    async fn test_overlapping_neighbors_deduplicated() {
        let store = MemoryStore::new();
        let caller = caller_following(&store, vec![vec!["1"], vec!["2"], vec!["3"]]).await;
        let provider = provider_with(vec![
            ("1", vec![10, 11, 12]),
            ("2", vec![11, 12, 13]),
            ("3", vec![10, 14]),
        ]);

        let ids = recommend_from_graph(&store, &provider, &caller.id, SocialEdge::Following)
            .await
            .unwrap();

        assert_eq!(ids, vec!["10", "11", "12", "13", "14"]);
    }

    #[tokio::test]
    async fn test_cap_counts_only_new_ids() {
        let store = MemoryStore::new();
        let mut lists = vec![vec!["1"], vec!["2"]];
        lists.extend(std::iter::repeat(Vec::new()).take(6));
        let caller = caller_following(&store, lists).await;
        let provider = provider_with(vec![
            ("1", vec![10, 11, 12]),
            ("2", vec![10, 11, 20, 21, 22]),
        ]);

        let ids = recommend_from_graph(&store, &provider, &caller.id, SocialEdge::Following)
            .await
            .unwrap();

        // Second neighbor's duplicates do not use up its allowance
        assert_eq!(ids, vec!["10", "11", "20", "21"]);
    }

    #[tokio::test]
    async fn test_only_first_six_neighbors_visited() {
        let store = MemoryStore::new();
        let lists: Vec<Vec<&str>> = ["1", "2", "3", "4", "5", "6", "7"]
            .iter()
            .map(|seed| vec![*seed])
            .collect();
        let caller = caller_following(&store, lists).await;

        let mut provider = MockMovieProvider::new();
        provider
            .expect_similar_movies()
            .times(6)
            .returning(|seed| Ok(vec![movie(seed.parse::<u64>().unwrap() * 100)]));
        provider.expect_name().return_const("mock");

        let ids = recommend_from_graph(&store, &provider, &caller.id, SocialEdge::Following)
            .await
            .unwrap();

        assert_eq!(ids, vec!["100", "200", "300", "400", "500", "600"]);
    }

    #[tokio::test]
    async fn test_neighbor_seed_is_latest_watched() {
        let store = MemoryStore::new();
        let caller = caller_following(&store, vec![vec!["5", "6", "7"]]).await;
        let provider = provider_with(vec![("7", vec![70]), ("5", vec![50])]);

        let ids = recommend_from_graph(&store, &provider, &caller.id, SocialEdge::Following)
            .await
            .unwrap();

        assert_eq!(ids, vec!["70"]);
    }

    #[tokio::test]
    async fn test_missing_neighbor_skipped() {
        let store = MemoryStore::new();
        let mut caller = caller_following(&store, vec![vec!["1"]]).await;
        caller.following.insert(0, EntityId::new());
        store.insert_user(&caller).await.unwrap();
        let provider = provider_with(vec![("1", vec![10])]);

        let ids = recommend_from_graph(&store, &provider, &caller.id, SocialEdge::Following)
            .await
            .unwrap();

        assert_eq!(ids, vec!["10"]);
    }

    #[tokio::test]
    async fn test_followers_source_walks_followers() {
        let store = MemoryStore::new();
        let mut fan = User::new("fan");
        fan.watched.push("1".into());
        let mut star = User::new("star");
        star.followers.push(fan.id);
        fan.following.push(star.id);
        store.insert_user(&fan).await.unwrap();
        store.insert_user(&star).await.unwrap();
        let provider = provider_with(vec![("1", vec![10, 11])]);

        let ids = recommend_for(&store, &provider, &star.id, RecommendationSource::Followers)
            .await
            .unwrap();
        assert_eq!(ids, vec!["10", "11"]);

        let none = recommend_for(&store, &provider, &fan.id, RecommendationSource::Followers)
            .await
            .unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn test_large_follower_set_caps_each_follower() {
        let store = MemoryStore::new();
        let lists: Vec<Option<Vec<&str>>> = ["1", "2", "3", "4", "5", "6", "7"]
            .iter()
            .map(|seed| Some(vec![*seed]))
            .collect();
        let caller = caller_followed_by(&store, lists).await;
        let provider = provider_with(vec![
            ("1", vec![10, 11, 12]),
            ("2", vec![20, 21, 22]),
            ("3", vec![30, 31, 32]),
            ("4", vec![40, 41, 42]),
            ("5", vec![50, 51, 52]),
            ("6", vec![60, 61, 62]),
            ("7", vec![70, 71, 72]),
        ]);

        let ids = recommend_for(&store, &provider, &caller.id, RecommendationSource::Followers)
            .await
            .unwrap();

        assert_eq!(
            ids,
            vec!["10", "11", "20", "21", "30", "31", "40", "41", "50", "51", "60", "61"]
        );
    }

    #[tokio::test]
    async fn test_skipped_followers_still_trigger_cap() {
        let store = MemoryStore::new();
        // Eight entries: the first six hold one missing account and two empty
        // histories, so only three followers are asked and the last two never are
        let caller = caller_followed_by(
            &store,
            vec![
                None,
                Some(vec!["1"]),
                Some(Vec::new()),
                Some(vec!["2"]),
                Some(Vec::new()),
                Some(vec!["3"]),
                Some(vec!["4"]),
                Some(vec!["5"]),
            ],
        )
        .await;
        let provider = provider_with(vec![
            ("1", vec![10, 11, 12]),
            ("2", vec![11, 20, 21, 22]),
            ("3", vec![30, 31, 32]),
            ("4", vec![40]),
            ("5", vec![50]),
        ]);

        let ids = recommend_from_graph(&store, &provider, &caller.id, SocialEdge::Followers)
            .await
            .unwrap();

        assert_eq!(ids, vec!["10", "11", "20", "21", "30", "31"]);
    }

    #[tokio::test]
    async fn test_provider_failure_fails_graph_call() {
        let store = MemoryStore::new();
        let caller = caller_following(&store, vec![vec!["1"], vec!["2"]]).await;
        let mut provider = MockMovieProvider::new();
        provider
            .expect_similar_movies()
            .returning(|_| Err(AppError::UpstreamUnavailable("timeout".into())));
        provider.expect_name().return_const("mock");

        let result =
            recommend_from_graph(&store, &provider, &caller.id, SocialEdge::Following).await;
        assert!(matches!(result, Err(AppError::UpstreamUnavailable(_))));
    }

    #[tokio::test]
    async fn test_history_uses_latest_entry() {
        let store = MemoryStore::new();
        let mut user = User::new("ana");
        user.watchlist = vec!["10".into(), "20".into()];
        store.insert_user(&user).await.unwrap();

        let mut provider = MockMovieProvider::new();
        provider
            .expect_similar_movies()
            .with(eq("20"))
            .times(1)
            .returning(|_| Ok(vec![movie(5), movie(6)]));
        provider.expect_name().return_const("mock");

        let movies = recommend_from_history(&store, &provider, &user.id, MovieList::Watchlist)
            .await
            .unwrap();
        assert_eq!(movies, vec![movie(5), movie(6)]);

        let ids = recommend_for(&store, &provider, &user.id, RecommendationSource::OwnWatched).await;
        assert!(matches!(ids, Err(AppError::EmptyHistory(_))));
    }

    #[test]
    fn test_source_from_path_segment() {
        assert_eq!(
            "following".parse::<RecommendationSource>().unwrap(),
            RecommendationSource::Following
        );
        assert_eq!(
            "watchlist".parse::<RecommendationSource>().unwrap(),
            RecommendationSource::OwnWatchlist
        );
        assert!(matches!(
            "friends".parse::<RecommendationSource>(),
            Err(AppError::InvalidInput(_))
        ));
        for source in [
            RecommendationSource::OwnWatched,
            RecommendationSource::OwnWatchlist,
            RecommendationSource::Following,
            RecommendationSource::Followers,
        ] {
            assert_eq!(source.as_str().parse::<RecommendationSource>().unwrap(), source);
        }
    }
}
