use serde::{Deserialize, Serialize};

use super::EntityId;

/// Direction of a social-graph edge, seen from the owning user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SocialEdge {
    Following,
    Followers,
}

/// One of the user's ordered movie lists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MovieList {
    Watched,
    Watchlist,
}

impl std::str::FromStr for MovieList {
    type Err = crate::error::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "watched" => Ok(MovieList::Watched),
            "watchlist" => Ok(MovieList::Watchlist),
            other => Err(crate::error::AppError::InvalidInput(format!(
                "Unknown movie list: {}",
                other
            ))),
        }
    }
}

/// The social-graph facet of a user account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: EntityId,
    pub username: String,
    #[serde(default)]
    pub is_admin: bool,
    #[serde(default)]
    pub following: Vec<EntityId>,
    #[serde(default)]
    pub followers: Vec<EntityId>,
    /// Insertion order matters: the last entry is the most recent
    #[serde(default)]
    pub watched: Vec<String>,
    #[serde(default)]
    pub watchlist: Vec<String>,
}

impl User {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            id: EntityId::new(),
            username: username.into(),
            is_admin: false,
            following: Vec::new(),
            followers: Vec::new(),
            watched: Vec::new(),
            watchlist: Vec::new(),
        }
    }

    pub fn edges(&self, edge: SocialEdge) -> &[EntityId] {
        match edge {
            SocialEdge::Following => &self.following,
            SocialEdge::Followers => &self.followers,
        }
    }

    pub fn edges_mut(&mut self, edge: SocialEdge) -> &mut Vec<EntityId> {
        match edge {
            SocialEdge::Following => &mut self.following,
            SocialEdge::Followers => &mut self.followers,
        }
    }

    pub fn movies(&self, list: MovieList) -> &[String] {
        match list {
            MovieList::Watched => &self.watched,
            MovieList::Watchlist => &self.watchlist,
        }
    }

    pub fn movies_mut(&mut self, list: MovieList) -> &mut Vec<String> {
        match list {
            MovieList::Watched => &mut self.watched,
            MovieList::Watchlist => &mut self.watchlist,
        }
    }

    /// Most recently added movie of a list
    pub fn latest(&self, list: MovieList) -> Option<&str> {
        self.movies(list).last().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latest_is_last_added() {
        let mut user = User::new("ana");
        assert_eq!(user.latest(MovieList::Watched), None);
        user.watched.push("100".into());
        user.watched.push("42".into());
        assert_eq!(user.latest(MovieList::Watched), Some("42"));
        assert_eq!(user.latest(MovieList::Watchlist), None);
    }

    #[test]
    fn test_movie_list_from_str() {
        assert_eq!("watched".parse::<MovieList>().unwrap(), MovieList::Watched);
        assert_eq!(
            "watchlist".parse::<MovieList>().unwrap(),
            MovieList::Watchlist
        );
        assert!(matches!(
            "favorites".parse::<MovieList>(),
            Err(crate::error::AppError::InvalidInput(_))
        ));
    }
}
