use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::{ids::new_option_id, EntityId};

/// Distance from creation to the advertised end of a poll
pub const POLL_LIFETIME_HOURS: i64 = 24;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollOption {
    pub id: String,
    pub text: String,
    pub votes: u32,
}

/// A poll attached to a movie
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Poll {
    pub id: EntityId,
    pub movie_id: String,
    pub question: String,
    pub created_at: DateTime<Utc>,
    /// Informational; votes cast after it are still counted
    pub ends_at: DateTime<Utc>,
    pub options: Vec<PollOption>,
}

impl Poll {
    pub fn new(movie_id: String, question: String) -> Self {
        let created_at = Utc::now();
        Self {
            id: EntityId::new(),
            movie_id,
            question,
            created_at,
            ends_at: created_at + Duration::hours(POLL_LIFETIME_HOURS),
            options: Vec::new(),
        }
    }

    pub fn add_option(&mut self, text: String) -> &PollOption {
        self.options.push(PollOption {
            id: new_option_id(),
            text,
            votes: 0,
        });
        &self.options[self.options.len() - 1]
    }

    /// Increments the first option whose id matches. Returns false if none did.
    pub fn record_vote(&mut self, option_id: &str) -> bool {
        match self.options.iter_mut().find(|o| o.id == option_id) {
            Some(option) => {
                option.votes += 1;
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn poll_with(ids: &[&str]) -> Poll {
        let mut poll = Poll::new("603".into(), "Best sequel?".into());
        poll.options = ids
            .iter()
            .map(|id| PollOption {
                id: id.to_string(),
                text: format!("option {}", id),
                votes: 0,
            })
            .collect();
        poll
    }

    #[test]
    fn test_new_poll_ends_a_day_later() {
        let poll = Poll::new("603".into(), "Q".into());
        assert_eq!(poll.ends_at - poll.created_at, Duration::hours(24));
    }

    #[test]
    fn test_record_vote_touches_only_first_match() {
        let mut poll = poll_with(&["o1", "o1", "o2"]);
        assert!(poll.record_vote("o1"));
        assert_eq!(poll.options[0].votes, 1);
        assert_eq!(poll.options[1].votes, 0);
        assert_eq!(poll.options[2].votes, 0);
    }

    #[test]
    fn test_record_vote_missing_option() {
        let mut poll = poll_with(&["o1"]);
        assert!(!poll.record_vote("nope"));
        assert_eq!(poll.options[0].votes, 0);
    }

    #[test]
    fn test_add_option_generates_id() {
        let mut poll = Poll::new("603".into(), "Q".into());
        let id = poll.add_option("Yes".into()).id.clone();
        assert!(!id.is_empty());
        assert_eq!(poll.options[0].text, "Yes");
        assert_eq!(poll.options[0].votes, 0);
    }
}
