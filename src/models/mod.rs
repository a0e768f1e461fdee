pub mod comment;
pub mod ids;
pub mod movie;
pub mod poll;
pub mod post;
pub mod report;
pub mod user;

pub use comment::{Comment, CommentReaction};
pub use ids::EntityId;
pub use movie::{MovieRef, MovieSummary, SimilarMovie, TmdbMovie, TmdbPage};
pub use poll::{Poll, PollOption};
pub use post::{Post, PostView, Reaction, ReactionSummary};
pub use report::ReportedPost;
pub use user::{MovieList, SocialEdge, User};
