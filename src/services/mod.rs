pub mod comments;
pub mod polls;
pub mod providers;
pub mod reactions;
pub mod recommendations;
pub mod reports;
pub mod social;
