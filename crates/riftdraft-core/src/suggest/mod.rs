pub mod cache;
pub mod key;

pub use cache::{CacheState, SuggestionCache, SuggestionError};
pub use key::MatchupKey;
