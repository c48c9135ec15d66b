pub mod matcher;
pub mod normalize;

pub use matcher::{MatchRule, NameMatch, TeamNameMatcher};
pub use normalize::NameNormalizer;
