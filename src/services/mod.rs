pub mod bracket;
pub mod processing;
pub mod projection;
