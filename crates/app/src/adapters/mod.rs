pub mod git;
pub mod github;
pub mod persistence;
pub mod terminal;
