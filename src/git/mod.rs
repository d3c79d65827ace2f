pub mod parse;
pub mod repository;
pub mod source;
pub mod types;

pub use parse::PathFilter;
pub use repository::RepoCache;
pub use source::{ChangeSource, GitSource};
