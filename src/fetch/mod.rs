pub mod channel;
pub mod worker;

pub use channel::{DiffResult, ListResult};
pub use worker::FetchWorker;
