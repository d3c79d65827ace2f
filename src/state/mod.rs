pub mod app_state;
pub mod file_list;
pub mod viewport;

pub use app_state::{AppState, FocusPanel};
pub use file_list::{FileListState, Group, ListRow};
pub use viewport::ViewportState;
