pub mod config_io;
pub mod folder_store;
pub mod lock;
pub mod state;
pub mod store;
pub mod todo_store;
pub mod watcher;
