pub mod config;
pub mod folder;
pub mod todo;

pub use config::*;
pub use folder::*;
pub use todo::*;
