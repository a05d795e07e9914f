pub mod folder_ops;
pub mod search;
pub mod todo_ops;
