pub mod app;
pub mod input;
pub mod layout;
pub mod render;
pub mod text_input;
pub mod theme;

pub use app::run;
