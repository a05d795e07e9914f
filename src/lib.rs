pub mod cli {
    pub mod commands;
    pub mod handlers;
    pub mod output;
}
pub mod io;
pub mod logging;
pub mod model;
pub mod motion;
pub mod ops;
pub mod tui;
pub mod util {
    pub mod unicode;
}
