use clap::Parser;
use lodestone::cli::commands::Cli;
use lodestone::cli::handlers;
use lodestone::io::config_io;
use lodestone::logging;

fn main() {
    let cli = Cli::parse();

    let data_dir = match config_io::resolve_data_dir(cli.data_dir.as_deref()) {
        Ok(dir) => dir,
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(1);
        }
    };
    if let Err(e) = logging::init(&data_dir) {
        eprintln!("warning: logging disabled: {}", e);
    }

    let result = if cli.command.is_none() {
        // No subcommand → launch TUI
        lodestone::tui::run(&data_dir)
    } else {
        handlers::dispatch(cli, &data_dir)
    };
    if let Err(e) = result {
        tracing::error!(error = %e, "exiting with error");
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
