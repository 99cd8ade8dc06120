use pomobar_core::init_logging;

mod app;
mod commands;

fn main() {
    let matches = app::build_cli().get_matches();

    // Extract quiet flag before initializing logging
    let quiet = matches.get_flag("quiet");
    init_logging(quiet);

    let exit_code = match commands::run_command(&matches) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("pomobar: {}", e);
            tracing::error!(event = "cli.run_failed", error = %e);
            1
        }
    };
    std::process::exit(exit_code);
}
