use clap::{Arg, ArgAction, Command};

pub fn build_cli() -> Command {
    Command::new("pomobar")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Pomodoro interval timer for waybar")
        .long_about(
            "pomobar tracks a work/break cycle in a small background server and \
            answers status queries from bar invocations. Every subcommand is \
            self-sufficient: it finds a running server, or reports that none is \
            up; only 'serve' ever starts one.",
        )
        .arg(
            Arg::new("quiet")
                .short('q')
                .long("quiet")
                .help("Only log errors")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("status")
                .about("Print the current interval status as bar JSON (the poll tick)"),
        )
        .subcommand(Command::new("start").about("Start a work interval"))
        .subcommand(Command::new("clear").about("Clear the running interval"))
        .subcommand(
            Command::new("serve")
                .about("Start the timer server if none is running (blocks until shutdown)"),
        )
        .subcommand(Command::new("shutdown").about("Stop a running timer server"))
}
