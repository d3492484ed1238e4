//! Main CLI application

use crate::cli::commands;
use crate::cli::logging::{init_logging, Verbosity};
use crate::config::Paths;
use crate::task::{Format, SortField};
use anyhow::Result;
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use clap_complete::Shell;

/// CLI application
pub struct App {
    /// The clap command
    command: Command,
    /// Data directory
    paths: Paths,
}

impl App {
    /// Create a new app using the discovered data directory
    pub fn new() -> Result<Self> {
        Ok(App::with_paths(Paths::discover()?))
    }

    /// Create an app bound to a specific data directory
    pub fn with_paths(paths: Paths) -> Self {
        App {
            command: build_command(),
            paths,
        }
    }

    /// Run the application with the process arguments
    pub fn run(self) -> Result<()> {
        let matches = self.command.clone().get_matches();
        self.dispatch(&matches)
    }

    /// Run the application with explicit arguments
    pub fn run_from<I, T>(self, args: I) -> Result<()>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let matches = self.command.clone().try_get_matches_from(args)?;
        self.dispatch(&matches)
    }

    fn dispatch(mut self, matches: &ArgMatches) -> Result<()> {
        init_logging(get_verbosity(matches));
        tracing::debug!(data_dir = %self.paths.root().display(), "starting");

        match matches.subcommand() {
            Some(("new", sub)) => commands::new_task(&self.paths, sub),
            Some(("list", sub)) => commands::list(&self.paths, sub),
            Some(("show", sub)) => commands::show(&self.paths, sub),
            Some(("complete", sub)) => commands::complete(&self.paths, sub),
            Some(("push", _)) => commands::push(&self.paths),
            Some(("fetch", _)) => commands::fetch(&self.paths),
            Some(("config", sub)) => commands::config(&self.paths, sub),
            Some(("completion", sub)) => {
                commands::completion(&mut self.command, sub);
                Ok(())
            }
            _ => {
                // No command given, show help
                self.command.print_help()?;
                println!();
                Ok(())
            }
        }
    }
}

/// Build the clap command tree
pub fn build_command() -> Command {
    Command::new("yata")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Yet another task app: a personal task tracker")
        .arg(
            Arg::new("quiet")
                .short('q')
                .long("quiet")
                .help("Only log errors")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Log debug output")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .subcommand(
            Command::new("new")
                .visible_alias("add")
                .about("Create a new task")
                .arg(
                    Arg::new("description")
                        .value_name("DESCRIPTION")
                        .help("What needs doing")
                        .num_args(1..)
                        .required(true),
                )
                .arg(
                    Arg::new("tag")
                        .short('t')
                        .long("tag")
                        .value_name("TAG")
                        .help("Tag the task (repeatable)")
                        .action(ArgAction::Append),
                )
                .arg(
                    Arg::new("priority")
                        .short('p')
                        .long("priority")
                        .value_name("PRIORITY")
                        .help("low, normal or high")
                        .default_value("normal"),
                ),
        )
        .subcommand(
            Command::new("list")
                .visible_alias("ls")
                .about("List tasks")
                .arg(
                    Arg::new("sort")
                        .long("sort")
                        .value_name("FIELD")
                        .help("Order tasks by a field")
                        .value_parser(SortField::NAMES)
                        .default_value("id"),
                )
                .arg(
                    Arg::new("all")
                        .short('a')
                        .long("all")
                        .help("Include completed tasks")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("show-tags")
                        .long("show-tags")
                        .help("Show tags with their task counts instead of tasks")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("tag")
                        .long("tag")
                        .value_name("TAG")
                        .help("Only tasks with this tag"),
                )
                .arg(
                    Arg::new("description")
                        .long("description")
                        .value_name("TEXT")
                        .help("Only tasks whose description contains this text"),
                )
                .arg(format_arg(Format::Compact)),
        )
        .subcommand(
            Command::new("show")
                .about("Show a single task")
                .arg(id_arg().required(true))
                .arg(format_arg(Format::Detailed)),
        )
        .subcommand(
            Command::new("complete")
                .visible_alias("done")
                .about("Mark tasks as completed")
                .arg(id_arg().num_args(1..).required(true)),
        )
        .subcommand(Command::new("push").about("Push tasks to the configured sync backend"))
        .subcommand(Command::new("fetch").about("Fetch tasks from the configured sync backend"))
        .subcommand(
            Command::new("config")
                .about("Read or set a configuration key")
                .arg(
                    Arg::new("key")
                        .value_name("KEY")
                        .help("Dotted key, e.g. googledrive.secretfile")
                        .required(true),
                )
                .arg(
                    Arg::new("value")
                        .value_name("VALUE")
                        .help("New value; omit to print the current one"),
                ),
        )
        .subcommand(
            Command::new("completion")
                .about("Generate a shell completion script")
                .arg(
                    Arg::new("shell")
                        .value_name("SHELL")
                        .value_parser(value_parser!(Shell))
                        .required(true),
                ),
        )
}

fn id_arg() -> Arg {
    Arg::new("id")
        .value_name("ID")
        .help("Task ID")
        .value_parser(value_parser!(u32))
}

fn format_arg(default: Format) -> Arg {
    Arg::new("format")
        .short('f')
        .long("format")
        .value_name("FORMAT")
        .help("compact, detailed or json")
        .default_value(default.to_string())
}

/// Get verbosity level from matches
fn get_verbosity(matches: &ArgMatches) -> Verbosity {
    if matches.get_flag("quiet") {
        Verbosity::Quiet
    } else if matches.get_flag("verbose") {
        Verbosity::Verbose
    } else {
        Verbosity::Normal
    }
}

/// Run the CLI application with the process arguments
pub fn run() -> Result<()> {
    crate::ui::configure_colors();
    App::new()?.run()
}
