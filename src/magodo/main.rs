use clap::Parser;
use colored::*;
use directories::ProjectDirs;
use magodo::api::{CmdMessage, ListedTodo, MagodoApi, MessageLevel};
use magodo::clock::SystemClock;
use magodo::config::MagodoConfig;
use magodo::error::Result;
use magodo::filter::{DescFilter, MetadataFilter, TodoFilter};
use magodo::grammar::ParseMode;
use magodo::model::Priority;
use std::io::{self, Read};
use std::path::PathBuf;

mod args;
use args::{Cli, Commands, ListArgs};

fn main() {
    match run() {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("{} {}", "Error:".red(), e.chain());
            std::process::exit(1);
        }
    }
}

/// Returns `Ok(false)` when the command ran but found problems.
fn run() -> Result<bool> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let api = init_api(&cli)?;
    let lines = read_stdin_lines()?;

    match cli.command {
        Commands::Fmt => handle_fmt(&api, &lines),
        Commands::Ls(args) => handle_list(&api, &lines, args),
        Commands::Check => handle_check(&api, &lines),
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    };

    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .target(env_logger::Target::Stderr)
        .init();
}

fn config_dir(cli: &Cli) -> Option<PathBuf> {
    cli.config.clone().or_else(|| {
        ProjectDirs::from("com", "magodo", "magodo").map(|dirs| dirs.config_dir().to_path_buf())
    })
}

fn init_api(cli: &Cli) -> Result<MagodoApi> {
    let mut config = if cli.plain {
        MagodoConfig::plain(ParseMode::Permissive)
    } else {
        match config_dir(cli) {
            Some(dir) => MagodoConfig::load(dir)?,
            None => {
                log::warn!("could not determine a config directory, using defaults");
                MagodoConfig::default()
            }
        }
    };

    if cli.strict {
        config.mode = ParseMode::Strict;
    }

    log::debug!("using config: {:?}", config);
    MagodoApi::from_config(config, SystemClock)
}

fn read_stdin_lines() -> Result<Vec<String>> {
    let mut input = String::new();
    io::stdin().read_to_string(&mut input)?;
    Ok(input.lines().map(str::to_string).collect())
}

fn handle_fmt(api: &MagodoApi, lines: &[String]) -> Result<bool> {
    let result = api.format(lines)?;
    for line in &result.lines {
        println!("{}", line);
    }
    print_messages(&result.messages);
    Ok(true)
}

fn handle_list(api: &MagodoApi, lines: &[String], args: ListArgs) -> Result<bool> {
    let json = args.json;
    let filter = build_filter(args)?;
    let result = api.list(lines, &filter)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result.listed_todos)?);
    } else {
        print_todos(&result.listed_todos);
    }
    print_messages(&result.messages);
    Ok(true)
}

fn handle_check(api: &MagodoApi, lines: &[String]) -> Result<bool> {
    let result = api.check(lines)?;
    print_messages(&result.messages);
    Ok(result.rejected == 0)
}

fn build_filter(args: ListArgs) -> Result<TodoFilter> {
    let priorities = args
        .priorities
        .into_iter()
        .map(Priority::new)
        .collect::<Result<Vec<_>>>()?;

    let done = match (args.done, args.open) {
        (true, _) => Some(true),
        (_, true) => Some(false),
        _ => None,
    };

    Ok(TodoFilter {
        contexts: args.contexts,
        projects: args.projects,
        epics: args.epics,
        priorities,
        desc_filters: args.descs.into_iter().map(DescFilter::new).collect(),
        done,
        metadata_filters: args
            .metadata
            .iter()
            .map(|text| MetadataFilter::parse(text))
            .collect(),
        ..TodoFilter::default()
    })
}

fn print_todos(todos: &[ListedTodo]) {
    if todos.is_empty() {
        println!("No todos found.");
        return;
    }

    let width = todos
        .iter()
        .map(|t| t.line_number.to_string().len())
        .max()
        .unwrap_or(1);

    for listed in todos {
        let number = format!("{:>width$}.", listed.line_number, width = width);
        let line = if listed.todo.done() {
            listed.line.dimmed()
        } else if listed.todo.priority().letter() == 'A' {
            listed.line.bold()
        } else {
            listed.line.normal()
        };
        println!("{} {}", number.yellow(), line);
    }
}

fn print_messages(messages: &[CmdMessage]) {
    for message in messages {
        match message.level {
            MessageLevel::Info => eprintln!("{}", message.content.dimmed()),
            MessageLevel::Success => eprintln!("{}", message.content.green()),
            MessageLevel::Warning => eprintln!("{}", message.content.yellow()),
            MessageLevel::Error => eprintln!("{}", message.content.red()),
        }
    }
}
