use anyhow::{anyhow, Context, Result};
use clap::{App as Cli, AppSettings, Arg, ArgMatches, SubCommand};
use log::*;
use todolist_sync::{
    api::{LoginParams, TaskStatus},
    app::App,
    config::Config,
    events::Event,
    logger::CustomLogger,
    state::{FilterValue, RequestStatus, TaskFields},
};

#[tokio::main]
async fn main() -> Result<()> {
    let matches = cli().get_matches();

    let mut config = Config::new();
    config
        .load(matches.value_of("config"))
        .context("Failed to load configuration")?;
    if let Some(level) = matches.value_of("log-level") {
        config.set_log_level(level)?;
    }
    CustomLogger::new(config.log_level).install()?;

    let app = App::new(&config)?;
    app.bootstrap().await;

    if let Some(event) = event_for(&matches)? {
        let is_login = matches!(event, Event::Login(_));
        app.handle(event).await;
        if is_login && app.store().lock().await.auth().is_logged_in() {
            app.refresh().await;
        }
    }

    let snapshot = app.snapshot().await;
    print!("{}", serde_yaml::to_string(&snapshot)?);
    if snapshot.app.status() == RequestStatus::Failed {
        if let Some(message) = snapshot.app.error() {
            error!("{}", message);
        }
        std::process::exit(1);
    }
    Ok(())
}

const SESSION_NOTE: &str = "Session cookies are kept in memory only, so every run starts logged \
out. Against a server that authenticates by cookie only `login` succeeds; \
the other commands need an `api_key` in config.yml that the server accepts \
as a session.";

fn cli() -> Cli<'static, 'static> {
    Cli::new(env!("CARGO_PKG_NAME"))
        .version(env!("CARGO_PKG_VERSION"))
        .about(env!("CARGO_PKG_DESCRIPTION"))
        .setting(AppSettings::VersionlessSubcommands)
        .after_help(SESSION_NOTE)
        .arg(
            Arg::with_name("config")
                .short("c")
                .long("config")
                .value_name("DIR")
                .help("Sets a custom configuration directory")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("log-level")
                .short("l")
                .long("log-level")
                .value_name("LEVEL")
                .help("Overrides the configured log level")
                .possible_values(&["off", "error", "warn", "info", "debug", "trace"])
                .takes_value(true),
        )
        .subcommand(SubCommand::with_name("show").about("Prints the synchronized state"))
        .subcommand(
            SubCommand::with_name("login")
                .about("Starts a session for this run only")
                .arg(Arg::with_name("email").required(true))
                .arg(Arg::with_name("password").required(true))
                .arg(Arg::with_name("remember-me").long("remember-me")),
        )
        .subcommand(SubCommand::with_name("logout").about("Ends the session"))
        .subcommand(
            SubCommand::with_name("add-list")
                .about("Creates a todolist")
                .arg(Arg::with_name("title").required(true)),
        )
        .subcommand(
            SubCommand::with_name("rename-list")
                .about("Renames a todolist")
                .arg(Arg::with_name("id").required(true))
                .arg(Arg::with_name("title").required(true)),
        )
        .subcommand(
            SubCommand::with_name("remove-list")
                .about("Deletes a todolist and its tasks")
                .arg(Arg::with_name("id").required(true)),
        )
        .subcommand(
            SubCommand::with_name("add-task")
                .about("Creates a task")
                .arg(Arg::with_name("list-id").required(true))
                .arg(Arg::with_name("title").required(true)),
        )
        .subcommand(
            SubCommand::with_name("remove-task")
                .about("Deletes a task")
                .arg(Arg::with_name("list-id").required(true))
                .arg(Arg::with_name("task-id").required(true)),
        )
        .subcommand(
            SubCommand::with_name("set-status")
                .about("Changes a task's status")
                .arg(Arg::with_name("list-id").required(true))
                .arg(Arg::with_name("task-id").required(true))
                .arg(
                    Arg::with_name("status")
                        .required(true)
                        .help("new, in-progress, completed or draft"),
                ),
        )
        .subcommand(
            SubCommand::with_name("filter")
                .about("Changes which tasks of a todolist are shown")
                .arg(Arg::with_name("list-id").required(true))
                .arg(
                    Arg::with_name("filter")
                        .required(true)
                        .possible_values(&["all", "active", "completed"]),
                ),
        )
}

/// Translate the chosen subcommand into an orchestrator event.
///
fn event_for(matches: &ArgMatches) -> Result<Option<Event>> {
    let event = match matches.subcommand() {
        ("login", Some(args)) => Event::Login(LoginParams {
            email: value(args, "email")?,
            password: value(args, "password")?,
            remember_me: args.is_present("remember-me"),
            captcha: None,
        }),
        ("logout", Some(_)) => Event::Logout,
        ("add-list", Some(args)) => Event::AddTodolist {
            title: value(args, "title")?,
        },
        ("rename-list", Some(args)) => Event::RenameTodolist {
            id: value(args, "id")?,
            title: value(args, "title")?,
        },
        ("remove-list", Some(args)) => Event::RemoveTodolist {
            id: value(args, "id")?,
        },
        ("add-task", Some(args)) => Event::AddTask {
            todolist_id: value(args, "list-id")?,
            title: value(args, "title")?,
        },
        ("remove-task", Some(args)) => Event::RemoveTask {
            todolist_id: value(args, "list-id")?,
            task_id: value(args, "task-id")?,
        },
        ("set-status", Some(args)) => {
            let status: TaskStatus = value(args, "status")?.parse().map_err(|e| anyhow!("{}", e))?;
            Event::UpdateTask {
                todolist_id: value(args, "list-id")?,
                task_id: value(args, "task-id")?,
                fields: TaskFields {
                    status: Some(status),
                    ..TaskFields::default()
                },
            }
        }
        ("filter", Some(args)) => {
            let filter: FilterValue = value(args, "filter")?.parse().map_err(|e| anyhow!("{}", e))?;
            Event::ChangeFilter {
                id: value(args, "list-id")?,
                filter,
            }
        }
        _ => return Ok(None),
    };
    Ok(Some(event))
}

fn value(args: &ArgMatches, name: &str) -> Result<String> {
    args.value_of(name)
        .map(str::to_string)
        .ok_or_else(|| anyhow!("Missing argument '{}'", name))
}
