//! A terminal front-end for the task manager

use std::error::Error;
use std::sync::Arc;

use chrono::{Local, NaiveDate, Utc};
use clap::{Arg, ArgAction, ArgMatches, Command};

use taskpad::client::Client;
use taskpad::config::Settings;
use taskpad::filter::StatusFilter;
use taskpad::pages::{App, Context, LoginPage, ProfilePage, RegisterPage, TaskListPage};
use taskpad::quick_change::QuickChange;
use taskpad::router::{Resolution, Route};
use taskpad::storage::FileStorage;
use taskpad::{Notifications, Session, TaskStatus};

fn cli() -> Command {
    let id = || Arg::new("id").required(true).value_parser(clap::value_parser!(i64)).help("Task id");
    let status = || Arg::new("status").long("status").help("TO_DO, IN_PROGRESS or DONE");

    Command::new("taskpad")
        .version(env!("CARGO_PKG_VERSION"))
        .about("A client for a personal task manager")
        .subcommand_required(true)
        .subcommand(Command::new("login").about("Log in")
            .arg(Arg::new("email").required(true))
            .arg(Arg::new("password").required(true)))
        .subcommand(Command::new("register").about("Create an account")
            .arg(Arg::new("full_name").required(true))
            .arg(Arg::new("email").required(true))
            .arg(Arg::new("password").required(true))
            .arg(Arg::new("confirm").required(true).help("The password, again")))
        .subcommand(Command::new("logout").about("Log out"))
        .subcommand(Command::new("list").about("List the tasks")
            .arg(Arg::new("search").long("search").help("Only show tasks whose title or description contain this"))
            .arg(Arg::new("status").long("status").default_value("all").help("all, TO_DO, IN_PROGRESS or DONE"))
            .arg(Arg::new("all").long("all").action(ArgAction::SetTrue).help("Show every task, not only the first page")))
        .subcommand(Command::new("calendar").about("Show a month of tasks")
            .arg(Arg::new("offset").long("offset").allow_negative_numbers(true)
                .value_parser(clap::value_parser!(i32)).default_value("0").help("Months after (or before) the current one"))
            .arg(Arg::new("day").long("day").help("List every task of this day (YYYY-MM-DD)")))
        .subcommand(Command::new("upcoming").about("Show the next tasks"))
        .subcommand(Command::new("add").about("Add a task")
            .arg(Arg::new("title").required(true))
            .arg(Arg::new("description").required(true))
            .arg(Arg::new("due").required(true).help("YYYY-MM-DD"))
            .arg(status()))
        .subcommand(Command::new("edit").about("Edit a task")
            .arg(id())
            .arg(Arg::new("title").long("title"))
            .arg(Arg::new("description").long("description"))
            .arg(Arg::new("due").long("due").help("YYYY-MM-DD"))
            .arg(status()))
        .subcommand(Command::new("status").about("Change the status of a task")
            .arg(id())
            .arg(Arg::new("status").required(true).help("TO_DO, IN_PROGRESS or DONE")))
        .subcommand(Command::new("delete").about("Delete a task").arg(id()))
        .subcommand(Command::new("profile").about("Show or update the profile")
            .arg(Arg::new("name").long("name"))
            .arg(Arg::new("email").long("email"))
            .arg(Arg::new("current_password").long("current-password"))
            .arg(Arg::new("new_password").long("new-password")))
}

fn arg<'a>(matches: &'a ArgMatches, name: &str) -> Option<&'a str> {
    matches.get_one::<String>(name).map(|s| s.as_str())
}

fn required<'a>(matches: &'a ArgMatches, name: &str) -> Result<&'a str, Box<dyn Error>> {
    arg(matches, name).ok_or_else(|| format!("Missing argument {}", name).into())
}


#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let matches = cli().get_matches();
    let settings = Settings::from_env();
    log::debug!("Using {} as API and {:?} as data folder", settings.api_base_url, settings.data_folder);

    let storage = Arc::new(FileStorage::new(&settings.data_folder));
    let session = Arc::new(Session::load(storage));
    let notifications = Notifications::global();
    let client = Arc::new(Client::from_settings(&settings)?);
    let ctx = Context::new(client, session.clone(), notifications.clone());

    let mut app = App::new(session);
    let today = Local::now().date_naive();

    if let Some((name, sub)) = matches.subcommand() {
        let path = match name {
            "login" => Route::Login.path(),
            "register" => Route::Register.path(),
            "profile" => Route::Profile.path(),
            _ => Route::Tasks.path(),
        };

        match app.navigate(path) {
            Resolution::Redirect(Route::Login) => {
                println!("Please log in first");
            },
            Resolution::Redirect(_) => {
                println!("Already logged in. Log out first");
            },
            _ => run(name, sub, ctx, today).await?,
        }
    }

    taskpad::utils::print_notifications(&notifications.drain(), Utc::now());
    Ok(())
}

async fn run(name: &str, matches: &ArgMatches, ctx: Context<Client>, today: NaiveDate) -> Result<(), Box<dyn Error>> {
    match name {
        "login" => {
            let mut page = LoginPage::new(ctx);
            page.email = required(matches, "email")?.to_string();
            page.password = required(matches, "password")?.to_string();
            if let Some(route) = page.submit().await {
                log::debug!("Going to {}", route);
            }
        },

        "register" => {
            let mut page = RegisterPage::new(ctx);
            page.full_name = required(matches, "full_name")?.to_string();
            page.email = required(matches, "email")?.to_string();
            page.password = required(matches, "password")?.to_string();
            page.confirm_password = required(matches, "confirm")?.to_string();
            page.submit().await;
        },

        "profile" => {
            let mut page = ProfilePage::new(ctx);
            if page.load().is_some() {
                return Ok(());
            }
            let mut changed = false;
            if let Some(name) = arg(matches, "name") {
                page.full_name = name.to_string();
                changed = true;
            }
            if let Some(email) = arg(matches, "email") {
                page.email = email.to_string();
                changed = true;
            }
            if arg(matches, "current_password").is_some() || arg(matches, "new_password").is_some() {
                page.toggle_password_fields();
                page.current_password = arg(matches, "current_password").unwrap_or_default().to_string();
                page.new_password = arg(matches, "new_password").unwrap_or_default().to_string();
                changed = true;
            }
            if changed {
                page.submit().await;
            }
            if let Some(user) = page.user() {
                println!("[{}] {} <{}>", page.initials(), user.full_name, user.email);
            }
        },

        "logout" => {
            let mut page = ProfilePage::new(ctx);
            page.logout();
            println!("Logged out");
        },

        _ => {
            let mut page = TaskListPage::new(ctx, today);
            if page.load().await.is_some() {
                return Ok(());
            }
            run_task_command(name, matches, &mut page, today).await?;
        },
    }
    Ok(())
}

async fn run_task_command(name: &str, matches: &ArgMatches, page: &mut TaskListPage<Client>, today: NaiveDate) -> Result<(), Box<dyn Error>> {
    match name {
        "list" => {
            let status = StatusFilter::from(arg(matches, "status").unwrap_or("all"));
            page.set_filter(arg(matches, "search").unwrap_or_default(), status);
            if matches.get_flag("all") {
                page.toggle_show_all();
            }
            println!("{}", taskpad::utils::format_counts(&page.status_counts()));
            taskpad::utils::print_tasks(&page.visible_cards());
            if page.has_more_cards() && page.filter().show_all == false {
                println!("    ... {} more, use --all to see them", page.filtered().len() - page.visible_cards().len());
            }
        },

        "calendar" => {
            let offset = matches.get_one::<i32>("offset").copied().unwrap_or(0);
            for _ in 0..offset.unsigned_abs() {
                if offset > 0 { page.next_month() } else { page.previous_month() }
            }
            taskpad::utils::print_month(&page.month_view(today));
            if let Some(day) = arg(matches, "day") {
                page.select_day(NaiveDate::parse_from_str(day, "%Y-%m-%d")?);
                if let Some(tasks) = page.day_detail() {
                    println!("{}", day);
                    taskpad::utils::print_tasks(&tasks);
                }
            }
        },

        "upcoming" => {
            taskpad::utils::print_upcoming(&page.upcoming(today));
        },

        "add" => {
            page.open_add_form();
            let form = page.form_mut();
            form.title = required(matches, "title")?.to_string();
            form.description = required(matches, "description")?.to_string();
            form.due_date = required(matches, "due")?.to_string();
            if let Some(status) = arg(matches, "status") {
                form.status = TaskStatus::from(status);
            }
            submit(page, today).await;
        },

        "edit" => {
            let id = matches.get_one::<i64>("id").copied().ok_or("Missing task id")?;
            if page.open_edit_form(id) == false {
                println!("No task #{}", id);
                return Ok(());
            }
            let form = page.form_mut();
            if let Some(title) = arg(matches, "title") { form.title = title.to_string(); }
            if let Some(description) = arg(matches, "description") { form.description = description.to_string(); }
            if let Some(due) = arg(matches, "due") { form.due_date = due.to_string(); }
            if let Some(status) = arg(matches, "status") { form.status = TaskStatus::from(status); }
            submit(page, today).await;
        },

        "status" => {
            let id = matches.get_one::<i64>("id").copied().ok_or("Missing task id")?;
            let status = TaskStatus::from(required(matches, "status")?);
            match page.change_status(id, status).await {
                Ok(QuickChange::NotLoaded) => println!("No task #{}", id),
                Ok(QuickChange::Unselectable) => println!("Unknown status. Use TO_DO, IN_PROGRESS or DONE"),
                Ok(_) | Err(_) => (),
            }
        },

        "delete" => {
            let id = matches.get_one::<i64>("id").copied().ok_or("Missing task id")?;
            page.delete_task(id).await;
        },

        other => log::warn!("Unknown command {}", other),
    }
    Ok(())
}

async fn submit(page: &mut TaskListPage<Client>, today: NaiveDate) {
    if page.submit_form(today).await == false {
        let errors = page.form().errors();
        let messages = vec![errors.title.clone(), errors.description.clone(), errors.due_date.clone()];
        for message in messages.into_iter().flatten() {
            println!("    {}", message);
        }
    }
}
