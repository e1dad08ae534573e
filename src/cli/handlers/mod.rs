mod init;
pub use init::cmd_init;

use std::fs;
use std::path::PathBuf;
use std::sync::OnceLock;

use chrono::{Local, NaiveDate, Utc};

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::config_io;
use crate::io::lock::StoreLock;
use crate::io::state;
use crate::io::store_io::{self, StoreError};
use crate::model::group::{Group, parse_due};
use crate::model::store::Store;
use crate::ops::filter::{self, Filter};
use crate::ops::reorder::{self, MoveInstruction, Partition};
use crate::ops::{import, task_ops};

/// Override for the working directory (set by -C flag)
static PROJECT_DIR_OVERRIDE: OnceLock<PathBuf> = OnceLock::new();

/// Fixes the current date, e.g. `TUDU_TODAY=2026-10-19`
pub const TODAY_ENV: &str = "TUDU_TODAY";

type CmdResult = Result<(), Box<dyn std::error::Error>>;

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli) -> CmdResult {
    let json = cli.json;

    if let Some(ref dir) = cli.project_dir {
        let abs = fs::canonicalize(dir)
            .map_err(|e| format!("cannot resolve -C path '{}': {}", dir, e))?;
        let _ = PROJECT_DIR_OVERRIDE.set(abs);
    }

    match cli.command {
        // Init is handled in main.rs before store discovery
        Commands::Init(args) => cmd_init(args, cli.project_dir.as_deref()),

        // Read commands
        Commands::List(args) => cmd_list(args, json),
        Commands::Show(args) => cmd_show(args, json),
        Commands::Search(args) => cmd_search(args, json),
        Commands::Export(args) => cmd_export(args),
        Commands::Config(args) => cmd_config(args, json),

        // Write commands
        Commands::Add(args) => cmd_add(args, json),
        Commands::Edit(args) => cmd_edit(args),
        Commands::Toggle(args) => cmd_toggle(args),
        Commands::Done(args) => cmd_set_completed(args, true),
        Commands::Undone(args) => cmd_set_completed(args, false),
        Commands::Rm(args) => cmd_rm(args),
        Commands::Clear => cmd_clear(),
        Commands::Mv(args) => cmd_mv(args, json),
        Commands::Import(args) => cmd_import(args),
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn start_dir() -> Result<PathBuf, StoreError> {
    match PROJECT_DIR_OVERRIDE.get() {
        Some(dir) => Ok(dir.clone()),
        None => std::env::current_dir().map_err(StoreError::IoError),
    }
}

fn load_store_cwd() -> Result<Store, StoreError> {
    let root = store_io::discover_store(&start_dir()?)?;
    store_io::load_store(&root)
}

/// Lock the store, then load it. The lock must outlive the save.
fn load_store_locked() -> Result<(StoreLock, Store), Box<dyn std::error::Error>> {
    let root = store_io::discover_store(&start_dir()?)?;
    let lock = StoreLock::acquire_default(&root.join(store_io::DATA_DIR))?;
    let store = store_io::load_store(&root)?;
    Ok((lock, store))
}

/// The current date, captured once per command.
fn today() -> Result<NaiveDate, String> {
    match std::env::var(TODAY_ENV) {
        Ok(s) => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
            .map_err(|_| format!("{} must be YYYY-MM-DD, got '{}'", TODAY_ENV, s)),
        Err(_) => Ok(Local::now().date_naive()),
    }
}

/// Put the list back in group order and write it.
fn save(store: &mut Store, today: NaiveDate) -> Result<(), StoreError> {
    store.tasks = reorder::regroup(&store.tasks, today);
    store_io::save_tasks(&store.data_dir, &store.tasks)
}

fn parse_group(s: &str) -> Result<Group, Box<dyn std::error::Error>> {
    s.parse::<Group>().map_err(Box::<dyn std::error::Error>::from)
}

fn parse_filter(s: &str) -> Result<Filter, Box<dyn std::error::Error>> {
    s.parse::<Filter>().map_err(Box::<dyn std::error::Error>::from)
}

// ---------------------------------------------------------------------------
// Read commands
// ---------------------------------------------------------------------------

fn cmd_list(args: ListArgs, json: bool) -> CmdResult {
    let store = load_store_cwd()?;
    let today = today()?;
    let mut ui_state = state::read_ui_state(&store.data_dir).unwrap_or_default();

    let filter = match args.filter.as_deref() {
        Some(f) => {
            let filter = parse_filter(f)?;
            if ui_state.filter != Some(filter) {
                ui_state.filter = Some(filter);
                if let Err(e) = state::write_ui_state(&store.data_dir, &ui_state) {
                    tracing::warn!(error = %e, "could not save ui state");
                }
            }
            filter
        }
        None => match ui_state.filter {
            Some(f) => f,
            None => parse_filter(&store.config.ui.default_filter)?,
        },
    };

    if json {
        let listing = listing_to_json(&store.config.list.name, &store.tasks, today, filter);
        println!("{}", serde_json::to_string_pretty(&listing)?);
    } else {
        for line in format_listing(
            &store.config.list.name,
            &store.tasks,
            today,
            filter,
            store.config.ui.max_text_width,
        ) {
            println!("{}", line);
        }
    }
    Ok(())
}

fn cmd_show(args: IdArg, json: bool) -> CmdResult {
    let store = load_store_cwd()?;
    let today = today()?;
    let task = task_ops::find_task(&store.tasks, &args.id)
        .ok_or_else(|| format!("task not found: {}", args.id))?;
    let (group, index) = task_position(&store.tasks, today, &args.id)
        .ok_or_else(|| format!("task not found: {}", args.id))?;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&task_to_json(task, group, index))?
        );
    } else {
        for line in format_task_detail(task, group, index) {
            println!("{}", line);
        }
    }
    Ok(())
}

fn cmd_search(args: SearchArgs, json: bool) -> CmdResult {
    let store = load_store_cwd()?;
    let today = today()?;
    let hits = filter::search(&store.tasks, &args.pattern)?;

    let mut positioned = Vec::new();
    for task in hits {
        if let Some((group, index)) = task_position(&store.tasks, today, &task.id) {
            positioned.push((task, group, index));
        }
    }

    if json {
        let out: Vec<TaskJson> = positioned
            .iter()
            .map(|(t, g, i)| task_to_json(t, *g, *i))
            .collect();
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else if positioned.is_empty() {
        println!("no matches");
    } else {
        for (task, group, index) in positioned {
            println!(
                "{}",
                format_search_hit(task, group, index, today, store.config.ui.max_text_width)
            );
        }
    }
    Ok(())
}

fn cmd_export(args: ExportArgs) -> CmdResult {
    let store = load_store_cwd()?;
    let json = import::export_json(&store.tasks)?;

    match args.path {
        Some(path) => {
            store_io::atomic_write(std::path::Path::new(&path), format!("{}\n", json).as_bytes())
                .map_err(|e| format!("could not write {}: {}", path, e))?;
            println!("exported {} tasks to {}", store.tasks.len(), path);
        }
        None => println!("{}", json),
    }
    Ok(())
}

fn cmd_config(args: ConfigCmd, json: bool) -> CmdResult {
    let root = store_io::discover_store(&start_dir()?)?;
    let data_dir = root.join(store_io::DATA_DIR);

    match args.action {
        None => {
            let (config, _) = config_io::read_config(&data_dir)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&config)?);
            } else {
                for line in format_config(&config) {
                    println!("{}", line);
                }
            }
        }
        Some(ConfigAction::UpcomingDays(a)) => {
            let _lock = StoreLock::acquire_default(&data_dir)?;
            let (_, mut doc) = config_io::read_config(&data_dir)?;
            config_io::set_upcoming_offset_days(&mut doc, a.days)?;
            config_io::write_config(&data_dir, &doc)?;
            println!("reorder.upcoming_offset_days = {}", a.days);
        }
        Some(ConfigAction::DefaultFilter(a)) => {
            let filter = parse_filter(&a.filter)?;
            let _lock = StoreLock::acquire_default(&data_dir)?;
            let (_, mut doc) = config_io::read_config(&data_dir)?;
            config_io::set_default_filter(&mut doc, &filter.to_string());
            config_io::write_config(&data_dir, &doc)?;
            println!("ui.default_filter = {}", filter);
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Write commands
// ---------------------------------------------------------------------------

fn cmd_add(args: AddArgs, json: bool) -> CmdResult {
    let (_lock, mut store) = load_store_locked()?;
    let today = today()?;
    let offset = store.config.reorder.upcoming_offset_days;
    let due = match args.due.as_deref() {
        Some(expr) => parse_due(expr, today, offset)?,
        None => today,
    };

    let id = task_ops::add_task(&mut store.tasks, &args.text, due, Utc::now().timestamp_millis())?;
    save(&mut store, today)?;

    if json {
        let task = task_ops::find_task(&store.tasks, &id).ok_or("added task vanished")?;
        let (group, index) = task_position(&store.tasks, today, &id).ok_or("added task vanished")?;
        println!(
            "{}",
            serde_json::to_string_pretty(&task_to_json(task, group, index))?
        );
    } else {
        println!("{}", id);
    }
    Ok(())
}

fn cmd_edit(args: EditArgs) -> CmdResult {
    if args.text.is_none() && args.due.is_none() {
        return Err("nothing to change: pass --text and/or --due".into());
    }
    let (_lock, mut store) = load_store_locked()?;
    let today = today()?;

    if let Some(ref text) = args.text {
        task_ops::edit_text(&mut store.tasks, &args.id, text)?;
    }
    if let Some(ref expr) = args.due {
        let due = parse_due(expr, today, store.config.reorder.upcoming_offset_days)?;
        task_ops::set_due_date(&mut store.tasks, &args.id, due)?;
    }
    save(&mut store, today)?;
    println!("{} updated", args.id);
    Ok(())
}

fn cmd_toggle(args: IdArg) -> CmdResult {
    let (_lock, mut store) = load_store_locked()?;
    let today = today()?;
    let completed = task_ops::toggle_completed(&mut store.tasks, &args.id)?;
    save(&mut store, today)?;
    println!("{} {}", args.id, if completed { "done" } else { "not done" });
    Ok(())
}

fn cmd_set_completed(args: IdArg, completed: bool) -> CmdResult {
    let (_lock, mut store) = load_store_locked()?;
    let today = today()?;
    let changed = task_ops::set_completed(&mut store.tasks, &args.id, completed)?;
    if changed {
        save(&mut store, today)?;
    }
    println!("{} {}", args.id, if completed { "done" } else { "not done" });
    Ok(())
}

fn cmd_rm(args: IdArg) -> CmdResult {
    let (_lock, mut store) = load_store_locked()?;
    let today = today()?;
    let removed = task_ops::delete_task(&mut store.tasks, &args.id)?;
    save(&mut store, today)?;
    println!("deleted {} ({})", removed.id, removed.text);
    Ok(())
}

fn cmd_clear() -> CmdResult {
    let (_lock, mut store) = load_store_locked()?;
    let today = today()?;
    let removed = task_ops::clear_completed(&mut store.tasks);
    if removed > 0 {
        save(&mut store, today)?;
    }
    println!("cleared {} completed tasks", removed);
    Ok(())
}

fn cmd_mv(args: MvArgs, json: bool) -> CmdResult {
    let source_group = parse_group(&args.from_group)?;
    let dest_group = parse_group(&args.to_group)?;
    let (_lock, mut store) = load_store_locked()?;
    let today = today()?;

    let mv = MoveInstruction::new(source_group, args.from_index, dest_group, args.to_index);
    let moved_id = Partition::of(&store.tasks, today)
        .group(source_group)
        .get(args.from_index)
        .map(|t| t.id.clone());

    let tasks = match reorder::try_reorder(
        &store.tasks,
        &mv,
        today,
        store.config.reorder.upcoming_offset_days,
    ) {
        Ok(tasks) => tasks,
        Err(e) => {
            tracing::warn!(error = %e, "move rejected; list unchanged");
            return Err(e.into());
        }
    };
    // try_reorder validated the index, so the task exists
    let moved_id = moved_id.ok_or("moved task vanished")?;

    store.tasks = tasks;
    store_io::save_tasks(&store.data_dir, &store.tasks)?;

    let task = task_ops::find_task(&store.tasks, &moved_id).ok_or("moved task vanished")?;
    let (group, index) =
        task_position(&store.tasks, today, &moved_id).ok_or("moved task vanished")?;
    if json {
        let out = MoveJson {
            id: moved_id.clone(),
            from: source_group,
            to: group,
            index,
            due_date: format_date(task.due_date),
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        println!(
            "{}: {}/{} → {}/{} (due {})",
            moved_id,
            source_group,
            args.from_index,
            group,
            index,
            format_date(task.due_date)
        );
    }
    Ok(())
}

fn cmd_import(args: ImportArgs) -> CmdResult {
    let text = fs::read_to_string(&args.path)
        .map_err(|e| format!("could not read {}: {}", args.path, e))?;
    let incoming = import::parse_json(&text)?;

    let (_lock, mut store) = load_store_locked()?;
    let today = today()?;

    let added = if args.merge {
        let (merged, added) = import::merge(&store.tasks, incoming);
        store.tasks = merged;
        added
    } else {
        let count = incoming.len();
        store.tasks = incoming;
        count
    };
    save(&mut store, today)?;

    if args.merge {
        println!("merged {} new tasks ({} total)", added, store.tasks.len());
    } else {
        println!("imported {} tasks", added);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
