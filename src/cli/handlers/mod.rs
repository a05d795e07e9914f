use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::config_io;
use crate::io::folder_store::get_folders;
use crate::io::lock::WriteLock;
use crate::io::store::FileStore;
use crate::io::todo_store::get_todos;
use crate::model::config::AppConfig;
use crate::model::folder::{Folder, INBOX_ID};
use crate::ops::search::{self, StatusFilter};
use crate::ops::{folder_ops, todo_ops};

type CmdResult = Result<(), Box<dyn std::error::Error>>;

/// Everything a command needs from the data directory
struct Context {
    data_dir: PathBuf,
    config: AppConfig,
    store: FileStore,
}

impl Context {
    fn open(data_dir: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let config = config_io::read_config(data_dir)?;
        Ok(Context {
            data_dir: data_dir.to_path_buf(),
            config,
            store: FileStore::new(data_dir),
        })
    }

    fn lock(&self) -> Result<WriteLock, Box<dyn std::error::Error>> {
        Ok(WriteLock::for_store(&self.store)?)
    }

    fn folders(&mut self) -> Vec<Folder> {
        get_folders(&mut self.store)
    }

    fn resolve_folder(&mut self, query: &str) -> Result<Folder, Box<dyn std::error::Error>> {
        let folders = self.folders();
        folder_ops::resolve(&folders, query)
            .cloned()
            .ok_or_else(|| format!("folder not found: {}", query).into())
    }
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli, data_dir: &Path) -> CmdResult {
    let json = cli.json;
    let Some(command) = cli.command else {
        return Err("no subcommand given (try `lode --help`)".into());
    };

    match command {
        // Config commands must work even when config.toml does not parse
        Commands::Config(args) => cmd_config(args, data_dir),
        other => run(other, &mut Context::open(data_dir)?, json),
    }
}

fn run(command: Commands, ctx: &mut Context, json: bool) -> CmdResult {
    tracing::debug!(data_dir = %ctx.data_dir.display(), "cli command");
    match command {
        // Read commands
        Commands::Folders => cmd_folders(ctx, json),
        Commands::List(args) => cmd_list(ctx, args, json),
        Commands::Find(args) => cmd_find(ctx, args, json),

        // Write commands
        Commands::Folder(args) => cmd_folder(ctx, args),
        Commands::Add(args) => cmd_add(ctx, args),
        Commands::Toggle(args) => cmd_toggle(ctx, args),
        Commands::Edit(args) => cmd_edit(ctx, args),
        Commands::Tag(args) => cmd_tag(ctx, args),
        Commands::Mv(args) => cmd_mv(ctx, args),
        Commands::Rm(args) => cmd_rm(ctx, args),

        Commands::Config(args) => cmd_config(args, &ctx.data_dir),
    }
}

/// Ask a yes/no question on stdin. Anything but `y`/`yes` declines.
fn confirm(prompt: &str) -> io::Result<bool> {
    eprint!("{} [y/N] ", prompt);
    io::stderr().flush()?;
    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}

// ---------------------------------------------------------------------------
// Read commands
// ---------------------------------------------------------------------------

fn cmd_folders(ctx: &mut Context, json: bool) -> CmdResult {
    let _lock = ctx.lock()?;
    let folders = ctx.folders();
    let todos = get_todos(&ctx.store);

    if json {
        let out: Vec<FolderJson> = folders
            .iter()
            .map(|f| folder_to_json(f, ctx.config.is_permanent(&f.id), &todos))
            .collect();
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        for (_, members) in folder_ops::sidebar_sections(&folders) {
            for folder in members {
                let count = todos.iter().filter(|t| t.folder_id == folder.id).count();
                println!(
                    "{}",
                    format_folder_line(folder, ctx.config.is_permanent(&folder.id), count)
                );
            }
        }
    }
    Ok(())
}

fn cmd_list(ctx: &mut Context, args: ListArgs, json: bool) -> CmdResult {
    let _lock = ctx.lock()?;
    let folder = match args.folder.as_deref() {
        Some(query) => Some(ctx.resolve_folder(query)?),
        None => None,
    };
    let status = if args.done {
        StatusFilter::Done
    } else if args.open {
        StatusFilter::Open
    } else {
        StatusFilter::All
    };

    let todos = get_todos(&ctx.store);
    let shown = search::filter_todos(
        &todos,
        folder.as_ref().map(|f| f.id.as_str()),
        args.tag.as_deref(),
        status,
    );

    if json {
        let out: Vec<TodoJson> = shown.iter().map(|t| todo_to_json(t)).collect();
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        for todo in shown {
            println!("{}", format_todo_line(todo));
        }
    }
    Ok(())
}

fn cmd_find(ctx: &mut Context, args: FindArgs, json: bool) -> CmdResult {
    let _lock = ctx.lock()?;
    let folders = ctx.folders();
    let todos = get_todos(&ctx.store);
    let results = search::quick_find(&folders, &todos, &args.term);

    if json {
        let out = find_to_json(&results, |id| ctx.config.is_permanent(id), &todos);
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else if results.is_empty() {
        println!("No results found for \"{}\".", args.term);
    } else {
        for line in format_find_results(&results) {
            println!("{}", line);
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Write commands
// ---------------------------------------------------------------------------

fn cmd_folder(ctx: &mut Context, args: FolderCmd) -> CmdResult {
    let _lock = ctx.lock()?;
    match args.action {
        FolderAction::Add { name, icon } => {
            let folder = folder_ops::create_folder(&mut ctx.store, &name, icon.as_deref())?;
            println!("{}", folder.id);
        }
        FolderAction::Rm { id, yes } => {
            let folder = ctx.resolve_folder(&id)?;
            if ctx.config.is_permanent(&folder.id) {
                return Err(folder_ops::FolderError::Permanent(folder.id).into());
            }
            let count = get_todos(&ctx.store)
                .iter()
                .filter(|t| t.folder_id == folder.id)
                .count();
            let prompt = format!("Delete \"{}\" and its {} todo(s)?", folder.name, count);
            if !yes && !confirm(&prompt)? {
                println!("cancelled");
                return Ok(());
            }
            let deleted =
                folder_ops::delete_folder(&mut ctx.store, &ctx.config.permanent_folders, &folder.id)?;
            println!("deleted {} ({} todos)", deleted.folder.id, deleted.todos_removed);
        }
        FolderAction::Rename { id, name } => {
            let folder = ctx.resolve_folder(&id)?;
            let renamed = folder_ops::rename_folder(&mut ctx.store, &folder.id, &name)?;
            println!("{} renamed to {}", renamed.id, renamed.name);
        }
    }
    Ok(())
}

fn cmd_add(ctx: &mut Context, args: AddArgs) -> CmdResult {
    let _lock = ctx.lock()?;
    let folder_id = match args.folder.as_deref() {
        Some(query) => ctx.resolve_folder(query)?.id,
        None => INBOX_ID.to_string(),
    };
    let folders = ctx.folders();
    let todo = todo_ops::create_todo(&mut ctx.store, &folders, &args.text, &folder_id, &args.tag)?;
    println!("{}", todo.id);
    Ok(())
}

fn cmd_toggle(ctx: &mut Context, args: IdArgs) -> CmdResult {
    let _lock = ctx.lock()?;
    let todo = todo_ops::toggle_todo(&mut ctx.store, args.id)?;
    println!("{}", format_todo_line(&todo));
    Ok(())
}

fn cmd_edit(ctx: &mut Context, args: EditArgs) -> CmdResult {
    let _lock = ctx.lock()?;
    let todo = todo_ops::edit_text(&mut ctx.store, args.id, &args.text)?;
    println!("{}", format_todo_line(&todo));
    Ok(())
}

fn cmd_tag(ctx: &mut Context, args: TagArgs) -> CmdResult {
    let _lock = ctx.lock()?;
    let todo = match args.action.as_str() {
        "add" => todo_ops::add_tag(&mut ctx.store, args.id, &args.tag)?,
        "rm" => todo_ops::remove_tag(&mut ctx.store, args.id, &args.tag)?,
        other => return Err(format!("unknown action '{}' (expected: add, rm)", other).into()),
    };
    println!("{}", format_todo_line(&todo));
    Ok(())
}

fn cmd_mv(ctx: &mut Context, args: MvArgs) -> CmdResult {
    let _lock = ctx.lock()?;
    let folder = ctx.resolve_folder(&args.folder)?;
    let folders = ctx.folders();
    let todo = todo_ops::move_todo(&mut ctx.store, &folders, args.id, &folder.id)?;
    println!("{} -> {}", todo.id, folder.id);
    Ok(())
}

fn cmd_rm(ctx: &mut Context, args: IdArgs) -> CmdResult {
    let _lock = ctx.lock()?;
    let todo = todo_ops::delete_todo(&mut ctx.store, args.id)?;
    println!("deleted {}", todo.id);
    Ok(())
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

fn cmd_config(args: ConfigCmd, data_dir: &Path) -> CmdResult {
    match args.action {
        ConfigAction::Get { key } => {
            let doc = config_io::read_document(data_dir)?;
            match config_io::get_value(&doc, &key)? {
                Some(value) => println!("{}", value),
                None => return Err(format!("{} is not set", key).into()),
            }
        }
        ConfigAction::Set { key, value } => {
            let _lock = WriteLock::for_dir(data_dir)?;
            let mut doc = config_io::read_document(data_dir)?;
            config_io::set_value(&mut doc, &key, &value)?;
            config_io::write_document(data_dir, &doc)?;
            tracing::info!(key, "config updated");
            println!("{} = {}", key, value);
        }
    }
    Ok(())
}
