use std::io::{self, Read};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result, anyhow, bail};
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use tracing::debug;
use tracing_subscriber::EnvFilter;
use zeroize::Zeroizing;

use clipvault::config::{self, Config};
use clipvault::navigation::{children_at, id_path_to_node, navigation_path};
use clipvault::tree::find_node;
use clipvault::{AppData, Direction, Node, NodeUpdate, Session, VaultFile, search};

use crate::ui::{
    copy_to_clipboard, prompt_master_password, prompt_new_master_password, render_hits,
    render_listing, render_path, render_tree, validate_master_passphrase,
};

const DEFAULT_CLEAR_SECS: u64 = 20;

#[derive(Parser, Debug)]
#[command(name = "clipvault", version, about = "Encrypted tree of clipboard snippets")]
pub struct Cli {
    /// Vault file to use instead of the configured one
    #[arg(long, global = true, env = "CLIPVAULT_VAULT")]
    vault: Option<PathBuf>,

    /// Master password; prompted for when absent
    #[arg(long, global = true, env = "CLIPVAULT_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Report whether a vault exists
    Status,
    /// Create a new vault protected by a master password
    Setup,
    /// Check the master password and print the tree
    Unlock,
    /// Print the whole tree
    Tree,
    /// List the children of a group (the root by default)
    Ls {
        #[arg(long)]
        group: Option<String>,
    },
    /// Create a group
    AddGroup {
        name: String,
        #[arg(long)]
        parent: Option<String>,
    },
    /// Create an item; content is read from stdin unless given
    AddItem {
        name: String,
        #[arg(long)]
        parent: Option<String>,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long)]
        content: Option<String>,
    },
    /// Change fields of a group or item
    Edit {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        content: Option<String>,
    },
    /// Delete a node and everything below it
    Rm { id: String },
    /// Swap a node with its neighbour
    Move { id: String, direction: MoveDirection },
    /// Search by `group -> subgroup -> text`
    Search {
        query: String,
        #[arg(long)]
        groups_only: bool,
    },
    /// Print the location of a node
    Path { id: String },
    /// Copy an item's content to the clipboard
    Copy {
        id: String,
        /// Seconds before the clipboard is wiped; 0 leaves it
        #[arg(long, default_value_t = DEFAULT_CLEAR_SECS)]
        clear_after: u64,
    },
    /// Inspect or change where the vault lives
    #[command(subcommand)]
    Config(ConfigCommand),
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    Show,
    SetPath { path: PathBuf },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum MoveDirection {
    Up,
    Down,
}

impl From<MoveDirection> for Direction {
    fn from(value: MoveDirection) -> Self {
        match value {
            MoveDirection::Up => Direction::Up,
            MoveDirection::Down => Direction::Down,
        }
    }
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Command::Config(cmd) = &cli.command {
        return run_config(cmd, cli.vault.clone());
    }

    let resolved = config::resolve_vault_path(cli.vault.clone())?;
    debug!(path = %resolved.path.display(), source = %resolved.source, "Resolved vault path");
    let mut session = Session::new(VaultFile::new(resolved.path));

    match &cli.command {
        Command::Status => {
            if session.vault_exists() {
                println!("Vault found at {}", session.vault().path().display());
            } else {
                println!(
                    "No vault at {}. Run `clipvault setup` to create one.",
                    session.vault().path().display()
                );
            }
            return Ok(());
        }
        Command::Setup => {
            if session.vault_exists() {
                bail!("A vault already exists at {}", session.vault().path().display());
            }
            let password = match cli.password.clone() {
                Some(pw) => {
                    let pw = Zeroizing::new(pw);
                    validate_master_passphrase(&pw)?;
                    pw
                }
                None => prompt_new_master_password()?,
            };
            session.setup(&password)?;
            println!("Vault created at {}", session.vault().path().display());
            return Ok(());
        }
        _ => {}
    }

    let data = unlock(&mut session, cli.password.clone())?;
    let result = run_unlocked(&session, &cli.command, data);
    session.lock();
    result
}

fn unlock(session: &mut Session, password: Option<String>) -> Result<AppData> {
    if !session.vault_exists() {
        bail!(
            "No vault at {}. Run `clipvault setup` first.",
            session.vault().path().display()
        );
    }
    let password = match password {
        Some(pw) => Zeroizing::new(pw),
        None => prompt_master_password()?,
    };
    Ok(session.unlock(&password)?)
}

fn run_unlocked(session: &Session, command: &Command, data: AppData) -> Result<()> {
    match command {
        Command::Unlock | Command::Tree => print!("{}", render_tree(&data)),
        Command::Ls { group } => {
            let stack = match group {
                Some(id) => id_path_to_node(&data.groups, id)
                    .filter(|_| find_node(&data.groups, id).is_some_and(|f| f.node.is_group()))
                    .ok_or_else(|| anyhow!("No group with id {id}"))?,
                None => Vec::new(),
            };
            let breadcrumb = navigation_path(&data, &stack);
            print!("{}", render_listing(&breadcrumb, children_at(&data, &stack)));
        }
        Command::AddGroup { name, parent } => {
            let data = session.create_group(parent.as_deref(), name)?;
            print!("{}", render_tree(&data));
        }
        Command::AddItem {
            name,
            parent,
            description,
            content,
        } => {
            let content = match content {
                Some(text) => Zeroizing::new(text.clone()),
                None => read_stdin()?,
            };
            let data = session.create_item(parent.as_deref(), name, description, &content)?;
            print!("{}", render_tree(&data));
        }
        Command::Edit {
            id,
            name,
            description,
            content,
        } => {
            let update = NodeUpdate {
                name: name.clone(),
                description: description.clone(),
                content: content.clone(),
            };
            if update.is_empty() {
                bail!("Nothing to change; pass --name, --description or --content");
            }
            let data = session.update_node(id, &update)?;
            print!("{}", render_tree(&data));
        }
        Command::Rm { id } => {
            let data = session.delete_node(id)?;
            print!("{}", render_tree(&data));
        }
        Command::Move { id, direction } => {
            let data = session.reorder_node(id, (*direction).into())?;
            print!("{}", render_tree(&data));
        }
        Command::Search { query, groups_only } => {
            let query = query.trim();
            if !query.is_empty() {
                print!("{}", render_hits(&search(&data.groups, query, *groups_only)));
            }
        }
        Command::Path { id } => {
            let path = render_path(&data, id).ok_or_else(|| anyhow!("No node with id {id}"))?;
            println!("{path}");
        }
        Command::Copy { id, clear_after } => {
            let found = find_node(&data.groups, id).ok_or_else(|| anyhow!("No node with id {id}"))?;
            let Node::Item(item) = found.node else {
                bail!("{} is a group; only items can be copied", found.node.name());
            };
            if *clear_after > 0 {
                println!("Copied \"{}\"; clipboard clears in {clear_after}s", item.name);
            } else {
                println!("Copied \"{}\"", item.name);
            }
            copy_to_clipboard(&item.content, Duration::from_secs(*clear_after))?;
        }
        Command::Status | Command::Setup | Command::Config(_) => {}
    }
    Ok(())
}

fn run_config(cmd: &ConfigCommand, explicit: Option<PathBuf>) -> Result<()> {
    match cmd {
        ConfigCommand::Show => {
            let resolved = config::resolve_vault_path(explicit)?;
            println!("config file: {}", config::config_path()?.display());
            println!("vault: {} ({})", resolved.path.display(), resolved.source);
        }
        ConfigCommand::SetPath { path } => {
            let path = if path.is_absolute() {
                path.clone()
            } else {
                std::env::current_dir()?.join(path)
            };
            let mut cfg = config::load_config()?.unwrap_or_default();
            cfg.vault_path = Some(path.clone());
            save(&cfg)?;
            println!("Vault path set to {}", path.display());
        }
    }
    Ok(())
}

fn save(cfg: &Config) -> Result<()> {
    config::save_config(cfg).context("Failed to write config")
}

fn read_stdin() -> Result<Zeroizing<String>> {
    let mut buf = Zeroizing::new(String::new());
    io::stdin()
        .read_to_string(&mut buf)
        .context("Failed to read content from stdin")?;
    Ok(buf)
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with_writer(io::stderr)
        .init();
}
