use std::io::{stdin, IsTerminal};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use human_panic::setup_panic;
use log::info;
use pathkv::store::{Store, StoreOptions};

use pathkv_cli::command::{self, Command};
use pathkv_cli::config::ConfigLoad;
use pathkv_cli::session::Session;
use pathkv_cli::trace;

#[derive(Debug, Parser, PartialEq)]
#[command(version, author, about)]
pub struct Args {
    #[clap(short, long, help = "print the parsed arguments and config before running")]
    debug: bool,

    /// Database directory. Overrides the config file's `database_dir`.
    #[clap(long = "dir")]
    dir: Option<String>,

    /// Configuration file path, loaded/created via confy.
    #[clap(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// The one-shot subcommand to run. If omitted, starts a REPL (or
    /// reads statements from stdin, when stdin is not a terminal).
    #[clap(subcommand)]
    cmd: Option<Command>,

    #[clap(short = 'n', long, help = "force non-interactive mode", default_value = "false")]
    non_interactive: bool,

    #[clap(short = 'l', long, default_value = "info")]
    log_level: String,

    #[clap(long, require_equals = true, help = "query line(s) to execute")]
    query: Option<String>,
}

pub fn main() -> Result<()> {
    setup_panic!();

    let args = Args::parse();
    if args.debug {
        println!("{:?}", args);
    }

    let mut cfg: ConfigLoad = match &args.config {
        Some(path) => confy::load_path(path).unwrap_or_default(),
        None => confy::load("pathkv-cli", "config").unwrap_or_default(),
    };
    if let Some(dir) = &args.dir {
        cfg.database_dir = Some(dir.clone());
    }
    cfg.log_level = Some(args.log_level.clone());

    let log_dir = format!(
        "{}/.pathkv",
        std::env::var("HOME").unwrap_or_else(|_| ".".to_string())
    );
    let _guards = trace::init_logging(&log_dir, cfg.log_level())?;
    info!("pathkv-cli starting, args: {:?}", &args);

    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    ctrlc::set_handler(move || {
        r.store(false, Ordering::SeqCst);
    })
    .expect("error setting Ctrl-C handler");

    let is_terminal = stdin().is_terminal();
    let is_repl = is_terminal && !args.non_interactive && args.query.is_none() && args.cmd.is_none();
    if is_repl {
        cfg.terminal_update();
    }

    let store = Store::connect(cfg.database_dir(), StoreOptions::default())?;

    if let Some(cmd) = args.cmd {
        let mut store = store;
        let output = command::run(&mut store, cmd)?;
        if !output.is_empty() {
            println!("{output}");
        }
        return Ok(());
    }

    let mut session = Session::try_new(cfg, store, is_repl)?;

    if is_repl {
        session.handle_repl();
        return Ok(());
    }

    match args.query {
        None => session.handle_reader(stdin().lock())?,
        Some(query) => session.handle_reader(std::io::Cursor::new(query))?,
    }

    Ok(())
}

