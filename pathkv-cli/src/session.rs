//! Interactive and piped-input front ends over a [`pathkv::store::Store`].
//!
//! Unlike the reference CLI's `Session`, which streams SQL-flavored
//! statements to a remote async server, this one holds the store
//! directly: there is no network round trip, so every method here is
//! synchronous.

use std::io::BufRead;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{anyhow, Result};
use colored::Colorize;
use pathkv::store::Store;
use rustyline::config::Builder;
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::{CompletionType, Editor};

use crate::ast::tokenize_line;
use crate::config::ConfigLoad;
use crate::rusty::CliHelper;

/// Verbs recognized at the start of a REPL line, used both for
/// dispatch and for completion hints in [`crate::rusty`].
pub const COMMAND_VERBS: &[&str] = &[
    "get",
    "safe_get",
    "has",
    "put",
    "discard",
    "delete",
    "count_up",
    "count_down",
    "match_count",
    "match_keys",
    "match_items",
    "checkout",
    "undo",
    "redo",
    "log",
    "encode",
    "decode",
    "exit",
    "quit",
];

pub struct Session {
    is_repl: bool,
    settings: ConfigLoad,
    store: Store,
    keywords: Arc<Vec<String>>,
}

impl Session {
    pub fn try_new(settings: ConfigLoad, store: Store, is_repl: bool) -> Result<Self> {
        if is_repl {
            println!("Welcome to pathkv.");
            println!();
        }

        let keywords = COMMAND_VERBS.iter().map(|s| s.to_string()).collect();

        Ok(Self {
            is_repl,
            settings,
            store,
            keywords: Arc::new(keywords),
        })
    }

    fn prompt(&self) -> String {
        format!("{} > ", self.settings.prompt().trim_end())
    }

    pub fn handle_repl(&mut self) {
        let config = Builder::new()
            .completion_prompt_limit(5)
            .completion_type(CompletionType::Circular)
            .build();
        let mut rl = Editor::<CliHelper, DefaultHistory>::with_config(config).unwrap();

        rl.set_helper(Some(CliHelper::with_keywords(self.keywords.clone())));
        rl.load_history(&history_path()).ok();

        loop {
            match rl.readline(&self.prompt()) {
                Ok(line) => {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }
                    let _ = rl.add_history_entry(line);

                    match self.handle_line(true, line) {
                        Ok(None) => break,
                        Ok(Some(output)) => {
                            if !output.is_empty() {
                                println!("{output}");
                            }
                        }
                        Err(e) => eprintln!("{} {}", "error:".red(), e),
                    }
                }
                Err(ReadlineError::Io(err)) => eprintln!("io err: {err}"),
                Err(ReadlineError::Interrupted) => println!("^C"),
                Err(ReadlineError::Eof) => break,
                Err(_) => {}
            }
        }

        println!("Bye~");
        let _ = rl.save_history(&history_path());
    }

    pub fn handle_reader<R: BufRead>(&mut self, r: R) -> Result<()> {
        let start = Instant::now();
        for line in r.lines() {
            let line = line.map_err(|e| anyhow!("read lines err: {e}"))?;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            if let Some(output) = self.handle_line(false, line)? {
                if !output.is_empty() {
                    println!("{output}");
                }
            }
        }

        if self.settings.show_stats() {
            println!("{:.3}", start.elapsed().as_secs_f64());
        }
        Ok(())
    }

    /// Runs one line of input, returning `Ok(None)` on `exit`/`quit`.
    fn handle_line(&mut self, is_repl: bool, line: &str) -> Result<Option<String>> {
        let line = line.trim_end_matches(';').trim();
        if is_repl && (line == "exit" || line == "quit") {
            return Ok(None);
        }

        if line.starts_with('.') {
            let parts: Vec<&str> = line.trim_start_matches('.').split_whitespace().collect();
            if parts.len() != 2 {
                return Err(anyhow!(
                    "control command error, must be of the form `.cmd_name cmd_value`"
                ));
            }
            if !self.settings.inject_cmd(parts[0], parts[1]) {
                return Err(anyhow!("unknown control command: {}", parts[0]));
            }
            return Ok(Some(String::new()));
        }

        let command = parse_command(line)?;
        let output = crate::command::run(&mut self.store, command)?;
        Ok(Some(output))
    }
}

/// Parses one tokenized REPL line into a [`crate::command::Command`].
fn parse_command(line: &str) -> Result<crate::command::Command> {
    use crate::command::Command;

    let tokens = tokenize_line(line).map_err(|e| anyhow!(e))?;
    let words: Vec<String> = tokens
        .iter()
        .map(|t| match t.kind {
            crate::ast::TokenKind::QuotedString => t.unquoted().to_string(),
            _ => t.text().to_string(),
        })
        .collect();

    let Some(verb) = words.first() else {
        return Err(anyhow!("empty command"));
    };

    let args = &words[1..];
    let need = |n: usize| -> Result<()> {
        if args.len() != n {
            Err(anyhow!("`{verb}` takes {n} argument(s), got {}", args.len()))
        } else {
            Ok(())
        }
    };

    match verb.to_ascii_lowercase().as_str() {
        "get" => {
            need(1)?;
            Ok(Command::Get { key: args[0].clone() })
        }
        "safe_get" => {
            need(1)?;
            Ok(Command::SafeGet { key: args[0].clone() })
        }
        "has" => {
            need(1)?;
            Ok(Command::Has { key: args[0].clone() })
        }
        "put" => {
            need(2)?;
            Ok(Command::Put {
                key: args[0].clone(),
                value: args[1].clone(),
            })
        }
        "discard" => {
            need(1)?;
            Ok(Command::Discard { key: args[0].clone() })
        }
        "delete" => {
            need(1)?;
            Ok(Command::Delete { key: args[0].clone() })
        }
        "count_up" => {
            need(1)?;
            Ok(Command::CountUp { key: args[0].clone() })
        }
        "count_down" => {
            need(1)?;
            Ok(Command::CountDown { key: args[0].clone() })
        }
        "match_count" => {
            need(1)?;
            Ok(Command::MatchCount { prefix: args[0].clone() })
        }
        "match_keys" => {
            need(1)?;
            Ok(Command::MatchKeys { prefix: args[0].clone() })
        }
        "match_items" => {
            need(1)?;
            Ok(Command::MatchItems { prefix: args[0].clone() })
        }
        "checkout" => {
            need(1)?;
            Ok(Command::Checkout { commit: args[0].clone() })
        }
        "undo" => {
            need(0)?;
            Ok(Command::Undo)
        }
        "redo" => {
            need(0)?;
            Ok(Command::Redo)
        }
        "log" => {
            need(0)?;
            Ok(Command::Log)
        }
        "encode" => {
            need(2)?;
            Ok(Command::Encode {
                key: args[0].clone(),
                format: args[1].clone(),
            })
        }
        "decode" => {
            need(2)?;
            Ok(Command::Decode {
                key: args[0].clone(),
                format: args[1].clone(),
            })
        }
        other => Err(anyhow!("unrecognized command: {other}")),
    }
}

fn history_path() -> String {
    format!(
        "{}/.pathkv_history",
        std::env::var("HOME").unwrap_or_else(|_| ".".to_string())
    )
}
