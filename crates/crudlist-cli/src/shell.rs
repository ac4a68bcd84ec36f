//! Interactive session over one in-memory store
//!
//! Each input line is split into words (double quotes group words) and
//! parsed with clap, so `help` and per-command `--help` come for free.

use crate::render;
use anyhow::{Result, bail};
use clap::{Parser, Subcommand};
use colored::Colorize;
use crudlist_core::config::DisplayConfig;
use crudlist_core::{Change, Store, parse_id, seed, validate_record_input};
use std::io::{BufRead, Write};
use std::path::PathBuf;

#[derive(Parser)]
#[command(no_binary_name = true, disable_version_flag = true)]
struct Line {
    #[command(subcommand)]
    command: ShellCommand,
}

#[derive(Subcommand)]
enum ShellCommand {
    /// Add a record
    Add { title: String, detail: String },

    /// Delete a record
    #[command(alias = "rm")]
    Delete { id: String },

    /// Flip the done flag of a record
    Toggle { id: String },

    /// Replace title, detail and flag of a record
    Edit {
        id: String,
        title: String,
        detail: String,
        /// Mark as done
        #[arg(long, conflicts_with = "open")]
        done: bool,
        /// Mark as open
        #[arg(long)]
        open: bool,
    },

    /// Show one record
    Show { id: String },

    /// List all records
    #[command(alias = "ls")]
    List,

    /// Write the current records to a file (`.json` for an array, JSONL otherwise)
    Export { path: PathBuf },

    /// Leave the session
    #[command(alias = "exit")]
    Quit,
}

/// Split a line into words; double quotes group, backslash escapes a quote
pub fn tokenize(line: &str) -> Result<Vec<String>> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut quoted = false;
    let mut chars = line.chars();

    while let Some(c) = chars.next() {
        match c {
            '"' => {
                quoted = !quoted;
                in_word = true;
            }
            '\\' if quoted => match chars.next() {
                Some(next) => current.push(next),
                None => bail!("dangling escape at end of line"),
            },
            c if c.is_whitespace() && !quoted => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            c => {
                current.push(c);
                in_word = true;
            }
        }
    }

    if quoted {
        bail!("unterminated quote");
    }
    if in_word {
        words.push(current);
    }
    Ok(words)
}

enum Flow {
    Continue,
    Quit,
}

/// Run a session until `quit` or end of input
pub fn run<R: BufRead, W: Write>(
    store: &mut Store,
    display: &DisplayConfig,
    input: R,
    out: &mut W,
    prompt: bool,
) -> Result<()> {
    if prompt {
        write!(out, "> ")?;
        out.flush()?;
    }
    for line in input.lines() {
        let line = line?;
        let words = match tokenize(&line) {
            Ok(words) => words,
            Err(e) => {
                writeln!(out, "{} {}", "!".yellow(), e)?;
                continue;
            }
        };
        if !words.is_empty() {
            match Line::try_parse_from(words) {
                Ok(parsed) => match execute(store, display, parsed.command, out) {
                    Ok(Flow::Quit) => return Ok(()),
                    Ok(Flow::Continue) => {}
                    Err(e) => writeln!(out, "{} {}", "!".yellow(), e)?,
                },
                Err(e) => write!(out, "{}", e.render())?,
            }
        }
        if prompt {
            write!(out, "> ")?;
            out.flush()?;
        }
    }
    Ok(())
}

fn execute<W: Write>(
    store: &mut Store,
    display: &DisplayConfig,
    command: ShellCommand,
    out: &mut W,
) -> Result<Flow> {
    match command {
        ShellCommand::Add { title, detail } => {
            validate_record_input(&title, &detail)?;
            let record = store.create(&title, &detail)?;
            writeln!(out, "{} Created {}", "✓".green(), record.id)?;
        }
        ShellCommand::Delete { id } => {
            let id = parse_id(&id)?;
            report(out, store.delete(id), "Deleted", id)?;
        }
        ShellCommand::Toggle { id } => {
            let id = parse_id(&id)?;
            report(out, store.toggle_flag(id), "Toggled", id)?;
        }
        ShellCommand::Edit {
            id,
            title,
            detail,
            done,
            open,
        } => {
            let id = parse_id(&id)?;
            validate_record_input(&title, &detail)?;
            let flag = match (done, open) {
                (true, _) => true,
                (_, true) => false,
                _ => store.get(id).map(|r| r.flag).unwrap_or(false),
            };
            report(out, store.update(id, &title, &detail, flag), "Updated", id)?;
        }
        ShellCommand::Show { id } => {
            let id = parse_id(&id)?;
            let record = store.require(id)?;
            writeln!(out, "{}", render::detail(record, display))?;
        }
        ShellCommand::List => {
            writeln!(out, "{}", render::table(store.records(), display))?;
        }
        ShellCommand::Export { path } => {
            seed::save(&path, &store.snapshot())?;
            writeln!(out, "{} Exported {} record(s) to {}", "✓".green(), store.len(), path.display())?;
        }
        ShellCommand::Quit => return Ok(Flow::Quit),
    }
    Ok(Flow::Continue)
}

fn report<W: Write>(out: &mut W, change: Change, verb: &str, id: u64) -> Result<()> {
    match change {
        Change::Applied => writeln!(out, "{} {} {}", "✓".green(), verb, id)?,
        Change::Unchanged => writeln!(out, "No record {}; nothing changed", id)?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crudlist_core::{Collection, Record};

    fn session(store: &mut Store, script: &str) -> String {
        let mut out = Vec::new();
        run(store, &DisplayConfig::default(), script.as_bytes(), &mut out, false).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_tokenize() {
        assert_eq!(
            tokenize(r#"add "Learn Rust" 'borrowing'"#).unwrap(),
            vec!["add", "Learn Rust", "'borrowing'"]
        );
        assert_eq!(tokenize(r#"add "" x"#).unwrap(), vec!["add", "", "x"]);
        assert_eq!(tokenize(r#"edit 1 "say \"hi\"" d"#).unwrap()[2], r#"say "hi""#);
        assert!(tokenize(r#"add "open"#).is_err());
        assert!(tokenize("   ").unwrap().is_empty());
    }

    #[test]
    fn test_add_toggle_delete() {
        let mut store = Store::new();
        let out = session(&mut store, "add \"Learn Rust\" ownership\n");
        assert!(out.contains("Created"));
        let id = store.records()[0].id;

        session(&mut store, &format!("toggle {id}\n"));
        assert!(store.get(id).unwrap().flag);

        let out = session(&mut store, &format!("rm {id}\nrm {id}\n"));
        assert!(out.contains(&format!("Deleted {id}")));
        assert!(out.contains("nothing changed"));
        assert!(store.is_empty());
    }

    #[test]
    fn test_blank_input_never_reaches_store() {
        let mut store = Store::new();
        let out = session(&mut store, "add \"  \" detail\n");
        assert!(out.contains("title must not be empty"));
        assert!(store.is_empty());
    }

    #[test]
    fn test_edit_keeps_flag_unless_given() {
        let mut store = Store::with_collection(Collection::demo());
        session(&mut store, "edit 3 \"Context\" \"docs\"\n");
        assert_eq!(
            store.get(3).unwrap(),
            &Record { id: 3, title: "Context".into(), detail: "docs".into(), flag: true }
        );
        session(&mut store, "edit 3 Context docs --open\n");
        assert!(!store.get(3).unwrap().flag);
    }

    #[test]
    fn test_quit_stops_reading() {
        let mut store = Store::new();
        session(&mut store, "quit\nadd a b\n");
        assert!(store.is_empty());
    }

    #[test]
    fn test_bad_id_and_unknown_command() {
        let mut store = Store::with_collection(Collection::demo());
        let out = session(&mut store, "toggle abc\nfrobnicate\nshow 99\n");
        assert!(out.contains("Invalid record ID: abc"));
        assert!(out.contains("frobnicate"));
        assert!(out.contains("Record not found: 99"));
        assert_eq!(store.snapshot(), Collection::demo());
    }

    #[test]
    fn test_export() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.jsonl");
        let mut store = Store::with_collection(Collection::demo());
        session(&mut store, &format!("export {}\n", path.display()));
        assert_eq!(seed::load(&path).unwrap(), Collection::demo());
    }

    #[test]
    fn test_export_reloads_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        let json = dir.path().join("snap.json");
        let mut store = Store::with_collection(Collection::demo());
        session(&mut store, &format!("toggle 1
export {}
", json.display()));
        assert_eq!(seed::load(&json).unwrap(), store.snapshot());

        let bare = dir.path().join("snap");
        session(&mut store, &format!("rm 1
rm 2
rm 3
export {}
", bare.display()));
        assert_eq!(store.len(), 1);
        assert_eq!(seed::load(&bare).unwrap(), store.snapshot());
    }
}
