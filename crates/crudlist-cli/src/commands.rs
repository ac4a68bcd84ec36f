//! CLI command implementations

use crate::{render, shell};
use anyhow::{Result, bail};
use colored::Colorize;
use crudlist_core::{Config, Form, Store, parse_id, seed};
use tracing_subscriber::EnvFilter;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};

/// Everything a command needs: resolved config and the seeded store
pub struct Context {
    pub config_path: PathBuf,
    pub config: Config,
    pub store: Store,
    pub json: bool,
}

impl Context {
    pub fn load(config: Option<&Path>, seed_override: Option<PathBuf>, json: bool) -> Result<Self> {
        let (config_path, config) = Config::discover(config)?;
        init_tracing(&config.log_level);

        if !config.display.colors {
            colored::control::set_override(false);
        }

        let records = match seed_override {
            Some(path) => seed::load(&path)?,
            None => config.initial_records()?,
        };
        tracing::debug!(config = %config_path.display(), records = records.len(), "context ready");

        Ok(Self {
            config_path,
            config,
            store: Store::with_collection(records),
            json,
        })
    }
}

/// Install a stderr subscriber; `RUST_LOG` wins over `default_level`
fn init_tracing(default_level: &str) {
    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| default_level.to_string());
    let filter = EnvFilter::try_new(&filter).unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

pub fn list(ctx: &Context, flag: Option<bool>) -> Result<()> {
    let records: Vec<_> = ctx
        .store
        .records()
        .iter()
        .filter(|r| flag.is_none_or(|f| r.flag == f))
        .collect();

    if ctx.json {
        println!("{}", serde_json::to_string(&records)?);
    } else {
        println!("{}", render::table(records, &ctx.config.display));
    }
    Ok(())
}

pub fn show(ctx: &Context, id: &str) -> Result<()> {
    let record = ctx.store.require(parse_id(id)?)?;

    if ctx.json {
        println!("{}", serde_json::to_string_pretty(record)?);
    } else {
        println!("{}", render::detail(record, &ctx.config.display));
    }
    Ok(())
}

pub fn shell(mut ctx: Context) -> Result<()> {
    let stdin = std::io::stdin();
    let interactive = stdin.is_terminal();
    if interactive {
        println!(
            "{} record(s) loaded. Type {} for commands, {} to leave.",
            ctx.store.len(),
            "help".bold(),
            "quit".bold()
        );
    }
    let mut stdout = std::io::stdout();
    shell::run(
        &mut ctx.store,
        &ctx.config.display,
        stdin.lock(),
        &mut stdout,
        interactive,
    )
}

pub fn member(ctx: &Context, first: &str, last: &str, email: &str) -> Result<()> {
    let mut form = Form::member_join();
    form.fill("first_name", first);
    form.fill("last_name", last);
    form.fill("email", email);

    match form.submit() {
        Ok(values) => {
            if ctx.json {
                let map: serde_json::Map<_, _> = values
                    .into_iter()
                    .map(|(k, v)| (k, serde_json::Value::String(v)))
                    .collect();
                println!("{}", serde_json::json!({ "valid": true, "values": map }));
            } else {
                println!("{} Form is valid", "✓".green());
            }
            Ok(())
        }
        Err(errors) => {
            if ctx.json {
                println!("{}", serde_json::json!({ "valid": false, "errors": errors }));
            } else {
                for error in &errors {
                    println!("{} {}: {}", "✗".red(), error.field, error.message);
                }
            }
            bail!("{} invalid field(s)", errors.len())
        }
    }
}

/// Output JSON schema for config file
pub fn schema() -> Result<()> {
    let schema = serde_json::json!({
        "$schema": "http://json-schema.org/draft-07/schema#",
        "title": "crudlist Configuration",
        "description": "Configuration file for crudlist",
        "type": "object",
        "properties": {
            "seed": {
                "type": ["string", "null"],
                "description": "Seed file loaded at startup (JSON array, keyed JSON object, or JSONL)"
            },
            "demo_seed": {
                "type": "boolean",
                "description": "Start from the demo records when no seed file is set",
                "default": true
            },
            "log_level": {
                "type": "string",
                "description": "CLI log filter when RUST_LOG is unset",
                "default": "warn"
            },
            "api": {
                "type": "object",
                "properties": {
                    "host": {
                        "type": "string",
                        "description": "Address for crudlist-api to bind",
                        "default": "127.0.0.1"
                    },
                    "port": {
                        "type": "integer",
                        "description": "Port for crudlist-api (CRUDLIST_API_PORT overrides)",
                        "minimum": 1,
                        "maximum": 65535,
                        "default": 3848
                    },
                    "log_level": {
                        "type": "string",
                        "description": "Server log filter when RUST_LOG is unset",
                        "default": "info"
                    }
                }
            },
            "display": {
                "type": "object",
                "properties": {
                    "colors": {
                        "type": "boolean",
                        "description": "Use colors in output",
                        "default": true
                    },
                    "show_count": {
                        "type": "boolean",
                        "description": "Show record count in list header",
                        "default": true
                    },
                    "max_title_length": {
                        "type": "integer",
                        "description": "Maximum title length before truncation",
                        "minimum": 10,
                        "default": 60
                    }
                }
            }
        }
    });
    println!("{}", serde_json::to_string_pretty(&schema)?);
    Ok(())
}

/// Show current configuration
pub fn config_show(ctx: &Context) -> Result<()> {
    if ctx.json {
        println!("{}", serde_json::to_string_pretty(&ctx.config)?);
    } else {
        println!("{}", format!("# {}", ctx.config_path.display()).dimmed());
        print!("{}", ctx.config.to_toml()?);
    }
    Ok(())
}

/// Print the config file path in use
pub fn config_path(ctx: &Context) -> Result<()> {
    let exists = ctx.config_path.exists();
    if ctx.json {
        println!(
            "{}",
            serde_json::json!({ "path": ctx.config_path, "exists": exists })
        );
    } else if exists {
        println!("{}", ctx.config_path.display());
    } else {
        println!("{} (not created, using defaults)", ctx.config_path.display());
    }
    Ok(())
}

/// Reset configuration to defaults
pub fn config_reset(ctx: &Context) -> Result<()> {
    if let Some(parent) = ctx.config_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&ctx.config_path, Config::default_with_comments())?;
    println!(
        "{} Configuration reset to defaults at {}",
        "✓".green(),
        ctx.config_path.display()
    );
    Ok(())
}

/// Get a specific config value
pub fn config_get(ctx: &Context, key: &str) -> Result<()> {
    let value = lookup(&serde_json::to_value(&ctx.config)?, key)?;

    if ctx.json {
        println!("{}", serde_json::to_string(&value)?);
    } else {
        match value {
            serde_json::Value::String(s) => println!("{}", s),
            serde_json::Value::Bool(b) => println!("{}", b),
            serde_json::Value::Number(n) => println!("{}", n),
            serde_json::Value::Null => println!("null"),
            other => println!("{}", serde_json::to_string_pretty(&other)?),
        }
    }
    Ok(())
}

/// Walk a dotted key path (e.g. "display.colors") through a JSON value
fn lookup(root: &serde_json::Value, key: &str) -> Result<serde_json::Value> {
    let mut value = root;
    for part in key.split('.') {
        value = value
            .get(part)
            .ok_or_else(|| anyhow::anyhow!("Config key not found: {}", key))?;
    }
    Ok(value.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_nested_key() {
        let config = serde_json::to_value(Config::default()).unwrap();
        assert_eq!(lookup(&config, "api.port").unwrap(), serde_json::json!(3848));
        assert_eq!(lookup(&config, "demo_seed").unwrap(), serde_json::json!(true));
        assert!(lookup(&config, "display.nope").is_err());
    }
}
