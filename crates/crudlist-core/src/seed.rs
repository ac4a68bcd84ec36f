//! Seed import and snapshot export
//!
//! Accepted inputs:
//! - a JSON array of records
//! - a JSON object keyed by record ID (`{"1": {"title": ..}}`); entries
//!   whose key is not numeric and that carry no `id` get a fresh one
//! - a single JSON record object
//! - JSONL, one record per line
//!
//! Keyed objects are read in the order a browser walks them: keys that are
//! array indices (`"0"`, `"2"`, `"10"`) first in numeric order, every other
//! key after them in document order.
//!
//! Board tasks carry only `text`; it fills whichever of title and detail
//! is missing. Every record is checked with [`validate_record_input`]
//! before it is accepted, so a seed can never bring in a blank title or
//! detail.
//!
//! None of this is a persistence layer; a seed is read once and an export
//! is a point-in-time dump.

use crate::{Collection, Error, IdGenerator, Record, Result, lowest_unused, validate_record_input};
use serde::Deserialize;
use std::collections::BTreeSet;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

/// On-disk shape of a seed file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedFormat {
    /// Array, keyed object, or single record
    Json,
    /// One record per line
    Jsonl,
}

impl SeedFormat {
    /// Format implied by the file extension, if it names one
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "jsonl" | "ndjson" => Some(SeedFormat::Jsonl),
            "json" => Some(SeedFormat::Json),
            _ => None,
        }
    }

    /// Pick a format from the file extension, then from the content
    pub fn detect(path: Option<&Path>, content: &str) -> Self {
        if let Some(format) = path.and_then(Self::from_path) {
            return format;
        }
        match content.trim_start().chars().next() {
            Some('[') => SeedFormat::Json,
            Some('{') if looks_like_single_document(content) => SeedFormat::Json,
            _ => SeedFormat::Jsonl,
        }
    }
}

fn looks_like_single_document(content: &str) -> bool {
    content.lines().filter(|l| !l.trim().is_empty()).count() <= 1
        || serde_json::from_str::<serde_json::Value>(content).is_ok()
}

/// Loose record shape shared by every seed format
#[derive(Debug, Deserialize)]
struct SeedEntry {
    #[serde(default)]
    id: Option<u64>,
    #[serde(default, alias = "todo")]
    title: Option<String>,
    #[serde(default)]
    text: Option<String>,
    #[serde(default, alias = "desc")]
    detail: Option<String>,
    #[serde(default, alias = "done")]
    flag: bool,
}

/// An entry waiting for its ID, with where it came from for error messages
struct Pending {
    location: String,
    id: Option<u64>,
    entry: SeedEntry,
}

impl Pending {
    fn from_value(location: String, value: serde_json::Value, key_id: Option<u64>) -> Result<Self> {
        let entry: SeedEntry = serde_json::from_value(value)
            .map_err(|e| Error::Seed(format!("{location}: {e}")))?;
        Ok(Self {
            id: entry.id.or(key_id),
            location,
            entry,
        })
    }
}

/// Parse seed content in the given format
pub fn parse(content: &str, format: SeedFormat) -> Result<Collection> {
    let pending = match format {
        SeedFormat::Jsonl => parse_jsonl(content)?,
        SeedFormat::Json => match serde_json::from_str::<serde_json::Value>(content)? {
            serde_json::Value::Array(items) => items
                .into_iter()
                .enumerate()
                .map(|(i, item)| Pending::from_value(format!("record at index {i}"), item, None))
                .collect::<Result<Vec<_>>>()?,
            serde_json::Value::Object(map) if map.values().any(|v| !v.is_object()) => {
                vec![Pending::from_value(
                    "record".to_string(),
                    serde_json::Value::Object(map),
                    None,
                )?]
            }
            serde_json::Value::Object(map) => parse_keyed(map)?,
            serde_json::Value::Null => Vec::new(),
            other => {
                return Err(Error::Seed(format!(
                    "expected an array or object, found {}",
                    json_kind(&other)
                )));
            }
        },
    };
    Collection::from_records(assemble(pending)?)
}

fn parse_jsonl(content: &str) -> Result<Vec<Pending>> {
    let mut pending = Vec::new();
    for (n, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let location = format!("line {}", n + 1);
        let value: serde_json::Value = serde_json::from_str(line)
            .map_err(|e| Error::Seed(format!("{location}: {e}")))?;
        pending.push(Pending::from_value(location, value, None)?);
    }
    Ok(pending)
}

/// Array-index keys sort numerically ahead of all other keys
fn array_index(key: &str) -> Option<u32> {
    key.parse::<u32>()
        .ok()
        .filter(|n| *n != u32::MAX && n.to_string() == key)
}

fn parse_keyed(map: serde_json::Map<String, serde_json::Value>) -> Result<Vec<Pending>> {
    let mut keyed: Vec<(String, serde_json::Value)> = map.into_iter().collect();
    keyed.sort_by_key(|(key, _)| match array_index(key) {
        Some(n) => (false, n),
        None => (true, 0),
    });

    keyed
        .into_iter()
        .map(|(key, value)| {
            let key_id = key.parse::<u64>().ok();
            Pending::from_value(format!("entry {key}"), value, key_id)
        })
        .collect()
}

/// Hand out IDs to entries without one and validate every record
fn assemble(pending: Vec<Pending>) -> Result<Vec<Record>> {
    let mut ids = IdGenerator::new();
    let mut taken: BTreeSet<u64> = pending.iter().filter_map(|p| p.id).collect();
    if let Some(max) = taken.last() {
        ids.observe(*max);
    }

    let mut records = Vec::with_capacity(pending.len());
    for Pending { location, id, entry } in pending {
        let id = match id {
            Some(id) => id,
            None => {
                let id = match ids.next_id() {
                    Some(id) => id,
                    None => lowest_unused(taken.iter().copied()).ok_or(Error::IdsExhausted)?,
                };
                taken.insert(id);
                id
            }
        };

        let title = entry.title.or_else(|| entry.text.clone()).unwrap_or_default();
        let detail = entry.detail.or(entry.text).unwrap_or_default();
        validate_record_input(&title, &detail)
            .map_err(|e| Error::Seed(format!("{location}: {e}")))?;

        records.push(Record {
            id,
            title,
            detail,
            flag: entry.flag,
        });
    }
    Ok(records)
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

/// Load a seed file
pub fn load(path: &Path) -> Result<Collection> {
    let content = fs::read_to_string(path)?;
    let format = SeedFormat::detect(Some(path), &content);
    let records = parse(&content, format)?;
    tracing::info!(path = %path.display(), count = records.len(), "seed loaded");
    Ok(records)
}

/// Write a collection as JSONL
pub fn write_jsonl<W: Write>(records: &Collection, writer: W) -> Result<()> {
    let mut writer = BufWriter::new(writer);
    for record in records {
        serde_json::to_writer(&mut writer, record)?;
        writeln!(writer)?;
    }
    writer.flush()?;
    Ok(())
}

/// Write a collection as a pretty-printed JSON array
pub fn write_json<W: Write>(records: &Collection, writer: W) -> Result<()> {
    let mut writer = BufWriter::new(writer);
    serde_json::to_writer_pretty(&mut writer, records)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

/// Export a collection to `path`
///
/// `.json` gets a JSON array; `.jsonl`, `.ndjson` and anything else get
/// JSONL. Either way [`load`] reads the file back to an equal collection.
pub fn save(path: &Path, records: &Collection) -> Result<()> {
    let format = SeedFormat::from_path(path).unwrap_or(SeedFormat::Jsonl);
    let file = File::create(path)?;
    match format {
        SeedFormat::Json => write_json(records, file)?,
        SeedFormat::Jsonl => write_jsonl(records, file)?,
    }
    tracing::info!(path = %path.display(), count = records.len(), ?format, "snapshot exported");
    Ok(())
}

/// Collection as a JSON object keyed by record ID, in collection order
pub fn to_keyed(records: &Collection) -> serde_json::Value {
    let map = records
        .iter()
        .map(|r| {
            (
                r.id.to_string(),
                serde_json::json!({ "title": r.title, "detail": r.detail, "flag": r.flag }),
            )
        })
        .collect::<serde_json::Map<_, _>>();
    serde_json::Value::Object(map)
}
