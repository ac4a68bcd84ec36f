//! Text rendering for records

use colored::Colorize;
use crudlist_core::Record;
use crudlist_core::config::DisplayConfig;
use tabled::settings::Style;
use tabled::{Table, Tabled};

#[derive(Tabled)]
struct RecordRow {
    #[tabled(rename = "ID")]
    id: u64,
    #[tabled(rename = "State")]
    state: &'static str,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Detail")]
    detail: String,
}

/// Cut `s` to at most `max` characters, marking the cut with an ellipsis
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let keep = max.saturating_sub(1);
    let mut out: String = s.chars().take(keep).collect();
    out.push('…');
    out
}

pub fn table<'a>(records: impl IntoIterator<Item = &'a Record>, display: &DisplayConfig) -> String {
    let rows: Vec<RecordRow> = records
        .into_iter()
        .map(|r| RecordRow {
            id: r.id,
            state: r.flag_label(),
            title: truncate(&r.title, display.max_title_length),
            detail: truncate(&r.detail, display.max_title_length),
        })
        .collect();
    let count = rows.len();

    let mut out = String::new();
    if display.show_count {
        out.push_str(&format!("{} record(s)\n", count));
    }
    if count == 0 {
        out.push_str("No records");
    } else {
        out.push_str(&Table::new(rows).with(Style::rounded()).to_string());
    }
    out
}

pub fn detail(record: &Record, display: &DisplayConfig) -> String {
    let state = if !display.colors {
        record.flag_label().normal()
    } else if record.flag {
        record.flag_label().green()
    } else {
        record.flag_label().white()
    };
    let id = if display.colors {
        record.id.to_string().cyan().bold()
    } else {
        record.id.to_string().normal()
    };
    format!(
        "{} {}\n\nState:  {}\nDetail: {}",
        id, record.title, state, record.detail
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdefghij", 5), "abcd…");
        assert_eq!(truncate("할 일 추가하기", 3), "할 …");
    }

    #[test]
    fn test_table_lists_every_record() {
        let records = vec![Record::new(1, "A", "a"), Record::new(2, "B", "b")];
        let out = table(&records, &DisplayConfig::default());
        assert!(out.starts_with("2 record(s)"));
        assert!(out.contains("open"));
        assert!(out.contains(" B "));
    }

    #[test]
    fn test_empty_table() {
        let out = table(&Vec::<Record>::new(), &DisplayConfig::default());
        assert!(out.ends_with("No records"));
    }
}
