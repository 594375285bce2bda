//! Output formatting for the explorer commands.
//!
//! Human output is colored when stdout is a terminal; `--json` output is plain.

use colored::Colorize;
use serde_json::json;
use type_explorer::{TypeCategory, TypeDescriptor, TypeRegistrySnapshot};

/// Type counts per category.
pub fn summary(snapshot: &TypeRegistrySnapshot, as_json: bool) -> Result<String, serde_json::Error> {
    let counts = TypeCategory::ALL
        .into_iter()
        .map(|category| (category, snapshot.category(category).map_or(0, |types| types.len())));

    if as_json {
        let value: serde_json::Map<String, serde_json::Value> = counts
            .map(|(category, count)| (category.wire_key().to_owned(), json!(count)))
            .collect();
        return serde_json::to_string_pretty(&value);
    }

    let rows: String = counts
        .map(|(category, count)| format!("  {:<16}{count}\n", format!("{category}:")))
        .collect();
    Ok(format!("{}\n{rows}", "TYPE SYSTEM".bold()))
}

/// Type names of one category, one per line.
pub fn list(category: TypeCategory, names: &[String], as_json: bool) -> Result<String, serde_json::Error> {
    if as_json {
        return serde_json::to_string_pretty(names);
    }
    if names.is_empty() {
        return Ok(format!("{}\n", format!("no {category} types loaded").yellow()));
    }
    Ok(names.iter().map(|name| format!("{name}\n")).collect())
}

/// A single descriptor. Text mode prints the description above the raw JSON.
pub fn descriptor(
    name: &str,
    descriptor: &TypeDescriptor,
    as_json: bool,
) -> Result<String, serde_json::Error> {
    let body = serde_json::to_string_pretty(descriptor.as_json())?;
    if as_json {
        return Ok(body);
    }

    let description = descriptor
        .description()
        .map(|text| format!("{text}\n"))
        .unwrap_or_default();
    Ok(format!("{}\n{description}\n{body}\n", name.bold()))
}
