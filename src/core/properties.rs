// src/core/properties.rs

use crate::constants::PROBE_NOT_FOUND_CODE;
use std::path::PathBuf;

/// Marker appended to a truncated summary cell.
const ELLIPSIS: char = '…';
const MISSING: &str = "-";

/// Builds the shell snippet run inside a target: prints the first candidate
/// file that exists, or exits with [`PROBE_NOT_FOUND_CODE`].
pub fn probe_script(paths: &[PathBuf]) -> String {
    let quoted: Vec<String> = paths
        .iter()
        .map(|p| {
            let raw = p.display().to_string();
            shlex::try_quote(&raw).map_or(raw.clone(), |q| q.into_owned())
        })
        .collect();
    format!(
        "for f in {}; do if [ -f \"$f\" ]; then cat \"$f\"; exit 0; fi; done; exit {}",
        quoted.join(" "),
        PROBE_NOT_FOUND_CODE
    )
}

/// Parses simple `key=value` lines. Blank lines and `#`/`!` comments are skipped,
/// lines without `=` are ignored. Order of first appearance is kept; a repeated
/// key overwrites the earlier value in place.
pub fn parse(text: &str) -> Vec<(String, String)> {
    let mut pairs: Vec<(String, String)> = Vec::new();
    for line in text.lines().map(str::trim) {
        if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
            continue;
        }
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        let (key, value) = (key.trim().to_string(), value.trim().to_string());
        match pairs.iter_mut().find(|(k, _)| *k == key) {
            Some(existing) => existing.1 = value,
            None => pairs.push((key, value)),
        }
    }
    pairs
}

/// Value of `key`, if the file had it.
pub fn lookup<'a>(pairs: &'a [(String, String)], key: &str) -> Option<&'a str> {
    pairs
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
}

/// Properties collected from one target. `None` when no candidate file existed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetProperties {
    /// Service name.
    pub target: String,
    /// Parsed pairs in file order.
    pub pairs: Option<Vec<(String, String)>>,
}

/// Renders the column-aligned summary.
///
/// Every column is as wide as its widest cell. The `capped_key` column is cut
/// to `max_width` characters, the last one replaced by `…`.
pub fn render_summary(
    rows: &[TargetProperties],
    keys: &[String],
    capped_key: &str,
    max_width: usize,
) -> String {
    let mut headers = vec!["SERVICE".to_string()];
    headers.extend(keys.iter().map(|k| k.to_uppercase()));

    let table: Vec<Vec<String>> = rows
        .iter()
        .map(|row| {
            let mut cells = vec![row.target.clone()];
            for key in keys {
                let value = row
                    .pairs
                    .as_deref()
                    .and_then(|pairs| lookup(pairs, key))
                    .filter(|v| !v.is_empty())
                    .unwrap_or(MISSING);
                if key == capped_key {
                    cells.push(truncate(value, max_width));
                } else {
                    cells.push(value.to_string());
                }
            }
            cells
        })
        .collect();

    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for cells in &table {
        for (width, cell) in widths.iter_mut().zip(cells) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    for cells in std::iter::once(&headers).chain(&table) {
        let line: Vec<String> = cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| pad(cell, *width))
            .collect();
        out.push_str(line.join("  ").trim_end());
        out.push('\n');
    }
    out
}

fn pad(cell: &str, width: usize) -> String {
    let fill = width.saturating_sub(cell.chars().count());
    format!("{}{}", cell, " ".repeat(fill))
}

fn truncate(value: &str, max_width: usize) -> String {
    if value.chars().count() <= max_width || max_width == 0 {
        return value.to_string();
    }
    let mut cut: String = value.chars().take(max_width.saturating_sub(1)).collect();
    cut.push(ELLIPSIS);
    cut
}
