//! Mapping file reader
//!
//! The mapping file is CSV with a header row and exactly two significant
//! columns: an asset file name and a product code. If the first header cell
//! contains the word `asset` (case-insensitive), the first column is the
//! asset name; otherwise the columns are read swapped. Extra columns are
//! ignored.

use std::fs;
use std::path::Path;

use crate::error::{ImportError, ImportResult};
use crate::models::MappingEntry;

/// Read and parse a mapping file from disk
pub fn read_mapping(path: &Path) -> ImportResult<Vec<MappingEntry>> {
    let content = fs::read_to_string(path)?;
    parse_mapping(&content, path)
}

/// Parse mapping content
///
/// Blank lines are skipped. A row missing either value is an error naming
/// the file and 1-based line number.
pub fn parse_mapping(content: &str, file: &Path) -> ImportResult<Vec<MappingEntry>> {
    let mut lines = content.lines().enumerate().map(|(i, l)| (i + 1, l));

    let header = loop {
        match lines.next() {
            Some((_, l)) if l.trim().is_empty() => continue,
            Some((_, l)) => break l,
            None => {
                return Err(ImportError::EmptyMapping {
                    file: file.to_path_buf(),
                })
            }
        }
    };

    let header_fields = split_fields(header);
    if header_fields.len() < 2 {
        return Err(ImportError::MappingHeader {
            file: file.to_path_buf(),
        });
    }
    let asset_first = header_fields[0].to_ascii_lowercase().contains("asset");

    let mut entries = Vec::new();
    for (line_no, line) in lines {
        if line.trim().is_empty() {
            continue;
        }
        let fields = split_fields(line);
        if fields.len() < 2 {
            return Err(ImportError::MappingRow {
                file: file.to_path_buf(),
                line: line_no,
                message: "expected two columns".to_string(),
            });
        }
        let (asset_name, product_code) = if asset_first {
            (&fields[0], &fields[1])
        } else {
            (&fields[1], &fields[0])
        };
        if asset_name.is_empty() {
            return Err(ImportError::MappingRow {
                file: file.to_path_buf(),
                line: line_no,
                message: "empty asset file name".to_string(),
            });
        }
        if product_code.is_empty() {
            return Err(ImportError::MappingRow {
                file: file.to_path_buf(),
                line: line_no,
                message: "empty product code".to_string(),
            });
        }
        entries.push(MappingEntry::new(asset_name.clone(), product_code.clone()));
    }

    Ok(entries)
}

/// Split one CSV line into trimmed fields, honoring double-quoted values
/// with `""` escapes.
fn split_fields(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    current.push('"');
                } else {
                    in_quotes = false;
                }
            }
            '"' => in_quotes = true,
            ',' if !in_quotes => {
                fields.push(current.trim().to_string());
                current.clear();
            }
            _ => current.push(c),
        }
    }
    fields.push(current.trim().to_string());
    fields
}
