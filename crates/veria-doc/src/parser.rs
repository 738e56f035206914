use async_trait::async_trait;

use veria_core::FileKind;

use crate::error::{DocError, Result};
use crate::types::{ParsedDocument, ParsedTable};

/// Contract for document parsing collaborators.
///
/// Spreadsheet/word/pdf engines live with the deployment; the core only
/// needs structured text and tables back.
#[async_trait]
pub trait DocumentParser: Send + Sync {
    async fn parse(&self, data: &[u8], kind: FileKind) -> Result<ParsedDocument>;
}

/// Built-in parser for CSV spreadsheets.
///
/// Covers the common bulk-import path without an external engine; other
/// kinds are rejected as unsupported. Handles double-quoted fields with
/// embedded commas and doubled quotes.
#[derive(Debug, Default)]
pub struct CsvParser;

#[async_trait]
impl DocumentParser for CsvParser {
    async fn parse(&self, data: &[u8], kind: FileKind) -> Result<ParsedDocument> {
        if kind != FileKind::Spreadsheet {
            return Err(DocError::Unsupported(format!("{kind:?}")));
        }
        let text = String::from_utf8_lossy(data);
        let mut lines = text.lines().filter(|l| !l.trim().is_empty());

        let header = lines.next().ok_or(DocError::Empty)?;
        let columns = split_csv_line(header);
        if columns.is_empty() {
            return Err(DocError::Empty);
        }

        let mut rows = Vec::new();
        for line in lines {
            let mut row = split_csv_line(line);
            row.resize(columns.len(), String::new());
            rows.push(row);
        }

        Ok(ParsedDocument {
            text: text.to_string(),
            tables: vec![ParsedTable { columns, rows }],
        })
    }
}

fn split_csv_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    field.push('"');
                } else {
                    in_quotes = false;
                }
            }
            '"' => in_quotes = true,
            ',' if !in_quotes => {
                fields.push(field.trim().to_string());
                field.clear();
            }
            _ => field.push(c),
        }
    }
    fields.push(field.trim().to_string());
    fields
}
