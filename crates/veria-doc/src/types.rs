use serde::{Deserialize, Serialize};

/// Structured content extracted from one document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParsedDocument {
    /// Free text (word/pdf body, or a flattened sheet rendering).
    pub text: String,
    /// Tabular content; spreadsheets yield one table per sheet.
    pub tables: Vec<ParsedTable>,
}

impl ParsedDocument {
    /// The first table with at least one data row, if any.
    pub fn primary_table(&self) -> Option<&ParsedTable> {
        self.tables.iter().find(|t| !t.rows.is_empty())
    }
}

/// One table of a parsed document: a header row plus data rows.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParsedTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Column indices relevant to bulk object import, inferred from the
/// header row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMapping {
    pub name: usize,
    pub description: Option<usize>,
    pub subtype: Option<usize>,
}

impl ParsedTable {
    /// Infer which columns hold the object name, description, and
    /// subtype. Returns `None` when no plausible name column exists.
    pub fn column_mapping(&self) -> Option<ColumnMapping> {
        let find = |keywords: &[&str]| {
            self.columns.iter().position(|c| {
                let lower = c.to_lowercase();
                keywords.iter().any(|k| lower.contains(k))
            })
        };

        let name = find(&["name", "asset", "title"])?;
        let description = find(&["description", "desc", "details", "comment"]);
        let subtype = find(&["subtype", "type", "category"]).filter(|&i| i != name);

        Some(ColumnMapping {
            name,
            description,
            subtype,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(columns: &[&str]) -> ParsedTable {
        ParsedTable {
            columns: columns.iter().map(|s| s.to_string()).collect(),
            rows: vec![vec!["x".to_string(); columns.len()]],
        }
    }

    #[test]
    fn test_column_mapping_full() {
        let mapping = table(&["Asset Name", "Description", "Asset Type"])
            .column_mapping()
            .unwrap();
        assert_eq!(mapping.name, 0);
        assert_eq!(mapping.description, Some(1));
        assert_eq!(mapping.subtype, Some(2));
    }

    #[test]
    fn test_column_mapping_name_only() {
        let mapping = table(&["Name"]).column_mapping().unwrap();
        assert_eq!(mapping.name, 0);
        assert_eq!(mapping.description, None);
        assert_eq!(mapping.subtype, None);
    }

    #[test]
    fn test_column_mapping_no_name_column() {
        assert!(table(&["Id", "Owner"]).column_mapping().is_none());
    }

    #[test]
    fn test_column_mapping_type_column_never_shadows_name() {
        // "Asset Type" matches both the name and subtype keyword lists;
        // the name match wins and subtype picks a different column.
        let mapping = table(&["Asset Type", "Details"]).column_mapping().unwrap();
        assert_eq!(mapping.name, 0);
        assert_eq!(mapping.subtype, None);
        assert_eq!(mapping.description, Some(1));
    }

    #[test]
    fn test_primary_table_skips_empty() {
        let doc = ParsedDocument {
            text: String::new(),
            tables: vec![
                ParsedTable {
                    columns: vec!["Name".to_string()],
                    rows: vec![],
                },
                ParsedTable {
                    columns: vec!["Name".to_string()],
                    rows: vec![vec!["Server".to_string()]],
                },
            ],
        };
        assert_eq!(doc.primary_table().unwrap().rows.len(), 1);
    }
}
