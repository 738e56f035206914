//! Document parser adapter contract and the parsed-table model used by
//! bulk import.

pub mod error;
pub mod parser;
pub mod types;

pub use error::{DocError, Result};
pub use parser::{CsvParser, DocumentParser};
pub use types::{ColumnMapping, ParsedDocument, ParsedTable};
