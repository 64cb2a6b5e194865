//! Data model for tabular data representation

mod number;
mod schema;
mod table;

pub use number::{Number, Sign};
pub use schema::{CellType, Column};
pub use table::{CellValue, Row, Table};
