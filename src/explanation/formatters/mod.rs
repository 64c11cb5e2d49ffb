pub mod markdown;
pub mod json;
pub mod geojson;
pub mod csv;

pub use markdown::MarkdownFormatter;
pub use json::JsonFormatter;
pub use geojson::GeoJsonFormatter;
pub use csv::{CsvFormatter, CSV_HEADER};
