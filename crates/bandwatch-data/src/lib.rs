//! Market data sources.

mod csv_source;
mod yahoo;

pub use csv_source::CsvDataSource;
pub use yahoo::YahooDataSource;
