pub mod aggregate;
pub mod config;
pub mod engine;
pub mod error;
pub mod extract;
pub mod payload;
pub mod progress;
pub mod scanner;
pub mod summary;
pub mod table;

pub use aggregate::{aggregate, AggregateResult, FunctionCount};
pub use crate::config::AppConfig;
pub use engine::{ScanEngine, ScanReport, ScanTotals};
pub use error::{Error, Result};
pub use extract::extract_function_names;
pub use payload::{decode, DecodedPayload};
pub use progress::{ProgressReporter, SilentReporter};
pub use scanner::scan_directory;
pub use summary::{summarize_csv, CsvSummary, FUNCTION_LIST_COLUMN};
