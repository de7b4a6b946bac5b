//! Table Scan Common Library
//!
//! CLIとセッション管理で共有される型とユーティリティ

pub mod types;
pub mod error;
pub mod parser;
pub mod prompts;
pub mod data_url;
pub mod time_ago;
#[cfg(feature = "excel")]
pub mod export;

pub use types::{Scan, Table};
pub use error::{Error, Result};
pub use parser::{extract_json, parse_table_response, parse_table_value};
pub use prompts::{build_table_prompt, table_response_schema};
pub use data_url::{encode_base64, to_data_url};
pub use time_ago::time_ago;
