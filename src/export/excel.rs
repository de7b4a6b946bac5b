//! Excel生成（CLI版）
//!
//! 共通ライブラリでバッファを作り、ファイルに書き出す

use crate::error::{Result, TableScanError};
use std::path::Path;
use table_scan_common::export::{generate_table_buffer, DEFAULT_SHEET_NAME};
use table_scan_common::Table;
use tracing::debug;

pub fn generate_excel(table: &Table, output_path: &Path) -> Result<()> {
    let buffer = generate_table_buffer(table, DEFAULT_SHEET_NAME)
        .map_err(TableScanError::ExcelGeneration)?;

    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(output_path, &buffer)?;
    debug!(path = %output_path.display(), bytes = buffer.len(), "Excel出力");
    Ok(())
}
