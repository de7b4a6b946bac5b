pub mod excel;

use crate::error::Result;
use std::path::{Path, PathBuf};
use table_scan_common::Table;

/// 既定の出力ファイル名（拡張子なし）
pub const DEFAULT_FILE_STEM: &str = "extracted_data";

/// 出力先を決める
///
/// ディレクトリまたは拡張子なしのパスなら `extracted_data.xlsx` を付ける。
/// 他の拡張子は `.xlsx` に置き換える。
pub fn output_path(output: &Path) -> PathBuf {
    match output.extension() {
        _ if output.is_dir() => output.join(format!("{}.xlsx", DEFAULT_FILE_STEM)),
        None => output.join(format!("{}.xlsx", DEFAULT_FILE_STEM)),
        Some(ext) if ext.eq_ignore_ascii_case("xlsx") => output.to_path_buf(),
        Some(_) => output.with_extension("xlsx"),
    }
}

/// 表をExcelに出力して、書き込んだパスを返す
pub fn export_table(table: &Table, output: &Path) -> Result<PathBuf> {
    let path = output_path(output);
    excel::generate_excel(table, &path)?;
    Ok(path)
}
