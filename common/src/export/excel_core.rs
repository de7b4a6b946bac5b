//! Excel生成（共通ライブラリ）
//!
//! 表をそのままのグリッドとして1シートに書き出す。
//! 見出し推定や型変換は行わず、すべてのセルを文字列として書き込む。

use crate::types::Table;
use rust_xlsxwriter::Workbook;

/// 出力シート名
pub const DEFAULT_SHEET_NAME: &str = "Sheet1";

/// 表をExcelバッファに生成
///
/// # Arguments
/// * `table` - 出力する表（行ごとの列数は不揃いでもよい）
/// * `sheet_name` - シート名
pub fn generate_table_buffer(table: &Table, sheet_name: &str) -> Result<Vec<u8>, String> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet
        .set_name(sheet_name)
        .map_err(|e| format!("シート名設定エラー: {}", e))?;

    for (r, row) in table.rows().iter().enumerate() {
        let row_num = u32::try_from(r).map_err(|_| format!("行数が上限を超えています: {}", r))?;
        for (c, value) in row.iter().enumerate() {
            let col_num = u16::try_from(c).map_err(|_| format!("列数が上限を超えています: {}", c))?;
            worksheet
                .write_string(row_num, col_num, value)
                .map_err(|e| format!("セル書き込みエラー: {}", e))?;
        }
    }

    workbook
        .save_to_buffer()
        .map_err(|e| format!("Excel保存エラー: {}", e))
}
