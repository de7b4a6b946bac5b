//! APIレスポンスパーサー
//!
//! Gemini APIのレスポンスからJSONを抽出し、表（配列の配列）としてパースする

use crate::error::{Error, Result};
use crate::types::Table;
use serde_json::Value;

/// APIレスポンスからJSON部分を抽出
///
/// 抽出優先順位:
/// 1. ```json ... ``` ブロック
/// 2. 生の [...] 配列
/// 3. エラー
///
/// # Examples
/// ```
/// use table_scan_common::extract_json;
///
/// let response = "結果: [[\"A\", \"B\"]]";
/// let json = extract_json(response).unwrap();
/// assert_eq!(json, "[[\"A\", \"B\"]]");
/// ```
pub fn extract_json(response: &str) -> Result<&str> {
    if let Some(start_marker) = response.find("```json") {
        let start = start_marker + 7; // "```json" の長さ
        if let Some(end_offset) = response[start..].find("```") {
            let end = start + end_offset;
            return Ok(response[start..end].trim());
        }
    }

    if let Some(start) = response.find('[') {
        if let Some(end) = response.rfind(']') {
            if end >= start {
                return Ok(&response[start..=end]);
            }
        }
    }

    Err(Error::Parse("JSONが見つかりません".into()))
}

/// 表レスポンスをパース
///
/// # Returns
/// * `Ok(Table)` - 配列の配列として解釈できた場合（空配列も成功）
/// * `Err(Error::Parse)` - JSONが無い、または形が配列の配列でない場合
pub fn parse_table_response(response: &str) -> Result<Table> {
    let json_str = extract_json(response)?;
    let value: Value = serde_json::from_str(json_str.trim())
        .map_err(|e| Error::Parse(format!("表JSONパースエラー: {}", e)))?;
    parse_table_value(&value)
}

/// JSON値を表に変換
///
/// 数値・真偽値は文字列化し、nullは空セルとして扱う。
pub fn parse_table_value(value: &Value) -> Result<Table> {
    let rows = value
        .as_array()
        .ok_or_else(|| Error::Parse("最上位が配列ではありません".into()))?;

    let mut table = Vec::with_capacity(rows.len());
    for (r, row) in rows.iter().enumerate() {
        let cells = row
            .as_array()
            .ok_or_else(|| Error::Parse(format!("{}行目が配列ではありません", r + 1)))?;

        let mut out = Vec::with_capacity(cells.len());
        for (c, cell) in cells.iter().enumerate() {
            let text = match cell {
                Value::String(s) => s.clone(),
                Value::Number(n) => n.to_string(),
                Value::Bool(b) => b.to_string(),
                Value::Null => String::new(),
                Value::Array(_) | Value::Object(_) => {
                    return Err(Error::Parse(format!(
                        "{}行{}列目が文字列ではありません",
                        r + 1,
                        c + 1
                    )));
                }
            };
            out.push(text);
        }
        table.push(out);
    }

    Ok(Table::new(table))
}
