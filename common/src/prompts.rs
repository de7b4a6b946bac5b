//! プロンプト生成モジュール
//!
//! 表抽出用のプロンプトとレスポンススキーマ

use serde_json::{json, Value};

/// 表抽出プロンプト
pub fn build_table_prompt() -> String {
    r#"Analyze the image and extract all tabular data.
Respond with ONLY a valid JSON object that is an array of arrays.
Each inner array should represent a row in the table.
Each element in the inner array should be a string representing a cell's content.
Do not include headers if they are just merged cells or part of the image's title. Capture the actual data rows.
Do not include any markdown formatting or any other text in your response. Just the JSON."#
        .to_string()
}

/// 文字列の配列の配列を要求するレスポンススキーマ
pub fn table_response_schema() -> Value {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "ARRAY",
            "items": { "type": "STRING" }
        }
    })
}
