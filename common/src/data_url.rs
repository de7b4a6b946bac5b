//! Data URLユーティリティ
//!
//! 履歴の画像は元ファイルなしで表示できるよう Data URL で保持する。

use base64::{engine::general_purpose::STANDARD, Engine as _};

/// バイト列を標準Base64に変換
pub fn encode_base64(data: &[u8]) -> String {
    STANDARD.encode(data)
}

/// バイト列から Data URL を生成
pub fn to_data_url(mime_type: &str, data: &[u8]) -> String {
    format!("data:{};base64,{}", mime_type, encode_base64(data))
}
