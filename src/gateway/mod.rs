//! 表抽出ゲートウェイ
//!
//! 画像から表を取り出す外部サービスとの境界。
//! セッション側はこのトレイトだけに依存し、テストでは偽の実装に差し替える。

pub mod gemini;

pub use gemini::GeminiGateway;

use async_trait::async_trait;
use table_scan_common::{to_data_url, Table};
use thiserror::Error;

/// 抽出対象の画像
#[derive(Debug, Clone)]
pub struct ImageInput {
    pub file_name: String,
    pub mime_type: String,
    pub data: Vec<u8>,
}

impl ImageInput {
    /// 履歴に保存する Data URL
    pub fn data_url(&self) -> String {
        to_data_url(&self.mime_type, &self.data)
    }
}

/// ゲートウェイの失敗
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    #[error("APIキーが設定されていません")]
    Configuration,

    #[error("AIの応答形式が不正: {0}")]
    InvalidResponseShape(String),

    #[error("APIキーが無効です")]
    InvalidCredential,

    #[error("不明なエラー: {0}")]
    Unknown(String),
}

impl GatewayError {
    /// 生のエラーメッセージから分類
    pub fn from_message(message: &str) -> Self {
        if message.contains("API key not valid") || message.contains("API key is invalid") {
            GatewayError::InvalidCredential
        } else {
            GatewayError::Unknown(message.to_string())
        }
    }

    /// 利用者に表示するメッセージ
    ///
    /// 不明なエラーは内部の詳細を出さず定型文にする。
    pub fn user_message(&self) -> String {
        match self {
            GatewayError::Configuration => {
                "APIキーが設定されていません。AIサービスと通信できません".to_string()
            }
            GatewayError::InvalidResponseShape(_) => {
                "AIの応答が想定した形式（文字列の配列の配列）ではありませんでした".to_string()
            }
            GatewayError::InvalidCredential => {
                "設定されたAPIキーが無効です。設定を確認してください".to_string()
            }
            GatewayError::Unknown(_) => {
                "画像からデータを抽出できませんでした。AIモデルが処理できなかったか、APIキーに問題がある可能性があります"
                    .to_string()
            }
        }
    }
}

#[async_trait]
pub trait ExtractionGateway: Send + Sync {
    async fn extract(&self, image: &ImageInput) -> Result<Table, GatewayError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_message_detects_invalid_key() {
        assert_eq!(
            GatewayError::from_message("API key not valid. Please pass a valid API key."),
            GatewayError::InvalidCredential
        );
        assert_eq!(
            GatewayError::from_message("The API key is invalid"),
            GatewayError::InvalidCredential
        );
    }

    #[test]
    fn test_from_message_unknown() {
        let err = GatewayError::from_message("connection reset");
        assert_eq!(err, GatewayError::Unknown("connection reset".into()));
    }

    #[test]
    fn test_unknown_message_is_generic() {
        let msg = GatewayError::Unknown("internal trace 0x1234".into()).user_message();
        assert!(!msg.contains("0x1234"));
    }

    #[test]
    fn test_image_input_data_url() {
        let image = ImageInput {
            file_name: "t.png".into(),
            mime_type: "image/png".into(),
            data: b"abc".to_vec(),
        };
        assert_eq!(image.data_url(), "data:image/png;base64,YWJj");
    }
}
