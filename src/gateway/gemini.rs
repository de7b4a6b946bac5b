//! Gemini API連携
//!
//! 画像と表抽出プロンプトを送り、JSONスキーマ付きで配列の配列を受け取る。

use super::{ExtractionGateway, GatewayError, ImageInput};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use table_scan_common::{
    build_table_prompt, encode_base64, parse_table_response, table_response_schema, Table,
};
use tracing::{debug, warn};

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// APIキーはURLに載せずヘッダーで渡す
const API_KEY_HEADER: &str = "x-goog-api-key";

/// Gemini APIリクエスト
#[derive(Serialize)]
struct GeminiRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum Part {
    InlineData { inline_data: InlineData },
    Text { text: String },
}

#[derive(Serialize)]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Serialize)]
struct GenerationConfig {
    #[serde(rename = "responseMimeType")]
    response_mime_type: String,
    #[serde(rename = "responseSchema")]
    response_schema: serde_json::Value,
}

/// Gemini APIレスポンス
#[derive(Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<ResponseContent>,
}

#[derive(Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: String,
}

/// エラーレスポンス
#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
}

pub struct GeminiGateway {
    client: reqwest::Client,
    api_key: String,
    model: String,
}

impl GeminiGateway {
    pub fn new(api_key: String, model: String, timeout: Duration) -> Result<Self, GatewayError> {
        if api_key.trim().is_empty() {
            return Err(GatewayError::Configuration);
        }
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GatewayError::Unknown(format!("HTTPクライアント生成エラー: {}", e)))?;
        Ok(Self { client, api_key, model })
    }

    fn endpoint(&self) -> String {
        format!("{}/{}:generateContent", GEMINI_API_BASE, self.model)
    }
}

#[async_trait]
impl ExtractionGateway for GeminiGateway {
    async fn extract(&self, image: &ImageInput) -> Result<Table, GatewayError> {
        let request = build_request(image);
        debug!(model = %self.model, bytes = image.data.len(), "Gemini APIへ送信");

        let response = self
            .client
            .post(self.endpoint())
            .header(API_KEY_HEADER, self.api_key.as_str())
            .json(&request)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(transport_error)?;

        if !status.is_success() {
            warn!(status = status.as_u16(), "Gemini APIエラー");
            return Err(classify_failure(status.as_u16(), &body));
        }

        debug!(chars = body.len(), "Gemini APIレスポンス受信");
        parse_generate_response(&body)
    }
}

fn build_request(image: &ImageInput) -> GeminiRequest {
    GeminiRequest {
        contents: vec![Content {
            parts: vec![
                Part::InlineData {
                    inline_data: InlineData {
                        mime_type: image.mime_type.clone(),
                        data: encode_base64(&image.data),
                    },
                },
                Part::Text { text: build_table_prompt() },
            ],
        }],
        generation_config: GenerationConfig {
            response_mime_type: "application/json".to_string(),
            response_schema: table_response_schema(),
        },
    }
}

/// generateContent のレスポンス本文から表を取り出す
fn parse_generate_response(body: &str) -> Result<Table, GatewayError> {
    let response: GeminiResponse = serde_json::from_str(body)
        .map_err(|e| GatewayError::Unknown(format!("レスポンス解析エラー: {}", e)))?;

    let text: String = response
        .candidates
        .first()
        .and_then(|c| c.content.as_ref())
        .map(|c| c.parts.iter().map(|p| p.text.as_str()).collect())
        .unwrap_or_default();

    // 候補なし・空テキストは空の表として扱う
    if text.trim().is_empty() {
        return Ok(Table::default());
    }

    parse_table_response(&text).map_err(|e| GatewayError::InvalidResponseShape(e.to_string()))
}

/// 通信エラー（メッセージにURLを含めない）
fn transport_error(e: reqwest::Error) -> GatewayError {
    GatewayError::Unknown(e.without_url().to_string())
}

/// HTTPエラーを分類
fn classify_failure(status: u16, body: &str) -> GatewayError {
    let message = serde_json::from_str::<ErrorEnvelope>(body)
        .map(|e| e.error.message)
        .unwrap_or_else(|_| body.to_string());

    match GatewayError::from_message(&message) {
        GatewayError::Unknown(_) if status == 401 || status == 403 => GatewayError::InvalidCredential,
        GatewayError::Unknown(msg) => GatewayError::Unknown(format!("HTTP {}: {}", status, msg)),
        other => other,
    }
}
