use crate::gateway::GatewayError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TableScanError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("APIキーが設定されていません。環境変数 GEMINI_API_KEY を設定するか `table-scan config --set-api-key YOUR_KEY` で設定してください")]
    MissingApiKey,

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("対応していない画像形式です: {0}")]
    UnsupportedImage(String),

    #[error("表データを抽出できませんでした。画像に明確な表が含まれていないか、形式がサポートされていない可能性があります")]
    ExtractionEmpty,

    #[error("{}", .0.user_message())]
    Extraction(#[from] GatewayError),

    #[error("スキャンが見つかりません: {0}")]
    ScanNotFound(String),

    #[error("スキャンIDが重複しています: {0}")]
    DuplicateScan(String),

    #[error("表が読み込まれていません")]
    NoActiveTable,

    #[error("行番号が範囲外です: {row}（行数: {rows}）")]
    RowOutOfRange { row: usize, rows: usize },

    #[error("Excel生成エラー: {0}")]
    ExcelGeneration(String),

    #[error("入力エラー: {0}")]
    Prompt(String),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, TableScanError>;
