//! エラーケーステスト
//!
//! 各種エラー条件でのエラーハンドリングを検証

use table_scan::error::TableScanError;
use table_scan::gateway::GatewayError;
use table_scan::scanner;
use std::path::Path;
use tempfile::tempdir;

/// 存在しない画像を読み込んだ場合
#[test]
fn test_load_nonexistent_image() {
    let result = scanner::load_image(Path::new("/nonexistent/path/12345.png"));
    assert!(matches!(result, Err(TableScanError::FileNotFound(_))));
}

/// 画像ではないファイルを読み込んだ場合
#[test]
fn test_load_non_image_file() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("notes.txt");
    std::fs::write(&path, "hello").unwrap();

    let result = scanner::load_image(&path);
    assert!(matches!(result, Err(TableScanError::UnsupportedImage(_))));
}

/// TableScanErrorのDisplay実装確認
#[test]
fn test_error_display() {
    let errors = vec![
        TableScanError::Config("テスト設定エラー".to_string()),
        TableScanError::MissingApiKey,
        TableScanError::FileNotFound("test.jpg".to_string()),
        TableScanError::UnsupportedImage("test.txt".to_string()),
        TableScanError::ExtractionEmpty,
        TableScanError::ScanNotFound("abc".to_string()),
        TableScanError::DuplicateScan("abc".to_string()),
        TableScanError::NoActiveTable,
        TableScanError::RowOutOfRange { row: 3, rows: 2 },
        TableScanError::ExcelGeneration("Excel生成エラー".to_string()),
    ];

    for err in errors {
        let display = format!("{}", err);
        assert!(!display.is_empty(), "Error display should not be empty");
    }
}

/// APIキー未設定のメッセージに設定方法が含まれる
#[test]
fn test_missing_api_key_message() {
    let message = TableScanError::MissingApiKey.to_string();
    assert!(message.contains("GEMINI_API_KEY"));
    assert!(message.contains("config --set-api-key"));
}

/// ゲートウェイエラーは利用者向けの文言で表示する
#[test]
fn test_gateway_error_display() {
    let err = TableScanError::from(GatewayError::Unknown("HTTP 500: secret detail".into()));
    let display = err.to_string();
    assert!(display.contains("画像からデータを抽出できませんでした"));
    assert!(!display.contains("secret detail"));

    let err = TableScanError::from(GatewayError::InvalidCredential);
    assert!(err.to_string().contains("APIキーが無効"));
}

/// IOエラーからの変換
#[test]
fn test_io_error_conversion() {
    let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
    let err: TableScanError = io_err.into();
    assert!(matches!(err, TableScanError::Io(_)));
}

/// JSONエラーからの変換
#[test]
fn test_json_error_conversion() {
    let json_err = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
    let err: TableScanError = json_err.into();
    assert!(matches!(err, TableScanError::JsonParse(_)));
}
