//! 表画像をAIで抽出し、編集してExcelに出力するツール

pub mod cli;
pub mod config;
pub mod editor;
pub mod error;
pub mod export;
pub mod gateway;
pub mod history;
pub mod render;
pub mod scanner;
pub mod session;
