use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "table-scan")]
#[command(about = "表画像AI抽出・編集・Excel出力ツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 表画像を解析して履歴に追加
    Scan {
        /// 画像ファイルのパス
        #[arg(required = true)]
        image: PathBuf,

        /// 抽出後にExcelを出力（ファイルまたはディレクトリ）
        #[arg(short, long)]
        export: Option<PathBuf>,

        /// 抽出後に対話式で編集
        #[arg(short = 'E', long)]
        edit: bool,
    },

    /// スキャン履歴の管理
    History {
        #[command(subcommand)]
        action: HistoryAction,
    },

    /// 履歴のスキャンを対話式で編集
    Edit {
        /// スキャンID
        #[arg(required = true)]
        id: String,
    },

    /// 履歴のスキャンをExcelに出力
    Export {
        /// スキャンID
        #[arg(required = true)]
        id: String,

        /// 出力ファイル/ディレクトリ（デフォルト: ./extracted_data.xlsx）
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// 設定を表示/編集
    Config {
        /// APIキーを設定
        #[arg(long)]
        set_api_key: Option<String>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}

#[derive(Subcommand)]
pub enum HistoryAction {
    /// 履歴一覧（新しい順）
    List,

    /// スキャンの表を表示
    Show {
        #[arg(required = true)]
        id: String,
    },

    /// スキャンを削除
    Delete {
        #[arg(required = true)]
        id: String,
    },

    /// 履歴を全削除
    Clear {
        /// 確認をスキップ
        #[arg(short, long)]
        yes: bool,
    },
}
