//! スキャン結果の型定義
//!
//! CLIとセッション管理で共有される型:
//! - Table: 抽出された表（文字列セルの行の並び）
//! - Scan: 履歴に保存される1回分のスキャン記録

use serde::{Deserialize, Serialize};

/// 抽出された表
///
/// 行ごとに列数が異なってもよい（表示・出力時に最大列数へ揃える）。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Table {
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(rows: Vec<Vec<String>>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// 最長の行の列数
    pub fn column_count(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// セル値を取得（範囲外は空文字）
    pub fn cell(&self, row: usize, col: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .map(String::as_str)
            .unwrap_or("")
    }

    /// 1セルだけ差し替えた新しい表を返す
    ///
    /// 元の表は変更しない。`col` が行の長さを超える場合は空セルで埋めてから設定する。
    /// 行が存在しない場合は `None`。
    pub fn with_cell(&self, row: usize, col: usize, value: impl Into<String>) -> Option<Table> {
        if row >= self.rows.len() {
            return None;
        }

        let mut rows = self.rows.clone();
        let target = &mut rows[row];
        if col >= target.len() {
            target.resize(col + 1, String::new());
        }
        target[col] = value.into();

        Some(Table { rows })
    }

    /// 全行を最大列数まで空セルで埋めた行列
    pub fn padded_rows(&self) -> Vec<Vec<&str>> {
        let width = self.column_count();
        self.rows
            .iter()
            .map(|row| {
                (0..width)
                    .map(|c| row.get(c).map(String::as_str).unwrap_or(""))
                    .collect()
            })
            .collect()
    }
}

impl From<Vec<Vec<String>>> for Table {
    fn from(rows: Vec<Vec<String>>) -> Self {
        Self::new(rows)
    }
}

impl From<Vec<Vec<&str>>> for Table {
    fn from(rows: Vec<Vec<&str>>) -> Self {
        Self::new(
            rows.into_iter()
                .map(|r| r.into_iter().map(str::to_string).collect())
                .collect(),
        )
    }
}

/// 履歴に保存されるスキャン記録
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scan {
    /// 一意なID（UUID v4）
    pub id: String,

    /// 作成・更新時刻（Unixミリ秒）
    pub timestamp: i64,

    /// 画像のData URL（data:image/png;base64,...）
    pub image_url: String,

    /// 抽出された表のスナップショット
    pub table_data: Table,
}
