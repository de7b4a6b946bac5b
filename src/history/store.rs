//! スキャン履歴ストア
//!
//! 新しいスキャンを先頭に持つ一覧。変更のたびに一覧全体を1回で書き込み、
//! 書き込みが終わってからメモリ上の一覧を差し替える。

use super::persistence::KeyValueStore;
use crate::error::{Result, TableScanError};
use table_scan_common::{Scan, Table};
use tracing::{debug, warn};

/// 履歴を保存するキー
pub const HISTORY_KEY: &str = "scanHistory";

#[derive(Debug)]
pub struct HistoryStore<S: KeyValueStore> {
    store: S,
    scans: Vec<Scan>,
}

impl<S: KeyValueStore> HistoryStore<S> {
    /// 保存済みの履歴を読み込む
    ///
    /// 読めない・壊れている場合は空の履歴から始める。
    pub fn load(store: S) -> Self {
        let scans = match store.get(HISTORY_KEY) {
            Ok(Some(content)) => match serde_json::from_str::<Vec<Scan>>(&content) {
                Ok(scans) => scans,
                Err(e) => {
                    warn!("履歴の解析に失敗、空の履歴で開始: {}", e);
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!("履歴の読み込みに失敗、空の履歴で開始: {}", e);
                Vec::new()
            }
        };
        debug!(count = scans.len(), "履歴読み込み");

        Self { store, scans }
    }

    pub fn scans(&self) -> &[Scan] {
        &self.scans
    }

    pub fn get(&self, id: &str) -> Option<&Scan> {
        self.scans.iter().find(|s| s.id == id)
    }

    pub fn is_empty(&self) -> bool {
        self.scans.is_empty()
    }

    /// 先頭に追加
    pub fn append(&mut self, scan: Scan) -> Result<()> {
        if self.get(&scan.id).is_some() {
            return Err(TableScanError::DuplicateScan(scan.id));
        }

        let mut updated = Vec::with_capacity(self.scans.len() + 1);
        updated.push(scan);
        updated.extend(self.scans.iter().cloned());
        self.commit(updated);
        Ok(())
    }

    /// 表と時刻を更新（並び順は変えない）
    pub fn update_by_id(&mut self, id: &str, table: Table, timestamp: i64) -> Result<()> {
        let index = self
            .scans
            .iter()
            .position(|s| s.id == id)
            .ok_or_else(|| TableScanError::ScanNotFound(id.to_string()))?;

        let mut updated = self.scans.clone();
        updated[index].table_data = table;
        updated[index].timestamp = timestamp;
        self.commit(updated);
        Ok(())
    }

    /// 削除（存在しなければ何もしない）
    ///
    /// 削除したかどうかを返す。
    pub fn delete_by_id(&mut self, id: &str) -> bool {
        if self.get(id).is_none() {
            return false;
        }
        let updated = self.scans.iter().filter(|s| s.id != id).cloned().collect();
        self.commit(updated);
        true
    }

    /// 全件削除
    pub fn clear_all(&mut self) {
        self.commit(Vec::new());
    }

    /// 書き込んでからメモリ上の一覧を差し替える
    ///
    /// 書き込み失敗はログのみ。メモリ上の一覧がこのセッションでは正となる。
    fn commit(&mut self, updated: Vec<Scan>) {
        match serde_json::to_string(&updated) {
            Ok(json) => {
                if let Err(e) = self.store.set(HISTORY_KEY, &json) {
                    warn!("履歴の保存に失敗: {}", e);
                }
            }
            Err(e) => warn!("履歴のシリアライズに失敗: {}", e),
        }
        self.scans = updated;
    }
}
