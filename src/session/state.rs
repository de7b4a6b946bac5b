//! セッション状態
//!
//! 1回の「画像選択 → 抽出 → 編集 → 保存」の流れを表す。I/Oは持たない。

use super::progress::PROGRESS_CAP;
use crate::error::{Result, TableScanError};
use crate::gateway::GatewayError;
use std::fmt;
use std::time::{Duration, Instant};
use table_scan_common::{Scan, Table};

/// 保存完了表示を出しておく時間
pub const SAVED_NOTICE_DURATION: Duration = Duration::from_secs(3);

/// 抽出の失敗理由
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractionFailure {
    /// 表が1行も取れなかった（再試行可能）
    EmptyResult,
    /// ゲートウェイの失敗
    Gateway(GatewayError),
}

impl fmt::Display for ExtractionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtractionFailure::EmptyResult => write!(f, "{}", TableScanError::ExtractionEmpty),
            ExtractionFailure::Gateway(e) => write!(f, "{}", e.user_message()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    image_url: Option<String>,
    table: Option<Table>,
    active_scan_id: Option<String>,
    dirty: bool,
    loading: bool,
    progress: u8,
    error: Option<ExtractionFailure>,
    saved_at: Option<Instant>,
}

impl Session {
    pub fn image_url(&self) -> Option<&str> {
        self.image_url.as_deref()
    }

    pub fn table(&self) -> Option<&Table> {
        self.table.as_ref()
    }

    pub fn active_scan_id(&self) -> Option<&str> {
        self.active_scan_id.as_deref()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn progress(&self) -> u8 {
        self.progress
    }

    pub fn error(&self) -> Option<&ExtractionFailure> {
        self.error.as_ref()
    }

    /// 初期状態（何も読み込んでいない）か
    pub fn is_empty(&self) -> bool {
        *self == Session::default()
    }

    /// 抽出開始: 前回の内容を消して読み込み中にする
    pub fn begin_extraction(&mut self, image_url: String) {
        *self = Session {
            image_url: Some(image_url),
            loading: true,
            ..Session::default()
        };
    }

    /// 進捗を反映（読み込み中のみ、減らさない、99で頭打ち）
    ///
    /// 値が変わったかどうかを返す。
    pub fn report_progress(&mut self, value: u8) -> bool {
        if !self.loading {
            return false;
        }
        let next = self.progress.max(value.min(PROGRESS_CAP));
        let changed = next != self.progress;
        self.progress = next;
        changed
    }

    /// 抽出が決着したら100にする
    pub fn finish_progress(&mut self) {
        if self.loading {
            self.progress = 100;
        }
    }

    /// 抽出成功
    ///
    /// 読み込み中フラグは `settle` で落とす（100%表示を残すため）。
    pub fn complete_extraction(&mut self, table: Table, scan_id: String) {
        self.table = Some(table);
        self.active_scan_id = Some(scan_id);
        self.error = None;
        self.dirty = false;
    }

    /// 抽出失敗
    pub fn fail_extraction(&mut self, failure: ExtractionFailure) {
        self.table = None;
        self.active_scan_id = None;
        self.error = Some(failure);
    }

    /// 読み込み中表示を終える
    pub fn settle(&mut self) {
        self.loading = false;
    }

    /// 履歴のスキャンを表示対象にする
    pub fn load_scan(&mut self, scan: &Scan) {
        *self = Session {
            image_url: Some(scan.image_url.clone()),
            table: Some(scan.table_data.clone()),
            active_scan_id: Some(scan.id.clone()),
            ..Session::default()
        };
    }

    /// セルを書き換える
    pub fn edit_cell(&mut self, row: usize, col: usize, value: impl Into<String>) -> Result<()> {
        let table = self.table.as_ref().ok_or(TableScanError::NoActiveTable)?;
        let edited = table
            .with_cell(row, col, value)
            .ok_or(TableScanError::RowOutOfRange { row, rows: table.row_count() })?;
        self.table = Some(edited);
        self.dirty = true;
        Ok(())
    }

    /// 保存済みにする
    pub fn mark_saved(&mut self, now: Instant) {
        self.dirty = false;
        self.saved_at = Some(now);
    }

    /// 保存完了表示を出すか
    pub fn show_saved_notice(&self, now: Instant) -> bool {
        self.saved_at
            .is_some_and(|t| now.saturating_duration_since(t) < SAVED_NOTICE_DURATION)
    }

    pub fn reset(&mut self) {
        *self = Session::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loaded() -> Session {
        let mut session = Session::default();
        session.load_scan(&Scan {
            id: "x".into(),
            timestamp: 0,
            image_url: "data:image/png;base64,AAAA".into(),
            table_data: Table::from(vec![vec!["A", "B", "C"], vec!["D"]]),
        });
        session
    }

    #[test]
    fn test_begin_extraction_clears_previous() {
        let mut session = loaded();
        session.edit_cell(0, 0, "Z").unwrap();

        session.begin_extraction("data:image/jpeg;base64,BBBB".into());
        assert!(session.is_loading());
        assert!(session.table().is_none());
        assert!(session.active_scan_id().is_none());
        assert!(!session.is_dirty());
        assert_eq!(session.progress(), 0);
        assert_eq!(session.image_url(), Some("data:image/jpeg;base64,BBBB"));
    }

    #[test]
    fn test_report_progress_is_monotonic_and_capped() {
        let mut session = Session::default();
        session.begin_extraction("data:,".into());

        assert!(session.report_progress(40));
        assert!(!session.report_progress(30));
        assert_eq!(session.progress(), 40);
        session.report_progress(150);
        assert_eq!(session.progress(), 99);

        session.finish_progress();
        assert_eq!(session.progress(), 100);
    }

    #[test]
    fn test_report_progress_ignored_when_idle() {
        let mut session = Session::default();
        assert!(!session.report_progress(50));
        assert_eq!(session.progress(), 0);
    }

    #[test]
    fn test_edit_cell_marks_dirty_and_keeps_other_cells() {
        let mut session = loaded();
        let before = session.table().unwrap().clone();

        session.edit_cell(1, 2, "new").unwrap();
        let after = session.table().unwrap();

        assert!(session.is_dirty());
        assert_eq!(after.cell(1, 2), "new");
        assert_eq!(after.rows()[0], before.rows()[0]);
        assert_eq!(after.cell(1, 0), "D");
        assert_eq!(before.cell(1, 2), "");
    }

    #[test]
    fn test_edit_cell_without_table() {
        let mut session = Session::default();
        assert!(matches!(session.edit_cell(0, 0, "x"), Err(TableScanError::NoActiveTable)));
    }

    #[test]
    fn test_edit_cell_missing_row() {
        let mut session = loaded();
        let result = session.edit_cell(5, 0, "x");
        assert!(matches!(result, Err(TableScanError::RowOutOfRange { row: 5, rows: 2 })));
        assert!(!session.is_dirty());
    }

    #[test]
    fn test_saved_notice_expires() {
        let mut session = loaded();
        let now = Instant::now();
        session.mark_saved(now);
        assert!(session.show_saved_notice(now + Duration::from_secs(1)));
        assert!(!session.show_saved_notice(now + Duration::from_secs(3)));
    }

    #[test]
    fn test_failure_messages() {
        let empty = ExtractionFailure::EmptyResult.to_string();
        assert!(empty.contains("表データを抽出できませんでした"));

        let invalid = ExtractionFailure::Gateway(GatewayError::InvalidCredential).to_string();
        assert!(invalid.contains("APIキーが無効"));
    }

    #[test]
    fn test_reset() {
        let mut session = loaded();
        session.reset();
        assert!(session.is_empty());
    }
}
