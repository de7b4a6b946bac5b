//! セッション管理
//!
//! セッション状態と履歴ストアをまとめて扱い、利用者の操作を受け付ける。
//! 抽出は1件ずつ。新しい抽出・リセット・履歴読み込みのたびに世代番号を進め、
//! 古い世代の結果は捨てる。

use super::progress::{ProgressCurve, ProgressTicker};
use super::state::{ExtractionFailure, Session};
use crate::config::Config;
use crate::error::{Result, TableScanError};
use crate::export;
use crate::gateway::{ExtractionGateway, GatewayError, ImageInput};
use crate::history::{HistoryStore, KeyValueStore};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};
use table_scan_common::Scan;
use tokio::sync::watch;
use tracing::{debug, info, warn};
use uuid::Uuid;

#[derive(Debug, Clone, Copy)]
pub struct SessionOptions {
    pub time_constant: Duration,
    pub tick: Duration,
    pub settle_delay: Duration,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

impl From<&Config> for SessionOptions {
    fn from(config: &Config) -> Self {
        Self {
            time_constant: config.progress_time_constant(),
            tick: config.progress_tick(),
            settle_delay: config.settle_delay(),
        }
    }
}

/// 抽出の結末
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractionOutcome {
    /// 表を取得し履歴に追加した
    Loaded { scan_id: String },
    /// 表が空だった
    Empty,
    /// ゲートウェイが失敗した
    Failed(GatewayError),
    /// 途中でリセット・別の抽出が行われ、結果を捨てた
    Superseded,
}

struct Inner<S: KeyValueStore> {
    session: Session,
    history: HistoryStore<S>,
    generation: u64,
    ticker: Option<ProgressTicker>,
    updates: watch::Sender<Session>,
}

impl<S: KeyValueStore> Inner<S> {
    fn publish(&self) {
        self.updates.send_replace(self.session.clone());
    }

    fn cancel_ticker(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            ticker.cancel();
        }
    }

    /// 進行中の抽出を無効にして初期状態へ
    fn reset_session(&mut self) {
        self.cancel_ticker();
        self.generation += 1;
        self.session.reset();
    }
}

pub struct SessionController<S: KeyValueStore + 'static> {
    inner: Arc<Mutex<Inner<S>>>,
    gateway: Arc<dyn ExtractionGateway>,
    options: SessionOptions,
}

impl<S: KeyValueStore + 'static> Clone for SessionController<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            gateway: Arc::clone(&self.gateway),
            options: self.options,
        }
    }
}

impl<S: KeyValueStore + 'static> SessionController<S> {
    pub fn new(
        history: HistoryStore<S>,
        gateway: Arc<dyn ExtractionGateway>,
        options: SessionOptions,
    ) -> Self {
        let (updates, _) = watch::channel(Session::default());
        Self {
            inner: Arc::new(Mutex::new(Inner {
                session: Session::default(),
                history,
                generation: 0,
                ticker: None,
                updates,
            })),
            gateway,
            options,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner<S>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// セッション状態の変化を購読
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.lock().updates.subscribe()
    }

    /// 現在のセッション状態
    pub fn session(&self) -> Session {
        self.lock().session.clone()
    }

    /// 履歴一覧（新しい順）
    pub fn history(&self) -> Vec<Scan> {
        self.lock().history.scans().to_vec()
    }

    /// 画像から表を抽出する
    ///
    /// 前のセッションは破棄する。どの結末でも読み込み中表示は必ず終わる。
    pub async fn extract(&self, image: ImageInput) -> ExtractionOutcome {
        let image_url = image.data_url();
        let generation = {
            let mut inner = self.lock();
            inner.reset_session();
            inner.session.begin_extraction(image_url.clone());
            inner.publish();
            let generation = inner.generation;
            inner.ticker = Some(self.spawn_ticker(generation));
            generation
        };
        info!(file = %image.file_name, generation, "抽出開始");

        let result = self.gateway.extract(&image).await;

        let outcome = {
            let mut inner = self.lock();
            if inner.generation != generation {
                debug!(generation, "破棄済みの抽出結果を無視");
                return ExtractionOutcome::Superseded;
            }
            inner.cancel_ticker();
            inner.session.finish_progress();

            let outcome = match result {
                Ok(table) if !table.is_empty() => {
                    let scan = Scan {
                        id: Uuid::new_v4().to_string(),
                        timestamp: now_millis(),
                        image_url,
                        table_data: table.clone(),
                    };
                    let scan_id = scan.id.clone();
                    if let Err(e) = inner.history.append(scan) {
                        warn!("履歴への追加に失敗: {}", e);
                    }
                    inner.session.complete_extraction(table, scan_id.clone());
                    info!(scan_id = %scan_id, "抽出完了");
                    ExtractionOutcome::Loaded { scan_id }
                }
                Ok(_) => {
                    info!("抽出結果が空");
                    inner.session.fail_extraction(ExtractionFailure::EmptyResult);
                    ExtractionOutcome::Empty
                }
                Err(e) => {
                    warn!("抽出失敗: {}", e);
                    inner.session.fail_extraction(ExtractionFailure::Gateway(e.clone()));
                    ExtractionOutcome::Failed(e)
                }
            };
            inner.publish();
            outcome
        };

        if !self.options.settle_delay.is_zero() {
            tokio::time::sleep(self.options.settle_delay).await;
        }

        let mut inner = self.lock();
        if inner.generation == generation {
            inner.session.settle();
            inner.publish();
        }
        outcome
    }

    fn spawn_ticker(&self, generation: u64) -> ProgressTicker {
        let weak = Arc::downgrade(&self.inner);
        let curve = ProgressCurve::new(self.options.time_constant);
        let started = Instant::now();

        ProgressTicker::spawn(self.options.tick, move || {
            let Some(shared) = weak.upgrade() else {
                return false;
            };
            let mut inner = shared.lock().unwrap_or_else(PoisonError::into_inner);
            if inner.generation != generation || !inner.session.is_loading() {
                return false;
            }
            if inner.session.report_progress(curve.estimate(started.elapsed())) {
                inner.publish();
            }
            true
        })
    }

    /// セルを編集
    pub fn edit_cell(&self, row: usize, col: usize, value: impl Into<String>) -> Result<()> {
        let mut inner = self.lock();
        inner.session.edit_cell(row, col, value)?;
        inner.publish();
        Ok(())
    }

    /// 編集内容を履歴に保存
    ///
    /// 未編集、または対象スキャンがない場合は何もせず `false` を返す。
    pub fn save_edits(&self) -> Result<bool> {
        let mut guard = self.lock();
        let inner = &mut *guard;

        if !inner.session.is_dirty() {
            return Ok(false);
        }
        let (Some(id), Some(table)) = (inner.session.active_scan_id(), inner.session.table()) else {
            return Ok(false);
        };

        inner.history.update_by_id(id, table.clone(), now_millis())?;
        inner.session.mark_saved(Instant::now());
        inner.publish();
        info!("編集内容を保存");
        Ok(true)
    }

    /// セッションを初期状態に戻す
    pub fn reset(&self) {
        let mut inner = self.lock();
        inner.reset_session();
        inner.publish();
    }

    /// 履歴のスキャンを読み込む
    pub fn load_from_history(&self, id: &str) -> Result<()> {
        let mut inner = self.lock();
        let scan = inner
            .history
            .get(id)
            .cloned()
            .ok_or_else(|| TableScanError::ScanNotFound(id.to_string()))?;

        inner.reset_session();
        inner.session.load_scan(&scan);
        inner.publish();
        Ok(())
    }

    /// 履歴から削除（表示中のスキャンならセッションもリセット）
    pub fn delete_scan(&self, id: &str) -> bool {
        let mut inner = self.lock();
        let removed = inner.history.delete_by_id(id);
        if inner.session.active_scan_id() == Some(id) {
            inner.reset_session();
            inner.publish();
        }
        removed
    }

    /// 履歴を全削除（表示中のスキャンがあればセッションもリセット）
    pub fn clear_history(&self) {
        let mut inner = self.lock();
        inner.history.clear_all();
        if inner.session.active_scan_id().is_some() {
            inner.reset_session();
            inner.publish();
        }
    }

    /// 表示中の表をExcelに出力
    pub fn export_current(&self, output: &Path) -> Result<PathBuf> {
        let table = self
            .lock()
            .session
            .table()
            .cloned()
            .ok_or(TableScanError::NoActiveTable)?;
        export::export_table(&table, output)
    }
}

fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
