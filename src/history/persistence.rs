//! 履歴の永続化先
//!
//! キー1つに対して文字列全体を読み書きするだけの面。
//! ファイル版は一時ファイルに書いてからリネームするので、途中で落ちても前回の内容が残る。

use std::collections::HashMap;
use std::io;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};

pub trait KeyValueStore: Send {
    fn get(&self, key: &str) -> io::Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> io::Result<()>;
}

/// ディレクトリ内の `<key>.json` に保存する
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> io::Result<Option<String>> {
        match std::fs::read_to_string(self.path_for(key)) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> io::Result<()> {
        std::fs::create_dir_all(&self.dir)?;
        let target = self.path_for(key);
        let temp = self.dir.join(format!(".{}.json.tmp", key));
        let result = std::fs::write(&temp, value).and_then(|()| std::fs::rename(&temp, &target));
        if result.is_err() {
            // 失敗時は一時ファイルを残さない
            let _ = std::fs::remove_file(&temp);
        }
        result
    }
}

/// メモリ上のストア
///
/// clone したハンドル同士は同じ中身を共有するので、再起動（再読み込み）を再現できる。
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
    fail_writes: Arc<Mutex<bool>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 以降の書き込みを失敗させる
    pub fn set_fail_writes(&self, fail: bool) {
        *self.fail_writes.lock().unwrap_or_else(PoisonError::into_inner) = fail;
    }

    /// 生の値を直接書き込む（壊れたデータの再現用）
    pub fn put_raw(&self, key: &str, value: &str) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value.to_string());
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> io::Result<Option<String>> {
        Ok(self
            .entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> io::Result<()> {
        if *self.fail_writes.lock().unwrap_or_else(PoisonError::into_inner) {
            return Err(io::Error::new(io::ErrorKind::Other, "書き込み失敗（テスト）"));
        }
        self.put_raw(key, value);
        Ok(())
    }
}
