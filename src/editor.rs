//! 対話式の表編集
//!
//! セル編集・保存・Excel出力・リセットを端末から行う。

use crate::error::{Result, TableScanError};
use crate::history::KeyValueStore;
use crate::render::render_table;
use crate::session::{Session, SessionController};
use dialoguer::{Confirm, Input, Select};
use std::path::PathBuf;
use std::time::Instant;

/// 編集メニュー
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorAction {
    /// セルを編集
    EditCell,
    /// 履歴に保存
    Save,
    /// Excelに出力
    Export,
    /// 表を再表示
    Show,
    /// セッションを破棄して終了
    Reset,
    /// 終了
    Quit,
}

impl EditorAction {
    const ALL: [EditorAction; 6] = [
        EditorAction::EditCell,
        EditorAction::Save,
        EditorAction::Export,
        EditorAction::Show,
        EditorAction::Reset,
        EditorAction::Quit,
    ];

    fn label(self) -> &'static str {
        match self {
            EditorAction::EditCell => "セルを編集",
            EditorAction::Save => "変更を保存",
            EditorAction::Export => "Excelとしてダウンロード",
            EditorAction::Show => "表を表示",
            EditorAction::Reset => "リセット",
            EditorAction::Quit => "終了",
        }
    }
}

/// メニュー表示
///
/// 未保存の変更があれば保存に `*` を付け、保存直後の一定時間は保存済みと表示する。
pub fn menu_labels(session: &Session, now: Instant) -> Vec<String> {
    EditorAction::ALL
        .iter()
        .map(|a| match a {
            EditorAction::Save if session.is_dirty() => format!("{} *", a.label()),
            EditorAction::Save if session.show_saved_notice(now) => {
                format!("{}（保存済み）", a.label())
            }
            _ => a.label().to_string(),
        })
        .collect()
}

/// "行,列"（1始まり）を 0 始まりの位置に変換
pub fn parse_cell_address(input: &str) -> Option<(usize, usize)> {
    let input = input.trim();
    let (row, col) = input
        .split_once(',')
        .or_else(|| input.split_once(char::is_whitespace))?;
    let row: usize = row.trim().parse().ok()?;
    let col: usize = col.trim().parse().ok()?;
    if row == 0 || col == 0 {
        return None;
    }
    Some((row - 1, col - 1))
}

fn prompt_err(e: dialoguer::Error) -> TableScanError {
    TableScanError::Prompt(e.to_string())
}

/// 対話式編集を実行
pub fn run_editor<S: KeyValueStore + 'static>(controller: &SessionController<S>) -> Result<()> {
    println!("---");
    println!("操作を選択してください（セル位置は 行,列 で指定）");
    println!("---\n");

    loop {
        let session = controller.session();
        if session.table().is_none() {
            println!("表が読み込まれていません");
            return Ok(());
        }

        let labels = menu_labels(&session, Instant::now());

        let choice = Select::new()
            .with_prompt("操作")
            .items(&labels)
            .default(0)
            .interact()
            .map_err(prompt_err)?;

        match EditorAction::ALL[choice] {
            EditorAction::EditCell => edit_one_cell(controller)?,
            EditorAction::Save => {
                if controller.save_edits()? {
                    println!("✔ 変更を保存しました\n");
                } else {
                    println!("保存する変更はありません\n");
                }
            }
            EditorAction::Export => {
                let output: String = Input::new()
                    .with_prompt("出力先")
                    .default(".".to_string())
                    .interact_text()
                    .map_err(prompt_err)?;
                let path = controller.export_current(&PathBuf::from(output))?;
                println!("✔ Excel出力: {}\n", path.display());
            }
            EditorAction::Show => {
                if let Some(table) = controller.session().table() {
                    println!("{}", render_table(table));
                }
            }
            EditorAction::Reset => {
                controller.reset();
                println!("セッションをリセットしました");
                return Ok(());
            }
            EditorAction::Quit => {
                if controller.session().is_dirty() {
                    let save = Confirm::new()
                        .with_prompt("未保存の変更があります。保存しますか？")
                        .default(true)
                        .interact()
                        .map_err(prompt_err)?;
                    if save {
                        controller.save_edits()?;
                        println!("✔ 変更を保存しました");
                    }
                }
                return Ok(());
            }
        }
    }
}

fn edit_one_cell<S: KeyValueStore + 'static>(controller: &SessionController<S>) -> Result<()> {
    let address: String = Input::new()
        .with_prompt("セル（行,列）")
        .interact_text()
        .map_err(prompt_err)?;

    let Some((row, col)) = parse_cell_address(&address) else {
        println!("  → セル位置は「2,3」のように入力してください\n");
        return Ok(());
    };

    let current = controller
        .session()
        .table()
        .map(|t| t.cell(row, col).to_string())
        .unwrap_or_default();

    let value: String = Input::new()
        .with_prompt(format!("{}行{}列", row + 1, col + 1))
        .with_initial_text(current)
        .allow_empty(true)
        .interact_text()
        .map_err(prompt_err)?;

    match controller.edit_cell(row, col, value.clone()) {
        Ok(()) => println!("  → {}\n", value),
        Err(TableScanError::RowOutOfRange { rows, .. }) => {
            println!("  → {}行目はありません（全{}行）\n", row + 1, rows);
        }
        Err(e) => return Err(e),
    }
    Ok(())
}
