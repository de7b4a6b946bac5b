//! Excel出力の統合テスト
//!
//! 書き出したファイルを calamine で読み戻して内容を確認する

use calamine::{open_workbook, Reader, Xlsx};
use std::path::Path;
use table_scan::export::{export_table, DEFAULT_FILE_STEM};
use table_scan_common::Table;
use tempfile::tempdir;

fn read_sheet(path: &Path, sheet: &str) -> Vec<Vec<String>> {
    let mut workbook: Xlsx<_> = open_workbook(path).expect("Failed to open workbook");
    let range = workbook.worksheet_range(sheet).expect("sheet missing");
    range
        .rows()
        .map(|row| row.iter().map(|cell| cell.to_string()).collect())
        .collect()
}

#[test]
fn test_export_writes_sheet1() {
    let dir = tempdir().expect("Failed to create temp dir");
    let output = dir.path().join("result.xlsx");
    let table = Table::from(vec![vec!["品名", "数量"], vec!["ボルト", "12"]]);

    let path = export_table(&table, &output).expect("export failed");
    assert_eq!(path, output);

    let rows = read_sheet(&path, "Sheet1");
    assert_eq!(
        rows,
        vec![vec!["品名".to_string(), "数量".to_string()], vec!["ボルト".to_string(), "12".to_string()]]
    );
}

/// 数字に見えるセルも文字列のまま書く
#[test]
fn test_export_keeps_cells_as_text() {
    let dir = tempdir().expect("Failed to create temp dir");
    let table = Table::from(vec![vec!["007", "1.50"]]);

    let path = export_table(&table, &dir.path().join("text.xlsx")).unwrap();

    let mut workbook: Xlsx<_> = open_workbook(&path).unwrap();
    let range = workbook.worksheet_range("Sheet1").unwrap();
    assert_eq!(range.get_value((0, 0)), Some(&calamine::Data::String("007".into())));
    assert_eq!(range.get_value((0, 1)), Some(&calamine::Data::String("1.50".into())));
}

/// 長さの違う行は短い側が空欄になる
#[test]
fn test_export_ragged_rows() {
    let dir = tempdir().expect("Failed to create temp dir");
    let table = Table::from(vec![vec!["A", "B", "C"], vec!["D"]]);

    let path = export_table(&table, &dir.path().join("ragged.xlsx")).unwrap();
    let rows = read_sheet(&path, "Sheet1");

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0], vec!["A", "B", "C"]);
    assert_eq!(rows[1][0], "D");
    assert!(rows[1][1..].iter().all(|c| c.is_empty()));
}

/// ディレクトリを指定すると既定のファイル名になる
#[test]
fn test_export_default_file_name() {
    let dir = tempdir().expect("Failed to create temp dir");
    let table = Table::from(vec![vec!["x"]]);

    let path = export_table(&table, dir.path()).unwrap();
    assert_eq!(path, dir.path().join(format!("{}.xlsx", DEFAULT_FILE_STEM)));
    assert!(path.exists());
}

/// xlsx以外の拡張子を指定しても .xlsx で書き出す
#[test]
fn test_export_forces_xlsx_extension() {
    let dir = tempdir().expect("Failed to create temp dir");
    let table = Table::from(vec![vec!["x"]]);

    let path = export_table(&table, &dir.path().join("out.csv")).unwrap();
    assert_eq!(path, dir.path().join("out.xlsx"));
    assert!(!dir.path().join("out.csv").exists());
    assert_eq!(read_sheet(&path, "Sheet1"), vec![vec!["x".to_string()]]);
}

/// 出力先の親ディレクトリがなければ作る
#[test]
fn test_export_creates_parent_dirs() {
    let dir = tempdir().expect("Failed to create temp dir");
    let output = dir.path().join("nested").join("deeper").join("out.xlsx");

    let path = export_table(&Table::from(vec![vec!["x"]]), &output).unwrap();
    assert!(path.exists());
}
