//! 端末表示

use table_scan_common::{time_ago, Scan, Table};

/// 表を枠付きテキストにする
///
/// 列数は最長の行に合わせ、足りないセルは空欄で表示する。
pub fn render_table(table: &Table) -> String {
    let width = table.column_count();
    if width == 0 {
        return "表示するデータがありません\n".to_string();
    }

    let headers: Vec<String> = (1..=width).map(|c| format!("Column {}", c)).collect();
    let rows = table.padded_rows();
    let row_label_width = table.row_count().to_string().len();

    let col_widths: Vec<usize> = (0..width)
        .map(|c| {
            rows.iter()
                .map(|r| r[c].chars().count())
                .chain(std::iter::once(headers[c].chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut out = String::new();
    let header_cells: Vec<&str> = headers.iter().map(String::as_str).collect();
    out.push_str(&format_line(&" ".repeat(row_label_width), &header_cells, &col_widths));
    out.push_str(&separator(row_label_width, &col_widths));
    for (i, row) in rows.iter().enumerate() {
        let label = format!("{:>w$}", i + 1, w = row_label_width);
        out.push_str(&format_line(&label, row, &col_widths));
    }
    out
}

fn format_line(label: &str, cells: &[&str], widths: &[usize]) -> String {
    let body = cells
        .iter()
        .zip(widths)
        .map(|(cell, w)| {
            let pad = w.saturating_sub(cell.chars().count());
            format!("{}{}", cell, " ".repeat(pad))
        })
        .collect::<Vec<_>>()
        .join(" | ");
    format!("{} | {}\n", label, body)
}

fn separator(label_width: usize, widths: &[usize]) -> String {
    let body = widths
        .iter()
        .map(|w| "-".repeat(*w))
        .collect::<Vec<_>>()
        .join("-+-");
    format!("{}-+-{}\n", "-".repeat(label_width), body)
}

/// 履歴一覧の1行
pub fn render_history_line(scan: &Scan, now_ms: i64) -> String {
    format!(
        "{}  {:<8}  {}行×{}列",
        scan.id,
        time_ago(now_ms, scan.timestamp),
        scan.table_data.row_count(),
        scan.table_data.column_count()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_table_pads_ragged_rows() {
        let table = Table::from(vec![vec!["Name", "Qty"], vec!["Bolt"]]);
        let text = render_table(&table);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "  | Column 1 | Column 2");
        assert_eq!(lines[1], "--+----------+---------");
        assert_eq!(lines[2], "1 | Name     | Qty     ");
        assert_eq!(lines[3], "2 | Bolt     |         ");
    }

    #[test]
    fn test_render_empty_table() {
        assert!(render_table(&Table::default()).contains("ありません"));
    }

    #[test]
    fn test_render_history_line() {
        let scan = Scan {
            id: "abc".into(),
            timestamp: 0,
            image_url: String::new(),
            table_data: Table::from(vec![vec!["A", "B"], vec!["C"]]),
        };
        let line = render_history_line(&scan, 120_000);
        assert!(line.starts_with("abc  2分前"));
        assert!(line.ends_with("2行×2列"));
    }
}
