//! 経過時間の表示

const MINUTE: f64 = 60.0;
const HOUR: f64 = 3_600.0;
const DAY: f64 = 86_400.0;
const MONTH: f64 = 2_592_000.0;
const YEAR: f64 = 31_536_000.0;

/// 履歴一覧用の相対時刻ラベル（"3日前" など）
///
/// 各単位は1を超えた時点で採用する（ちょうど60秒は「たった今」）。
pub fn time_ago(now_ms: i64, timestamp_ms: i64) -> String {
    let seconds = ((now_ms - timestamp_ms) / 1000) as f64;

    for (unit, label) in [(YEAR, "年"), (MONTH, "ヶ月"), (DAY, "日"), (HOUR, "時間"), (MINUTE, "分")] {
        let interval = seconds / unit;
        if interval > 1.0 {
            return format!("{}{}前", interval.floor() as i64, label);
        }
    }
    "たった今".to_string()
}
