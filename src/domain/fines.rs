use chrono::NaiveDate;

use super::borrow::{BorrowRecord, is_overdue};

/// 延滞料金の日額（通貨単位）
pub const FINE_RATE_PER_DAY: i64 = 5;

/// 純粋関数：未払い延滞料金を計算する
///
/// アルゴリズム：
/// - 返却済みレコードは対象外（返却がどれだけ遅れていても加算しない）
/// - 未返却かつ返却期限を過ぎたレコードについて、
///   延滞日数（暦日） × 日額 を合計する
///
/// 返却済みレコードを除外するのは現行運用をそのまま保存した仕様。
/// 返却時点の延滞額は窓口で精算される前提になっている。
///
/// 副作用なし。入力レコード群のスナップショットに対して計算するのみ。
///
/// # 戻り値
/// 非負の合計額。対象レコードがなければ0。
pub fn outstanding_fines(records: &[BorrowRecord], as_of: NaiveDate) -> i64 {
    records
        .iter()
        .filter(|record| is_overdue(record, as_of))
        .map(|record| (as_of - record.due_on()).num_days() * FINE_RATE_PER_DAY)
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::borrow::{BorrowRecord, close_borrow, open_borrow};
    use crate::domain::value_objects::{BookId, MemberId};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn open_record(borrowed_on: NaiveDate, due_on: NaiveDate) -> BorrowRecord {
        BorrowRecord::Open(open_borrow(BookId::new(), MemberId::new(), borrowed_on, due_on).unwrap())
    }

    #[test]
    fn test_overdue_open_record_accrues_per_day() {
        // 2024-01-10期限、2024-01-15時点で5日延滞 → 5日 × 5 = 25
        let records = vec![open_record(date(2024, 1, 1), date(2024, 1, 10))];

        assert_eq!(outstanding_fines(&records, date(2024, 1, 15)), 25);
    }

    #[test]
    fn test_closed_record_contributes_nothing() {
        // 同じ日付でも返却済みなら加算されない（返却の遅れは問わない）
        let open = open_borrow(
            BookId::new(),
            MemberId::new(),
            date(2024, 1, 1),
            date(2024, 1, 10),
        )
        .unwrap();
        let closed = close_borrow(BorrowRecord::Open(open), date(2024, 1, 20)).unwrap();
        let records = vec![BorrowRecord::Closed(closed)];

        assert_eq!(outstanding_fines(&records, date(2024, 1, 15)), 0);
    }

    #[test]
    fn test_empty_collection_totals_zero() {
        assert_eq!(outstanding_fines(&[], date(2024, 1, 15)), 0);
    }

    #[test]
    fn test_future_due_date_contributes_nothing() {
        let records = vec![open_record(date(2024, 1, 1), date(2024, 2, 1))];

        assert_eq!(outstanding_fines(&records, date(2024, 1, 15)), 0);
    }

    #[test]
    fn test_due_today_contributes_nothing() {
        // 期限当日はまだ延滞ではない（dueDate < asOfDate のみ加算）
        let records = vec![open_record(date(2024, 1, 1), date(2024, 1, 15))];

        assert_eq!(outstanding_fines(&records, date(2024, 1, 15)), 0);
    }

    #[test]
    fn test_mixed_records_sum_only_open_overdue() {
        let overdue_open = open_record(date(2024, 1, 1), date(2024, 1, 10)); // 5日 × 5 = 25
        let not_yet_due = open_record(date(2024, 1, 12), date(2024, 1, 26)); // 0
        let closed_late = {
            let open = open_borrow(
                BookId::new(),
                MemberId::new(),
                date(2023, 12, 1),
                date(2023, 12, 10),
            )
            .unwrap();
            BorrowRecord::Closed(close_borrow(BorrowRecord::Open(open), date(2024, 1, 5)).unwrap())
        }; // 返却済みのため0

        let records = vec![overdue_open, not_yet_due, closed_late];

        assert_eq!(outstanding_fines(&records, date(2024, 1, 15)), 25);
    }
}
