use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use super::{
    BookId, ExtendDueDateError, ExtensionDays, InvalidLoanDates, LoanId, MemberId,
    ReturnLoanError,
};

/// 貸出期間（日数）
pub const LOAN_PERIOD_DAYS: u64 = 14;

/// 貸出の状態
///
/// `Returned` は終端状態。`Active` のみが延長・返却を受け付ける。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoanStatus {
    Active,
    Returned,
}

/// 貸出 - 書籍と会員を結ぶレコード
///
/// 日付に関する状態（貸出日・返却期限・返却日・返却済みフラグ）は
/// この集約だけが所有する。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Loan {
    pub loan_id: LoanId,
    pub book_id: BookId,
    pub member_id: MemberId,
    pub loan_date: NaiveDate,
    pub due_date: NaiveDate,
    pub return_date: Option<NaiveDate>,
    pub is_returned: bool,
}

impl Loan {
    pub fn status(&self) -> LoanStatus {
        if self.is_returned {
            LoanStatus::Returned
        } else {
            LoanStatus::Active
        }
    }
}

/// 貸出日から既定の返却期限を求める
pub fn default_due_date(loan_date: NaiveDate) -> Result<NaiveDate, InvalidLoanDates> {
    loan_date
        .checked_add_days(Days::new(LOAN_PERIOD_DAYS))
        .ok_or(InvalidLoanDates::OutOfRange)
}

/// 返却期限が貸出日から最低貸出期間以上離れているか検証する
pub fn validate_dates(loan_date: NaiveDate, due_date: NaiveDate) -> Result<(), InvalidLoanDates> {
    let earliest = default_due_date(loan_date)?;
    if due_date < earliest {
        return Err(InvalidLoanDates::DueDateTooEarly { earliest });
    }
    Ok(())
}

/// 純粋関数：書籍を貸し出す
///
/// ビジネスルール：
/// - 貸出期間は14日間
/// - 状態はActive
///
/// 副作用なし。在庫の確保は呼び出し側（リポジトリ）の責務。
pub fn open_loan(
    book_id: BookId,
    member_id: MemberId,
    loan_date: NaiveDate,
) -> Result<Loan, InvalidLoanDates> {
    Ok(Loan {
        loan_id: LoanId::new(),
        book_id,
        member_id,
        loan_date,
        due_date: default_due_date(loan_date)?,
        return_date: None,
        is_returned: false,
    })
}

/// 純粋関数：書籍を返却する
///
/// 延滞していても返却は受け付ける。返却済みの貸出は再返却できない。
pub fn return_loan(loan: &Loan, returned_on: NaiveDate) -> Result<Loan, ReturnLoanError> {
    if loan.is_returned {
        return Err(ReturnLoanError::AlreadyReturned);
    }

    Ok(Loan {
        return_date: Some(returned_on),
        is_returned: true,
        ..loan.clone()
    })
}

/// 純粋関数：返却期限を延長する
///
/// ビジネスルール：
/// - 返却済みは延長不可
/// - 延滞中（返却期限 < 今日）は延長不可。期限当日はまだ延長できる
/// - 返却期限のみが変わる
pub fn extend_due_date(
    loan: &Loan,
    days: ExtensionDays,
    today: NaiveDate,
) -> Result<Loan, ExtendDueDateError> {
    if loan.is_returned {
        return Err(ExtendDueDateError::AlreadyReturned);
    }

    if is_overdue(loan, today) {
        return Err(ExtendDueDateError::Overdue);
    }

    let due_date = loan
        .due_date
        .checked_add_days(Days::new(u64::from(days.value())))
        .ok_or(ExtendDueDateError::DateOutOfRange)?;

    Ok(Loan {
        due_date,
        ..loan.clone()
    })
}

/// 純粋関数：延滞判定
pub fn is_overdue(loan: &Loan, today: NaiveDate) -> bool {
    !loan.is_returned && loan.due_date < today
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn active_loan(loan_date: NaiveDate) -> Loan {
        open_loan(BookId::new(), MemberId::new(), loan_date).unwrap()
    }

    #[test]
    fn test_open_loan_sets_due_date_fourteen_days_out() {
        let loan_date = date(2024, 3, 1);
        let loan = active_loan(loan_date);

        assert_eq!(loan.loan_date, loan_date);
        assert_eq!(loan.due_date, date(2024, 3, 15));
        assert_eq!(loan.return_date, None);
        assert!(!loan.is_returned);
        assert_eq!(loan.status(), LoanStatus::Active);
    }

    #[test]
    fn test_return_loan_marks_returned_with_date() {
        let loan = active_loan(date(2024, 3, 1));
        let returned = return_loan(&loan, date(2024, 3, 10)).unwrap();

        assert!(returned.is_returned);
        assert_eq!(returned.return_date, Some(date(2024, 3, 10)));
        assert_eq!(returned.due_date, loan.due_date);
        assert_eq!(returned.status(), LoanStatus::Returned);
    }

    #[test]
    fn test_return_loan_accepts_overdue_loan() {
        let loan = active_loan(date(2024, 3, 1));
        let returned = return_loan(&loan, date(2024, 4, 30)).unwrap();
        assert!(returned.is_returned);
    }

    #[test]
    fn test_return_loan_fails_when_already_returned() {
        let loan = active_loan(date(2024, 3, 1));
        let returned = return_loan(&loan, date(2024, 3, 10)).unwrap();

        let result = return_loan(&returned, date(2024, 3, 11));
        assert_eq!(result.unwrap_err(), ReturnLoanError::AlreadyReturned);
    }

    #[test]
    fn test_extend_due_date_adds_exact_days_only() {
        let loan = active_loan(date(2024, 3, 1));
        let days = ExtensionDays::try_from(5).unwrap();

        let extended = extend_due_date(&loan, days, date(2024, 3, 10)).unwrap();

        assert_eq!(extended.due_date, date(2024, 3, 20));
        assert_eq!(
            Loan {
                due_date: loan.due_date,
                ..extended
            },
            loan
        );
    }

    #[test]
    fn test_extend_due_date_allowed_on_due_date() {
        let loan = active_loan(date(2024, 3, 1));
        let days = ExtensionDays::try_from(1).unwrap();

        let extended = extend_due_date(&loan, days, loan.due_date).unwrap();
        assert_eq!(extended.due_date, date(2024, 3, 16));
    }

    #[test]
    fn test_extend_due_date_fails_when_overdue() {
        let loan = active_loan(date(2024, 3, 1));
        let days = ExtensionDays::try_from(5).unwrap();

        let result = extend_due_date(&loan, days, date(2024, 3, 16));
        assert_eq!(result.unwrap_err(), ExtendDueDateError::Overdue);
    }

    #[test]
    fn test_extend_due_date_fails_when_returned() {
        let loan = active_loan(date(2024, 3, 1));
        let returned = return_loan(&loan, date(2024, 3, 5)).unwrap();
        let days = ExtensionDays::try_from(5).unwrap();

        let result = extend_due_date(&returned, days, date(2024, 3, 6));
        assert_eq!(result.unwrap_err(), ExtendDueDateError::AlreadyReturned);
    }

    #[test]
    fn test_is_overdue_boundaries() {
        let loan = active_loan(date(2024, 3, 1));

        assert!(!is_overdue(&loan, date(2024, 3, 14)));
        assert!(!is_overdue(&loan, date(2024, 3, 15)));
        assert!(is_overdue(&loan, date(2024, 3, 16)));
    }

    #[test]
    fn test_is_overdue_false_when_returned() {
        let loan = active_loan(date(2024, 3, 1));
        let returned = return_loan(&loan, date(2024, 3, 20)).unwrap();

        assert!(!is_overdue(&returned, date(2024, 4, 1)));
    }

    #[test]
    fn test_validate_dates() {
        let loan_date = date(2024, 3, 1);

        assert!(validate_dates(loan_date, date(2024, 3, 15)).is_ok());
        assert!(validate_dates(loan_date, date(2024, 4, 1)).is_ok());
        assert_eq!(
            validate_dates(loan_date, date(2024, 3, 14)).unwrap_err(),
            InvalidLoanDates::DueDateTooEarly {
                earliest: date(2024, 3, 15)
            }
        );
    }

    #[test]
    fn test_extend_due_date_fails_past_last_representable_date() {
        let loan = active_loan(date(2024, 3, 1));
        let days = ExtensionDays::try_from(4_000_000_000).unwrap();

        let result = extend_due_date(&loan, days, date(2024, 3, 10));
        assert_eq!(result.unwrap_err(), ExtendDueDateError::DateOutOfRange);
    }

    #[test]
    fn test_loan_period_out_of_range_near_max_date() {
        let last = NaiveDate::MAX;

        assert_eq!(
            open_loan(BookId::new(), MemberId::new(), last).unwrap_err(),
            InvalidLoanDates::OutOfRange
        );
        assert_eq!(
            validate_dates(last, last).unwrap_err(),
            InvalidLoanDates::OutOfRange
        );
    }
}
