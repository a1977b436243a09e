//! Borrowing (loan) model and lifecycle types

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// Lifecycle state of a borrowing.
///
/// Only `Borrowed` and `Returned` are ever persisted; `Overdue` is a
/// read-time view of an unreturned borrowing past its due date (see
/// [`Borrowing::status_as_of`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "VARCHAR", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum BorrowingStatus {
    Borrowed,
    Returned,
    Overdue,
}

/// Borrowing model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Borrowing {
    pub id: Uuid,
    pub book_id: i64,
    pub member_id: i64,
    pub borrow_date: NaiveDate,
    pub due_date: NaiveDate,
    pub return_date: Option<NaiveDate>,
    pub status: BorrowingStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Borrowing {
    /// Due date for a loan starting on `borrow_date`
    pub fn due_date_for(borrow_date: NaiveDate, loan_period_days: u16) -> NaiveDate {
        borrow_date + Duration::days(loan_period_days as i64)
    }

    /// Lifecycle state as observed on `as_of`.
    ///
    /// A borrowing due exactly on `as_of` is not yet overdue; returned
    /// borrowings stay `Returned` no matter how late they were.
    pub fn status_as_of(&self, as_of: NaiveDate) -> BorrowingStatus {
        match self.status {
            BorrowingStatus::Borrowed if self.due_date < as_of => BorrowingStatus::Overdue,
            status => status,
        }
    }

    pub fn is_overdue(&self, as_of: NaiveDate) -> bool {
        self.status_as_of(as_of) == BorrowingStatus::Overdue
    }
}

/// Create borrowing request
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateBorrowing {
    pub book_id: i64,
    pub member_id: i64,
}

/// Borrowing as served by the API, with the overdue state derived
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BorrowingDetails {
    pub id: Uuid,
    pub book_id: i64,
    pub member_id: i64,
    pub borrow_date: NaiveDate,
    pub due_date: NaiveDate,
    pub return_date: Option<NaiveDate>,
    pub status: BorrowingStatus,
}

impl BorrowingDetails {
    /// Project a ledger record into its API view as of `as_of`
    pub fn from_record(record: Borrowing, as_of: NaiveDate) -> Self {
        Self {
            status: record.status_as_of(as_of),
            id: record.id,
            book_id: record.book_id,
            member_id: record.member_id,
            borrow_date: record.borrow_date,
            due_date: record.due_date,
            return_date: record.return_date,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn borrowing(borrow: NaiveDate, period: u16) -> Borrowing {
        Borrowing {
            id: Uuid::new_v4(),
            book_id: 1,
            member_id: 1,
            borrow_date: borrow,
            due_date: Borrowing::due_date_for(borrow, period),
            return_date: None,
            status: BorrowingStatus::Borrowed,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn due_date_is_borrow_date_plus_loan_period() {
        assert_eq!(
            Borrowing::due_date_for(date(2024, 1, 1), 14),
            date(2024, 1, 15)
        );
    }

    #[test]
    fn borrowed_past_due_reads_as_overdue() {
        let b = borrowing(date(2024, 1, 1), 14);
        assert_eq!(b.status_as_of(date(2024, 1, 16)), BorrowingStatus::Overdue);
        assert!(b.is_overdue(date(2024, 1, 16)));
    }

    #[test]
    fn due_today_is_not_overdue() {
        let b = borrowing(date(2024, 1, 1), 14);
        assert_eq!(b.status_as_of(date(2024, 1, 15)), BorrowingStatus::Borrowed);
    }

    #[test]
    fn returned_borrowing_never_reads_as_overdue() {
        let mut b = borrowing(date(2024, 1, 1), 14);
        b.status = BorrowingStatus::Returned;
        b.return_date = Some(date(2024, 1, 20));
        assert_eq!(b.status_as_of(date(2024, 2, 1)), BorrowingStatus::Returned);
    }

    #[test]
    fn details_carry_the_derived_status() {
        let b = borrowing(date(2024, 1, 1), 14);
        let details = BorrowingDetails::from_record(b, date(2024, 1, 16));
        assert_eq!(details.status, BorrowingStatus::Overdue);
        assert_eq!(details.due_date, date(2024, 1, 15));
    }

    #[test]
    fn status_serializes_in_upper_case() {
        let json = serde_json::to_string(&BorrowingStatus::Overdue).unwrap();
        assert_eq!(json, "\"OVERDUE\"");
    }
}
