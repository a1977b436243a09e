//! Borrowings repository: the loan ledger and its stock-consistent mutations

use chrono::{NaiveDate, Utc};
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::borrowing::{Borrowing, BorrowingStatus},
};

#[derive(Clone)]
pub struct BorrowingsRepository {
    pool: Pool<Postgres>,
}

impl BorrowingsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get borrowing by ID
    pub async fn get_by_id(&self, id: Uuid) -> AppResult<Borrowing> {
        sqlx::query_as::<_, Borrowing>("SELECT * FROM m_borrowings WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(AppError::BorrowingNotFound(id))
    }

    /// Full ledger, newest first
    pub async fn list_all(&self) -> AppResult<Vec<Borrowing>> {
        let borrowings = sqlx::query_as::<_, Borrowing>(
            "SELECT * FROM m_borrowings ORDER BY borrow_date DESC, created_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(borrowings)
    }

    /// Borrowings for a member
    pub async fn list_by_member(&self, member_id: i64) -> AppResult<Vec<Borrowing>> {
        let borrowings = sqlx::query_as::<_, Borrowing>(
            "SELECT * FROM m_borrowings WHERE member_id = $1 ORDER BY borrow_date DESC",
        )
        .bind(member_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(borrowings)
    }

    /// Unreturned borrowings whose due date lies strictly before `as_of`
    pub async fn list_overdue(&self, as_of: NaiveDate) -> AppResult<Vec<Borrowing>> {
        let borrowings = sqlx::query_as::<_, Borrowing>(
            "SELECT * FROM m_borrowings WHERE status = $1 AND due_date < $2 ORDER BY due_date",
        )
        .bind(BorrowingStatus::Borrowed)
        .bind(as_of)
        .fetch_all(&self.pool)
        .await?;
        Ok(borrowings)
    }

    /// Count unreturned borrowings
    pub async fn count_active(&self) -> AppResult<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM m_borrowings WHERE status = $1")
                .bind(BorrowingStatus::Borrowed)
                .fetch_one(&self.pool)
                .await?;
        Ok(count)
    }

    /// Count unreturned borrowings past their due date as of `as_of`
    pub async fn count_overdue(&self, as_of: NaiveDate) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM m_borrowings WHERE status = $1 AND due_date < $2",
        )
        .bind(BorrowingStatus::Borrowed)
        .bind(as_of)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    /// Count unreturned borrowings of a book (delete guard for the catalog)
    pub async fn count_active_for_book(&self, book_id: i64) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM m_borrowings WHERE book_id = $1 AND status = $2",
        )
        .bind(book_id)
        .bind(BorrowingStatus::Borrowed)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    /// Count unreturned borrowings held by a member (delete guard)
    pub async fn count_active_for_member(&self, member_id: i64) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM m_borrowings WHERE member_id = $1 AND status = $2",
        )
        .bind(member_id)
        .bind(BorrowingStatus::Borrowed)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    /// Create a borrowing, taking one copy off the shelf.
    ///
    /// The stock check, the decrement and the ledger insert run in a single
    /// transaction. `FOR UPDATE` on the book row serializes every stock
    /// movement for that book: when two requests race for the last copy,
    /// whichever acquires the lock first wins and the other observes
    /// `stock == 0`. Movements on different books never contend. Any error
    /// before commit rolls the whole transaction back.
    pub async fn create(
        &self,
        book_id: i64,
        member_id: i64,
        loan_period_days: u16,
    ) -> AppResult<Borrowing> {
        let mut tx = self.pool.begin().await?;

        let stock: i32 = sqlx::query_scalar("SELECT stock FROM m_books WHERE id = $1 FOR UPDATE")
            .bind(book_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(AppError::BookNotFound(book_id))?;

        if stock <= 0 {
            return Err(AppError::OutOfStock(book_id));
        }

        sqlx::query("UPDATE m_books SET stock = stock - 1, updated_at = NOW() WHERE id = $1")
            .bind(book_id)
            .execute(&mut *tx)
            .await?;

        let borrow_date = Utc::now().date_naive();
        let due_date = Borrowing::due_date_for(borrow_date, loan_period_days);

        let borrowing = sqlx::query_as::<_, Borrowing>(
            r#"
            INSERT INTO m_borrowings (id, book_id, member_id, borrow_date, due_date, status)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(book_id)
        .bind(member_id)
        .bind(borrow_date)
        .bind(due_date)
        .bind(BorrowingStatus::Borrowed)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(borrowing)
    }

    /// Mark a borrowing returned and put the copy back in stock.
    ///
    /// Locks the borrowing row before the status check so a concurrent return
    /// of the same loan sees RETURNED and fails instead of incrementing the
    /// stock a second time. The status update and the stock increment commit
    /// or roll back together.
    pub async fn mark_returned(&self, id: Uuid) -> AppResult<Borrowing> {
        let mut tx = self.pool.begin().await?;

        let borrowing =
            sqlx::query_as::<_, Borrowing>("SELECT * FROM m_borrowings WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?
                .ok_or(AppError::BorrowingNotFound(id))?;

        if borrowing.status != BorrowingStatus::Borrowed {
            return Err(AppError::AlreadyReturned(id));
        }

        let borrowing = sqlx::query_as::<_, Borrowing>(
            r#"
            UPDATE m_borrowings
            SET status = $1, return_date = $2, updated_at = NOW()
            WHERE id = $3
            RETURNING *
            "#,
        )
        .bind(BorrowingStatus::Returned)
        .bind(Utc::now().date_naive())
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("UPDATE m_books SET stock = stock + 1, updated_at = NOW() WHERE id = $1")
            .bind(borrowing.book_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(borrowing)
    }
}
