//! Lending engine: the borrow/return lifecycle over catalog stock and the ledger

use chrono::Utc;
use uuid::Uuid;

use crate::{
    config::LendingConfig,
    error::AppResult,
    models::borrowing::Borrowing,
    repository::Repository,
};

#[derive(Clone)]
pub struct LendingService {
    repository: Repository,
    config: LendingConfig,
}

impl LendingService {
    pub fn new(repository: Repository, config: LendingConfig) -> Self {
        Self { repository, config }
    }

    /// Borrow a copy of a book for a member.
    ///
    /// The referenced book and member must exist. The stock decrement and the
    /// ledger insert happen atomically in the repository; the stock is
    /// re-checked there under the book-row lock, so the pre-checks here only
    /// order the NotFound errors ahead of the critical section.
    pub async fn borrow(&self, book_id: i64, member_id: i64) -> AppResult<Borrowing> {
        self.repository.books.get_by_id(book_id).await?;
        self.repository.members.get_by_id(member_id).await?;

        let borrowing = self
            .repository
            .borrowings
            .create(book_id, member_id, self.config.loan_period_days)
            .await?;

        tracing::info!(
            borrowing_id = %borrowing.id,
            book_id,
            member_id,
            due_date = %borrowing.due_date,
            "book borrowed"
        );

        Ok(borrowing)
    }

    /// Return a borrowed copy
    pub async fn return_borrowing(&self, id: Uuid) -> AppResult<Borrowing> {
        let borrowing = self.repository.borrowings.mark_returned(id).await?;

        tracing::info!(
            borrowing_id = %id,
            book_id = borrowing.book_id,
            member_id = borrowing.member_id,
            "book returned"
        );

        Ok(borrowing)
    }

    /// Get a single ledger entry
    pub async fn get_borrowing(&self, id: Uuid) -> AppResult<Borrowing> {
        self.repository.borrowings.get_by_id(id).await
    }

    /// Full ledger
    pub async fn list_borrowings(&self) -> AppResult<Vec<Borrowing>> {
        self.repository.borrowings.list_all().await
    }

    /// Borrowings for a member
    pub async fn list_member_borrowings(&self, member_id: i64) -> AppResult<Vec<Borrowing>> {
        // Verify member exists
        self.repository.members.get_by_id(member_id).await?;
        self.repository.borrowings.list_by_member(member_id).await
    }

    /// Unreturned borrowings past their due date as of today
    pub async fn list_overdue(&self) -> AppResult<Vec<Borrowing>> {
        self.repository
            .borrowings
            .list_overdue(Utc::now().date_naive())
            .await
    }

    /// Count active borrowings
    pub async fn count_active(&self) -> AppResult<i64> {
        self.repository.borrowings.count_active().await
    }

    /// Count overdue borrowings
    pub async fn count_overdue(&self) -> AppResult<i64> {
        self.repository
            .borrowings
            .count_overdue(Utc::now().date_naive())
            .await
    }
}
