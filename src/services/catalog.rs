//! Catalog management service

use crate::{
    error::{AppError, AppResult},
    models::book::{Book, BookQuery, CreateBook, UpdateBook},
    repository::Repository,
};

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
}

impl CatalogService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Search books with filters
    pub async fn search_books(&self, query: &BookQuery) -> AppResult<(Vec<Book>, i64)> {
        self.repository.books.search(query).await
    }

    /// Get book by ID
    pub async fn get_book(&self, id: i64) -> AppResult<Book> {
        self.repository.books.get_by_id(id).await
    }

    /// Create a new book
    pub async fn create_book(&self, book: CreateBook) -> AppResult<Book> {
        if self.repository.books.isbn_exists(&book.isbn, None).await? {
            return Err(AppError::Conflict(format!(
                "A book with ISBN {} already exists",
                book.isbn
            )));
        }

        let created = self.repository.books.create(&book).await?;
        tracing::info!(book_id = created.id, isbn = %created.isbn, "book created");
        Ok(created)
    }

    /// Update an existing book
    pub async fn update_book(&self, id: i64, book: UpdateBook) -> AppResult<Book> {
        // Verify book exists
        self.repository.books.get_by_id(id).await?;

        if let Some(ref isbn) = book.isbn {
            if self.repository.books.isbn_exists(isbn, Some(id)).await? {
                return Err(AppError::Conflict(format!(
                    "A book with ISBN {} already exists",
                    isbn
                )));
            }
        }

        self.repository.books.update(id, &book).await
    }

    /// Delete a book. Refused while copies are out on loan: the ledger's
    /// stock accounting would be left pointing at nothing.
    pub async fn delete_book(&self, id: i64) -> AppResult<()> {
        self.repository.books.get_by_id(id).await?;

        let active = self.repository.borrowings.count_active_for_book(id).await?;
        if active > 0 {
            return Err(AppError::Conflict(format!(
                "Book has {} unreturned borrowing(s)",
                active
            )));
        }

        self.repository.books.delete(id).await?;
        tracing::info!(book_id = id, "book deleted");
        Ok(())
    }
}
