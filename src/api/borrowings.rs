//! Borrowing (lending lifecycle) endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::borrowing::{Borrowing, BorrowingDetails, CreateBorrowing},
};

use super::AuthenticatedUser;

fn as_details(borrowings: Vec<Borrowing>) -> Vec<BorrowingDetails> {
    let today = Utc::now().date_naive();
    borrowings
        .into_iter()
        .map(|b| BorrowingDetails::from_record(b, today))
        .collect()
}

/// List the whole borrowing ledger
#[utoipa::path(
    get,
    path = "/borrowings",
    tag = "borrowings",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All borrowings", body = Vec<BorrowingDetails>),
        (status = 403, description = "Librarian rights required")
    )
)]
pub async fn list_borrowings(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<Vec<BorrowingDetails>>> {
    claims.require_staff()?;

    let borrowings = state.services.lending.list_borrowings().await?;
    Ok(Json(as_details(borrowings)))
}

/// Get a single borrowing
#[utoipa::path(
    get,
    path = "/borrowings/{id}",
    tag = "borrowings",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Borrowing ID")),
    responses(
        (status = 200, description = "The borrowing", body = BorrowingDetails),
        (status = 404, description = "Borrowing not found")
    )
)]
pub async fn get_borrowing(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<BorrowingDetails>> {
    claims.require_staff()?;

    let borrowing = state.services.lending.get_borrowing(id).await?;
    Ok(Json(BorrowingDetails::from_record(
        borrowing,
        Utc::now().date_naive(),
    )))
}

/// Borrow a book for a member
#[utoipa::path(
    post,
    path = "/borrowings",
    tag = "borrowings",
    security(("bearer_auth" = [])),
    request_body = CreateBorrowing,
    responses(
        (status = 201, description = "Borrowing created", body = BorrowingDetails),
        (status = 404, description = "Book or member not found"),
        (status = 409, description = "No copies available")
    )
)]
pub async fn create_borrowing(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(request): Json<CreateBorrowing>,
) -> AppResult<(StatusCode, Json<BorrowingDetails>)> {
    claims.require_staff()?;

    let borrowing = state
        .services
        .lending
        .borrow(request.book_id, request.member_id)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(BorrowingDetails::from_record(
            borrowing,
            Utc::now().date_naive(),
        )),
    ))
}

/// Return a borrowed book
#[utoipa::path(
    put,
    path = "/borrowings/{id}/return",
    tag = "borrowings",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Borrowing ID")),
    responses(
        (status = 200, description = "Book returned", body = BorrowingDetails),
        (status = 404, description = "Borrowing not found"),
        (status = 409, description = "Already returned")
    )
)]
pub async fn return_borrowing(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<BorrowingDetails>> {
    claims.require_staff()?;

    let borrowing = state.services.lending.return_borrowing(id).await?;
    Ok(Json(BorrowingDetails::from_record(
        borrowing,
        Utc::now().date_naive(),
    )))
}

/// List overdue borrowings
#[utoipa::path(
    get,
    path = "/borrowings/overdue",
    tag = "borrowings",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Unreturned borrowings past their due date", body = Vec<BorrowingDetails>),
        (status = 403, description = "Librarian rights required")
    )
)]
pub async fn list_overdue(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<Vec<BorrowingDetails>>> {
    claims.require_staff()?;

    let borrowings = state.services.lending.list_overdue().await?;
    Ok(Json(as_details(borrowings)))
}

/// List a member's borrowings
#[utoipa::path(
    get,
    path = "/members/{id}/borrowings",
    tag = "borrowings",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Member ID")),
    responses(
        (status = 200, description = "The member's borrowings", body = Vec<BorrowingDetails>),
        (status = 404, description = "Member not found")
    )
)]
pub async fn list_member_borrowings(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(member_id): Path<i64>,
) -> AppResult<Json<Vec<BorrowingDetails>>> {
    claims.require_staff()?;

    let borrowings = state
        .services
        .lending
        .list_member_borrowings(member_id)
        .await?;
    Ok(Json(as_details(borrowings)))
}
