use crate::application::loan::{
    extend_due_date as execute_extend_due_date, loan_book as execute_loan_book,
    return_book as execute_return_book,
};
use crate::domain::{
    commands::{ExtendDueDate, LoanBook, ReturnBook},
    value_objects::{BookId, LoanId},
};
use axum::{Json, extract::State, http::StatusCode};
use std::sync::Arc;
use uuid::Uuid;

use crate::api::{
    error::ApiError,
    extract::{ApiJson, ApiPath},
    types::{ExtendDueDateRequest, LoanBookRequest, LoanResponse, StatusResponse},
};
use super::{AppState, today};

/// POST /books/:id/loan - 書籍を貸し出す
///
/// 強制されるビジネスルール:
/// - 書籍が存在すること（404）
/// - 在庫が1冊以上あること
/// - 会員が存在すること
///
/// 貸出完了メールはレスポンスを待たせずにバックグラウンドで送られる。
pub async fn loan_book(
    State(state): State<Arc<AppState>>,
    ApiPath(book_id): ApiPath<Uuid>,
    ApiJson(req): ApiJson<LoanBookRequest>,
) -> Result<(StatusCode, Json<StatusResponse>), ApiError> {
    let cmd = LoanBook {
        book_id: BookId::from_uuid(book_id),
        member_id: req.member_id(),
        loaned_on: today(),
    };

    execute_loan_book(&state.service_deps, cmd).await?;

    Ok((
        StatusCode::CREATED,
        Json(StatusResponse::new("Book loaned successfully.")),
    ))
}

/// POST /books/:id/return_book - 書籍を返却する
///
/// 書籍と会員の組に対する貸出中の貸出を返却済みにし、在庫を1冊戻す。
pub async fn return_book(
    State(state): State<Arc<AppState>>,
    ApiPath(book_id): ApiPath<Uuid>,
    ApiJson(req): ApiJson<LoanBookRequest>,
) -> Result<Json<StatusResponse>, ApiError> {
    let cmd = ReturnBook {
        book_id: BookId::from_uuid(book_id),
        member_id: req.member_id(),
        returned_on: today(),
    };

    execute_return_book(&state.service_deps, cmd).await?;

    Ok(Json(StatusResponse::new("Book returned successfully.")))
}

/// POST /loans/:id/extend_due_date - 返却期限を延長する
///
/// 強制されるビジネスルール:
/// - 貸出が存在すること（404）
/// - 延長日数が正の整数であること
/// - 延滞中・返却済みでないこと
pub async fn extend_due_date(
    State(state): State<Arc<AppState>>,
    ApiPath(loan_id): ApiPath<Uuid>,
    ApiJson(req): ApiJson<ExtendDueDateRequest>,
) -> Result<Json<LoanResponse>, ApiError> {
    let cmd = ExtendDueDate {
        loan_id: LoanId::from_uuid(loan_id),
        additional_days: req.additional_days(),
        requested_on: today(),
    };

    let loan = execute_extend_due_date(&state.service_deps, cmd).await?;

    Ok(Json(LoanResponse::from(loan)))
}
