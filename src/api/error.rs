use crate::application::{catalog::CatalogError, loan::LendingError};
use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use validator::ValidationErrors;

use super::types::ErrorResponse;

/// API層のエラー型
///
/// アプリケーション層のエラーと入力エラーをHTTPレスポンスにマッピングする。
/// 本文は常に `{"error": message}`。
#[derive(Debug)]
pub enum ApiError {
    Lending(LendingError),
    Catalog(CatalogError),
    BadRequest(String),
    NotFound(String),
}

impl From<LendingError> for ApiError {
    fn from(err: LendingError) -> Self {
        ApiError::Lending(err)
    }
}

impl From<CatalogError> for ApiError {
    fn from(err: CatalogError) -> Self {
        ApiError::Catalog(err)
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        ApiError::BadRequest(errors.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

/// エラーチェーンを1行の文字列にする（ログ用）
fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

/// 内部エラーの詳細はログに記録し、クライアントには一般的なメッセージのみを返す
fn internal(err: &dyn std::error::Error) -> (StatusCode, String) {
    tracing::error!(error = %error_chain(err), "internal error");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "Internal server error".to_string(),
    )
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Lending(err) => match err {
                // 404 Not Found - パスで指定されたリソースが存在しない
                LendingError::BookNotFound | LendingError::LoanNotFound => {
                    (StatusCode::NOT_FOUND, err.to_string())
                }

                // 400 Bad Request - 貸出ルール違反・入力不正
                LendingError::NoAvailableCopies
                | LendingError::MemberNotFound
                | LendingError::ActiveLoanNotFound
                | LendingError::InvalidExtensionDays
                | LendingError::LoanDateOutOfRange
                | LendingError::LoanOverdue
                | LendingError::LoanAlreadyReturned => (StatusCode::BAD_REQUEST, err.to_string()),

                // 500 Internal Server Error - 永続化の障害
                LendingError::BookStoreError(_)
                | LendingError::MemberStoreError(_)
                | LendingError::LoanStoreError(_) => internal(&err),
            },
            ApiError::Catalog(err) => match err {
                CatalogError::NotFound(_) => (StatusCode::NOT_FOUND, err.to_string()),
                CatalogError::Invalid(message) => (StatusCode::BAD_REQUEST, message),
                CatalogError::Storage(_) => internal(&err),
            },
            ApiError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            ApiError::NotFound(message) => (StatusCode::NOT_FOUND, message),
        };

        (status, Json(ErrorResponse::new(message))).into_response()
    }
}
