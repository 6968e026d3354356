pub mod authors;
pub mod books;
pub mod lending;
pub mod loans;
pub mod members;

use crate::application::loan::ServiceDependencies;
use crate::config::PaginationConfig;
use chrono::{Local, NaiveDate};

// ============================================================================
// State
// ============================================================================

/// ハンドラー間で共有されるアプリケーション状態
#[derive(Clone)]
pub struct AppState {
    pub service_deps: ServiceDependencies,
    pub pagination: PaginationConfig,
}

impl AppState {
    pub fn new(service_deps: ServiceDependencies, pagination: PaginationConfig) -> Self {
        Self {
            service_deps,
            pagination,
        }
    }
}

/// リクエスト処理日（サーバーのローカル日付）
fn today() -> NaiveDate {
    Local::now().date_naive()
}
