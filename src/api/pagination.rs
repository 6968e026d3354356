use crate::config::PaginationConfig;
use crate::ports::{PageRequest, Paged};
use serde::{Deserialize, Serialize};

use super::error::ApiError;

/// 一覧取得のクエリパラメータ（`?page=2&page_size=20`）
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

/// 検証済みのページ指定
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageParams {
    pub page: u64,
    pub page_size: u64,
}

impl PageQuery {
    /// 既定値と上限を適用してページ指定を確定する
    ///
    /// 1未満の値は 400。`page_size` は上限で切り詰める。
    pub fn resolve(&self, config: &PaginationConfig) -> Result<PageParams, ApiError> {
        let page = match self.page {
            None => 1,
            Some(page) if page >= 1 => page as u64,
            Some(_) => return Err(ApiError::BadRequest("page must be at least 1.".to_string())),
        };

        let page_size = match self.page_size {
            None => config.default_page_size,
            Some(size) if size >= 1 => (size as u64).min(config.max_page_size),
            Some(_) => {
                return Err(ApiError::BadRequest(
                    "page_size must be at least 1.".to_string(),
                ));
            }
        };

        Ok(PageParams { page, page_size })
    }
}

impl PageParams {
    pub fn request(&self) -> PageRequest {
        PageRequest {
            offset: (self.page - 1).saturating_mul(self.page_size),
            limit: self.page_size,
        }
    }
}

/// ページ付き一覧レスポンス
#[derive(Debug, Serialize)]
pub struct PaginatedResponse<T> {
    pub count: u64,
    pub page: u64,
    pub page_size: u64,
    pub next: Option<u64>,
    pub previous: Option<u64>,
    pub results: Vec<T>,
}

impl<T> PaginatedResponse<T> {
    /// 取得結果をレスポンスに変換する
    ///
    /// 範囲外のページは 404 `Invalid page.`。空の一覧の1ページ目は範囲内とする。
    pub fn build<U>(
        params: PageParams,
        paged: Paged<U>,
        to_response: impl FnMut(U) -> T,
    ) -> Result<Self, ApiError> {
        let offset = params.request().offset;
        if params.page > 1 && offset >= paged.total {
            return Err(ApiError::NotFound("Invalid page.".to_string()));
        }

        let shown = offset + paged.items.len() as u64;
        Ok(Self {
            count: paged.total,
            page: params.page,
            page_size: params.page_size,
            next: (shown < paged.total).then_some(params.page + 1),
            previous: (params.page > 1).then(|| params.page - 1),
            results: paged.items.into_iter().map(to_response).collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(page: Option<i64>, page_size: Option<i64>) -> PageQuery {
        PageQuery { page, page_size }
    }

    fn paged(items: Vec<u32>, total: u64) -> Paged<u32> {
        Paged { items, total }
    }

    #[test]
    fn test_resolve_applies_defaults() {
        let params = query(None, None).resolve(&PaginationConfig::default()).unwrap();
        assert_eq!(
            params,
            PageParams {
                page: 1,
                page_size: 10
            }
        );
        assert_eq!(params.request(), PageRequest { offset: 0, limit: 10 });
    }

    #[test]
    fn test_resolve_caps_page_size() {
        let params = query(Some(3), Some(500))
            .resolve(&PaginationConfig::default())
            .unwrap();
        assert_eq!(params.page_size, 100);
        assert_eq!(params.request().offset, 200);
    }

    #[test]
    fn test_resolve_rejects_values_below_one() {
        let config = PaginationConfig::default();
        assert!(matches!(
            query(Some(0), None).resolve(&config),
            Err(ApiError::BadRequest(_))
        ));
        assert!(matches!(
            query(None, Some(-5)).resolve(&config),
            Err(ApiError::BadRequest(_))
        ));
    }

    #[test]
    fn test_build_links_neighbouring_pages() {
        let params = PageParams {
            page: 2,
            page_size: 2,
        };
        let response = PaginatedResponse::build(params, paged(vec![3, 4], 5), |n| n * 10).unwrap();

        assert_eq!(response.count, 5);
        assert_eq!(response.next, Some(3));
        assert_eq!(response.previous, Some(1));
        assert_eq!(response.results, vec![30, 40]);
    }

    #[test]
    fn test_build_last_page_has_no_next() {
        let params = PageParams {
            page: 3,
            page_size: 2,
        };
        let response = PaginatedResponse::build(params, paged(vec![5], 5), |n| n).unwrap();

        assert_eq!(response.next, None);
        assert_eq!(response.previous, Some(2));
    }

    #[test]
    fn test_build_empty_first_page_is_valid() {
        let params = PageParams {
            page: 1,
            page_size: 10,
        };
        let response = PaginatedResponse::build(params, paged(vec![], 0), |n| n).unwrap();

        assert_eq!(response.count, 0);
        assert!(response.results.is_empty());
        assert_eq!(response.next, None);
        assert_eq!(response.previous, None);
    }

    #[test]
    fn test_build_rejects_page_past_the_end() {
        let params = PageParams {
            page: 4,
            page_size: 2,
        };
        let result = PaginatedResponse::build(params, paged(vec![], 5), |n| n);
        assert!(matches!(result, Err(ApiError::NotFound(message)) if message == "Invalid page."));
    }
}
