// HTTP handlers, one module per resource
pub mod chat;
pub mod companies;
pub mod dashboard;
pub mod deals;
pub mod embeddings;
pub mod thesis;

use axum::extract::FromRequest;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::entities::parse_category;
use crate::error::AppError;

/// `Json` body extractor whose rejections are `AppError::InvalidRequest` (400, JSON body).
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

pub const DEFAULT_PAGE_SIZE: u64 = 20;
pub const MAX_PAGE_SIZE: u64 = 100;

#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageQuery {
    /// 1-based page number (default: 1)
    #[param(required = false)]
    pub page: Option<u64>,
    /// Items per page, 1-100 (default: 20)
    #[param(required = false)]
    pub page_size: Option<u64>,
}

impl PageQuery {
    /// Validated `(page, page_size)`, page 1-based.
    pub fn resolve(&self) -> Result<(u64, u64), AppError> {
        let page = self.page.unwrap_or(1);
        let page_size = self.page_size.unwrap_or(DEFAULT_PAGE_SIZE);
        if page == 0 {
            return Err(AppError::InvalidRequest("page must be at least 1".to_string()));
        }
        if page_size == 0 || page_size > MAX_PAGE_SIZE {
            return Err(AppError::InvalidRequest(format!(
                "page_size must be between 1 and {MAX_PAGE_SIZE}"
            )));
        }
        Ok((page, page_size))
    }
}

/// Paging metadata shared by the list responses.
#[derive(Debug, Serialize, ToSchema)]
pub struct PageInfo {
    pub page: u64,
    pub page_size: u64,
    pub total: u64,
    pub total_pages: u64,
}

impl PageInfo {
    pub fn new(page: u64, page_size: u64, total: u64) -> Self {
        Self {
            page,
            page_size,
            total,
            total_pages: total.div_ceil(page_size),
        }
    }
}

/// Parses an optional, possibly blank, query-string category filter.
pub(crate) fn category_filter<E>(field: &str, raw: Option<&str>) -> Result<Option<E>, AppError>
where
    E: sea_orm::ActiveEnum<Value = String>,
{
    match raw.map(str::trim).filter(|v| !v.is_empty()) {
        Some(value) => parse_category(field, value).map(Some),
        None => Ok(None),
    }
}
