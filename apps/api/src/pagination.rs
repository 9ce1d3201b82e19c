//! Skip/limit paging shared by every list endpoint.
//!
//! Pages are 1-based. Out-of-range pages yield an empty `data` slice rather
//! than an error; ordering is whatever the store returns.

use serde::{Deserialize, Serialize};

use crate::errors::AppError;

/// Default page size of the candidate and employer list endpoints.
pub const LIST_DEFAULT_LIMIT: u64 = 10;
/// Largest `limit` those endpoints accept.
pub const LIST_MAX_LIMIT: u64 = 100;

/// Raw `?page=&limit=` query parameters before defaults are applied.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PageParams {
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

/// A validated page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
    pub limit: u64,
}

impl PageRequest {
    pub fn new(page: u64, limit: u64) -> Result<Self, AppError> {
        if page < 1 {
            return Err(AppError::Validation("page must be >= 1".to_string()));
        }
        if limit < 1 {
            return Err(AppError::Validation("limit must be >= 1".to_string()));
        }
        Ok(Self { page, limit })
    }

    /// Applies the endpoint's default limit and optional cap.
    pub fn from_params(
        params: PageParams,
        default_limit: u64,
        max_limit: Option<u64>,
    ) -> Result<Self, AppError> {
        let request = Self::new(params.page.unwrap_or(1), params.limit.unwrap_or(default_limit))?;
        if let Some(max) = max_limit {
            if request.limit > max {
                return Err(AppError::Validation(format!("limit must be <= {max}")));
            }
        }
        Ok(request)
    }

    pub fn offset(&self) -> u64 {
        (self.page - 1).saturating_mul(self.limit)
    }

    /// The natural-order slice `[offset, offset + limit)` of `items`.
    pub fn slice<T: Clone>(&self, items: &[T]) -> Vec<T> {
        let start = usize::try_from(self.offset()).unwrap_or(usize::MAX);
        let limit = usize::try_from(self.limit).unwrap_or(usize::MAX);
        items.iter().skip(start).take(limit).cloned().collect()
    }
}

pub fn total_pages(total_count: u64, limit: u64) -> u64 {
    if limit == 0 {
        return 0;
    }
    total_count.div_ceil(limit)
}

/// Page envelope returned by list endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub total_count: u64,
    pub total_pages: u64,
    pub current_page: u64,
    pub page_size: u64,
}

impl<T> Page<T> {
    pub fn new(data: Vec<T>, total_count: u64, request: PageRequest) -> Self {
        Self {
            data,
            total_count,
            total_pages: total_pages(total_count, request.limit),
            current_page: request.page,
            page_size: request.limit,
        }
    }
}

impl<T: Clone> Page<T> {
    /// Pages an in-memory result set whose full length is the total count.
    pub fn from_slice(items: &[T], request: PageRequest) -> Self {
        Self::new(request.slice(items), items.len() as u64, request)
    }
}
