use std::collections::BTreeMap;
use std::str::FromStr;

use integrations_core::{AppError, AppResult};

mod links;

pub use links::PageLinks;

/// Upper bound applied to history pages requested without a limit.
pub const MAX_NOTIFICATION_HISTORY_RESULTS: u64 = 500;

/// Validated limit/offset window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    limit: Option<u64>,
    offset: u64,
}

impl PageRequest {
    /// Creates a window without an upper bound starting at the first record.
    #[must_use]
    pub fn unbounded() -> Self {
        Self {
            limit: None,
            offset: 0,
        }
    }

    /// Validates transport parameters.
    ///
    /// A missing or zero `limit` means "all records". An explicit `offset` wins
    /// over `page_number`, which otherwise starts the window at
    /// `page_number * limit`.
    pub fn from_transport(
        limit: Option<i64>,
        offset: Option<i64>,
        page_number: Option<i64>,
        max_limit: u64,
    ) -> AppResult<Self> {
        let limit = match limit {
            None | Some(0) => None,
            Some(value) if value < 0 => {
                return Err(AppError::Validation(format!(
                    "limit must not be negative, got {value}"
                )));
            }
            Some(value) => {
                let value = value.unsigned_abs();
                if value > max_limit {
                    return Err(AppError::Validation(format!(
                        "limit must not exceed {max_limit}, got {value}"
                    )));
                }
                Some(value)
            }
        };

        let offset = match (offset, page_number) {
            (Some(value), _) if value < 0 => {
                return Err(AppError::Validation(format!(
                    "offset must not be negative, got {value}"
                )));
            }
            (Some(value), _) => value.unsigned_abs(),
            (None, Some(value)) if value < 0 => {
                return Err(AppError::Validation(format!(
                    "pageNumber must not be negative, got {value}"
                )));
            }
            (None, Some(value)) => value
                .unsigned_abs()
                .checked_mul(limit.unwrap_or(0))
                .ok_or_else(|| {
                    AppError::Validation(format!("pageNumber {value} is out of range"))
                })?,
            (None, None) => 0,
        };

        Ok(Self { limit, offset })
    }

    /// Returns the maximum number of records, `None` meaning all.
    #[must_use]
    pub fn limit(&self) -> Option<u64> {
        self.limit
    }

    /// Returns the number of records to skip.
    #[must_use]
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Replaces a missing limit with `cap`.
    #[must_use]
    pub fn capped(self, cap: u64) -> Self {
        Self {
            limit: Some(self.limit.unwrap_or(cap)),
            offset: self.offset,
        }
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::unbounded()
    }
}

/// Ordering direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    /// Smallest first.
    Asc,
    /// Largest first.
    Desc,
}

impl SortDirection {
    /// Returns the SQL keyword.
    #[must_use]
    pub fn as_sql(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// Sort key for a listing, parsed from `field[:asc|desc]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortBy<F> {
    /// Field to sort on.
    pub field: F,
    /// Direction of the sort.
    pub direction: SortDirection,
}

impl<F> SortBy<F>
where
    F: FromStr<Err = AppError>,
{
    /// Parses the transport value, falling back to `default` when absent.
    pub fn parse_transport(value: Option<&str>, default: Self) -> AppResult<Self> {
        let Some(value) = value.map(str::trim).filter(|value| !value.is_empty()) else {
            return Ok(default);
        };

        let (field, direction) = match value.split_once(':') {
            Some((field, direction)) => (field, Some(direction)),
            None => (value, None),
        };

        let direction = match direction.map(str::to_ascii_lowercase).as_deref() {
            None | Some("asc") => SortDirection::Asc,
            Some("desc") => SortDirection::Desc,
            Some(other) => {
                return Err(AppError::Validation(format!(
                    "unknown sort direction '{other}'"
                )));
            }
        };

        Ok(Self {
            field: F::from_str(field.trim())?,
            direction,
        })
    }
}

/// Metadata block of a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PageMeta {
    /// Number of records in the whole (filtered) result, not just this page.
    pub count: u64,
}

/// A page of records with navigation links.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    /// Records in query order.
    pub data: Vec<T>,
    /// Navigation links keyed by relation name.
    pub links: PageLinks,
    /// Page metadata.
    pub meta: PageMeta,
}

impl<T> Page<T> {
    /// Creates a page from records, links and the total count.
    #[must_use]
    pub fn new(data: Vec<T>, links: PageLinks, count: u64) -> Self {
        Self {
            data,
            links,
            meta: PageMeta { count },
        }
    }

    /// Creates the page returned when the caller may see nothing.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            data: Vec::new(),
            links: PageLinks::from_map(BTreeMap::new()),
            meta: PageMeta::default(),
        }
    }
}
