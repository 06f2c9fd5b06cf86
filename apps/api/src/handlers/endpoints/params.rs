use integrations_application::{
    EndpointListQuery, HistoryQuery, MAX_NOTIFICATION_HISTORY_RESULTS, PageRequest, SortBy,
};
use integrations_core::{AppError, AppResult};
use integrations_domain::EndpointTypeFilter;

/// Query string of the endpoint routes.
///
/// Parsed by hand because `type` may repeat.
#[derive(Debug, Default, PartialEq, Eq)]
pub(crate) struct EndpointQueryParams {
    limit: Option<i64>,
    offset: Option<i64>,
    page_number: Option<i64>,
    types: Vec<String>,
    active: Option<bool>,
    name: Option<String>,
    sort_by: Option<String>,
    include_detail: Option<bool>,
}

impl EndpointQueryParams {
    pub(crate) fn parse(raw_query: Option<&str>) -> AppResult<Self> {
        let mut params = Self::default();

        for (key, value) in url::form_urlencoded::parse(raw_query.unwrap_or_default().as_bytes()) {
            match key.as_ref() {
                "limit" => params.limit = Some(parse_integer("limit", &value)?),
                "offset" => params.offset = Some(parse_integer("offset", &value)?),
                "pageNumber" => params.page_number = Some(parse_integer("pageNumber", &value)?),
                "type" => params.types.push(value.into_owned()),
                "active" => params.active = Some(parse_flag("active", &value)?),
                "name" => {
                    params.name = Some(value.trim().to_owned()).filter(|name| !name.is_empty());
                }
                "sort_by" | "sortBy" => params.sort_by = Some(value.into_owned()),
                "includeDetail" => {
                    params.include_detail = Some(parse_flag("includeDetail", &value)?);
                }
                _ => {}
            }
        }

        Ok(params)
    }

    pub(crate) fn include_detail(&self, default: bool) -> bool {
        self.include_detail.unwrap_or(default)
    }

    fn page(&self, max_limit: u64) -> AppResult<PageRequest> {
        PageRequest::from_transport(self.limit, self.offset, self.page_number, max_limit)
    }

    pub(crate) fn endpoint_list_query(self, max_page_size: u64) -> AppResult<EndpointListQuery> {
        let type_filters = self
            .types
            .iter()
            .map(|value| EndpointTypeFilter::parse_transport(value.as_str()))
            .collect::<AppResult<Vec<_>>>()?;

        Ok(EndpointListQuery {
            page: self.page(max_page_size)?,
            sort: SortBy::parse_transport(self.sort_by.as_deref(), EndpointListQuery::DEFAULT_SORT)?,
            type_filters,
            active: self.active,
            name: self.name,
        })
    }

    pub(crate) fn history_query(self) -> AppResult<HistoryQuery> {
        Ok(HistoryQuery {
            page: self.page(MAX_NOTIFICATION_HISTORY_RESULTS)?,
            sort: SortBy::parse_transport(self.sort_by.as_deref(), HistoryQuery::DEFAULT_SORT)?,
            include_detail: self.include_detail(false),
        })
    }
}

fn parse_integer(name: &str, value: &str) -> AppResult<i64> {
    value
        .trim()
        .parse::<i64>()
        .map_err(|_| AppError::Validation(format!("{name} must be an integer, got '{value}'")))
}

fn parse_flag(name: &str, value: &str) -> AppResult<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(AppError::Validation(format!(
            "{name} must be 'true' or 'false', got '{value}'"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use integrations_application::{EndpointSortField, SortDirection};
    use integrations_core::AppError;
    use integrations_domain::EndpointType;

    use super::EndpointQueryParams;

    #[test]
    fn repeated_type_values_are_all_kept() {
        let params = EndpointQueryParams::parse(Some("type=webhook&type=camel%3Aslack&active=true"));
        let Ok(params) = params else {
            panic!("query should parse");
        };

        let query = params.endpoint_list_query(200);

        let Ok(query) = query else {
            panic!("query should convert");
        };
        assert_eq!(query.type_filters.len(), 2);
        assert_eq!(query.type_filters[1].endpoint_type(), EndpointType::Camel);
        assert_eq!(query.type_filters[1].sub_type(), Some("slack"));
        assert_eq!(query.active, Some(true));
    }

    #[test]
    fn offset_wins_over_page_number() {
        let Ok(params) = EndpointQueryParams::parse(Some("limit=10&pageNumber=3&offset=5")) else {
            panic!("query should parse");
        };

        let query = params.endpoint_list_query(200);

        assert!(matches!(
            query,
            Ok(ref query) if query.page.offset() == 5 && query.page.limit() == Some(10)
        ));
    }

    #[test]
    fn sort_and_history_defaults() {
        let Ok(params) = EndpointQueryParams::parse(Some("sort_by=name:desc")) else {
            panic!("query should parse");
        };
        let Ok(query) = params.endpoint_list_query(200) else {
            panic!("query should convert");
        };
        assert_eq!(query.sort.field, EndpointSortField::Name);
        assert_eq!(query.sort.direction, SortDirection::Desc);

        let Ok(params) = EndpointQueryParams::parse(None) else {
            panic!("empty query should parse");
        };
        let Ok(history) = params.history_query() else {
            panic!("history query should convert");
        };
        assert!(!history.include_detail);
        assert_eq!(history.sort.direction, SortDirection::Desc);
        assert_eq!(history.page.limit(), None);
    }

    #[test]
    fn invalid_values_are_validation_errors() {
        assert!(matches!(
            EndpointQueryParams::parse(Some("limit=ten")),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            EndpointQueryParams::parse(Some("active=maybe")),
            Err(AppError::Validation(_))
        ));

        let unknown_type = EndpointQueryParams::parse(Some("type=carrier_pigeon"))
            .and_then(|params| params.endpoint_list_query(200));
        assert!(matches!(unknown_type, Err(AppError::Validation(_))));

        let too_large = EndpointQueryParams::parse(Some("limit=201"))
            .and_then(|params| params.endpoint_list_query(200));
        assert!(matches!(too_large, Err(AppError::Validation(_))));

        let unknown_sort = EndpointQueryParams::parse(Some("sort_by=color"))
            .and_then(|params| params.endpoint_list_query(200));
        assert!(matches!(unknown_sort, Err(AppError::Validation(_))));
    }
}
