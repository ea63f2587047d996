use super::{
    OrderBy, QueryConfig, RawParams, Where, build_filters, build_pagination, build_search,
    build_sorting,
};

/// Everything the record store needs to run one list query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryDescriptor {
    pub page: u64,
    pub limit: u64,
    pub skip: u64,
    pub take: u64,
    /// `None` means "no constraint".
    pub condition: Option<Where>,
    pub order_by: OrderBy,
}

/// Build the full descriptor for a list request.
///
/// The search OR-clause (if any) comes first, followed by one conjunct per filter
/// in the order `config.filters` declares them.
pub fn compose_query(params: &RawParams, config: &QueryConfig) -> QueryDescriptor {
    let param = |key: &str| params.get(key).map(String::as_str);

    let window = build_pagination(param("page"), param("limit"), config.default_page_size);
    let order_by = build_sorting(param("sortBy"), param("sortOrder"), config.sort_fields);

    let mut conjuncts: Vec<Where> = build_search(param("search"), config.search_fields)
        .into_iter()
        .collect();
    conjuncts.extend(build_filters(params, config.filters));

    let condition = (!conjuncts.is_empty()).then(|| Where::And(conjuncts));

    tracing::debug!(
        page = window.page,
        limit = window.limit,
        condition = ?condition,
        sort_field = order_by.field,
        sort_direction = order_by.direction.as_str(),
        "Query built"
    );

    QueryDescriptor {
        page: window.page,
        limit: window.limit,
        skip: window.skip,
        take: window.take,
        condition,
        order_by,
    }
}
