//! # Filter State
//!
//! The filter, sort, and pagination inputs of a list page, and their
//! serialization into query parameters.
//!
//! Two rules hold for every list endpoint:
//! - empty values are omitted from the query string, never sent as `key=`;
//! - changing a filter or the sort order sends the page back to [`FIRST_PAGE`].

use std::collections::BTreeMap;

/// The page every filter change returns to.
pub const FIRST_PAGE: u32 = 1;

/// Page size used when a resource does not override it.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Name of the page-size query parameter. Endpoints disagree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageSizeParam {
    PerPage,
    Limit,
}

impl PageSizeParam {
    pub fn key(self) -> &'static str {
        match self {
            PageSizeParam::PerPage => "per_page",
            PageSizeParam::Limit => "limit",
        }
    }
}

/// Naming convention of the sort parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortParams {
    /// `sort_by` / `sort_order`
    SortBy,
    /// `sort` / `order`
    Sort,
}

impl SortParams {
    pub fn keys(self) -> (&'static str, &'static str) {
        match self {
            SortParams::SortBy => ("sort_by", "sort_order"),
            SortParams::Sort => ("sort", "order"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

/// Current filter, sort and pagination values of one list page.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterState {
    page: u32,
    page_size: u32,
    page_size_param: PageSizeParam,
    sort_params: SortParams,
    sort: Option<(String, SortDirection)>,
    fields: BTreeMap<String, String>,
}

impl Default for FilterState {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE, PageSizeParam::PerPage, SortParams::SortBy)
    }
}

impl FilterState {
    pub fn new(page_size: u32, page_size_param: PageSizeParam, sort_params: SortParams) -> Self {
        Self {
            page: FIRST_PAGE,
            page_size: page_size.max(1),
            page_size_param,
            sort_params,
            sort: None,
            fields: BTreeMap::new(),
        }
    }

    /// Builder form of [`FilterState::apply`].
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.apply(name, value);
        self
    }

    /// Sets a named filter. An empty value removes the filter.
    ///
    /// Always resets the page to [`FIRST_PAGE`].
    pub fn apply(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        if value.is_empty() {
            self.fields.remove(&name);
        } else {
            self.fields.insert(name, value);
        }
        self.page = FIRST_PAGE;
    }

    /// Removes every named filter and the sort order.
    pub fn reset(&mut self) {
        self.fields.clear();
        self.sort = None;
        self.page = FIRST_PAGE;
    }

    pub fn set_page(&mut self, page: u32) {
        self.page = page.max(FIRST_PAGE);
    }

    pub fn set_page_size(&mut self, page_size: u32) {
        self.page_size = page_size.max(1);
        self.page = FIRST_PAGE;
    }

    /// Changes the sort order. Resets the page like any other filter change.
    pub fn set_sort(&mut self, field: impl Into<String>, direction: SortDirection) {
        let field = field.into();
        self.sort = if field.is_empty() { None } else { Some((field, direction)) };
        self.page = FIRST_PAGE;
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    pub fn sort(&self) -> Option<(&str, SortDirection)> {
        self.sort.as_ref().map(|(field, dir)| (field.as_str(), *dir))
    }

    /// Serializes into query parameters: page, page size, sort, then the
    /// named filters in name order. Empty values are skipped.
    pub fn to_query(&self) -> Vec<(String, String)> {
        let mut query = vec![
            ("page".to_string(), self.page.to_string()),
            (self.page_size_param.key().to_string(), self.page_size.to_string()),
        ];
        if let Some((field, direction)) = &self.sort {
            let (sort_key, order_key) = self.sort_params.keys();
            query.push((sort_key.to_string(), field.clone()));
            query.push((order_key.to_string(), direction.as_str().to_string()));
        }
        query.extend(
            self.fields
                .iter()
                .filter(|(_, value)| !value.is_empty())
                .map(|(name, value)| (name.clone(), value.clone())),
        );
        query
    }
}
