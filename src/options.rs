//! Request options: pagination, field selection, sorting and extra parameters.
//!
//! Options are kept in the order they were added. When turned into query
//! parameters, a later option overrides an earlier one that sets the same key
//! (in the earlier one's position), which is how caller options override the
//! list defaults.
//!
//! ```rust
//! use idm_management::options::RequestOptions;
//!
//! let options = RequestOptions::list_defaults().merge(&RequestOptions::new().page(0).per_page(10));
//! assert_eq!(
//!     options.query_pairs(),
//!     vec![
//!         ("per_page".to_string(), "10".to_string()),
//!         ("include_totals".to_string(), "true".to_string()),
//!         ("page".to_string(), "0".to_string()),
//!     ]
//! );
//! ```

/// Page size used by list operations unless the caller overrides it.
pub const DEFAULT_PER_PAGE: u32 = 50;

/// A single request option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestOption {
    /// Zero-based page index (`page`)
    Page(u32),
    /// Items per page (`per_page`)
    PerPage(u32),
    /// Wrap list results with totals (`include_totals`)
    IncludeTotals(bool),
    /// Only return these fields (`fields` + `include_fields=true`)
    IncludeFields(Vec<String>),
    /// Return everything but these fields (`fields` + `include_fields=false`)
    ExcludeFields(Vec<String>),
    /// Sort expression such as `created_at:-1` (`sort`)
    Sort(String),
    /// Checkpoint pagination cursor (`from`)
    From(String),
    /// Checkpoint page size (`take`)
    Take(u32),
    /// Search query (`q` + `search_engine=v3`)
    Query(String),
    /// Arbitrary query parameter
    Parameter(String, String),
    /// Arbitrary request header
    Header(String, String),
}

/// Sort direction for [`RequestOptions::sort_by`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

impl RequestOption {
    fn query_pairs(&self) -> Vec<(String, String)> {
        let pair = |key: &str, value: String| (key.to_string(), value);
        match self {
            RequestOption::Page(page) => vec![pair("page", page.to_string())],
            RequestOption::PerPage(per_page) => vec![pair("per_page", per_page.to_string())],
            RequestOption::IncludeTotals(include) => {
                vec![pair("include_totals", include.to_string())]
            }
            RequestOption::IncludeFields(fields) => vec![
                pair("fields", fields.join(",")),
                pair("include_fields", "true".to_string()),
            ],
            RequestOption::ExcludeFields(fields) => vec![
                pair("fields", fields.join(",")),
                pair("include_fields", "false".to_string()),
            ],
            RequestOption::Sort(sort) => vec![pair("sort", sort.clone())],
            RequestOption::From(from) => vec![pair("from", from.clone())],
            RequestOption::Take(take) => vec![pair("take", take.to_string())],
            RequestOption::Query(query) => vec![
                pair("search_engine", "v3".to_string()),
                pair("q", query.clone()),
            ],
            RequestOption::Parameter(key, value) => vec![(key.clone(), value.clone())],
            RequestOption::Header(..) => Vec::new(),
        }
    }
}

/// Ordered collection of [`RequestOption`]s applied to one call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestOptions {
    options: Vec<RequestOption>,
}

impl RequestOptions {
    /// Create an empty set of options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Baseline applied by every list operation: `per_page=50`, `include_totals=true`.
    pub fn list_defaults() -> Self {
        Self::new().per_page(DEFAULT_PER_PAGE).include_totals(true)
    }

    /// Append an option.
    pub fn with(mut self, option: RequestOption) -> Self {
        self.options.push(option);
        self
    }

    /// Append every option of `overrides` after this one's.
    pub fn merge(mut self, overrides: &RequestOptions) -> Self {
        self.options.extend(overrides.options.iter().cloned());
        self
    }

    pub fn page(self, page: u32) -> Self {
        self.with(RequestOption::Page(page))
    }

    pub fn per_page(self, per_page: u32) -> Self {
        self.with(RequestOption::PerPage(per_page))
    }

    pub fn include_totals(self, include: bool) -> Self {
        self.with(RequestOption::IncludeTotals(include))
    }

    pub fn include_fields<I, S>(self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.with(RequestOption::IncludeFields(
            fields.into_iter().map(Into::into).collect(),
        ))
    }

    pub fn exclude_fields<I, S>(self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.with(RequestOption::ExcludeFields(
            fields.into_iter().map(Into::into).collect(),
        ))
    }

    /// Raw sort expression, `field:1` or `field:-1`.
    pub fn sort(self, sort: impl Into<String>) -> Self {
        self.with(RequestOption::Sort(sort.into()))
    }

    pub fn sort_by(self, field: &str, order: SortOrder) -> Self {
        let direction = match order {
            SortOrder::Ascending => 1,
            SortOrder::Descending => -1,
        };
        self.sort(format!("{field}:{direction}"))
    }

    pub fn from(self, checkpoint: impl Into<String>) -> Self {
        self.with(RequestOption::From(checkpoint.into()))
    }

    pub fn take(self, take: u32) -> Self {
        self.with(RequestOption::Take(take))
    }

    pub fn query(self, query: impl Into<String>) -> Self {
        self.with(RequestOption::Query(query.into()))
    }

    pub fn parameter(self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.with(RequestOption::Parameter(key.into(), value.into()))
    }

    pub fn header(self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.with(RequestOption::Header(name.into(), value.into()))
    }

    /// The options in the order they were added.
    pub fn iter(&self) -> impl Iterator<Item = &RequestOption> {
        self.options.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    /// Query parameters, ordered by first appearance of each key, last value wins.
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs: Vec<(String, String)> = Vec::new();
        for (key, value) in self.options.iter().flat_map(RequestOption::query_pairs) {
            match pairs.iter_mut().find(|(existing, _)| *existing == key) {
                Some(slot) => slot.1 = value,
                None => pairs.push((key, value)),
            }
        }
        pairs
    }

    /// Extra headers, in the order they were added.
    pub fn headers(&self) -> Vec<(String, String)> {
        self.options
            .iter()
            .filter_map(|option| match option {
                RequestOption::Header(name, value) => Some((name.clone(), value.clone())),
                _ => None,
            })
            .collect()
    }
}

impl FromIterator<RequestOption> for RequestOptions {
    fn from_iter<I: IntoIterator<Item = RequestOption>>(iter: I) -> Self {
        Self {
            options: iter.into_iter().collect(),
        }
    }
}
