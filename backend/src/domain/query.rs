//! Query specification builder.
//!
//! Turns untrusted query-string pairs into a [`QuerySpec`] whose every field
//! reference comes from a fixed per-resource allow-list. Client-supplied
//! names are only ever used as lookup keys into those lists; they never
//! reach a storage adapter.
//!
//! Optional refinements degrade instead of failing: an unknown `sort` falls
//! back to the resource default, an `order` other than exactly `asc` or
//! `desc` becomes ascending, and unparsable year bounds are dropped.

use std::collections::HashMap;
use std::hash::BuildHasher;

/// Parameter carrying the free-text search term.
pub const SEARCH_PARAM: &str = "search";
/// Parameter naming the sort field.
pub const SORT_PARAM: &str = "sort";
/// Parameter naming the sort direction.
pub const ORDER_PARAM: &str = "order";
/// Inclusive lower year bound.
pub const YEAR_FROM_PARAM: &str = "year_from";
/// Inclusive upper year bound.
pub const YEAR_TO_PARAM: &str = "year_to";

/// Resource families exposed by list endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    /// Camera models.
    Camera,
    /// Printed ephemera: catalogues, manuals, advertisements.
    Ephemera,
}

/// Text columns a search term may be matched against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextField {
    /// Camera name.
    Name,
    /// Camera manufacturer.
    Manufacturer,
    /// Camera or ephemera description.
    Description,
    /// Ephemera title.
    Title,
}

/// Columns that accept exact-match filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EqualityField {
    /// Camera manufacturer.
    Manufacturer,
    /// Camera format, such as `Plate`.
    Format,
    /// Ephemera type, such as `catalog`.
    Kind,
}

/// Integer year columns that accept range bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum YearField {
    /// Camera introduction year.
    YearIntroduced,
    /// Ephemera publication year.
    Year,
}

/// Columns a listing may be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortField {
    /// Camera name.
    Name,
    /// Camera introduction year.
    YearIntroduced,
    /// Camera rarity label.
    Rarity,
    /// Ephemera title.
    Title,
    /// Ephemera publication year.
    Year,
}

impl SortField {
    /// Public parameter name of this field.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::YearIntroduced => "year_introduced",
            Self::Rarity => "rarity",
            Self::Title => "title",
            Self::Year => "year",
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortDirection {
    /// Smallest first.
    #[default]
    Asc,
    /// Largest first.
    Desc,
}

impl SortDirection {
    /// Parse `asc` or `desc` exactly; anything else is ascending.
    #[must_use]
    pub fn parse_or_default(raw: Option<&str>) -> Self {
        match raw {
            Some("desc") => Self::Desc,
            _ => Self::Asc,
        }
    }
}

/// Fixed vocabulary for one resource.
#[derive(Debug)]
struct ResourceSchema {
    search: &'static [TextField],
    equality: &'static [(&'static str, EqualityField)],
    year: YearField,
    sortable: &'static [SortField],
    default_sort: SortField,
}

const CAMERA_SCHEMA: ResourceSchema = ResourceSchema {
    search: &[TextField::Name, TextField::Manufacturer, TextField::Description],
    equality: &[
        ("manufacturer", EqualityField::Manufacturer),
        ("format", EqualityField::Format),
    ],
    year: YearField::YearIntroduced,
    sortable: &[SortField::Name, SortField::YearIntroduced, SortField::Rarity],
    default_sort: SortField::Name,
};

const EPHEMERA_SCHEMA: ResourceSchema = ResourceSchema {
    search: &[TextField::Title, TextField::Description],
    equality: &[("type", EqualityField::Kind)],
    year: YearField::Year,
    sortable: &[SortField::Title, SortField::Year],
    default_sort: SortField::Title,
};

impl ResourceKind {
    const fn schema(self) -> &'static ResourceSchema {
        match self {
            Self::Camera => &CAMERA_SCHEMA,
            Self::Ephemera => &EPHEMERA_SCHEMA,
        }
    }

    /// Sort field used when the client names none or an unknown one.
    #[must_use]
    pub const fn default_sort(self) -> SortField {
        self.schema().default_sort
    }
}

/// Case-insensitive substring match, ORed across `fields`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchCondition {
    /// Raw term, matched literally.
    pub term: String,
    /// Columns to search.
    pub fields: &'static [TextField],
}

/// Exact match on an allow-listed column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EqualityCondition {
    /// Column to compare.
    pub field: EqualityField,
    /// Required value.
    pub value: String,
}

/// Inclusive year bounds. At least one bound is present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearRange {
    /// Column the bounds apply to.
    pub field: YearField,
    /// Lower bound.
    pub from: Option<i32>,
    /// Upper bound.
    pub to: Option<i32>,
}

impl YearRange {
    /// Whether `year` falls within the bounds.
    #[must_use]
    pub fn contains(&self, year: i32) -> bool {
        self.from.is_none_or(|from| year >= from) && self.to.is_none_or(|to| year <= to)
    }
}

/// Validated filter and ordering for one list request.
///
/// Conditions combine as `search AND equality... AND year range`.
///
/// # Examples
/// ```
/// use backend::domain::{QuerySpec, ResourceKind};
///
/// let spec = QuerySpec::from_pairs(
///     ResourceKind::Camera,
///     [("sort", "DROP TABLE"), ("manufacturer", "Kodak"), ("secretfield", "1")],
/// );
/// assert_eq!(spec.sort_field().as_str(), "name");
/// assert_eq!(spec.equality().len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuerySpec {
    resource: ResourceKind,
    search: Option<SearchCondition>,
    equality: Vec<EqualityCondition>,
    year_range: Option<YearRange>,
    sort_field: SortField,
    direction: SortDirection,
}

impl QuerySpec {
    /// Unfiltered specification in default order.
    #[must_use]
    pub fn unfiltered(resource: ResourceKind) -> Self {
        Self {
            resource,
            search: None,
            equality: Vec::new(),
            year_range: None,
            sort_field: resource.default_sort(),
            direction: SortDirection::Asc,
        }
    }

    /// Build from a parsed query-string map.
    #[must_use]
    pub fn build<S: BuildHasher>(resource: ResourceKind, params: &HashMap<String, String, S>) -> Self {
        Self::from_lookup(resource, |key| params.get(key).map(String::as_str))
    }

    /// Build from raw pairs. When a key repeats, the last value wins.
    #[must_use]
    pub fn from_pairs<'a, I>(resource: ResourceKind, pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let params: HashMap<&str, &str> = pairs.into_iter().collect();
        Self::from_lookup(resource, |key| params.get(key).copied())
    }

    fn from_lookup<'p>(resource: ResourceKind, lookup: impl Fn(&str) -> Option<&'p str>) -> Self {
        let schema = resource.schema();

        let search = lookup(SEARCH_PARAM)
            .filter(|term| !term.is_empty())
            .map(|term| SearchCondition {
                term: term.to_owned(),
                fields: schema.search,
            });

        let equality = schema
            .equality
            .iter()
            .filter_map(|&(param, field)| {
                lookup(param)
                    .filter(|value| !value.is_empty())
                    .map(|value| EqualityCondition {
                        field,
                        value: value.to_owned(),
                    })
            })
            .collect();

        let from = parse_year(lookup(YEAR_FROM_PARAM));
        let to = parse_year(lookup(YEAR_TO_PARAM));
        let year_range = (from.is_some() || to.is_some()).then_some(YearRange {
            field: schema.year,
            from,
            to,
        });

        let sort_field = lookup(SORT_PARAM)
            .and_then(|raw| schema.sortable.iter().copied().find(|f| f.as_str() == raw))
            .unwrap_or(schema.default_sort);

        Self {
            resource,
            search,
            equality,
            year_range,
            sort_field,
            direction: SortDirection::parse_or_default(lookup(ORDER_PARAM)),
        }
    }

    /// Resource this specification targets.
    #[must_use]
    pub const fn resource(&self) -> ResourceKind {
        self.resource
    }

    /// Free-text search condition, if any.
    #[must_use]
    pub const fn search(&self) -> Option<&SearchCondition> {
        self.search.as_ref()
    }

    /// Exact-match conditions in allow-list order.
    #[must_use]
    pub fn equality(&self) -> &[EqualityCondition] {
        &self.equality
    }

    /// Year bounds, if any.
    #[must_use]
    pub const fn year_range(&self) -> Option<&YearRange> {
        self.year_range.as_ref()
    }

    /// Effective sort field.
    #[must_use]
    pub const fn sort_field(&self) -> SortField {
        self.sort_field
    }

    /// Effective sort direction.
    #[must_use]
    pub const fn direction(&self) -> SortDirection {
        self.direction
    }
}

fn parse_year(raw: Option<&str>) -> Option<i32> {
    raw.and_then(|value| value.trim().parse::<i32>().ok())
}
