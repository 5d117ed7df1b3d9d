use serde::Serialize;

/// Offset pagination metadata included in list responses.
#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    /// Total number of matching items.
    #[schema(example = 47)]
    pub total: u64,
    #[schema(example = 50)]
    pub limit: u64,
    #[schema(example = 0)]
    pub skip: u64,
    /// Whether another page follows this one.
    pub has_more: bool,
}

impl Pagination {
    pub fn new(total: u64, limit: u64, skip: u64, returned: u64) -> Self {
        Self {
            total,
            limit,
            skip,
            has_more: skip.saturating_add(returned) < total,
        }
    }
}

/// Parses an optional boolean query flag. Anything but `true` is false.
pub fn flag(value: Option<&str>) -> Option<bool> {
    value.map(|v| v.trim().eq_ignore_ascii_case("true"))
}
