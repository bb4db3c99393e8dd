use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Paging {
    #[serde(rename = "pageIndex")]
    pub page_index: u32,
    #[serde(rename = "pageSize")]
    pub page_size: u32,
    pub total: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ComponentsResponse {
    pub paging: Paging,
    pub components: Vec<ProjectRef>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProjectRef {
    pub key: String,
    pub name: String,
}

/// Issue records are kept as raw JSON objects. The canonical fields are
/// extracted downstream with positional fallback rules, so deserializing
/// into a fixed struct here would throw away exactly the flexibility the
/// normalizer needs.
#[derive(Debug, Clone, Deserialize)]
pub struct IssuesResponse {
    pub total: u64,
    #[serde(default)]
    pub issues: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MetricsResponse {
    pub metrics: Vec<MetricDef>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MetricDef {
    pub key: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ComponentMeasuresResponse {
    pub component: ComponentMeasures,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ComponentMeasures {
    #[serde(default)]
    pub measures: Vec<MeasureRef>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MeasureRef {
    pub metric: String,
    #[serde(default)]
    pub value: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HistoryResponse {
    pub paging: Paging,
    pub measures: Vec<MetricHistory>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MetricHistory {
    pub metric: String,
    #[serde(default)]
    pub history: Vec<HistoryPoint>,
}

/// One point of a metric's time series. Dates are kept as the server's
/// literal strings; reconciliation matches them by exact value, never by
/// parsed instant.
#[derive(Debug, Clone, Deserialize)]
pub struct HistoryPoint {
    pub date: String,
    #[serde(default)]
    pub value: Option<String>,
}
