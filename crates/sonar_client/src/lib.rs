pub mod client;
pub mod payloads;

pub use client::{HttpSonarClient, IssueQuery, SonarApiError, SonarClient};
pub use reqwest::StatusCode;
pub use payloads::{
    ComponentMeasuresResponse, ComponentsResponse, HistoryPoint, HistoryResponse, IssuesResponse,
    MeasureRef, MetricHistory, MetricsResponse, Paging, ProjectRef,
};
