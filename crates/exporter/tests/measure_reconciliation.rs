use std::collections::HashMap;
use std::num::NonZeroU32;

use anyhow::Result;
use async_trait::async_trait;
use common::AppError;
use exporter::reconcile;
use sonar_client::{
    ComponentMeasuresResponse, ComponentsResponse, HistoryPoint, HistoryResponse, IssueQuery,
    IssuesResponse, MetricHistory, MetricsResponse, Paging, SonarClient,
};

struct StubHistoryServer {
    histories: HashMap<String, Vec<(String, String)>>,
}

impl StubHistoryServer {
    fn new(histories: &[(&str, &[(&str, &str)])]) -> Self {
        let histories = histories
            .iter()
            .map(|(metric, points)| {
                (
                    metric.to_string(),
                    points
                        .iter()
                        .map(|(date, value)| (date.to_string(), value.to_string()))
                        .collect(),
                )
            })
            .collect();
        Self { histories }
    }
}

#[async_trait]
impl SonarClient for StubHistoryServer {
    async fn search_projects(&self, _page: u32, _page_size: u32) -> Result<ComponentsResponse> {
        unreachable!()
    }

    async fn search_metrics(&self, _page_size: u32) -> Result<MetricsResponse> {
        unreachable!()
    }

    async fn component_measures(
        &self,
        _project_key: &str,
        _metric_key: &str,
    ) -> Result<ComponentMeasuresResponse> {
        unreachable!()
    }

    async fn search_history(
        &self,
        _project_key: &str,
        metric_key: &str,
        page: u32,
        page_size: u32,
    ) -> Result<HistoryResponse> {
        let Some(points) = self.histories.get(metric_key).cloned() else {
            // An unknown metric yields a malformed page (non-zero total but
            // no measures entry) so the shape-error path is reachable.
            return Ok(HistoryResponse {
                paging: Paging {
                    page_index: page,
                    page_size,
                    total: 1,
                },
                measures: Vec::new(),
            });
        };
        let total = points.len() as u64;
        let start = ((page - 1) * page_size) as usize;
        let history = points
            .into_iter()
            .skip(start)
            .take(page_size as usize)
            .map(|(date, value)| HistoryPoint {
                date,
                value: Some(value),
            })
            .collect();
        Ok(HistoryResponse {
            paging: Paging {
                page_index: page,
                page_size,
                total,
            },
            measures: vec![MetricHistory {
                metric: metric_key.to_string(),
                history,
            }],
        })
    }

    async fn search_issues(&self, _query: &IssueQuery) -> Result<IssuesResponse> {
        unreachable!()
    }
}

#[tokio::test]
async fn sparse_metric_fills_only_matching_dates() {
    let server = StubHistoryServer::new(&[
        ("complexity", &[("D1", "10"), ("D2", "11"), ("D3", "12")]),
        ("coverage", &[("D1", "5"), ("D3", "7")]),
    ]);
    let active = vec!["complexity".to_string(), "coverage".to_string()];

    let table = reconcile(&server, "proj", "sonar63", &active, NonZeroU32::new(1000).unwrap())
        .await
        .unwrap();

    assert_eq!(
        table.headers,
        vec![
            "projectName",
            "sonarVersion",
            "measure-date",
            "complexity",
            "coverage"
        ]
    );
    assert_eq!(table.rows.len(), 3);
    // row layout: projectName, sonarVersion, date, complexity, coverage
    assert_eq!(table.rows[0], vec!["proj", "sonar63", "D1", "10", "5"]);
    assert_eq!(table.rows[1], vec!["proj", "sonar63", "D2", "11", ""]);
    assert_eq!(table.rows[2], vec!["proj", "sonar63", "D3", "12", "7"]);
}

#[tokio::test]
async fn dates_outside_the_axis_are_dropped() {
    let server = StubHistoryServer::new(&[
        ("complexity", &[("D1", "1"), ("D2", "2")]),
        ("coverage", &[("D2", "50"), ("D9", "99")]),
    ]);
    let active = vec!["complexity".to_string(), "coverage".to_string()];

    let table = reconcile(&server, "proj", "sonar63", &active, NonZeroU32::new(1000).unwrap())
        .await
        .unwrap();

    assert_eq!(table.rows.len(), 2);
    assert_eq!(table.rows[1][4], "50");
    assert!(table.rows.iter().all(|row| row[2] != "D9"));
}

#[tokio::test]
async fn duplicate_axis_dates_collapse_to_first_occurrence() {
    let server = StubHistoryServer::new(&[("complexity", &[("D1", "1"), ("D1", "2"), ("D2", "3")])]);
    let active = vec!["complexity".to_string()];

    let table = reconcile(&server, "proj", "sonar63", &active, NonZeroU32::new(1000).unwrap())
        .await
        .unwrap();

    assert_eq!(table.rows.len(), 2);
    // the refetch overwrites the first slot with the later duplicate's value
    assert_eq!(table.rows[0][2], "D1");
    assert_eq!(table.rows[1][2], "D2");
}

#[tokio::test]
async fn axis_paging_covers_every_page() {
    let server = StubHistoryServer::new(&[(
        "complexity",
        &[("D1", "1"), ("D2", "2"), ("D3", "3"), ("D4", "4"), ("D5", "5")],
    )]);
    let active = vec!["complexity".to_string()];

    let table = reconcile(&server, "proj", "sonar63", &active, NonZeroU32::new(2).unwrap())
        .await
        .unwrap();

    assert_eq!(table.rows.len(), 5);
    assert_eq!(table.rows[4], vec!["proj", "sonar63", "D5", "5"]);
}

#[tokio::test]
async fn no_active_metrics_yields_headers_only() {
    let server = StubHistoryServer::new(&[]);

    let table = reconcile(&server, "proj", "sonar63", &[], NonZeroU32::new(1000).unwrap())
        .await
        .unwrap();

    assert_eq!(
        table.headers,
        vec!["projectName", "sonarVersion", "measure-date"]
    );
    assert!(table.rows.is_empty());
}

#[tokio::test]
async fn empty_axis_history_yields_zero_rows() {
    let server = StubHistoryServer::new(&[("complexity", &[])]);
    let active = vec!["complexity".to_string()];

    let table = reconcile(&server, "proj", "sonar63", &active, NonZeroU32::new(1000).unwrap())
        .await
        .unwrap();

    assert!(table.rows.is_empty());
}

#[tokio::test]
async fn history_without_measures_entry_is_a_shape_error() {
    let server = StubHistoryServer::new(&[]);
    let active = vec!["ghost".to_string()];

    let err = reconcile(&server, "proj", "sonar63", &active, NonZeroU32::new(1000).unwrap())
        .await
        .unwrap_err();

    assert!(matches!(
        err.downcast_ref::<AppError>(),
        Some(AppError::UnexpectedResponse(_))
    ));
}
