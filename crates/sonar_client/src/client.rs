use anyhow::Result;
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;
use url::Url;

use crate::payloads::{
    ComponentMeasuresResponse, ComponentsResponse, HistoryResponse, IssuesResponse,
    MetricsResponse,
};

#[derive(Debug, Error)]
pub enum SonarApiError {
    #[error("sonarqube api error: {status} for {endpoint}")]
    Http {
        status: StatusCode,
        endpoint: String,
    },
}

impl SonarApiError {
    pub fn status(status: StatusCode, endpoint: impl Into<String>) -> Self {
        Self::Http {
            status,
            endpoint: endpoint.into(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match *self {
            SonarApiError::Http { status, .. } => status,
        }
    }

    pub fn endpoint(&self) -> &str {
        match self {
            SonarApiError::Http { endpoint, .. } => endpoint.as_str(),
        }
    }
}

/// Parameters of one `issues/search` page request.
#[derive(Debug, Clone)]
pub struct IssueQuery {
    pub project_key: String,
    pub created_after: String,
    pub page: u32,
    /// When set, the query asks for newest issues first on the master
    /// branch. Used once the total exceeds the server's retrieval cap.
    pub latest_first: bool,
}

#[async_trait]
pub trait SonarClient: Send + Sync {
    async fn search_projects(&self, page: u32, page_size: u32) -> Result<ComponentsResponse>;

    async fn search_metrics(&self, page_size: u32) -> Result<MetricsResponse>;

    async fn component_measures(
        &self,
        project_key: &str,
        metric_key: &str,
    ) -> Result<ComponentMeasuresResponse>;

    async fn search_history(
        &self,
        project_key: &str,
        metric_key: &str,
        page: u32,
        page_size: u32,
    ) -> Result<HistoryResponse>;

    /// One page of `issues/search`, page size fixed at 1.
    async fn search_issues(&self, query: &IssueQuery) -> Result<IssuesResponse>;
}

pub struct HttpSonarClient {
    http: reqwest::Client,
    base: Url,
}

impl HttpSonarClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let base = Url::parse(base_url)?;
        Ok(Self {
            http: reqwest::Client::new(),
            base,
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        let endpoint = url.path().trim_start_matches('/').to_string();
        debug!(endpoint = %endpoint, url = %url, "Dispatching SonarQube request");
        let response = self.http.get(url).send().await?;
        let status = response.status();
        if status.is_success() {
            Ok(response.json::<T>().await?)
        } else {
            Err(SonarApiError::status(status, endpoint).into())
        }
    }

    fn join(&self, path: &str) -> Result<Url> {
        Ok(self.base.join(path)?)
    }

    fn with_query(url: &mut Url, params: &[(&str, String)]) {
        let mut query_pairs = url.query_pairs_mut();
        for (key, val) in params {
            query_pairs.append_pair(key, val);
        }
    }
}

#[async_trait]
impl SonarClient for HttpSonarClient {
    async fn search_projects(&self, page: u32, page_size: u32) -> Result<ComponentsResponse> {
        let mut url = self.join("api/components/search")?;
        let params = [
            ("qualifiers", "TRK".to_string()),
            ("ps", page_size.to_string()),
            ("p", page.to_string()),
        ];
        Self::with_query(&mut url, &params);
        self.get_json(url).await
    }

    async fn search_metrics(&self, page_size: u32) -> Result<MetricsResponse> {
        let mut url = self.join("api/metrics/search")?;
        let params = [("ps", page_size.to_string())];
        Self::with_query(&mut url, &params);
        self.get_json(url).await
    }

    async fn component_measures(
        &self,
        project_key: &str,
        metric_key: &str,
    ) -> Result<ComponentMeasuresResponse> {
        let mut url = self.join("api/measures/component")?;
        let params = [
            ("componentKey", project_key.to_string()),
            ("metricKeys", metric_key.to_string()),
        ];
        Self::with_query(&mut url, &params);
        self.get_json(url).await
    }

    async fn search_history(
        &self,
        project_key: &str,
        metric_key: &str,
        page: u32,
        page_size: u32,
    ) -> Result<HistoryResponse> {
        let mut url = self.join("api/measures/search_history")?;
        let params = [
            ("p", page.to_string()),
            ("ps", page_size.to_string()),
            ("component", project_key.to_string()),
            ("metrics", metric_key.to_string()),
        ];
        Self::with_query(&mut url, &params);
        self.get_json(url).await
    }

    async fn search_issues(&self, query: &IssueQuery) -> Result<IssuesResponse> {
        let mut url = self.join("api/issues/search")?;
        let mut params = vec![
            ("componentKeys", query.project_key.clone()),
            ("s", "CREATION_DATE".to_string()),
            ("statuses", "OPEN,CLOSED".to_string()),
            ("createdAfter", query.created_after.clone()),
            ("ps", "1".to_string()),
            ("p", query.page.to_string()),
        ];
        if query.latest_first {
            params.push(("asc", "false".to_string()));
            params.push(("branch", "master".to_string()));
        }
        Self::with_query(&mut url, &params);
        self.get_json(url).await
    }
}
