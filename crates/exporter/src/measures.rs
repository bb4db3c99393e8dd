use std::collections::HashMap;
use std::num::NonZeroU32;
use std::path::Path;

use anyhow::{Context, Result};
use common::AppError;
use sonar_client::SonarClient;
use tracing::debug;

/// In-memory measures table: one row per axis date, one column per active
/// metric after the three fixed columns. Built fully before a single
/// terminal write.
#[derive(Debug, Clone)]
pub struct MeasuresTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl MeasuresTable {
    pub fn write_csv(&self, path: &Path) -> Result<()> {
        let mut writer = csv::WriterBuilder::new()
            .delimiter(b';')
            .from_path(path)
            .with_context(|| format!("creating {}", path.display()))?;
        writer.write_record(&self.headers)?;
        for row in &self.rows {
            writer.write_record(row)?;
        }
        writer.flush()?;
        Ok(())
    }
}

/// Merges the per-metric measure histories of a project into one table
/// aligned on a master date axis.
///
/// The axis comes from the first active metric (lexicographically
/// smallest), paged at `page_size` points per page. Duplicate axis dates
/// are collapsed to their first occurrence. Every metric's history,
/// including the axis metric's own refetch, is then placed cell by cell:
/// a point whose date matches an axis date fills that row, a point whose
/// date is unknown to the axis is dropped, and axis dates a metric never
/// measured stay empty.
pub async fn reconcile(
    client: &dyn SonarClient,
    project_key: &str,
    version_label: &str,
    active_metrics: &[String],
    page_size: NonZeroU32,
) -> Result<MeasuresTable> {
    let per_page = page_size.get();
    let mut headers = vec![
        "projectName".to_string(),
        "sonarVersion".to_string(),
        "measure-date".to_string(),
    ];
    headers.extend(active_metrics.iter().cloned());

    let Some(axis_metric) = active_metrics.first() else {
        return Ok(MeasuresTable {
            headers,
            rows: Vec::new(),
        });
    };

    let first_page = client
        .search_history(project_key, axis_metric, 1, per_page)
        .await?;
    let total = first_page.paging.total;
    let pages = u32::try_from(total.div_ceil(u64::from(per_page)))
        .context("history page count exceeds supported range")?;

    let mut axis: Vec<String> = Vec::new();
    let mut axis_index: HashMap<String, usize> = HashMap::new();
    for page in 1..=pages {
        let response = client
            .search_history(project_key, axis_metric, page, per_page)
            .await?;
        let history = &response
            .measures
            .first()
            .ok_or(AppError::UnexpectedResponse(
                "history response has no measures entry",
            ))?
            .history;
        for point in history {
            if !axis_index.contains_key(&point.date) {
                axis_index.insert(point.date.clone(), axis.len());
                axis.push(point.date.clone());
            }
        }
    }
    debug!(
        project = project_key,
        axis_metric = %axis_metric,
        dates = axis.len(),
        "date axis constructed"
    );

    let mut matrix = vec![vec![String::new(); active_metrics.len()]; axis.len()];
    for (column, metric_key) in active_metrics.iter().enumerate() {
        for page in 1..=pages {
            let response = client
                .search_history(project_key, metric_key, page, per_page)
                .await?;
            let history = &response
                .measures
                .first()
                .ok_or(AppError::UnexpectedResponse(
                    "history response has no measures entry",
                ))?
                .history;
            for point in history {
                // Dates outside the axis are dropped; the axis is never extended.
                if let Some(&row) = axis_index.get(&point.date) {
                    matrix[row][column] = point.value.clone().unwrap_or_default();
                }
            }
        }
    }

    let rows = axis
        .into_iter()
        .zip(matrix)
        .map(|(date, values)| {
            let mut row = vec![project_key.to_string(), version_label.to_string(), date];
            row.extend(values);
            row
        })
        .collect();

    Ok(MeasuresTable { headers, rows })
}
