use std::path::Path;

use anyhow::{Context, Result};
use common::config::ExportConfig;
use serde_json::Value;
use sonar_client::{IssueQuery, SonarApiError, SonarClient};
use tracing::{info, warn};

/// Canonical issue columns, in output order.
pub const ISSUE_FIELDS: [&str; 17] = [
    "creationDate",
    "updateDate",
    "closeDate",
    "type",
    "rule",
    "component",
    "severity",
    "project",
    "startLine",
    "endLine",
    "resolution",
    "status",
    "message",
    "effort",
    "debt",
    "author",
    "key",
];

/// Flattens one raw issue record into a row matching [`ISSUE_FIELDS`].
///
/// Extraction rules per field, first match wins:
/// 1. a direct key on the record,
/// 2. for `startLine`/`endLine` only, the same key under the `textRange`
///    sub-object,
/// 3. the empty string.
pub fn normalize_issue(record: &Value) -> Vec<String> {
    ISSUE_FIELDS
        .iter()
        .map(|field| extract_field(record, field))
        .collect()
}

fn extract_field(record: &Value, field: &str) -> String {
    if let Some(value) = record.get(field) {
        return scalar_to_cell(value);
    }
    if matches!(field, "startLine" | "endLine") {
        if let Some(value) = record.get("textRange").and_then(|range| range.get(field)) {
            return scalar_to_cell(value);
        }
    }
    String::new()
}

fn scalar_to_cell(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Pages through a project's issues one record at a time and streams each
/// normalized row into `issues.csv` at `out_path`.
///
/// The server caps paged retrieval at `max_issues`; above that the query
/// switches to newest-first on the master branch so the most recent
/// `max_issues` issues are exported. Page size stays at 1 in both modes,
/// matching the upstream contract of one issue per response.
///
/// Returns the number of data rows written. A non-200 on the initial count
/// query skips the project's issue export entirely (no file is created).
pub async fn extract_issues(
    client: &dyn SonarClient,
    export: &ExportConfig,
    project_key: &str,
    out_path: &Path,
) -> Result<u64> {
    let count_query = IssueQuery {
        project_key: project_key.to_string(),
        created_after: export.created_after.clone(),
        page: 1,
        latest_first: false,
    };
    let total = match client.search_issues(&count_query).await {
        Ok(response) => response.total,
        Err(err) => match err.downcast_ref::<SonarApiError>() {
            Some(api_err) => {
                warn!(
                    project = project_key,
                    status = %api_err.status_code(),
                    "issue count query failed, skipping issue export"
                );
                return Ok(0);
            }
            None => return Err(err),
        },
    };

    let mut writer = csv::WriterBuilder::new()
        .delimiter(b';')
        .from_path(out_path)
        .with_context(|| format!("creating {}", out_path.display()))?;
    writer.write_record(ISSUE_FIELDS)?;
    writer.flush()?;

    let latest_first = total > u64::from(export.max_issues);
    let pages = u32::try_from(total).map_or(export.max_issues, |t| t.min(export.max_issues));
    if latest_first {
        info!(
            project = project_key,
            total,
            cap = export.max_issues,
            "issue total exceeds retrieval cap, exporting latest issues only"
        );
    }

    let mut rows = 0u64;
    for page in 1..=pages {
        let query = IssueQuery {
            project_key: project_key.to_string(),
            created_after: export.created_after.clone(),
            page,
            latest_first,
        };
        let response = client.search_issues(&query).await?;
        match response.issues.first() {
            Some(record) => {
                writer.write_record(normalize_issue(record))?;
                writer.flush()?;
                rows += 1;
            }
            None => {
                warn!(project = project_key, page, "issue page returned no records");
            }
        }
    }
    Ok(rows)
}
