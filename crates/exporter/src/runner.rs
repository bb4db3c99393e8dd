use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use common::AppConfig;
use sonar_client::{ProjectRef, SonarClient};
use tracing::info;

use crate::catalog;
use crate::issues::extract_issues;
use crate::measures::reconcile;
use crate::prompt::Selection;

/// Exports one project: `issues.csv` then `measures.csv`, both inside a
/// directory named after the project under the configured output root.
pub async fn export_project(
    client: &dyn SonarClient,
    config: &AppConfig,
    project: &ProjectRef,
) -> Result<()> {
    let dir = Path::new(&config.export.output_dir).join(&project.name);
    fs::create_dir_all(&dir).with_context(|| format!("creating {}", dir.display()))?;

    let all_metrics = catalog::list_all_metrics(client, config.export.metrics_page_size).await?;

    info!(project = %project.name, "extracting issues");
    let rows = extract_issues(
        client,
        &config.export,
        &project.key,
        &dir.join("issues.csv"),
    )
    .await?;
    info!(project = %project.name, rows, "completed extracting issues");

    info!(project = %project.name, "extracting measures");
    let active_metrics = catalog::active_metrics_for(client, &project.key, &all_metrics).await?;
    let table = reconcile(
        client,
        &project.key,
        &config.server.version_label,
        &active_metrics,
        config.export.history_page_size,
    )
    .await?;
    table.write_csv(&dir.join("measures.csv"))?;
    info!(
        project = %project.name,
        metrics = active_metrics.len(),
        dates = table.rows.len(),
        "completed extracting measures"
    );
    Ok(())
}

/// Runs the export for the selected project, or for every discovered
/// project in turn. Projects are processed strictly sequentially and the
/// first failure aborts the remainder of the run.
pub async fn run(
    client: &dyn SonarClient,
    config: &AppConfig,
    projects: &[ProjectRef],
    selection: Selection,
) -> Result<()> {
    match selection {
        Selection::All => {
            for project in projects {
                export_project(client, config, project).await?;
            }
        }
        Selection::Index(index) => {
            export_project(client, config, &projects[index - 1]).await?;
        }
    }
    Ok(())
}
