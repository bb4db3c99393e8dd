use anyhow::Result;
use sonar_client::SonarClient;
use tracing::debug;

/// All metric keys known to the server. One bulk call; the instance's
/// metric count sits well below the server's page-size ceiling.
pub async fn list_all_metrics(client: &dyn SonarClient, page_size: u32) -> Result<Vec<String>> {
    let response = client.search_metrics(page_size).await?;
    Ok(response
        .metrics
        .into_iter()
        .map(|metric| metric.key)
        .collect())
}

/// Filters the catalog down to metrics with at least one recorded measure
/// for the project, one `measures/component` round-trip per candidate.
/// The result is sorted and duplicate-free; its first element later defines
/// the date axis of the measures table.
pub async fn active_metrics_for(
    client: &dyn SonarClient,
    project_key: &str,
    all_metrics: &[String],
) -> Result<Vec<String>> {
    let mut active = Vec::new();
    for metric_key in all_metrics {
        let response = client.component_measures(project_key, metric_key).await?;
        if let Some(measure) = response.component.measures.first() {
            active.push(measure.metric.clone());
        } else {
            debug!(project = project_key, metric = %metric_key, "metric inactive");
        }
    }
    active.sort();
    active.dedup();
    Ok(active)
}
