use anyhow::Result;
use common::{config::AppConfig, errors::AppError, logging};
use exporter::prompt;
use sonar_client::{HttpSonarClient, SonarClient};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    logging::init_logging("info");
    let config = AppConfig::load()?;
    let client = HttpSonarClient::new(&config.server.base_url)?;

    let discovered = client
        .search_projects(1, config.export.project_page_size)
        .await?;
    info!(
        total = discovered.paging.total,
        listed = discovered.components.len(),
        "projects discovered"
    );

    let selection = match prompt::prompt_selection(&discovered.components) {
        Ok(selection) => selection,
        Err(AppError::InvalidSelection(message)) => {
            eprintln!("Invalid input: {message}");
            std::process::exit(1);
        }
        Err(err) => return Err(err.into()),
    };

    exporter::runner::run(&client, &config, &discovered.components, selection).await?;
    Ok(())
}
