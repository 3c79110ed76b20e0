use crate::cli::utils::output_success;
use crate::cli::{connect, OutputFormat};

pub async fn handle(output_format: OutputFormat) -> anyhow::Result<()> {
    let store = connect().await?;
    store.migrate().await?;
    store.close().await;

    output_success(output_format, "Schema is up to date", None)
}
