//! Storage-node binary entry point.

use storage_node::StorageNodeConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = StorageNodeConfig::from_env_and_args()?;
    storage_node::run(config).await
}
