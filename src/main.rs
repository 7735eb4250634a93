/*
 * Responsibility
 * - start the tokio runtime
 * - call app::run() (no logic lives here)
 */
use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    jwt_filter::app::run().await
}
