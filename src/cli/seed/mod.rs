//! Seed command - replaces users and charts from CSV files

use anyhow::Context;
use tracing::info;

use super::SeedArgs;

pub async fn run(args: SeedArgs) -> anyhow::Result<()> {
    let config = super::init()?;

    if args.users.is_none() && args.charts.is_none() {
        anyhow::bail!("nothing to seed: pass --users and/or --charts");
    }

    let state = crate::create_app_state(&config, false).await?;

    if let Some(path) = &args.users {
        let csv = tokio::fs::read(path)
            .await
            .with_context(|| format!("failed to read {}", path.display()))?;
        let imported = state.reset_service.reset_users(&csv).await?;
        info!("Imported {} users from {}", imported, path.display());
    }

    if let Some(path) = &args.charts {
        let csv = tokio::fs::read(path)
            .await
            .with_context(|| format!("failed to read {}", path.display()))?;
        let imported = state.reset_service.reset_charts(&csv).await?;
        info!("Imported {} charts from {}", imported, path.display());
    }

    Ok(())
}
