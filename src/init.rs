use anyhow::Result;
use clap::Args;
use serde::Serialize;
use sqlx::PgPool;

use crate::telemetry::{self};
use crate::telemetry::ops::init::Phase as InitPhase;

/// rfeed init: create/upgrade the feeds schema
#[derive(Args)]
pub struct InitCmd {
    #[arg(long, default_value_t = false)]
    pub apply: bool,
}

#[derive(Serialize)]
struct InitPlan { migrations: Vec<String> }

#[derive(Serialize)]
struct InitResult { migrations: usize }

pub async fn run(pool: &PgPool, args: InitCmd) -> Result<()> {
    let log = telemetry::init();
    let _g = log.root_span_kv([("apply", args.apply.to_string())]).entered();
    let migrator = sqlx::migrate!();

    if !args.apply {
        let _s = log.span(&InitPhase::Plan).entered();
        let migrations: Vec<String> = migrator.iter().map(|m| format!("{} {}", m.version, m.description)).collect();
        log.info(format!("📝 Init plan — {} migrations (already applied ones are skipped)", migrations.len()));
        for m in &migrations { log.info(format!("  {}", m)); }
        log.info("   Use --apply to execute.");
        log.plan(&InitPlan { migrations })?;
        return Ok(());
    }

    let _s = log.span(&InitPhase::Migrate).entered();
    // idempotent: applied versions are tracked in _sqlx_migrations
    migrator.run(pool).await?;
    log.info("✅ Database initialized");
    log.result(&InitResult { migrations: migrator.iter().count() })?;
    Ok(())
}
