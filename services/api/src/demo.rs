use crate::infra::{InMemoryParcelStore, InMemoryRuleStore, InMemoryScenarioRepository};
use clap::Args;
use std::sync::Arc;
use zoneplan::error::AppError;
use zoneplan::scenario::{ScenarioRequest, ScenarioService};

#[derive(Args, Debug)]
pub(crate) struct CheckArgs {
    /// Proposed building height in meters
    #[arg(long)]
    pub(crate) height: f64,
    /// Proposed footprint area in square meters
    #[arg(long)]
    pub(crate) footprint: f64,
    /// Requested boundary setback in meters
    #[arg(long, default_value_t = 0.0)]
    pub(crate) setback: f64,
}

/// Runs one compliance check against the seeded demo parcel and prints the
/// verdict the way the web client renders it.
pub(crate) fn run_check(args: CheckArgs) -> Result<(), AppError> {
    let service = ScenarioService::new(
        Arc::new(InMemoryParcelStore::seeded()),
        Arc::new(InMemoryRuleStore::seeded()),
        Arc::new(InMemoryScenarioRepository::default()),
    );

    let record = service.check(ScenarioRequest {
        height_m: args.height,
        footprint_sqm: args.footprint,
        min_setback_m: args.setback,
    })?;

    let verdict = &record.verdict;
    let header = if verdict.all_ok { "PASS" } else { "FAIL" };
    println!("{header} ({})", record.id.0);
    println!("  Height:   {}", pass_fail(verdict.height_ok));
    println!("  Coverage: {}", pass_fail(verdict.coverage_ok));
    println!("  Setback:  {}", pass_fail(verdict.setback_ok));
    if !verdict.notes.is_empty() {
        println!("Notes:");
        for note in &verdict.notes {
            println!("  - {note}");
        }
    }
    Ok(())
}

fn pass_fail(ok: bool) -> &'static str {
    if ok {
        "Pass"
    } else {
        "Fail"
    }
}
