use anyhow::Result;
use erpsetup_core::{config, record};

/// List saved run records, newest first.
pub fn run() -> Result<()> {
    let runs_dir = config::runs_dir()?;
    let records = record::list()?;

    if records.is_empty() {
        println!("No runs recorded in {}", runs_dir.display());
        return Ok(());
    }

    println!("Runs in {}:\n", runs_dir.display());
    println!(
        "  {:<36}  {:<24}  {:>7}  {:>7}  {}",
        "ID", "Site", "Applied", "Skipped", "Finished"
    );
    println!("  {}", "-".repeat(100));
    for r in &records {
        println!(
            "  {:<36}  {:<24}  {:>7}  {:>7}  {}",
            r.id,
            r.site_name,
            r.applied_steps.len(),
            r.skipped_steps.len(),
            r.finished_at.format("%Y-%m-%d %H:%M:%S UTC")
        );
    }
    println!("\n  Total: {} run(s)", records.len());
    Ok(())
}
