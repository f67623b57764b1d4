use console::style;
use dialoguer::Password;
use erpsetup_core::record::RunRecord;
use erpsetup_core::{AppError, SecretPrompter};
use erpsetup_provision::preflight::OsRelease;
use erpsetup_provision::step::PlannedStep;

/// Prompts on the controlling terminal without echoing input.
pub struct TerminalPrompter;

impl SecretPrompter for TerminalPrompter {
    fn prompt_secret(&mut self, label: &str) -> Result<String, AppError> {
        Password::new()
            .with_prompt(label)
            .allow_empty_password(true)
            .interact()
            .map_err(|e| AppError::Prompt(e.to_string()))
    }
}

pub fn print_os(os: &OsRelease) {
    let name = os.pretty_name.as_deref().unwrap_or(&os.id);
    println!("{} {name} (running as root)", style("✓").green());
}

/// Print the plan table: one line per step, pending steps highlighted.
pub fn print_plan(planned: &[PlannedStep]) {
    println!("  {:<4}  {:<18}  {:<34}  {}", "#", "Step", "Description", "State");
    println!("  {}", "-".repeat(72));
    for (i, step) in planned.iter().enumerate() {
        let state = if step.satisfied {
            style("done").green().to_string()
        } else {
            style("will run").yellow().to_string()
        };
        println!(
            "  {:<4}  {:<18}  {:<34}  {}",
            i + 1,
            step.name,
            step.description,
            state
        );
    }
    let pending = planned.iter().filter(|s| !s.satisfied).count();
    println!("\n  {pending} of {} step(s) will run", planned.len());
}

/// Print the install summary.
pub fn print_summary(record: &RunRecord) {
    let divider = "=".repeat(60);
    let elapsed = record.finished_at - record.started_at;

    println!("\n{divider}");
    println!("  ERPNext Installation Complete");
    println!("{divider}");
    println!("  Site:              http://{}", record.site_name);
    println!("  Bench:             {}", record.bench_dir);
    println!("  Service account:   {}", record.service_user);
    println!("  Login:             Administrator / (the admin password you set)");
    println!(
        "  Steps:             {} applied, {} already done",
        record.applied_steps.len(),
        record.skipped_steps.len()
    );
    println!("  Duration:          {}m {}s", elapsed.num_minutes(), elapsed.num_seconds() % 60);
    println!("  Run record:        ~/.erpsetup/runs/{}.json", record.id);
    println!("{divider}");
    println!("  Next steps:");
    println!("    1. curl -I http://{}", record.site_name);
    println!("    2. sudo supervisorctl status");
    println!(
        "    3. su - {} -c 'cd {} && bench doctor'",
        record.service_user, record.bench_dir
    );
    println!("{divider}\n");
}
