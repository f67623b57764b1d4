use crate::shell::HostShell;
use async_trait::async_trait;
use erpsetup_core::{AppError, SetupConfig};

/// Everything a step may touch.
pub struct StepContext<'a> {
    pub cfg: &'a SetupConfig,
    pub shell: &'a dyn HostShell,
}

/// One unit of provisioning work: a precondition and an action.
///
/// The runner skips `apply` when `is_satisfied` returns true. Steps that must
/// always run keep the default precondition.
#[async_trait]
pub trait Step: Send + Sync {
    /// Stable slug used in logs and run records.
    fn name(&self) -> &'static str;

    fn description(&self) -> &'static str;

    async fn is_satisfied(&self, _ctx: &StepContext<'_>) -> Result<bool, AppError> {
        Ok(false)
    }

    async fn apply(&self, ctx: &StepContext<'_>) -> Result<(), AppError>;
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub applied: Vec<&'static str>,
    pub skipped: Vec<&'static str>,
}

/// Run steps in order. The first failing step aborts the run; nothing is
/// rolled back. The failure is returned, not logged, so the caller reports it
/// once.
pub async fn run_steps(
    steps: &[Box<dyn Step>],
    ctx: &StepContext<'_>,
) -> Result<RunSummary, AppError> {
    let total = steps.len();
    let mut summary = RunSummary::default();

    for (i, step) in steps.iter().enumerate() {
        let index = i + 1;
        tracing::info!(step = step.name(), "[Step {index}/{total}] {}", step.description());

        let outcome = match step.is_satisfied(ctx).await {
            Ok(true) => {
                tracing::info!(step = step.name(), "  skipped (already satisfied)");
                summary.skipped.push(step.name());
                continue;
            }
            Ok(false) => step.apply(ctx).await,
            Err(e) => Err(e),
        };

        if let Err(e) = outcome {
            return Err(AppError::StepFailed {
                index,
                name: step.name().to_string(),
                source: Box::new(e),
            });
        }
        tracing::info!(step = step.name(), "  done");
        summary.applied.push(step.name());
    }

    Ok(summary)
}

/// Status of one step as reported by [`plan`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedStep {
    pub name: &'static str,
    pub description: &'static str,
    pub satisfied: bool,
}

/// Evaluate every precondition without applying anything.
pub async fn plan(
    steps: &[Box<dyn Step>],
    ctx: &StepContext<'_>,
) -> Result<Vec<PlannedStep>, AppError> {
    let mut planned = Vec::with_capacity(steps.len());
    for step in steps {
        planned.push(PlannedStep {
            name: step.name(),
            description: step.description(),
            satisfied: step.is_satisfied(ctx).await?,
        });
    }
    Ok(planned)
}
