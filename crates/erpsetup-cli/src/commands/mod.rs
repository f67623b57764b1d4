pub mod check;
pub mod install;
pub mod list_runs;
pub mod plan;
