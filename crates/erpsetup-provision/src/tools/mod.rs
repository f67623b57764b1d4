//! Narrow wrappers around the external CLIs the steps drive.

mod apt;
mod bench;
mod mariadb;
mod pipx;
mod systemctl;

pub use apt::Apt;
pub use bench::Bench;
pub use mariadb::{sql_quote, MariaDb, RootAccess};
pub use pipx::Pipx;
pub use systemctl::Systemctl;
