//! The named maintenance operations and the commands behind them

use super::parser::{count_lines_containing, parse_upgrade_stats};
use super::progress::ProgressSlice;
use super::runner::{CommandExecutor, RunnerError};
use super::types::{CommandResult, Details, UpgradeStats};

// ===== Success message keys =====

pub const REPOS_UPDATED: &str = "Repositories updated successfully";
pub const PACKAGES_UPGRADED: &str = "Packages upgraded successfully";
pub const FLATPAK_UPDATED: &str = "Flatpak applications updated successfully";
pub const CACHE_CLEANED: &str = "Package cache cleaned successfully";
pub const UNUSED_REMOVED: &str = "Unused packages removed successfully";
pub const ALL_UPDATED: &str = "All updates completed successfully";
pub const STATUS_CHECKED: &str = "System status check completed";

/// Sub-commands of the status report: (description, shell command).
pub const STATUS_CHECKS: [(&str, &str); 4] = [
    ("Disk Usage", "df -h"),
    ("Memory Usage", "free -h"),
    ("System Uptime", "uptime"),
    (
        "Updates Available",
        "apt list --upgradable 2>/dev/null | grep -v 'Listing...' | wc -l",
    ),
];

/// Steps of [`Operation::UpdateAll`], in execution order.
const UPDATE_ALL_STEPS: [Operation; 3] = [
    Operation::UpdateRepos,
    Operation::Upgrade,
    Operation::FlatpakUpdate,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    UpdateRepos,
    Upgrade,
    FlatpakUpdate,
    Clean,
    Autoremove,
    UpdateAll,
    StatusCheck,
}

impl Operation {
    /// Menu order.
    pub const ALL: [Operation; 7] = [
        Operation::UpdateRepos,
        Operation::Upgrade,
        Operation::FlatpakUpdate,
        Operation::Clean,
        Operation::Autoremove,
        Operation::UpdateAll,
        Operation::StatusCheck,
    ];

    pub fn id(self) -> &'static str {
        match self {
            Operation::UpdateRepos => "update-repos",
            Operation::Upgrade => "upgrade",
            Operation::FlatpakUpdate => "flatpak-update",
            Operation::Clean => "clean",
            Operation::Autoremove => "autoremove",
            Operation::UpdateAll => "update-all",
            Operation::StatusCheck => "status-check",
        }
    }

    /// Translation key for menu entries and dialog titles.
    pub fn label(self) -> &'static str {
        match self {
            Operation::UpdateRepos => "Update Repositories",
            Operation::Upgrade => "Upgrade Packages",
            Operation::FlatpakUpdate => "Update Flatpak",
            Operation::Clean => "Clean Packages",
            Operation::Autoremove => "Autoremove",
            Operation::UpdateAll => "Update All",
            Operation::StatusCheck => "System Status",
        }
    }

    /// Translation key shown while the operation is starting.
    pub fn status_key(self) -> &'static str {
        match self {
            Operation::UpdateRepos => "Updating repositories...",
            Operation::Upgrade => "Upgrading packages...",
            Operation::FlatpakUpdate => "Updating Flatpak applications...",
            Operation::Clean => "Cleaning package cache...",
            Operation::Autoremove => "Removing unused packages...",
            Operation::UpdateAll => "Updating everything...",
            Operation::StatusCheck => "Checking system status...",
        }
    }

    /// Whether any command of this operation goes through the elevation program.
    pub fn is_elevated(self) -> bool {
        !matches!(self, Operation::FlatpakUpdate | Operation::StatusCheck)
    }
}

/// Shell command lines for the single-command operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSet {
    pub update_repos: String,
    pub upgrade: String,
    pub flatpak_update: String,
    pub clean: String,
    pub autoremove: String,
}

impl CommandSet {
    /// Build the apt/flatpak commands, prefixing privileged ones with `elevation`
    /// (e.g. `pkexec`). An empty prefix runs them as-is.
    pub fn new(elevation: &str) -> Self {
        let elevated = |command: &str| {
            if elevation.trim().is_empty() {
                command.to_string()
            } else {
                format!("{} {}", elevation.trim(), command)
            }
        };
        Self {
            update_repos: elevated("apt-get update"),
            upgrade: elevated("apt-get upgrade -y"),
            flatpak_update: "flatpak update -y".to_string(),
            clean: elevated("apt-get clean"),
            autoremove: elevated("apt-get autoremove -y"),
        }
    }

    /// Command line for a single-command operation.
    pub fn command_for(&self, operation: Operation) -> Option<&str> {
        match operation {
            Operation::UpdateRepos => Some(&self.update_repos),
            Operation::Upgrade => Some(&self.upgrade),
            Operation::FlatpakUpdate => Some(&self.flatpak_update),
            Operation::Clean => Some(&self.clean),
            Operation::Autoremove => Some(&self.autoremove),
            Operation::UpdateAll | Operation::StatusCheck => None,
        }
    }
}

impl Default for CommandSet {
    fn default() -> Self {
        Self::new("pkexec")
    }
}

/// Maps operations to commands and reduces their output into results.
#[derive(Debug, Clone)]
pub struct Catalog<E> {
    executor: E,
    commands: CommandSet,
}

impl<E: CommandExecutor> Catalog<E> {
    pub fn new(executor: E, commands: CommandSet) -> Self {
        Self { executor, commands }
    }

    /// Run `operation` to completion. Never fails: runner faults become a
    /// failed result carrying the fault's description.
    pub fn execute(
        &self,
        operation: Operation,
        on_progress: &mut dyn FnMut(f64, &str) -> bool,
    ) -> CommandResult {
        log::info!("starting {}", operation.id());
        let outcome = match operation {
            Operation::UpdateAll => self.update_all(on_progress),
            Operation::StatusCheck => Ok(self.status_check(on_progress)),
            single => self.run_single(single, on_progress),
        };

        match outcome {
            Ok(result) => {
                if result.is_cancelled() {
                    log::warn!("{} cancelled", operation.id());
                } else {
                    log::info!("{} finished: success={}", operation.id(), result.success);
                }
                result
            }
            Err(e) => {
                log::error!("{} failed: {}", operation.id(), e);
                CommandResult::failure(format!("Error: {}", e))
            }
        }
    }

    fn run_single(
        &self,
        operation: Operation,
        on_progress: &mut dyn FnMut(f64, &str) -> bool,
    ) -> Result<CommandResult, RunnerError> {
        let Some(command) = self.commands.command_for(operation) else {
            return Ok(CommandResult::failure(format!(
                "Error: {} has no single command",
                operation.id()
            )));
        };
        let result = self.executor.run(command, on_progress)?;
        Ok(reduce(operation, result))
    }

    /// Repository refresh, upgrade and Flatpak update in sequence, each on
    /// its own slice of the progress range. Stops at the first failure and
    /// returns that step's result untouched.
    fn update_all(
        &self,
        on_progress: &mut dyn FnMut(f64, &str) -> bool,
    ) -> Result<CommandResult, RunnerError> {
        let mut upgrade = UpgradeStats::default();
        let mut flatpak_updated = 0;

        for (index, step) in UPDATE_ALL_STEPS.into_iter().enumerate() {
            let Some(command) = self.commands.command_for(step) else {
                continue;
            };
            let mut scaled = ProgressSlice::for_step(index, UPDATE_ALL_STEPS.len())
                .wrap(&mut *on_progress);
            let result = self.executor.run(command, &mut scaled)?;
            if !result.success {
                log::warn!("update-all stopped at {}", step.id());
                return Ok(result);
            }

            match step {
                Operation::Upgrade => upgrade = parse_upgrade_stats(result.details.output()),
                Operation::FlatpakUpdate => {
                    flatpak_updated = count_lines_containing(result.details.output(), "Installing")
                }
                _ => {}
            }
        }

        Ok(CommandResult::success(
            ALL_UPDATED,
            Details::UpdateAll {
                upgrade,
                flatpak_updated,
            },
        ))
    }

    /// Run each status probe to completion and assemble the report.
    fn status_check(&self, on_progress: &mut dyn FnMut(f64, &str) -> bool) -> CommandResult {
        let total = STATUS_CHECKS.len();
        let mut values = Vec::with_capacity(total);

        for (index, (description, command)) in STATUS_CHECKS.iter().enumerate() {
            let fraction = (index + 1) as f64 / total as f64;
            if !on_progress(fraction, &format!("Checking {}...", description)) {
                return CommandResult::cancelled();
            }
            let value = self
                .executor
                .capture(command)
                .unwrap_or_else(|e| format!("Error: {}", e));
            values.push(value);
        }

        CommandResult::success(
            STATUS_CHECKED,
            Details::Status {
                status: render_status_report(&values[0], &values[1], &values[2], &values[3]),
            },
        )
    }
}

/// Turn a single command's raw result into the operation's result.
/// Failures and cancellations pass through unchanged.
fn reduce(operation: Operation, result: CommandResult) -> CommandResult {
    if !result.success {
        return result;
    }
    let output = result.details.output();
    match operation {
        Operation::UpdateRepos => CommandResult::success(REPOS_UPDATED, Details::None),
        Operation::Upgrade => {
            CommandResult::success(PACKAGES_UPGRADED, Details::Upgrade(parse_upgrade_stats(output)))
        }
        Operation::FlatpakUpdate => CommandResult::success(
            FLATPAK_UPDATED,
            Details::Flatpak {
                updated: count_lines_containing(output, "Installing"),
            },
        ),
        Operation::Clean => CommandResult::success(CACHE_CLEANED, Details::None),
        Operation::Autoremove => CommandResult::success(
            UNUSED_REMOVED,
            Details::Autoremove {
                removed: count_lines_containing(output, "Removing"),
            },
        ),
        Operation::UpdateAll | Operation::StatusCheck => result,
    }
}

pub fn render_status_report(disk: &str, memory: &str, uptime: &str, updates: &str) -> String {
    format!(
        "System Status Report\n\
         -------------------\n\n\
         Disk Usage:\n{}\n\n\
         Memory Usage:\n{}\n\n\
         System Uptime:\n{}\n\n\
         Updates Available: {} packages",
        disk, memory, uptime, updates
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::maintenance::fake::FakeExecutor;

    fn test_commands() -> CommandSet {
        CommandSet::new("")
    }

    fn execute(
        executor: &FakeExecutor,
        operation: Operation,
    ) -> (CommandResult, Vec<(f64, String)>) {
        let catalog = Catalog::new(executor.clone(), test_commands());
        let mut seen = Vec::new();
        let result = catalog.execute(operation, &mut |fraction, message| {
            seen.push((fraction, message.to_string()));
            true
        });
        (result, seen)
    }

    #[test]
    fn test_command_set_prefixes_elevated_commands() {
        let commands = CommandSet::default();
        assert_eq!(commands.update_repos, "pkexec apt-get update");
        assert_eq!(commands.upgrade, "pkexec apt-get upgrade -y");
        assert_eq!(commands.clean, "pkexec apt-get clean");
        assert_eq!(commands.autoremove, "pkexec apt-get autoremove -y");
        assert_eq!(commands.flatpak_update, "flatpak update -y");

        let sudo = CommandSet::new("sudo");
        assert_eq!(sudo.upgrade, "sudo apt-get upgrade -y");
        assert_eq!(test_commands().clean, "apt-get clean");
    }

    #[test]
    fn test_operation_metadata() {
        let ids: Vec<&str> = Operation::ALL.iter().map(|op| op.id()).collect();
        assert_eq!(
            ids,
            vec![
                "update-repos",
                "upgrade",
                "flatpak-update",
                "clean",
                "autoremove",
                "update-all",
                "status-check",
            ]
        );
        assert!(!Operation::FlatpakUpdate.is_elevated());
        assert!(Operation::UpdateAll.is_elevated());
    }

    #[test]
    fn test_update_repos_drops_output() {
        let executor = FakeExecutor::new().succeed("apt-get update", &["Hit:1 http://deb"]);
        let (result, seen) = execute(&executor, Operation::UpdateRepos);
        assert_eq!(result, CommandResult::success(REPOS_UPDATED, Details::None));
        assert_eq!(seen.len(), 1);
    }

    #[test]
    fn test_upgrade_reduces_summary() {
        let executor = FakeExecutor::new().succeed(
            "apt-get upgrade -y",
            &[
                "Calculating upgrade...",
                "2 upgraded, 1 newly installed, 0 to remove and 0 not upgraded.",
            ],
        );
        let (result, _) = execute(&executor, Operation::Upgrade);
        assert!(result.success);
        assert_eq!(result.message, PACKAGES_UPGRADED);
        assert_eq!(
            result.details,
            Details::Upgrade(UpgradeStats {
                upgraded: 2,
                newly_installed: 1,
                to_remove: 0,
            })
        );
    }

    #[test]
    fn test_flatpak_counts_installing_lines() {
        let executor = FakeExecutor::new().succeed(
            "flatpak update -y",
            &["Installing 1/2", "Installing 2/2", "Changes complete."],
        );
        let (result, _) = execute(&executor, Operation::FlatpakUpdate);
        assert_eq!(result.details, Details::Flatpak { updated: 2 });
    }

    #[test]
    fn test_autoremove_counts_removing_lines() {
        let executor = FakeExecutor::new().succeed(
            "apt-get autoremove -y",
            &["Removing linux-image-6.1.0-17 ...", "Removing linux-headers ..."],
        );
        let (result, _) = execute(&executor, Operation::Autoremove);
        assert_eq!(result.message, UNUSED_REMOVED);
        assert_eq!(result.details, Details::Autoremove { removed: 2 });
    }

    #[test]
    fn test_clean_failure_passes_through() {
        let executor = FakeExecutor::new().fail("apt-get clean", "E: Could not open lock file\n");
        let (result, _) = execute(&executor, Operation::Clean);
        assert_eq!(
            result,
            CommandResult::failure("Error: E: Could not open lock file\n")
        );
    }

    #[test]
    fn test_update_all_merges_stats_and_scales_progress() {
        let executor = FakeExecutor::new()
            .succeed("apt-get update", &["Hit:1", "Hit:2"])
            .succeed(
                "apt-get upgrade -y",
                &["5 upgraded, 0 newly installed, 1 to remove and 0 not upgraded."],
            )
            .succeed("flatpak update -y", &["Installing 1/1"]);

        let (result, seen) = execute(&executor, Operation::UpdateAll);
        assert!(result.success);
        assert_eq!(result.message, ALL_UPDATED);
        assert_eq!(
            result.details,
            Details::UpdateAll {
                upgrade: UpgradeStats {
                    upgraded: 5,
                    newly_installed: 0,
                    to_remove: 1,
                },
                flatpak_updated: 1,
            }
        );
        assert_eq!(
            executor.calls(),
            vec!["apt-get update", "apt-get upgrade -y", "flatpak update -y"]
        );

        let fractions: Vec<f64> = seen.iter().map(|(f, _)| *f).collect();
        assert!(fractions.windows(2).all(|w| w[0] <= w[1]));
        assert!((fractions[0] - 0.01 / 3.0).abs() < 1e-12);
        assert!((fractions[2] - (1.0 / 3.0 + 0.01 / 3.0)).abs() < 1e-12);
        assert!((fractions[3] - (2.0 / 3.0 + 0.01 / 3.0)).abs() < 1e-12);
        assert!(fractions.iter().all(|f| *f < 1.0));
    }

    #[test]
    fn test_update_all_fails_fast() {
        let executor = FakeExecutor::new()
            .fail("apt-get update", "Request dismissed\n")
            .succeed("apt-get upgrade -y", &[])
            .succeed("flatpak update -y", &[]);

        let (result, _) = execute(&executor, Operation::UpdateAll);
        assert_eq!(result, CommandResult::failure("Error: Request dismissed\n"));
        assert_eq!(executor.calls(), vec!["apt-get update"]);
    }

    #[test]
    fn test_update_all_cancellation_stops_sequence() {
        let executor = FakeExecutor::new()
            .succeed("apt-get update", &["Hit:1"])
            .succeed("apt-get upgrade -y", &["Reading package lists..."])
            .succeed("flatpak update -y", &[]);
        let catalog = Catalog::new(executor.clone(), test_commands());

        let mut calls = 0;
        let result = catalog.execute(Operation::UpdateAll, &mut |_, _| {
            calls += 1;
            calls < 2
        });
        assert!(result.is_cancelled());
        assert_eq!(executor.calls(), vec!["apt-get update", "apt-get upgrade -y"]);
    }

    #[test]
    fn test_runner_fault_becomes_failed_result() {
        let executor = FakeExecutor::new().broken("apt-get update");
        let (result, _) = execute(&executor, Operation::UpdateRepos);
        assert!(!result.success);
        assert!(result.message.starts_with("Error: failed to start `apt-get update`"));
        assert_eq!(result.details, Details::None);
    }

    #[test]
    fn test_status_check_report() {
        let executor = FakeExecutor::new()
            .capture_output("df -h", "/dev/sda1 50G")
            .capture_output("free -h", "Mem: 16Gi")
            .capture_output("uptime", "up 3 days")
            .capture_output(STATUS_CHECKS[3].1, "7");

        let (result, seen) = execute(&executor, Operation::StatusCheck);
        assert!(result.success);
        assert_eq!(result.message, STATUS_CHECKED);
        assert_eq!(
            result.details,
            Details::Status {
                status: "System Status Report\n-------------------\n\n\
                         Disk Usage:\n/dev/sda1 50G\n\n\
                         Memory Usage:\nMem: 16Gi\n\n\
                         System Uptime:\nup 3 days\n\n\
                         Updates Available: 7 packages"
                    .to_string(),
            }
        );
        assert_eq!(
            seen,
            vec![
                (0.25, "Checking Disk Usage...".to_string()),
                (0.5, "Checking Memory Usage...".to_string()),
                (0.75, "Checking System Uptime...".to_string()),
                (1.0, "Checking Updates Available...".to_string()),
            ]
        );
    }

    #[test]
    fn test_status_check_records_probe_fault() {
        let executor = FakeExecutor::new()
            .capture_output("df -h", "disk")
            .broken("free -h")
            .capture_output("uptime", "up")
            .capture_output(STATUS_CHECKS[3].1, "0");

        let (result, _) = execute(&executor, Operation::StatusCheck);
        let Details::Status { status } = result.details else {
            panic!("expected status payload");
        };
        assert!(status.contains("Memory Usage:\nError: failed to start `free -h`"));
    }

    #[test]
    fn test_status_check_cancel() {
        let executor = FakeExecutor::new();
        let catalog = Catalog::new(executor.clone(), test_commands());
        let result = catalog.execute(Operation::StatusCheck, &mut |_, _| false);
        assert!(result.is_cancelled());
        assert!(executor.calls().is_empty());
    }
}
