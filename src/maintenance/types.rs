//! Result types shared by the runner, the reducers and the operation catalog

/// Message reported when the progress callback asks the runner to stop.
pub const CANCELLED_MESSAGE: &str = "Operation cancelled";

/// Message reported by the runner when a command exits with status 0.
pub const COMPLETED_MESSAGE: &str = "Completed";

/// Package counts reduced from an `apt-get upgrade` summary line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpgradeStats {
    pub upgraded: usize,
    pub newly_installed: usize,
    pub to_remove: usize,
}

/// Operation-specific payload of a [`CommandResult`].
///
/// One variant per result shape, so the presentation layer matches on
/// the payload instead of probing for optional keys. `None` is the empty
/// payload; a result always carries one of these.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Details {
    #[default]
    None,
    /// Captured stdout lines, in the order the child produced them.
    Output { output: Vec<String> },
    Upgrade(UpgradeStats),
    Flatpak { updated: usize },
    Autoremove { removed: usize },
    UpdateAll {
        upgrade: UpgradeStats,
        flatpak_updated: usize,
    },
    /// Preformatted system status report.
    Status { status: String },
}

impl Details {
    /// Numeric fields keyed by their stable identifiers, in display order.
    pub fn counts(&self) -> Vec<(&'static str, usize)> {
        match self {
            Details::Upgrade(stats) => upgrade_counts(stats),
            Details::Flatpak { updated } => vec![("updated", *updated)],
            Details::Autoremove { removed } => vec![("removed", *removed)],
            Details::UpdateAll {
                upgrade,
                flatpak_updated,
            } => {
                let mut counts = upgrade_counts(upgrade);
                counts.push(("flatpak_updated", *flatpak_updated));
                counts
            }
            Details::None | Details::Output { .. } | Details::Status { .. } => Vec::new(),
        }
    }

    /// Captured output lines, empty for payloads that do not keep them.
    pub fn output(&self) -> &[String] {
        match self {
            Details::Output { output } => output,
            _ => &[],
        }
    }
}

fn upgrade_counts(stats: &UpgradeStats) -> Vec<(&'static str, usize)> {
    vec![
        ("upgraded", stats.upgraded),
        ("newly_installed", stats.newly_installed),
        ("to_remove", stats.to_remove),
    ]
}

/// Final outcome of a command or operation, handed once to the UI.
#[derive(Debug, Clone, PartialEq)]
pub struct CommandResult {
    pub success: bool,
    /// Language-agnostic message key; translated by the presentation layer.
    pub message: String,
    pub details: Details,
}

impl CommandResult {
    pub fn success(message: impl Into<String>, details: Details) -> Self {
        Self {
            success: true,
            message: message.into(),
            details,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            details: Details::None,
        }
    }

    pub fn cancelled() -> Self {
        Self::failure(CANCELLED_MESSAGE)
    }

    pub fn is_cancelled(&self) -> bool {
        !self.success && self.message == CANCELLED_MESSAGE
    }
}
