//! Heuristic reductions over captured command output
//!
//! apt and flatpak print human-readable text only, so these scan lines for
//! known phrases. A wording change yields zero counts, never an error.

use super::types::UpgradeStats;
use regex::Regex;
use std::sync::LazyLock;

static UPGRADED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+) upgraded").expect("valid regex"));
static NEWLY_INSTALLED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+) newly installed").expect("valid regex"));
static TO_REMOVE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+) to remove").expect("valid regex"));

/// First number captured by `re` in `line`.
fn first_count(re: &Regex, line: &str) -> Option<usize> {
    re.captures(line)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// Parse the apt summary line, e.g.
///   `3 upgraded, 1 newly installed, 0 to remove and 2 not upgraded.`
///
/// A later matching line overwrites an earlier one.
pub fn parse_upgrade_stats<S: AsRef<str>>(lines: &[S]) -> UpgradeStats {
    let mut stats = UpgradeStats::default();

    for line in lines {
        let line = line.as_ref();
        if line.contains("upgraded,") {
            if let Some(n) = first_count(&UPGRADED_RE, line) {
                stats.upgraded = n;
            }
        }
        if line.contains("newly installed") {
            if let Some(n) = first_count(&NEWLY_INSTALLED_RE, line) {
                stats.newly_installed = n;
            }
        }
        if line.contains("to remove") {
            if let Some(n) = first_count(&TO_REMOVE_RE, line) {
                stats.to_remove = n;
            }
        }
    }

    stats
}

/// Number of lines containing `needle` (case-sensitive).
pub fn count_lines_containing<S: AsRef<str>>(lines: &[S], needle: &str) -> usize {
    lines
        .iter()
        .filter(|line| line.as_ref().contains(needle))
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(raw: &str) -> Vec<String> {
        raw.lines().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_upgrade_stats_apt_summary() {
        let output = lines(
            "Reading package lists...\n\
             Building dependency tree...\n\
             Calculating upgrade...\n\
             The following packages will be upgraded:\n\
             \x20 libc6 libc-bin tzdata\n\
             3 upgraded, 1 newly installed, 2 to remove and 4 not upgraded.\n\
             Need to get 6,512 kB of archives.",
        );
        assert_eq!(
            parse_upgrade_stats(&output),
            UpgradeStats {
                upgraded: 3,
                newly_installed: 1,
                to_remove: 2,
            }
        );
    }

    #[test]
    fn test_parse_upgrade_stats_no_summary_is_zero() {
        let output = lines("Reading package lists...\nDone");
        assert_eq!(parse_upgrade_stats(&output), UpgradeStats::default());
        assert_eq!(parse_upgrade_stats::<String>(&[]), UpgradeStats::default());
    }

    #[test]
    fn test_parse_upgrade_stats_ignores_not_upgraded() {
        // "upgraded," is absent, so the "not upgraded" count must not leak in
        let output = lines("0 newly installed, 0 to remove and 7 not upgraded.");
        let stats = parse_upgrade_stats(&output);
        assert_eq!(stats.upgraded, 0);
        assert_eq!(stats.newly_installed, 0);
        assert_eq!(stats.to_remove, 0);
    }

    #[test]
    fn test_parse_upgrade_stats_last_line_wins() {
        let output = lines(
            "1 upgraded, 0 newly installed, 0 to remove and 0 not upgraded.\n\
             12 upgraded, 3 newly installed, 1 to remove and 0 not upgraded.",
        );
        let stats = parse_upgrade_stats(&output);
        assert_eq!(stats.upgraded, 12);
        assert_eq!(stats.newly_installed, 3);
        assert_eq!(stats.to_remove, 1);
    }

    #[test]
    fn test_parse_upgrade_stats_partial_fields() {
        let output = lines("The following NEW packages will be installed:\n5 newly installed");
        let stats = parse_upgrade_stats(&output);
        assert_eq!(stats.upgraded, 0);
        assert_eq!(stats.newly_installed, 5);
    }

    #[test]
    fn test_count_lines_containing_flatpak_installs() {
        let output = lines(
            "Looking for updates...\n\
             Installing org.gnome.Platform\n\
             Installing org.mozilla.firefox\n\
             Updating org.freedesktop.Platform.GL.default\n\
             installing lowercase does not count",
        );
        assert_eq!(count_lines_containing(&output, "Installing"), 2);
        assert_eq!(count_lines_containing(&output, "Removing"), 0);
    }

    #[test]
    fn test_count_lines_containing_counts_lines_not_occurrences() {
        let output = lines("Removing a Removing b\nRemoving c\n");
        assert_eq!(count_lines_containing(&output, "Removing"), 2);
        assert_eq!(count_lines_containing::<&str>(&[], "Removing"), 0);
    }
}
