// Version comparison and Minecraft compatibility checks

use std::cmp::Ordering;

/// Strip build metadata and a leading "v" from a version string
///
/// - "1.20.1-R0.1-SNAPSHOT" -> "1.20.1"
/// - "v7.3.0" -> "7.3.0"
pub fn normalize_version(version: &str) -> &str {
    let version = version.trim();
    let version = version
        .strip_prefix(['v', 'V'])
        .filter(|rest| rest.starts_with(|c: char| c.is_ascii_digit()))
        .unwrap_or(version);
    version.split(['-', '+', ' ']).next().unwrap_or(version)
}

/// Check if a game version is compatible with the target Minecraft version.
///
/// "1.20" and "1.20.4" match each other in either direction, "1.2" never
/// matches "1.20".
pub fn matches_mc_version(version: &str, target: &str) -> bool {
    let version = normalize_version(version);
    let target = normalize_version(target);

    let is_prefix = |long: &str, short: &str| {
        long.strip_prefix(short)
            .is_some_and(|rest| rest.is_empty() || rest.starts_with('.'))
    };

    is_prefix(version, target) || is_prefix(target, version)
}

/// Compare two version strings segment by segment, numerically where both segments are numbers
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    let split = |v: &str| -> Vec<String> {
        normalize_version(v)
            .split(['.', '_'])
            .map(str::to_string)
            .collect()
    };
    let (a, b) = (split(a), split(b));

    for (x, y) in a.iter().zip(b.iter()) {
        let ordering = match (x.parse::<u64>(), y.parse::<u64>()) {
            (Ok(x), Ok(y)) => x.cmp(&y),
            _ => x.cmp(y),
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    a.len().cmp(&b.len())
}

/// Check whether `installed` is the same release as `latest`
pub fn is_same_version(installed: &str, latest: &str) -> bool {
    installed.trim() == latest.trim()
        || compare_versions(installed, latest) == Ordering::Equal
}
