//! Shared test utilities
//!
//! Common fixtures used across test modules. Only compiled in test builds.

use crate::deliverable::Deliverable;

/// A valid commit hash
pub const SHA_A: &str = "a26e6a2e8a5e321b2e3517dbb01a7b9a56a8bfd5";

/// Another valid commit hash
pub const SHA_B: &str = "0cd17d1ee3b9284d36b2a0d370b49a6f0bbb9660";

/// A deliverable that passes every check for series `rocky`
pub const SAMPLE_DELIVERABLE: &str = r"---
launchpad: oslo.config
team: oslo
type: library
release-model: cycle-with-intermediary
send-announcements-to: openstack-discuss@lists.openstack.org
repository-settings:
  openstack/oslo.config: {}
cycle-highlights:
  - Configuration drivers can be loaded from entry points.
releases:
  - version: 6.0.0.0rc1
    projects:
      - repo: openstack/oslo.config
        hash: a26e6a2e8a5e321b2e3517dbb01a7b9a56a8bfd5
  - version: 6.0.0
    projects:
      - repo: openstack/oslo.config
        hash: a26e6a2e8a5e321b2e3517dbb01a7b9a56a8bfd5
branches:
  - name: stable/rocky
    location: 6.0.0
release-notes: https://docs.openstack.org/releasenotes/oslo.config
";

/// Parse a deliverable for tests, prefixing a bug tracker and a single
/// release when the snippet does not provide them.
///
/// `body` is YAML appended after the defaults; keys it sets must not also
/// be defaulted, so pass `with_releases = false` when `body` has its own
/// `releases` list.
#[must_use]
pub fn make_deliverable(series: &str, body: &str, with_releases: bool) -> Deliverable {
    let mut yaml = String::new();
    if !body.contains("launchpad:") && !body.contains("storyboard:") {
        yaml.push_str("launchpad: release-test\n");
    }
    if with_releases {
        yaml.push_str(&format!(
            "releases:\n  - version: 0.0.3\n    projects:\n      - repo: openstack/release-test\n        hash: {SHA_B}\n"
        ));
    }
    yaml.push_str(body);
    Deliverable::parse(series, "release-test", &yaml).unwrap()
}
