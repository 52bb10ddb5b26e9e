// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Canopy-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Canopy and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;
use std::sync::Arc;

use regex::Regex;

/// Decides which non-root nodes start expanded when a tree is first built.
///
/// The root is always expanded (if it has children); every other node with
/// known children starts collapsed unless its name passes this predicate.
#[derive(Clone, Default)]
pub enum ExpandPolicy {
    #[default]
    RootOnly,
    All,
    /// Expand names with exactly this many characters.
    NameLength(usize),
    NamePattern(Regex),
    Custom(Arc<dyn Fn(&str) -> bool + Send + Sync>),
}

impl ExpandPolicy {
    pub fn custom(predicate: impl Fn(&str) -> bool + Send + Sync + 'static) -> Self {
        Self::Custom(Arc::new(predicate))
    }

    pub fn pre_expands(&self, name: &str) -> bool {
        match self {
            Self::RootOnly => false,
            Self::All => true,
            Self::NameLength(length) => name.chars().count() == *length,
            Self::NamePattern(pattern) => pattern.is_match(name),
            Self::Custom(predicate) => predicate(name),
        }
    }
}

impl fmt::Debug for ExpandPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RootOnly => f.write_str("RootOnly"),
            Self::All => f.write_str("All"),
            Self::NameLength(length) => f.debug_tuple("NameLength").field(length).finish(),
            Self::NamePattern(pattern) => {
                f.debug_tuple("NamePattern").field(&pattern.as_str()).finish()
            }
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use regex::Regex;
    use rstest::rstest;

    use super::ExpandPolicy;

    #[rstest]
    #[case(ExpandPolicy::RootOnly, "alice", false)]
    #[case(ExpandPolicy::All, "alice", true)]
    #[case(ExpandPolicy::NameLength(15), "alice", false)]
    #[case(ExpandPolicy::NameLength(5), "alice", true)]
    #[case(ExpandPolicy::NamePattern(Regex::new("^a").expect("regex")), "alice", true)]
    #[case(ExpandPolicy::NamePattern(Regex::new("^b").expect("regex")), "alice", false)]
    fn policy_decides_pre_expansion(
        #[case] policy: ExpandPolicy,
        #[case] name: &str,
        #[case] expected: bool,
    ) {
        assert_eq!(policy.pre_expands(name), expected);
    }

    #[test]
    fn custom_policy_runs_the_closure() {
        let policy = ExpandPolicy::custom(|name| name.ends_with("-team"));
        assert!(policy.pre_expands("core-team"));
        assert!(!policy.pre_expands("alice"));
        assert_eq!(format!("{policy:?}"), "Custom(..)");
    }
}
