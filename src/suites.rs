//! Suite membership of a single template.
use std::collections::BTreeSet;

/// The set of suites a template belongs to.
///
/// A template outside every suite is unconditional; otherwise it is active
/// when at least one of its suites is enabled.
///
/// # Examples
///
/// ```
/// use std::collections::BTreeSet;
/// use dotplate::SuiteSet;
///
/// let enabled: BTreeSet<String> = ["vim".to_string()].into();
/// assert!(SuiteSet::default().is_file_active(&enabled));
/// assert!(SuiteSet::from_iter(["vim", "emacs"]).is_file_active(&enabled));
/// assert!(!SuiteSet::from_iter(["emacs"]).is_file_active(&enabled));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SuiteSet {
    suites: BTreeSet<String>,
}

impl SuiteSet {
    /// Add a suite to the set.
    pub fn insert(&mut self, suite: impl Into<String>) {
        self.suites.insert(suite.into());
    }

    /// Return `true` if the template belongs to no suite.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.suites.is_empty()
    }

    /// Iterate over the suite names in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.suites.iter().map(String::as_str)
    }

    /// Decide whether the template is active given the enabled suites.
    #[must_use]
    pub fn is_file_active(&self, enabled: &BTreeSet<String>) -> bool {
        self.suites.is_empty() || !self.suites.is_disjoint(enabled)
    }
}

impl<S: Into<String>> FromIterator<S> for SuiteSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            suites: iter.into_iter().map(Into::into).collect(),
        }
    }
}
