//! Client interest filters.
//!
//! A client declares the organizations and repositories it wants to hear
//! about. Both lists empty means "everything".

use std::collections::BTreeSet;

/// Separator between owner and repository in a full repository name.
const REPO_SEPARATOR: char = '/';

/// A client's declared interest.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InterestFilter {
    orgs: BTreeSet<String>,
    repos: BTreeSet<String>,
}

impl InterestFilter {
    pub fn new<O, R>(orgs: O, repos: R) -> Self
    where
        O: IntoIterator,
        O::Item: Into<String>,
        R: IntoIterator,
        R::Item: Into<String>,
    {
        Self {
            orgs: orgs.into_iter().map(Into::into).collect(),
            repos: repos.into_iter().map(Into::into).collect(),
        }
    }

    /// `true` when no organization or repository was declared.
    pub fn is_unfiltered(&self) -> bool {
        self.orgs.is_empty() && self.repos.is_empty()
    }

    /// Decide whether an event with the given routing attributes is of
    /// interest.
    ///
    /// Matches when the filter is empty, the organization is listed, the
    /// full repository name is listed, or the short repository name (after
    /// the last `/`) is listed.
    pub fn matches(&self, org_name: Option<&str>, repo_name: Option<&str>) -> bool {
        if self.is_unfiltered() {
            return true;
        }

        if org_name.is_some_and(|org| self.orgs.contains(org)) {
            return true;
        }

        let Some(repo) = repo_name else {
            return false;
        };
        if self.repos.contains(repo) {
            return true;
        }
        repo.rsplit_once(REPO_SEPARATOR)
            .is_some_and(|(_, short)| self.repos.contains(short))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn filter(orgs: &[&str], repos: &[&str]) -> InterestFilter {
        InterestFilter::new(orgs.iter().copied(), repos.iter().copied())
    }

    #[test]
    fn empty_filter_matches_everything() {
        let f = InterestFilter::default();
        assert!(f.is_unfiltered());
        assert!(f.matches(None, None));
        assert!(f.matches(Some("acme"), Some("acme/widgets")));
    }

    #[test]
    fn org_filter() {
        assert!(filter(&["acme"], &[]).matches(Some("acme"), None));
        assert!(!filter(&["other"], &[]).matches(Some("acme"), None));
        assert!(!filter(&["acme"], &[]).matches(None, Some("acme/widgets")));
    }

    #[test]
    fn full_repo_name_filter() {
        let f = filter(&[], &["acme/widgets"]);
        assert!(f.matches(None, Some("acme/widgets")));
        assert!(!f.matches(None, Some("acme/gadgets")));
    }

    #[test]
    fn short_repo_name_filter() {
        let f = filter(&[], &["widgets"]);
        assert!(f.matches(Some("acme"), Some("acme/widgets")));
        assert!(f.matches(None, Some("widgets")));
        assert!(!f.matches(None, Some("widgets/other")));
    }

    #[test]
    fn either_list_can_match() {
        let f = filter(&["acme"], &["gadgets"]);
        assert!(f.matches(Some("acme"), Some("acme/widgets")));
        assert!(f.matches(Some("globex"), Some("globex/gadgets")));
        assert!(!f.matches(Some("globex"), Some("globex/widgets")));
    }

    #[test]
    fn filtered_client_skips_events_without_metadata() {
        assert!(!filter(&["acme"], &["widgets"]).matches(None, None));
    }
}
