//! Boolean list filters over the candidate papers.

use shared::domain::{Paper, PaperId};

pub const LOCAL_FILTER_LABEL: &str = "local authors only";
pub const VOTED_FILTER_LABEL: &str = "voted papers only";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FilterFlags {
    pub local_only: bool,
    pub voted_only: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaperPredicate {
    LocalAuthors,
    HasVotes,
}

impl PaperPredicate {
    pub fn matches(self, paper: &Paper) -> bool {
        match self {
            PaperPredicate::LocalAuthors => paper.is_local_author,
            PaperPredicate::HasVotes => paper.vote_count != 0,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PaperPredicate::LocalAuthors => LOCAL_FILTER_LABEL,
            PaperPredicate::HasVotes => VOTED_FILTER_LABEL,
        }
    }
}

impl FilterFlags {
    pub fn predicates(self) -> Vec<PaperPredicate> {
        let mut predicates = Vec::with_capacity(2);
        if self.local_only {
            predicates.push(PaperPredicate::LocalAuthors);
        }
        if self.voted_only {
            predicates.push(PaperPredicate::HasVotes);
        }
        predicates
    }

    pub fn is_empty(self) -> bool {
        !self.local_only && !self.voted_only
    }
}

/// One annotation slot per filter, filled only while that filter is active.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FilterLabels {
    pub local: Option<&'static str>,
    pub voted: Option<&'static str>,
}

impl FilterLabels {
    pub fn for_flags(flags: FilterFlags) -> Self {
        Self {
            local: flags.local_only.then(|| PaperPredicate::LocalAuthors.label()),
            voted: flags.voted_only.then(|| PaperPredicate::HasVotes.label()),
        }
    }

    pub fn annotation(label: &str) -> String {
        format!(", with filter: {label}")
    }
}

#[derive(Debug, Clone)]
pub struct FilteredView<'a> {
    pub visible: Vec<&'a Paper>,
    pub labels: FilterLabels,
}

impl<'a> FilteredView<'a> {
    pub fn count(&self) -> usize {
        self.visible.len()
    }

    pub fn ids(&self) -> Vec<PaperId> {
        self.visible.iter().map(|paper| paper.id.clone()).collect()
    }
}

/// Keeps the papers matching every active predicate, in input order.
///
/// Active predicates are combined as a conjunction per paper, so the result
/// is the intersection of the single-filter results whatever the order.
pub fn apply_filters(papers: &[Paper], flags: FilterFlags) -> FilteredView<'_> {
    let predicates = flags.predicates();
    let visible = papers
        .iter()
        .filter(|paper| predicates.iter().all(|predicate| predicate.matches(paper)))
        .collect();

    FilteredView {
        visible,
        labels: FilterLabels::for_flags(flags),
    }
}

#[cfg(test)]
#[path = "tests/filter_tests.rs"]
mod tests;
