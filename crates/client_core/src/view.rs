//! Gesture wiring between a presentation surface and the core.
//!
//! The coordinator holds no paper state of its own beyond the display order;
//! vote and reservation flags are always read back from the controller.

use std::sync::Arc;

use shared::{
    domain::{vote_postfix, Direction, FontSize, Paper, PaperId, SectionKey, ViewPreferences},
    error::Notice,
};
use tracing::{debug, warn};

use crate::{
    controller::{InteractionError, Outcome, PaperInteractionController},
    filter::{apply_filters, FilterFlags, FilterLabels},
    preferences::PreferenceStore,
    sort::{sort_papers, SortColumn, SortDirection},
};

pub const VOTE_LABEL: &str = "Vote for next astro-coffee";
pub const UNVOTE_LABEL: &str = "Remove your vote";
pub const RESERVE_LABEL: &str = "Reserve for later discussion";
pub const RELEASE_LABEL: &str = "Release your reservation";

/// Rendered state of one paper's vote and reservation controls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaperControls {
    pub paper_id: PaperId,
    pub vote_count: u32,
    pub vote_postfix: &'static str,
    pub vote_label: &'static str,
    pub vote_action: Direction,
    pub reserve_label: &'static str,
    pub reserve_action: Direction,
}

impl PaperControls {
    pub fn for_paper(paper: &Paper) -> Self {
        let vote_action = paper.next_vote_action();
        let reserve_action = paper.next_reserve_action();
        Self {
            paper_id: paper.id.clone(),
            vote_count: paper.vote_count,
            vote_postfix: vote_postfix(paper.vote_count),
            vote_label: match vote_action {
                Direction::Add => VOTE_LABEL,
                Direction::Remove => UNVOTE_LABEL,
            },
            vote_action,
            reserve_label: match reserve_action {
                Direction::Add => RESERVE_LABEL,
                Direction::Remove => RELEASE_LABEL,
            },
            reserve_action,
        }
    }
}

pub trait PresentationSurface: Send {
    fn render_paper_controls(&mut self, controls: &PaperControls);
    fn show_notice(&mut self, notice: &Notice);
    /// Visible papers, in display order.
    fn show_papers(&mut self, visible: &[PaperId]);
    fn set_match_count(&mut self, count: usize, original: usize);
    fn set_filter_labels(&mut self, labels: FilterLabels);
    fn set_section_expanded(&mut self, section: SectionKey, expanded: bool);
    /// Applies the text-size class to every abstract and selects the radio.
    fn apply_font_size(&mut self, size: FontSize);
    fn toggle_abstract(&mut self, paper_id: &PaperId);
}

#[derive(Debug, Clone, PartialEq)]
pub enum Gesture {
    VoteClicked(PaperId),
    ReserveClicked(PaperId),
    TitleClicked(PaperId),
    FiltersChanged(FilterFlags),
    SortRequested {
        column: SortColumn,
        direction: SortDirection,
    },
    SectionToggled {
        section: SectionKey,
        visible: bool,
    },
    FontSizeSelected(FontSize),
}

pub struct ViewCoordinator<S: PresentationSurface> {
    controller: Arc<PaperInteractionController>,
    preferences: PreferenceStore,
    surface: S,
    prefs: ViewPreferences,
    filters: FilterFlags,
    order: Vec<PaperId>,
    original_match_count: usize,
}

impl<S: PresentationSurface> ViewCoordinator<S> {
    pub fn new(
        controller: Arc<PaperInteractionController>,
        preferences: PreferenceStore,
        surface: S,
    ) -> Self {
        Self {
            controller,
            preferences,
            surface,
            prefs: ViewPreferences::default(),
            filters: FilterFlags::default(),
            order: Vec::new(),
            original_match_count: 0,
        }
    }

    pub fn controller(&self) -> &Arc<PaperInteractionController> {
        &self.controller
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn preferences(&self) -> &ViewPreferences {
        &self.prefs
    }

    pub fn original_match_count(&self) -> usize {
        self.original_match_count
    }

    /// Restores stored preferences, remembers the unfiltered match count and
    /// renders every paper's controls.
    pub async fn start(&mut self) {
        if let Some(prefs) = self.preferences.load().await {
            PreferenceStore::apply(&prefs, &mut self.surface);
            self.prefs = prefs;
        }

        let papers = self.controller.papers().await;
        self.order = papers.iter().map(|paper| paper.id.clone()).collect();
        self.original_match_count = papers.len();
        for paper in &papers {
            self.surface.render_paper_controls(&PaperControls::for_paper(paper));
        }
        self.refresh_listing().await;
    }

    pub async fn handle(&mut self, gesture: Gesture) -> Result<Option<Outcome>, InteractionError> {
        match gesture {
            Gesture::VoteClicked(paper_id) => {
                let direction = self.controller.paper(&paper_id).await?.next_vote_action();
                let outcome = self.controller.submit_vote(&paper_id, direction).await?;
                self.render_outcome(&paper_id, &outcome).await?;
                Ok(Some(outcome))
            }
            Gesture::ReserveClicked(paper_id) => {
                let direction = self.controller.paper(&paper_id).await?.next_reserve_action();
                let outcome = self
                    .controller
                    .submit_reservation(&paper_id, direction)
                    .await?;
                self.render_outcome(&paper_id, &outcome).await?;
                Ok(Some(outcome))
            }
            Gesture::TitleClicked(paper_id) => {
                self.surface.toggle_abstract(&paper_id);
                Ok(None)
            }
            Gesture::FiltersChanged(flags) => {
                self.filters = flags;
                self.refresh_listing().await;
                Ok(None)
            }
            Gesture::SortRequested { column, direction } => {
                self.apply_sort(&column, direction).await;
                Ok(None)
            }
            Gesture::SectionToggled { section, visible } => {
                self.prefs.set_section_visible(section, visible);
                self.surface.set_section_expanded(section, visible);
                self.persist_preferences().await;
                Ok(None)
            }
            Gesture::FontSizeSelected(size) => {
                self.prefs.font_size = size;
                self.surface.apply_font_size(size);
                self.persist_preferences().await;
                Ok(None)
            }
        }
    }

    async fn render_outcome(
        &mut self,
        paper_id: &PaperId,
        outcome: &Outcome,
    ) -> Result<(), InteractionError> {
        match outcome.notice() {
            Some(notice) => self.surface.show_notice(&notice),
            None => {
                let paper = self.controller.paper(paper_id).await?;
                self.surface.render_paper_controls(&PaperControls::for_paper(&paper));
            }
        }
        Ok(())
    }

    // Sorting the whole display order keeps hidden papers in place for the
    // next filter change; a stable sort restricted to the visible subset
    // gives the same visible order.
    async fn apply_sort(&mut self, column: &SortColumn, direction: SortDirection) {
        let mut papers = self.ordered_papers().await;
        sort_papers(&mut papers, column, direction);
        self.order = papers.iter().map(|paper| paper.id.clone()).collect();
        debug!("view: sorted column={column} direction={direction:?}");
        self.refresh_listing().await;
    }

    async fn refresh_listing(&mut self) {
        let papers = self.ordered_papers().await;
        let view = apply_filters(&papers, self.filters);
        self.surface.show_papers(&view.ids());
        self.surface.set_filter_labels(view.labels);
        self.surface.set_match_count(view.count(), self.original_match_count);
    }

    async fn ordered_papers(&self) -> Vec<Paper> {
        let mut papers = self.controller.papers().await;
        papers.sort_by_key(|paper| {
            self.order
                .iter()
                .position(|id| *id == paper.id)
                .unwrap_or(usize::MAX)
        });
        papers
    }

    async fn persist_preferences(&self) {
        if let Err(err) = self.preferences.save(&self.prefs).await {
            warn!("preferences: write-through failed err={err:#}");
        }
    }
}

#[cfg(test)]
#[path = "tests/view_tests.rs"]
mod tests;
