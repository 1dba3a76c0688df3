use std::collections::HashMap;

use client_core::{FilterLabels, PaperControls, PresentationSurface};
use shared::{
    domain::{FontSize, Paper, PaperId, SectionKey},
    error::Notice,
};

/// Buffers what the coordinator renders so a command can print it once.
#[derive(Debug, Default)]
pub struct TerminalSurface {
    pub controls: HashMap<PaperId, PaperControls>,
    pub notices: Vec<Notice>,
    pub visible: Vec<PaperId>,
    pub match_count: (usize, usize),
    pub labels: FilterLabels,
    pub sections: HashMap<SectionKey, bool>,
    pub font_size: FontSize,
    pub expanded_abstracts: Vec<PaperId>,
}

impl TerminalSurface {
    /// Abstracts follow their section's expanded flag unless toggled open.
    pub fn abstract_shown(&self, paper: &Paper) -> bool {
        self.sections.get(&paper.section()).copied().unwrap_or(true)
            || self.expanded_abstracts.contains(&paper.id)
    }

    /// Every visible paper gets a row; collapsed sections only hide the
    /// abstract line.
    pub fn render_listing(&self, papers: &[Paper]) -> String {
        let by_id: HashMap<&PaperId, &Paper> =
            papers.iter().map(|paper| (&paper.id, paper)).collect();

        let mut out = format!("{} of {} papers", self.match_count.0, self.match_count.1);
        for label in [self.labels.local, self.labels.voted].into_iter().flatten() {
            out.push_str(&FilterLabels::annotation(label));
        }
        out.push('\n');

        for paper_id in &self.visible {
            let Some(paper) = by_id.get(paper_id) else {
                continue;
            };
            let controls = self
                .controls
                .get(paper_id)
                .cloned()
                .unwrap_or_else(|| PaperControls::for_paper(paper));
            let date = paper
                .published_at
                .map(|date| date.to_string())
                .unwrap_or_else(|| "----------".to_string());
            out.push_str(&format!(
                "[{}] {} {} ({} {}) {}  | {} | {}\n",
                paper.section().as_str(),
                paper.id,
                date,
                controls.vote_count,
                controls.vote_postfix,
                paper.title,
                controls.vote_label,
                controls.reserve_label,
            ));
            if self.abstract_shown(paper) && !paper.abstract_text.is_empty() {
                out.push_str(&format!(
                    "    {} [{}]\n",
                    paper.abstract_text,
                    self.font_size.css_class()
                ));
            }
        }
        out
    }

    pub fn print_listing(&self, papers: &[Paper]) {
        print!("{}", self.render_listing(papers));
    }

    pub fn print_notices(&self) {
        for notice in &self.notices {
            eprintln!("{:?}: {}", notice.severity(), notice.message);
        }
    }
}

impl PresentationSurface for TerminalSurface {
    fn render_paper_controls(&mut self, controls: &PaperControls) {
        self.controls.insert(controls.paper_id.clone(), controls.clone());
    }

    fn show_notice(&mut self, notice: &Notice) {
        self.notices.push(notice.clone());
    }

    fn show_papers(&mut self, visible: &[PaperId]) {
        self.visible = visible.to_vec();
    }

    fn set_match_count(&mut self, count: usize, original: usize) {
        self.match_count = (count, original);
    }

    fn set_filter_labels(&mut self, labels: FilterLabels) {
        self.labels = labels;
    }

    fn set_section_expanded(&mut self, section: SectionKey, expanded: bool) {
        self.sections.insert(section, expanded);
    }

    fn apply_font_size(&mut self, size: FontSize) {
        self.font_size = size;
    }

    fn toggle_abstract(&mut self, paper_id: &PaperId) {
        match self.expanded_abstracts.iter().position(|id| id == paper_id) {
            Some(index) => {
                self.expanded_abstracts.remove(index);
            }
            None => self.expanded_abstracts.push(paper_id.clone()),
        }
    }
}
