use scraper::{ElementRef, Html};
use tracing::debug;

use crate::app::{Result, ShelfscanError};
use crate::domain::ProductRecord;
use crate::extractor::config::LocatorConfig;
use crate::extractor::hypothesis::Hypothesis;
use crate::extractor::product::{Extraction, ProductExtractor, Rejection};

/// Result of running every hypothesis against one document.
#[derive(Debug, Clone, Default)]
pub struct PageExtraction {
    /// Winning hypothesis, `None` when no hypothesis produced a record
    pub hypothesis: Option<String>,
    /// Outcomes of the winning hypothesis' candidates, in document order
    pub outcomes: Vec<Extraction>,
    /// Candidate count per hypothesis actually tried
    pub tried: Vec<(String, usize)>,
}

impl PageExtraction {
    pub fn accepted(&self) -> impl Iterator<Item = &ProductRecord> {
        self.outcomes.iter().filter_map(Extraction::record)
    }

    pub fn rejections(&self) -> impl Iterator<Item = &Rejection> {
        self.outcomes.iter().filter_map(|outcome| match outcome {
            Extraction::Rejected(reason) => Some(reason),
            Extraction::Accepted(_) => None,
        })
    }

    pub fn into_accepted(self) -> Vec<ProductRecord> {
        self.outcomes
            .into_iter()
            .filter_map(|outcome| match outcome {
                Extraction::Accepted(record) => Some(record),
                Extraction::Rejected(_) => None,
            })
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.hypothesis.is_none()
    }
}

/// Finds product cards by trying hypotheses in priority order.
///
/// A hypothesis wins only when at least one of its candidates survives the
/// product extractor; a structural match that yields nothing extractable
/// falls through to the next hypothesis.
#[derive(Debug, Clone)]
pub struct ElementLocator {
    hypotheses: Vec<Hypothesis>,
}

impl ElementLocator {
    pub fn new(hypotheses: Vec<Hypothesis>) -> Self {
        Self { hypotheses }
    }

    pub fn from_config(config: &LocatorConfig) -> Result<Self> {
        if config.hypotheses.is_empty() {
            return Err(ShelfscanError::Config(
                "locator needs at least one hypothesis".into(),
            ));
        }

        let hypotheses = config
            .hypotheses
            .iter()
            .map(|h| Hypothesis::compile(h, config))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self::new(hypotheses))
    }

    pub fn hypotheses(&self) -> &[Hypothesis] {
        &self.hypotheses
    }

    /// Candidate cards of the first hypothesis yielding an extractable record.
    pub fn locate<'a>(
        &self,
        document: &'a Html,
        extractor: &ProductExtractor,
    ) -> Option<(&Hypothesis, Vec<ElementRef<'a>>)> {
        self.hypotheses.iter().find_map(|hypothesis| {
            let candidates = hypothesis.candidates(document);
            candidates
                .iter()
                .any(|card| extractor.extract(*card, &hypothesis.fields).is_accepted())
                .then_some((hypothesis, candidates))
        })
    }

    /// Run the hypotheses and keep every outcome of the winner.
    pub fn extract_page(&self, document: &Html, extractor: &ProductExtractor) -> PageExtraction {
        let mut page = PageExtraction::default();

        for hypothesis in &self.hypotheses {
            let candidates = hypothesis.candidates(document);
            page.tried.push((hypothesis.name.clone(), candidates.len()));

            if candidates.is_empty() {
                debug!("Hypothesis '{}' matched no cards", hypothesis.name);
                continue;
            }

            let outcomes: Vec<Extraction> = candidates
                .into_iter()
                .map(|card| extractor.extract(card, &hypothesis.fields))
                .collect();

            let accepted = outcomes.iter().filter(|o| o.is_accepted()).count();
            debug!(
                "Hypothesis '{}' matched {} cards, {} extractable",
                hypothesis.name,
                outcomes.len(),
                accepted
            );

            if accepted > 0 {
                page.hypothesis = Some(hypothesis.name.clone());
                page.outcomes = outcomes;
                return page;
            }
        }

        page
    }
}
