/// Markup for one result page, as handed over by a fetch backend.
///
/// Consumed by value by the extraction pipeline and dropped afterwards.
#[derive(Debug, Clone)]
pub struct RawPage {
    pub page: u32,
    pub markup: String,
}

impl RawPage {
    pub fn new(page: u32, markup: impl Into<String>) -> Self {
        Self {
            page,
            markup: markup.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.markup.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markup.trim().is_empty()
    }
}
