use std::collections::HashSet;

/// Product identifiers already accepted during one run.
///
/// Identifiers compare by exact string equality; no case or whitespace
/// folding happens here.
#[derive(Debug, Clone, Default)]
pub struct SeenIds {
    seen: HashSet<String>,
}

impl SeenIds {
    pub fn new() -> Self {
        Self::default()
    }

    /// `true` the first time an identifier is offered, `false` afterwards.
    pub fn should_accept(&mut self, product_id: &str) -> bool {
        self.seen.insert(product_id.to_string())
    }
}
