use crate::app::{Result, ShelfscanError};

/// One unit of work against the listing source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionRequest {
    pub search_term: String,
    pub max_results: usize,
    pub page: u32,
}

impl ExtractionRequest {
    /// Validated request for the first page of a run.
    pub fn first(search_term: &str, max_results: usize) -> Result<Self> {
        let search_term = search_term.trim();
        if search_term.is_empty() {
            return Err(ShelfscanError::InvalidInput("Missing searchTerm".into()));
        }
        if max_results == 0 {
            return Err(ShelfscanError::InvalidInput(
                "maxResults must be a positive integer".into(),
            ));
        }

        Ok(Self {
            search_term: search_term.to_string(),
            max_results,
            page: 1,
        })
    }

    /// The same request, pointed at another page.
    pub fn for_page(&self, page: u32) -> Self {
        Self {
            page,
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_trims_term() {
        let request = ExtractionRequest::first("  吹風機 ", 10).unwrap();
        assert_eq!(request.search_term, "吹風機");
        assert_eq!(request.max_results, 10);
        assert_eq!(request.page, 1);
    }

    #[test]
    fn test_empty_term_is_input_error() {
        let err = ExtractionRequest::first("   ", 10).unwrap_err();
        assert!(err.is_input_error());
    }

    #[test]
    fn test_zero_cap_is_input_error() {
        let err = ExtractionRequest::first("laptop", 0).unwrap_err();
        assert!(err.is_input_error());
    }

    #[test]
    fn test_for_page_keeps_term() {
        let request = ExtractionRequest::first("laptop", 50).unwrap().for_page(3);
        assert_eq!(request.page, 3);
        assert_eq!(request.search_term, "laptop");
        assert_eq!(request.max_results, 50);
    }
}
