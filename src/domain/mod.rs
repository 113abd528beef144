pub mod page;
pub mod product;
pub mod request;

pub use page::RawPage;
pub use product::ProductRecord;
pub use request::ExtractionRequest;
