pub mod collection;
pub mod errors;
pub mod extractor;
pub mod models;


pub use collection::Collection;
pub use errors::ExportError;
pub use models::{
    CardDetail,
    CardRecord,
    Deck,
    ExportRequest,
    ExtractionResult,
};
