//! Custom request extractors.

mod pagination;
mod validated_json;

pub use pagination::{PageLinks, PageSettings, Pagination};
pub use validated_json::ValidatedJson;
