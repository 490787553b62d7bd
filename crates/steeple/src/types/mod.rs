//! Validated input types.

mod base_url;
mod procedure;
mod table;

pub use base_url::BaseUrl;
pub use procedure::Procedure;
pub use table::Table;
