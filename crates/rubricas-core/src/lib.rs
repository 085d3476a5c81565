pub mod error;
pub mod policy;
pub mod rubrica;
pub mod search;
pub mod source;

pub use error::CatalogError;
pub use policy::{ALL_RECORDS_TERM, DisplayPolicy, is_all_records};
pub use rubrica::{Repercussion, Rubrica, TaxCategory, TaxIncidence};
pub use search::search;
pub use source::{CollectionSource, DetailSource, validate_code};
