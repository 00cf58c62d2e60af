pub mod catalog;
pub mod dataset;
pub mod payload;
pub mod state;
pub mod validate;

pub use catalog::{IsotopeCatalog, CUSTOM_ISOTOPE};
pub use dataset::DatasetOption;
pub use payload::{build_search_query, build_simulation_request};
pub use state::{FormState, HalfLifeUnit, TextField};
pub use validate::{validate_search_query, validate_simulation_request, ValidationError};
