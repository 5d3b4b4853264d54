//! Record-set detection and flattening
//!
//! Turns an arbitrary parsed JSON payload into a list of flat records:
//! - [`detect_records`] locates the record list inside any JSON root shape
//! - [`flatten_record`] collapses nested object keys into separator-joined
//!   composite keys, leaving array values intact

mod detect;
mod flatten;

pub use detect::detect_records;
pub(crate) use detect::json_type_name;
pub use flatten::{flatten_record, DEFAULT_SEPARATOR};
