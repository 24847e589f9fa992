//! Per-index specialisation of the search client.
//!
//! Indices differ only in the field validator a
//! [`SearchClient`](crate::search::SearchClient) uses by default.

pub mod certificates;
pub mod ipv4;
pub mod websites;

use crate::search::FieldValidator;
use crate::types::Index;

/// The default field validator for an index.
pub fn validator_for(index: Index) -> FieldValidator {
    match index {
        Index::Certificates => certificates::is_valid_field as FieldValidator,
        Index::Ipv4 => ipv4::is_valid_field,
        Index::Websites => websites::is_valid_field,
    }
}
