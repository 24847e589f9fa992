use crate::config::ClientConfig;
use crate::search::SearchClient;
use crate::types::Index;

pub const INDEX: Index = Index::Certificates;

/// Whether `field` may be requested from the certificates index.
///
/// Accepts every field until the certificates field list is filled in.
pub fn is_valid_field(_field: &str) -> bool {
    true
}

/// A search client bound to the certificates index.
pub fn search_client(config: ClientConfig) -> SearchClient {
    SearchClient::new(INDEX, config)
}
