use crate::config::ClientConfig;
use crate::search::SearchClient;
use crate::types::Index;

/// The top million websites index.
pub const INDEX: Index = Index::Websites;

/// Accepts every field; there is no websites field list yet.
pub fn is_valid_field(_field: &str) -> bool {
    true
}

pub fn search_client(config: ClientConfig) -> SearchClient {
    SearchClient::new(INDEX, config)
}
