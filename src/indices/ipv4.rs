use crate::config::ClientConfig;
use crate::search::SearchClient;
use crate::types::Index;

pub const INDEX: Index = Index::Ipv4;

/// Documented IPv4 fields. Not exhaustive: protocol-specific fields such as
/// `80.http.get.title` are missing, so [`is_valid_field`] does not use it.
pub const KNOWN_FIELDS: &[&str] = &[
    "ip",
    "protocols",
    "location",
    "location.province",
    "location.province.raw",
    "location.registered_country_code",
    "location.postal_code",
    "location.country_code",
    "location.timezone",
    "location.continent",
    "location.city",
    "location.country",
    "location.country.raw",
    "location.longitude",
    "location.registered_country",
    "location.registered_country.raw",
    "location.latitude",
    "autonomous_system",
    "autonomous_system.description",
];

/// Whether `field` may be requested from the IPv4 index. Always true.
pub fn is_valid_field(_field: &str) -> bool {
    true
}

/// Strict validator limited to [`KNOWN_FIELDS`].
///
/// Plug it in with [`SearchClient::with_field_validator`] to fail fast on
/// typos instead of getting an error back from the API.
pub fn is_known_field(field: &str) -> bool {
    KNOWN_FIELDS.contains(&field)
}

/// A search client bound to the IPv4 index.
pub fn search_client(config: ClientConfig) -> SearchClient {
    SearchClient::new(INDEX, config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_fields() {
        assert!(is_known_field("ip"));
        assert!(is_known_field("location.country_code"));
        assert!(!is_known_field("location.planet"));
        assert!(is_valid_field("location.planet"));
    }

    #[test]
    fn test_strict_client_rejects_unknown_field() {
        let mut client = search_client(ClientConfig::default()).with_field_validator(is_known_field);
        client.add_field("autonomous_system").unwrap();
        assert!(client.add_field("location.planet").is_err());
        assert_eq!(client.fields().len(), 1);
    }
}
