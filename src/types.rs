use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A Censys API endpoint. Only search is implemented so far.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Endpoint {
    Search,
}

impl Endpoint {
    /// Path segment used when building request URLs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Endpoint::Search => "search",
        }
    }

    /// Upper-case name used in log and error messages.
    pub fn name(&self) -> &'static str {
        match self {
            Endpoint::Search => "SEARCH",
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named partition of the Censys dataset, queried independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Index {
    Certificates,
    Ipv4,
    Websites,
}

impl Index {
    pub const ALL: [Index; 3] = [Index::Certificates, Index::Ipv4, Index::Websites];

    /// Path segment used when building request URLs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Index::Certificates => "certificates",
            Index::Ipv4 => "ipv4",
            Index::Websites => "websites",
        }
    }

    /// Upper-case name used in log and error messages.
    pub fn name(&self) -> &'static str {
        match self {
            Index::Certificates => "CERTIFICATES",
            Index::Ipv4 => "IPV4",
            Index::Websites => "WEBSITES",
        }
    }
}

impl fmt::Display for Index {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Index {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Index::ALL
            .into_iter()
            .find(|index| index.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                format!(
                    "unknown index '{}' (expected one of: certificates, ipv4, websites)",
                    s
                )
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HttpMethod::Get => f.write_str("GET"),
            HttpMethod::Post => f.write_str("POST"),
        }
    }
}
