//! The search endpoint.
//!
//! There are four ways to use a [`SearchClient`]:
//!
//! - [`SearchClient::call`] takes the query, page and fields explicitly and
//!   ignores the client's configured properties.
//! - [`SearchClient::search`] uses the configured query, page and fields.
//! - [`SearchClient::iter`] runs `search` once and iterates the page.
//! - [`SearchClient::get`] walks pages up to a result cap. Every page is a
//!   separate API call, so a high cap can exhaust rate limits quickly.

pub mod cursor;
pub mod result;

pub use cursor::{GetOptions, SearchCursor};
pub use result::{PageInfo, SearchMetadata, SearchResult, SearchResultSet, ASSUMED_PAGE_SIZE};

use crate::client::{ApiClient, ApiResult};
use crate::config::ClientConfig;
use crate::error::{CensysError, Result};
use crate::indices;
use crate::types::{Endpoint, HttpMethod, Index};
use serde::Serialize;
use std::collections::BTreeSet;
use tracing::{debug, error};

/// The endpoint every [`SearchClient`] talks to.
pub const ENDPOINT: Endpoint = Endpoint::Search;

/// Page requested when none has been configured.
pub const DEFAULT_PAGE: u32 = 1;

/// Characters with a meaning in the Censys search syntax.
pub const RESERVED_CHARACTERS: [char; 22] = [
    '+', '-', '=', '&', '|', '>', '<', '!', '(', ')', '{', '}', '[', ']', '^', '"', '~', '*', '?',
    ':', '\\', '/',
];

/// Decides whether a field may be requested from an index.
pub type FieldValidator = fn(&str) -> bool;

/// Backslash-escape every reserved character in a search value.
pub fn escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if RESERVED_CHARACTERS.contains(&c) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[derive(Debug, Serialize)]
struct SearchRequest<'a> {
    query: String,
    page: u32,
    fields: Vec<&'a str>,
}

/// API access object for the search endpoint of one index.
///
/// The configured query, page and fields only affect later calls; a result
/// set that has already been returned never changes.
#[derive(Debug)]
pub struct SearchClient {
    api: ApiClient,
    validator: FieldValidator,
    query: Option<String>,
    page: u32,
    fields: BTreeSet<String>,
}

impl SearchClient {
    /// Create a client for `index`, validating fields with that index's
    /// default validator.
    pub fn new(index: Index, config: ClientConfig) -> Self {
        Self {
            api: ApiClient::new(ENDPOINT, index, config),
            validator: indices::validator_for(index),
            query: None,
            page: DEFAULT_PAGE,
            fields: BTreeSet::new(),
        }
    }

    /// Create a client configured from `CENSYS_*` environment variables.
    pub fn from_env(index: Index) -> Result<Self> {
        Ok(Self::new(index, ClientConfig::from_env()?))
    }

    /// Replace the field validator. Fields already added are not re-checked.
    pub fn with_field_validator(mut self, validator: FieldValidator) -> Self {
        self.validator = validator;
        self
    }

    pub fn index(&self) -> Index {
        self.api.index()
    }

    pub fn endpoint(&self) -> Endpoint {
        self.api.endpoint()
    }

    /// Session-level settings (credentials, timeout).
    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn api_mut(&mut self) -> &mut ApiClient {
        &mut self.api
    }

    /// Release the underlying HTTP session.
    pub fn close(&mut self) {
        self.api.close();
    }

    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        let query = query.into();
        debug!("Censys {} search query updated: {}", self.index().name(), query);
        self.query = Some(query);
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn set_page(&mut self, page: u32) -> Result<()> {
        if page == 0 {
            return Err(CensysError::InvalidPage(page));
        }
        self.page = page;
        debug!("Censys {} search page updated: {}", self.index().name(), page);
        Ok(())
    }

    /// A copy of the configured field set.
    pub fn fields(&self) -> BTreeSet<String> {
        self.fields.clone()
    }

    /// Replace the field set. Nothing changes if any field is invalid.
    pub fn set_fields<I, S>(&mut self, fields: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let fields = fields
            .into_iter()
            .map(|field| {
                let field = field.into();
                self.validate_field(&field)?;
                Ok(field)
            })
            .collect::<Result<BTreeSet<String>>>()?;
        debug!(
            "Censys {} search fields updated: {:?}",
            self.index().name(),
            fields
        );
        self.fields = fields;
        Ok(())
    }

    pub fn add_field(&mut self, field: impl Into<String>) -> Result<()> {
        let field = field.into();
        self.validate_field(&field)?;
        self.fields.insert(field);
        Ok(())
    }

    pub fn remove_field(&mut self, field: &str) -> Result<()> {
        if self.fields.remove(field) {
            Ok(())
        } else {
            Err(CensysError::FieldNotFound(field.to_string()))
        }
    }

    /// Call the search API with explicit arguments.
    ///
    /// The query is escaped and every field validated before anything is
    /// sent. Exactly one request is made.
    ///
    /// # Errors
    ///
    /// [`CensysError::InvalidField`] or [`CensysError::InvalidPage`] before
    /// the request, [`CensysError::Search`] if the API answers with an error,
    /// and [`CensysError::Http`] for transport failures.
    pub async fn call<S: AsRef<str>>(
        &mut self,
        query: &str,
        page: u32,
        fields: &[S],
    ) -> Result<SearchResultSet> {
        if page == 0 {
            return Err(CensysError::InvalidPage(page));
        }

        let mut unique = BTreeSet::new();
        for field in fields {
            let field = field.as_ref();
            self.validate_field(field)?;
            unique.insert(field);
        }

        let request = SearchRequest {
            query: escape(query),
            page,
            fields: unique.into_iter().collect(),
        };

        match self
            .api
            .do_call(HttpMethod::Post, &[], Some(&request))
            .await?
        {
            ApiResult::Success(response) => {
                let code = response.code();
                SearchResultSet::new(self.index(), code, response.into_raw())
            }
            ApiResult::Error(error) => Err(error.into()),
        }
    }

    /// Call the search API with the configured query, page and fields.
    pub async fn search(&mut self) -> Result<SearchResultSet> {
        let query = self.query.clone().unwrap_or_default();
        let fields: Vec<String> = self.fields.iter().cloned().collect();
        self.call(&query, self.page, fields.as_slice()).await
    }

    /// Iterate the records of a single [`search`](Self::search).
    pub async fn iter(&mut self) -> Result<std::vec::IntoIter<SearchResult>> {
        Ok(self.search().await?.into_iter())
    }

    /// Walk result pages until `max_results` records have been produced or
    /// the pages run out.
    ///
    /// The returned cursor is single-use; call `get` again to start over.
    pub fn get(&mut self, options: GetOptions) -> SearchCursor<'_> {
        SearchCursor::new(self, options)
    }

    fn validate_field(&self, field: &str) -> Result<()> {
        if (self.validator)(field) {
            return Ok(());
        }
        let err = CensysError::InvalidField {
            endpoint: self.endpoint().name().to_string(),
            index: self.index().name().to_string(),
            field: field.to_string(),
        };
        error!("{}", err);
        Err(err)
    }
}
