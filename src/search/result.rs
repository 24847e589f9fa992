//! Result pages and the records built from them.
//!
//! A [`SearchResultSet`] wraps one successful response from the search
//! endpoint. Its [`SearchResult`] records are only built the first time they
//! are asked for and are cached for the lifetime of the set.

use crate::client::SUCCESS_CODE;
use crate::error::{CensysError, Result};
use crate::types::Index;
use once_cell::sync::OnceCell;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

/// Page size assumed when numbering records on any page but the last.
pub const ASSUMED_PAGE_SIZE: usize = 100;

/// The `metadata` object of a search response.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SearchMetadata {
    /// Total number of results across all pages.
    pub count: u64,
    #[serde(default)]
    pub query: String,
    pub backend_time: f64,
    pub page: u32,
    pub pages: u32,
}

#[derive(Deserialize)]
struct ResponseHeader {
    status: String,
    metadata: SearchMetadata,
}

/// Page-level data shared by a result set and every record built from it.
#[derive(Debug)]
pub struct PageInfo {
    index: Index,
    code: u16,
    raw: Value,
    status: String,
    metadata: SearchMetadata,
}

impl PageInfo {
    pub fn index(&self) -> Index {
        self.index
    }

    /// HTTP status code of the response (always 200).
    pub fn code(&self) -> u16 {
        self.code
    }

    /// The full decoded response body.
    pub fn raw(&self) -> &Value {
        &self.raw
    }

    /// Human-readable status string returned by the server.
    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn metadata(&self) -> &SearchMetadata {
        &self.metadata
    }

    /// Total number of results across all pages, not just this one.
    pub fn count(&self) -> u64 {
        self.metadata.count
    }

    pub fn query(&self) -> &str {
        &self.metadata.query
    }

    pub fn backend_time(&self) -> f64 {
        self.metadata.backend_time
    }

    pub fn current_page(&self) -> u32 {
        self.metadata.page
    }

    pub fn total_pages(&self) -> u32 {
        self.metadata.pages
    }

    pub fn is_last_page(&self) -> bool {
        self.metadata.page == self.metadata.pages
    }

    /// The raw JSON objects of this page's results.
    pub fn raw_results(&self) -> &[Value] {
        self.raw
            .get("results")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Number of results on this page.
    pub fn len(&self) -> usize {
        self.raw_results().len()
    }

    pub fn is_empty(&self) -> bool {
        self.raw_results().is_empty()
    }
}

/// One page of results from the search endpoint.
///
/// Page metadata is available directly (through `Deref` to [`PageInfo`]).
/// The page also behaves like a sequence of [`SearchResult`]s: `len`, `get`,
/// indexing and iteration all go through the lazily built record list.
pub struct SearchResultSet {
    info: Arc<PageInfo>,
    results: OnceCell<Vec<SearchResult>>,
}

impl SearchResultSet {
    /// Wrap a successful search response.
    ///
    /// # Errors
    ///
    /// Returns [`CensysError::InvalidResultCode`] if `code` is not 200, and
    /// [`CensysError::MalformedResponse`] if the body does not have the
    /// `status`/`metadata`/`results` shape.
    pub fn new(index: Index, code: u16, raw: Value) -> Result<Self> {
        if code != SUCCESS_CODE {
            return Err(CensysError::InvalidResultCode(code));
        }

        let header = ResponseHeader::deserialize(&raw).map_err(|e| {
            CensysError::MalformedResponse(format!("invalid search response: {}", e))
        })?;

        match raw.get("results").and_then(Value::as_array) {
            Some(results) => {
                if let Some(pos) = results.iter().position(|r| !r.is_object()) {
                    return Err(CensysError::MalformedResponse(format!(
                        "search result {} is not a JSON object",
                        pos
                    )));
                }
            }
            None => {
                return Err(CensysError::MalformedResponse(
                    "missing 'results' array".to_string(),
                ))
            }
        }

        Ok(Self {
            info: Arc::new(PageInfo {
                index,
                code,
                raw,
                status: header.status,
                metadata: header.metadata,
            }),
            results: OnceCell::new(),
        })
    }

    pub fn info(&self) -> &PageInfo {
        &self.info
    }

    /// The records on this page, built on first access.
    pub fn records(&self) -> &[SearchResult] {
        self.results.get_or_init(|| {
            self.info
                .raw_results()
                .iter()
                .enumerate()
                .map(|(number_in_page, raw)| {
                    let fields = raw.as_object().cloned().unwrap_or_default();
                    SearchResult::new(Arc::clone(&self.info), number_in_page, fields)
                })
                .collect()
        })
    }

    /// A fresh copy of the records on this page.
    pub fn results(&self) -> Vec<SearchResult> {
        self.records().to_vec()
    }

    /// Values of one field across every record on this page.
    ///
    /// # Errors
    ///
    /// Returns [`CensysError::MissingKey`] if any record lacks the field.
    pub fn results_for_field(&self, field: &str) -> Result<Vec<&Value>> {
        self.records().iter().map(|r| r.field(field)).collect()
    }

    pub fn get(&self, i: usize) -> Option<&SearchResult> {
        self.records().get(i)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SearchResult> {
        self.records().iter()
    }

    pub fn len(&self) -> usize {
        self.records().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records().is_empty()
    }
}

impl Deref for SearchResultSet {
    type Target = PageInfo;

    fn deref(&self) -> &PageInfo {
        &self.info
    }
}

impl std::ops::Index<usize> for SearchResultSet {
    type Output = SearchResult;

    fn index(&self, i: usize) -> &SearchResult {
        &self.records()[i]
    }
}

impl<'a> IntoIterator for &'a SearchResultSet {
    type Item = &'a SearchResult;
    type IntoIter = std::slice::Iter<'a, SearchResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl IntoIterator for SearchResultSet {
    type Item = SearchResult;
    type IntoIter = std::vec::IntoIter<SearchResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.records();
        self.results.into_inner().unwrap_or_default().into_iter()
    }
}

impl fmt::Debug for SearchResultSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchResultSet")
            .field("index", &self.info.index)
            .field("code", &self.info.code)
            .field("status", &self.info.status)
            .field("metadata", &self.info.metadata)
            .field("loaded", &self.results.get().is_some())
            .finish()
    }
}

/// A single record from a search page.
///
/// Records are read-only views of one JSON object from the page's `results`
/// list. There is no way to add, change or remove a field:
///
/// ```compile_fail
/// fn overwrite(result: &mut censys::SearchResult) {
///     result.insert("ip".to_string(), serde_json::json!("10.0.0.1"));
/// }
/// ```
///
/// `overall_number` approximates the record's rank across all pages as
/// `page_size * current_page + number_in_page`, where `page_size` is
/// [`ASSUMED_PAGE_SIZE`] on every page except the last, and the last page's
/// own length there. It is only exact when the server really pages by 100.
#[derive(Debug, Clone)]
pub struct SearchResult {
    parent: Arc<PageInfo>,
    number_in_page: usize,
    overall_number: usize,
    fields: Map<String, Value>,
}

impl SearchResult {
    fn new(parent: Arc<PageInfo>, number_in_page: usize, fields: Map<String, Value>) -> Self {
        let page_size = if parent.is_last_page() {
            parent.len()
        } else {
            ASSUMED_PAGE_SIZE
        };
        let overall_number = page_size
            .saturating_mul(parent.current_page() as usize)
            .saturating_add(number_in_page);

        Self {
            parent,
            number_in_page,
            overall_number,
            fields,
        }
    }

    /// The page this record came from.
    pub fn parent(&self) -> &PageInfo {
        &self.parent
    }

    /// Zero-based position of this record on its page.
    pub fn number_in_page(&self) -> usize {
        self.number_in_page
    }

    pub fn overall_number(&self) -> usize {
        self.overall_number
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Look up a field, failing if the server did not return it.
    pub fn field(&self, key: &str) -> Result<&Value> {
        self.fields
            .get(key)
            .ok_or_else(|| CensysError::MissingKey(key.to_string()))
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn iter(&self) -> serde_json::map::Iter<'_> {
        self.fields.iter()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn to_json(&self) -> Value {
        Value::Object(self.fields.clone())
    }
}

impl PartialEq for SearchResult {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.parent, &other.parent)
            && self.number_in_page == other.number_in_page
            && self.fields == other.fields
    }
}

impl fmt::Display for SearchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", Value::Object(self.fields.clone()))
    }
}

impl<'a> IntoIterator for &'a SearchResult {
    type Item = (&'a String, &'a Value);
    type IntoIter = serde_json::map::Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}
