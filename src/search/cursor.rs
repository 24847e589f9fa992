use super::{SearchClient, SearchResult};
use crate::error::Result;
use std::time::Duration;
use tracing::debug;

/// Options for [`SearchClient::get`].
#[derive(Debug, Clone)]
pub struct GetOptions {
    /// Query to run; the client's configured query when `None` or empty.
    pub query: Option<String>,
    /// Fields to request; the client's configured fields when `None` or empty.
    pub fields: Option<Vec<String>>,
    /// Stop after this many records. Zero means no cap.
    pub max_results: usize,
    /// Pause between page fetches.
    pub sleep: Duration,
    /// First page to fetch (1-based).
    pub start_page: u32,
}

impl Default for GetOptions {
    fn default() -> Self {
        Self {
            query: None,
            fields: None,
            max_results: 100,
            sleep: Duration::ZERO,
            start_page: 1,
        }
    }
}

impl GetOptions {
    pub fn query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    pub fn fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = Some(fields.into_iter().map(Into::into).collect());
        self
    }

    pub fn max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }

    pub fn sleep(mut self, sleep: Duration) -> Self {
        self.sleep = sleep;
        self
    }

    pub fn start_page(mut self, start_page: u32) -> Self {
        self.start_page = start_page;
        self
    }
}

/// Forward-only walk over search results spanning several pages.
///
/// Pages are fetched one at a time, only when the previous page has been
/// fully consumed. The walk ends when the result cap is reached (possibly in
/// the middle of a page), when the last reported page has been consumed, or
/// on the first error. Once finished, `next` keeps returning `Ok(None)`.
pub struct SearchCursor<'a> {
    client: &'a mut SearchClient,
    query: String,
    fields: Vec<String>,
    cap: Option<usize>,
    sleep: Duration,
    start_page: u32,
    page: u32,
    max_page: Option<u32>,
    count: usize,
    current: Option<std::vec::IntoIter<SearchResult>>,
    done: bool,
}

impl<'a> SearchCursor<'a> {
    pub(crate) fn new(client: &'a mut SearchClient, options: GetOptions) -> Self {
        let query = match options.query {
            Some(query) if !query.is_empty() => query,
            _ => client.query.clone().unwrap_or_default(),
        };
        let fields = match options.fields {
            Some(fields) if !fields.is_empty() => fields,
            _ => client.fields.iter().cloned().collect(),
        };
        let cap = (options.max_results > 0).then_some(options.max_results);
        debug!("Using cap: {:?}", cap);

        Self {
            client,
            query,
            fields,
            cap,
            sleep: options.sleep,
            start_page: options.start_page,
            page: options.start_page,
            max_page: None,
            count: 0,
            current: None,
            done: false,
        }
    }

    /// Number of records produced so far.
    pub fn count(&self) -> usize {
        self.count
    }

    /// The page currently being consumed (or about to be fetched).
    pub fn page(&self) -> u32 {
        self.page
    }

    /// Total pages as reported by the most recent response.
    pub fn total_pages(&self) -> Option<u32> {
        self.max_page
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Produce the next record, fetching the next page when needed.
    pub async fn next(&mut self) -> Result<Option<SearchResult>> {
        loop {
            if self.done {
                return Ok(None);
            }

            if let Some(results) = self.current.as_mut() {
                if let Some(result) = results.next() {
                    self.count += 1;
                    if let Some(cap) = self.cap {
                        if self.count >= cap {
                            debug!("Result cap of {} reached", cap);
                            self.finish();
                        }
                    }
                    return Ok(Some(result));
                }
                self.current = None;
                match self.page.checked_add(1) {
                    Some(page) => self.page = page,
                    None => {
                        debug!("Page number overflow after page {}", self.page);
                        self.finish();
                        continue;
                    }
                }
            }

            if let Some(max_page) = self.max_page {
                if self.page > max_page {
                    debug!("Maximum page retrieved");
                    self.finish();
                    continue;
                }
            }

            if self.page > self.start_page && !self.sleep.is_zero() {
                tokio::time::sleep(self.sleep).await;
            }

            debug!("Retrieving search results page {}", self.page);
            let result_set = match self
                .client
                .call(&self.query, self.page, self.fields.as_slice())
                .await
            {
                Ok(result_set) => result_set,
                Err(e) => {
                    self.finish();
                    return Err(e);
                }
            };

            let previous = self.max_page.replace(result_set.total_pages());
            debug!(
                "Total pages is now {} (was {:?})",
                result_set.total_pages(),
                previous
            );
            debug!(
                "Page {} contains {} result(s)",
                result_set.current_page(),
                result_set.len()
            );
            self.current = Some(result_set.into_iter());
        }
    }

    /// Drain the cursor into a vector.
    pub async fn try_collect(mut self) -> Result<Vec<SearchResult>> {
        let mut results = Vec::new();
        while let Some(result) = self.next().await? {
            results.push(result);
        }
        Ok(results)
    }

    fn finish(&mut self) {
        if !self.done {
            debug!("Generator complete");
        }
        self.done = true;
        self.current = None;
    }
}
