//! Lazy iteration over cursor-paginated sources.
//!
//! Pages are pulled on demand: every item of the current page is yielded
//! before the next page is requested, and nothing is fetched ahead. Memory use
//! is bounded by one page regardless of how large the source is.

use std::iter::FusedIterator;

use tracing::debug;

/// One page of a paginated listing.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T, C> {
    pub items: Vec<T>,
    /// Cursor of the following page. `None` on the final page.
    pub next: Option<C>,
}

impl<T, C> Page<T, C> {
    pub fn new(items: Vec<T>, next: Option<C>) -> Self {
        Self { items, next }
    }

    pub fn last(items: Vec<T>) -> Self {
        Self { items, next: None }
    }
}

/// Iterator that pulls pages from `fetch` as its items are consumed.
///
/// Single-pass: to iterate again, build a new one from the starting cursor.
/// A fetch error is yielded once, after which the iterator ends. Items
/// yielded before the error remain valid.
///
/// # Example
///
/// ```ignore
/// let items = paginate(first_url, |url| fetch_page(url));
/// for item in items {
///     let item = item?;
///     // ...
/// }
/// ```
pub struct Paginated<T, C, F> {
    fetch: F,
    cursor: Option<C>,
    current: std::vec::IntoIter<T>,
    pages_fetched: usize,
    failed: bool,
}

/// Start lazily iterating a paginated source at `start`.
pub fn paginate<T, C, E, F>(start: C, fetch: F) -> Paginated<T, C, F>
where
    F: FnMut(&C) -> Result<Page<T, C>, E>,
{
    Paginated {
        fetch,
        cursor: Some(start),
        current: Vec::new().into_iter(),
        pages_fetched: 0,
        failed: false,
    }
}

impl<T, C, F> Paginated<T, C, F> {
    /// Number of pages requested so far.
    pub fn pages_fetched(&self) -> usize {
        self.pages_fetched
    }
}

impl<T, C, E, F> Iterator for Paginated<T, C, F>
where
    F: FnMut(&C) -> Result<Page<T, C>, E>,
{
    type Item = Result<T, E>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(item) = self.current.next() {
                return Some(Ok(item));
            }

            if self.failed {
                return None;
            }

            // Only request the next page once the current one is drained.
            let cursor = self.cursor.take()?;

            match (self.fetch)(&cursor) {
                Ok(page) => {
                    self.pages_fetched += 1;
                    debug!(
                        page = self.pages_fetched,
                        items = page.items.len(),
                        has_next = page.next.is_some(),
                        "Fetched page"
                    );
                    self.cursor = page.next;
                    self.current = page.items.into_iter();
                }
                Err(e) => {
                    self.failed = true;
                    return Some(Err(e));
                }
            }
        }
    }
}

impl<T, C, E, F> FusedIterator for Paginated<T, C, F> where F: FnMut(&C) -> Result<Page<T, C>, E> {}
