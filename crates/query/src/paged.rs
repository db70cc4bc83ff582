//! # Paged Query
//!
//! Storage pages runs *before* filtering, so filtered results need their page
//! boundaries re-derived after filtering. A query runs in two phases:
//! 1. List the full, natively sorted candidate id sequence for the query
//! 2. Hand the ids to a `Paginator`, which produces the requested window
//!    and the total the page count is computed from
//!
//! Two paginators exist:
//! - `NativePaginator` when filtering is off: no record is hydrated outside
//!   the requested window
//! - `FilteredPaginator` when filtering is on: every candidate is hydrated
//!   exactly once, and records landing in the window are kept for output
//!   rather than fetched a second time

use crate::error::{QueryError, Result};
use filters::FilterSet;
use run_store::{RecordHydrator, RecordLister, RunId, RunQuery, RunRecord};
use serde::Serialize;
use tracing::debug;

/// A 1-indexed page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: usize,
    page_size: usize,
}

impl PageRequest {
    pub fn new(page: usize, page_size: usize) -> Result<Self> {
        if page == 0 {
            return Err(QueryError::InvalidPage { page });
        }
        if page_size == 0 {
            return Err(QueryError::InvalidPageSize);
        }
        Ok(Self { page, page_size })
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Index of the first item on this page
    pub fn offset(&self) -> usize {
        (self.page - 1).saturating_mul(self.page_size)
    }
}

/// Number of pages needed for `total` items. Zero items means zero pages.
pub fn page_count(total: usize, page_size: usize) -> usize {
    total / page_size + (total % page_size).min(1)
}

/// The records on one page plus what the caller needs to render paging.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunPage {
    pub records: Vec<RunRecord>,
    /// JSON form of each record, same order as `records`
    pub serialized: Vec<String>,
    pub page_count: usize,
    /// The requested page, echoed back
    pub page: usize,
    /// Runs matching the query across all pages
    pub total: usize,
}

impl RunPage {
    fn from_slice(slice: PageSlice, request: PageRequest) -> Result<Self> {
        let serialized = slice
            .records
            .iter()
            .map(|run| {
                serde_json::to_string(run).map_err(|source| QueryError::Serialize {
                    id: run.id.clone(),
                    source,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            page_count: page_count(slice.total, request.page_size()),
            page: request.page(),
            total: slice.total,
            serialized,
            records: slice.records,
        })
    }

    pub fn ids(&self) -> Vec<&str> {
        self.records.iter().map(|run| run.id.as_str()).collect()
    }
}

/// A window of hydrated records and the size of the sequence it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSlice {
    pub records: Vec<RunRecord>,
    pub total: usize,
}

/// Turns a candidate id sequence into one page.
pub trait Paginator {
    fn name(&self) -> &str;

    fn paginate<H: RecordHydrator + ?Sized>(
        &self,
        candidate_ids: &[RunId],
        hydrator: &H,
        request: PageRequest,
    ) -> PageSlice;
}

fn hydrate_or_skip<H: RecordHydrator + ?Sized>(hydrator: &H, id: &str) -> Option<RunRecord> {
    let run = hydrator.hydrate(id);
    if run.is_none() {
        debug!("Skipping stale run id {}", id);
    }
    run
}

/// Storage-native paging: slice first, hydrate only the window.
#[derive(Debug, Clone, Copy, Default)]
pub struct NativePaginator;

impl Paginator for NativePaginator {
    fn name(&self) -> &str {
        "NativePaginator"
    }

    fn paginate<H: RecordHydrator + ?Sized>(
        &self,
        candidate_ids: &[RunId],
        hydrator: &H,
        request: PageRequest,
    ) -> PageSlice {
        // Stale ids inside the window are skipped and the walk continues,
        // so a page can borrow records from past its nominal end
        let records = candidate_ids
            .iter()
            .skip(request.offset())
            .filter_map(|id| hydrate_or_skip(hydrator, id))
            .take(request.page_size())
            .collect();

        PageSlice {
            records,
            total: candidate_ids.len(),
        }
    }
}

/// Filter-then-page: hydrate and test every candidate once, keep the window.
pub struct FilteredPaginator<'a> {
    filters: &'a FilterSet,
}

impl<'a> FilteredPaginator<'a> {
    pub fn new(filters: &'a FilterSet) -> Self {
        Self { filters }
    }
}

impl Paginator for FilteredPaginator<'_> {
    fn name(&self) -> &str {
        "FilteredPaginator"
    }

    fn paginate<H: RecordHydrator + ?Sized>(
        &self,
        candidate_ids: &[RunId],
        hydrator: &H,
        request: PageRequest,
    ) -> PageSlice {
        let window = request.offset()..request.offset().saturating_add(request.page_size());
        let mut records = Vec::with_capacity(request.page_size());
        let mut total = 0;

        for id in candidate_ids {
            let Some(run) = hydrate_or_skip(hydrator, id) else {
                continue;
            };
            if !self.filters.is_eligible(&run) {
                continue;
            }
            if window.contains(&total) {
                records.push(run);
            }
            total += 1;
        }

        PageSlice { records, total }
    }
}

/// Runs a page request against storage through the filter set.
pub struct PagedQuery<'a, L: ?Sized, H: ?Sized> {
    lister: &'a L,
    hydrator: &'a H,
    filters: &'a FilterSet,
}

impl<'a, L, H> PagedQuery<'a, L, H>
where
    L: RecordLister + ?Sized,
    H: RecordHydrator + ?Sized,
{
    pub fn new(lister: &'a L, hydrator: &'a H, filters: &'a FilterSet) -> Self {
        Self {
            lister,
            hydrator,
            filters,
        }
    }

    fn candidate_ids(&self, query: &RunQuery) -> Result<Vec<RunId>> {
        let ids = self
            .lister
            .list_candidate_ids(query)
            .map_err(QueryError::Listing)?;
        debug!("Listed {} candidate runs", ids.len());
        Ok(ids)
    }

    /// Fetch one page. Fails before any filtering if listing fails.
    pub fn run(&self, query: &RunQuery, request: PageRequest) -> Result<RunPage> {
        let candidate_ids = self.candidate_ids(query)?;

        let slice = if self.filters.is_active() {
            self.paginate_with(&FilteredPaginator::new(self.filters), &candidate_ids, request)
        } else {
            self.paginate_with(&NativePaginator, &candidate_ids, request)
        };

        RunPage::from_slice(slice, request)
    }

    fn paginate_with<P: Paginator>(
        &self,
        paginator: &P,
        candidate_ids: &[RunId],
        request: PageRequest,
    ) -> PageSlice {
        let slice = paginator.paginate(candidate_ids, self.hydrator, request);
        debug!(
            "{}: page {} has {} of {} matching runs",
            paginator.name(),
            request.page(),
            slice.records.len(),
            slice.total
        );
        slice
    }

    /// Every id the query matches, in native order.
    ///
    /// With filtering off this is the candidate sequence as listed, and no
    /// record is hydrated.
    pub fn matching_ids(&self, query: &RunQuery) -> Result<Vec<RunId>> {
        let candidate_ids = self.candidate_ids(query)?;
        if !self.filters.is_active() {
            return Ok(candidate_ids);
        }
        Ok(candidate_ids
            .into_iter()
            .filter(|id| {
                hydrate_or_skip(self.hydrator, id).is_some_and(|run| self.filters.is_eligible(&run))
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use run_store::RunKind;
    use std::collections::HashMap;

    struct MapHydrator(HashMap<String, RunRecord>);

    impl RecordHydrator for MapHydrator {
        fn hydrate(&self, id: &str) -> Option<RunRecord> {
            self.0.get(id).cloned()
        }
    }

    fn record(id: &str, won: bool) -> RunRecord {
        RunRecord {
            id: id.to_string(),
            primary_faction_id: None,
            secondary_faction_id: None,
            difficulty_level: 0,
            stages_cleared: 0,
            won,
            run_kind: RunKind::Standard,
            challenge_ref: None,
        }
    }

    fn create_test_hydrator(count: usize) -> (Vec<RunId>, MapHydrator) {
        let ids: Vec<RunId> = (0..count).map(|i| format!("run-{i}")).collect();
        let records = ids
            .iter()
            .enumerate()
            .map(|(i, id)| (id.clone(), record(id, i % 2 == 0)))
            .collect();
        (ids, MapHydrator(records))
    }

    #[test]
    fn test_page_count_is_ceiling_division() {
        assert_eq!(page_count(0, 4), 0);
        assert_eq!(page_count(10, 4), 3);
        assert_eq!(page_count(12, 4), 3);
        assert_eq!(page_count(1, 1), 1);
        assert_eq!(page_count(3, 10), 1);
    }

    #[test]
    fn test_page_request_rejects_misuse() {
        assert!(matches!(PageRequest::new(0, 10), Err(QueryError::InvalidPage { page: 0 })));
        assert!(matches!(PageRequest::new(1, 0), Err(QueryError::InvalidPageSize)));
        assert_eq!(PageRequest::new(3, 4).unwrap().offset(), 8);
    }

    #[test]
    fn test_native_paginator_window() {
        let (ids, hydrator) = create_test_hydrator(10);
        let slice = NativePaginator.paginate(&ids, &hydrator, PageRequest::new(2, 4).unwrap());

        let page_ids: Vec<&str> = slice.records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(page_ids, vec!["run-4", "run-5", "run-6", "run-7"]);
        assert_eq!(slice.total, 10);
    }

    #[test]
    fn test_native_paginator_skips_stale_ids() {
        let (ids, mut hydrator) = create_test_hydrator(10);
        hydrator.0.remove("run-5");

        let slice = NativePaginator.paginate(&ids, &hydrator, PageRequest::new(2, 4).unwrap());
        let page_ids: Vec<&str> = slice.records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(page_ids, vec!["run-4", "run-6", "run-7", "run-8"]);
        // The listed total is what paging is derived from
        assert_eq!(slice.total, 10);
    }

    #[test]
    fn test_native_paginator_past_the_end() {
        let (ids, hydrator) = create_test_hydrator(3);
        let slice = NativePaginator.paginate(&ids, &hydrator, PageRequest::new(5, 4).unwrap());
        assert!(slice.records.is_empty());
        assert_eq!(slice.total, 3);
    }

    #[test]
    fn test_filtered_paginator_repages_after_filtering() {
        use filters::SharedFilter;
        use filters::filters::OutcomeFilter;

        let (ids, mut hydrator) = create_test_hydrator(20);
        hydrator.0.remove("run-2");

        let outcome = SharedFilter::new(OutcomeFilter::new());
        outcome.write().set_option(1).unwrap();
        let mut set = FilterSet::new().with_filter(outcome);
        set.set_active(true);

        // Victories are the even runs: 0, 4, 6, ..., 18 (run-2 is gone)
        let request = PageRequest::new(2, 4).unwrap();
        let slice = FilteredPaginator::new(&set).paginate(&ids, &hydrator, request);
        let page_ids: Vec<&str> = slice.records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(page_ids, vec!["run-10", "run-12", "run-14", "run-16"]);
        assert_eq!(slice.total, 9);
    }
}
