//! The paginated job feed: filter state, page accumulation, and the
//! infinite-scroll trigger.
//!
//! Fetches are split into a dispatch half ([`JobFeed::begin_fetch`], which
//! tags the request with a generation) and an apply half ([`JobFeed::apply`],
//! which ignores any response whose generation is stale). A filter change
//! bumps the generation, so a late response from the previous filters can
//! never leak into the new result set.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::api::{Job, JobBoardApi, JobSearchRequest};
use crate::error::FetchError;

pub const DEFAULT_PAGE_SIZE: u32 = 12;
pub const SALARY_CAP: u64 = 100_000_000;

const JOB_STATUS_ACTIVE: &str = "Active";
const SORT_FIELD: &str = "postedOn";
const SORT_ORDER: &str = "desc";
const DEFAULT_COUNTRY: &str = "India";

/// The canonical sector list offered by the filter sidebar.
pub const SECTORS: &[&str] = &[
    "Agriculture",
    "Apparel, Madeups & Home Furnishing",
    "Automotive",
    "Banking, Financial Services & Insurance (BFSI)",
    "Beauty & Wellness",
    "Capital Goods",
    "Chemical & PetroChemical",
    "Construction",
    "Domestic Workers",
    "Education",
    "Electronics",
    "Food Processing",
    "Gem & Jewellery",
    "Healthcare",
    "Hydrocarbon",
    "Indian Iron & Steel",
    "Indian Plumbing",
    "Infrastructure Equipment",
    "IT-ITeS",
    "Life Sciences",
    "Logistics",
    "Management & Entrepreneurship and Professional",
    "Media & Entertainment",
    "Mining",
    "Other",
    "People with Disability",
    "Power",
    "Production and Manufacturing",
    "Retailers Association's",
    "Rubber",
    "Service",
    "Services including Repair and Maintenance",
    "Telecom",
    "Tourism & Hospitality",
    "textile",
];

/// Monthly salary ranges offered as one-click presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SalaryPreset {
    Any,
    Unpaid,
    UpTo15k,
    Above15k,
}

impl SalaryPreset {
    pub fn bounds(&self) -> (u64, u64) {
        match self {
            SalaryPreset::Any => (0, SALARY_CAP),
            SalaryPreset::Unpaid => (0, 0),
            SalaryPreset::UpTo15k => (1, 15_000),
            SalaryPreset::Above15k => (15_001, SALARY_CAP),
        }
    }
}

/// Current filter and pagination parameters. Owned by [`JobFeed`]; mutate it
/// through [`JobFeed::set_filters`] so pagination resets correctly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterState {
    pub sectors: Vec<String>,
    pub min_salary: u64,
    pub max_salary: u64,
    pub page_number: u32,
    pub page_size: u32,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            sectors: Vec::new(),
            min_salary: 0,
            max_salary: SALARY_CAP,
            page_number: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl FilterState {
    fn to_request(&self) -> JobSearchRequest {
        JobSearchRequest {
            page_number: self.page_number,
            page_size: self.page_size,
            job_status: JOB_STATUS_ACTIVE.to_string(),
            sector: self.sectors.clone(),
            country: vec![DEFAULT_COUNTRY.to_string()],
            state: Vec::new(),
            source_system: Vec::new(),
            min_salary: self.min_salary,
            max_salary: self.max_salary,
            field: SORT_FIELD.to_string(),
            order: SORT_ORDER.to_string(),
        }
    }
}

/// Partial update merged into [`FilterState`]. Only the fields that gate a
/// result reset are settable here; page number is feed-internal.
#[derive(Debug, Clone, Default)]
pub struct FilterChange {
    pub sectors: Option<Vec<String>>,
    pub min_salary: Option<u64>,
    pub max_salary: Option<u64>,
}

impl FilterChange {
    pub fn sectors(sectors: Vec<String>) -> Self {
        Self {
            sectors: Some(sectors),
            ..Self::default()
        }
    }

    pub fn salary(preset: SalaryPreset) -> Self {
        let (min, max) = preset.bounds();
        Self {
            min_salary: Some(min),
            max_salary: Some(max),
            sectors: None,
        }
    }
}

/// What the feed is showing right now. `NoResults` is an empty-but-healthy
/// outcome, deliberately distinct from `Error`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedPhase {
    /// Nothing fetched yet for the current filters.
    Initial,
    Loaded,
    NoResults,
    Error(String),
}

impl Default for FeedPhase {
    fn default() -> Self {
        FeedPhase::Initial
    }
}

/// A dispatched fetch. Holds the generation that decides whether the
/// response is still wanted when it arrives.
#[derive(Debug)]
pub struct FetchTicket {
    generation: u64,
    append: bool,
    page_size: u32,
    pub request: JobSearchRequest,
}

/// Whether an applied response mutated the feed or was discarded as stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyResult {
    Applied,
    Stale,
}

#[derive(Debug, Default)]
pub struct JobFeed {
    filters: FilterState,
    items: Vec<Job>,
    has_more: bool,
    is_loading: bool,
    phase: FeedPhase,
    /// Generation of the most recently dispatched fetch.
    generation: u64,
    /// True between a filter-driven reset and the dispatch of its page-1
    /// fetch; the scroll trigger must not fire in that window.
    resetting: bool,
}

impl JobFeed {
    pub fn new() -> Self {
        Self {
            has_more: true,
            ..Self::default()
        }
    }

    pub fn items(&self) -> &[Job] {
        &self.items
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn phase(&self) -> &FeedPhase {
        &self.phase
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    /// Merges a filter change. Any change to sectors or the salary range
    /// resets pagination to page 1, clears the accumulated results, and
    /// invalidates whatever fetch is currently in flight.
    pub fn set_filters(&mut self, change: FilterChange) {
        let mut changed = false;
        if let Some(sectors) = change.sectors {
            changed |= sectors != self.filters.sectors;
            self.filters.sectors = sectors;
        }
        if let Some(min) = change.min_salary {
            changed |= min != self.filters.min_salary;
            self.filters.min_salary = min;
        }
        if let Some(max) = change.max_salary {
            changed |= max != self.filters.max_salary;
            self.filters.max_salary = max;
        }
        if !changed {
            return;
        }

        debug!("Filters changed, resetting feed");
        self.filters.page_number = 1;
        self.items.clear();
        self.has_more = true;
        self.phase = FeedPhase::Initial;
        self.resetting = true;
        // Any in-flight response is now stale.
        self.generation += 1;
    }

    /// Restores the default filters (and resets the feed if they differ).
    pub fn reset_filters(&mut self) {
        let defaults = FilterState::default();
        self.set_filters(FilterChange {
            sectors: Some(defaults.sectors),
            min_salary: Some(defaults.min_salary),
            max_salary: Some(defaults.max_salary),
        });
    }

    /// Dispatches a fetch for the current filter state and returns its
    /// generation-tagged ticket. Exactly one response may be applied per
    /// ticket, and only while no newer fetch has been dispatched.
    pub fn begin_fetch(&mut self, append: bool) -> FetchTicket {
        self.generation += 1;
        self.is_loading = true;
        if !append {
            self.resetting = false;
        }
        FetchTicket {
            generation: self.generation,
            append,
            page_size: self.filters.page_size,
            request: self.filters.to_request(),
        }
    }

    /// Applies a fetch outcome. A ticket from a superseded dispatch never
    /// mutates the feed.
    pub fn apply(
        &mut self,
        ticket: FetchTicket,
        outcome: Result<Vec<Job>, FetchError>,
    ) -> ApplyResult {
        if ticket.generation != self.generation {
            debug!("Discarding stale fetch response (gen {})", ticket.generation);
            return ApplyResult::Stale;
        }

        self.is_loading = false;
        match outcome {
            Ok(jobs) => {
                self.has_more = jobs.len() as u32 == ticket.page_size;
                if ticket.append {
                    self.items.extend(jobs);
                    self.phase = FeedPhase::Loaded;
                } else if jobs.is_empty() {
                    self.items.clear();
                    self.phase = FeedPhase::NoResults;
                } else {
                    self.items = jobs;
                    self.phase = FeedPhase::Loaded;
                }
            }
            Err(e) => {
                self.has_more = false;
                if !ticket.append {
                    self.items.clear();
                }
                self.phase = FeedPhase::Error(e.to_string());
            }
        }
        ApplyResult::Applied
    }

    /// Scroll-proximity trigger. Dispatches the next page only when the feed
    /// has a loaded page behind it, is not already loading, still has more to
    /// give, and is not mid-reset.
    pub fn notify_sentinel_visible(&mut self) -> Option<FetchTicket> {
        if self.is_loading || !self.has_more || self.resetting || self.phase != FeedPhase::Loaded {
            return None;
        }
        self.filters.page_number += 1;
        Some(self.begin_fetch(true))
    }

    /// Convenience driver: dispatch, call the transport, apply.
    pub async fn fetch_page(&mut self, api: &dyn JobBoardApi, append: bool) -> ApplyResult {
        let ticket = self.begin_fetch(append);
        let outcome = api.search_jobs(&ticket.request).await;
        self.apply(ticket, outcome)
    }

    /// Sentinel-driven variant of [`fetch_page`](Self::fetch_page).
    pub async fn load_more(&mut self, api: &dyn JobBoardApi) -> Option<ApplyResult> {
        let ticket = self.notify_sentinel_visible()?;
        let outcome = api.search_jobs(&ticket.request).await;
        Some(self.apply(ticket, outcome))
    }
}
