//! The paginated extraction pipeline.
//!
//! [`Harvester`] walks the results pages of a [`SearchSession`], visits each
//! card's detail page and accumulates the normalized records. Failures are
//! isolated: a broken listing is skipped, a broken page ends pagination, and
//! only an unusable surface (or a pacing fault) aborts the run.

pub mod dataset;
pub mod detail;
pub mod images;
pub mod summary;


pub use dataset::Dataset;
pub use detail::DetailContext;
pub use images::{HttpImageSource, ImageCapture, ImageSource, ImageStore};
pub use summary::harvest_summaries;

use std::time::Duration;
use url::Url;

use crate::error::Result;
use crate::politeness::Governor;
use crate::results::{ListingSummary, listing_id};
use crate::session::SearchSession;
use crate::surface::{Role, Surface};

/// States of the pagination loop
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageState {
    Init,
    HarvestingPage(u32),
    ProcessingItems {
        page: u32,
        summaries: Vec<ListingSummary>,
        /// Results page to come back to after visiting the listings
        anchor: Url,
    },
    AdvancingPage(u32),
    Done,
    Aborted,
}

impl PageState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, PageState::Done | PageState::Aborted)
    }
}

/// Outcome of a completed run
#[derive(Debug, Clone)]
pub struct RunReport {
    pub dataset: Dataset,
    /// Number of results pages whose cards were harvested
    pub pages_harvested: u32,
    pub final_state: PageState,
}

/// Drives one browsing surface through a search session
pub struct Harvester<S, F> {
    surface: S,
    images: ImageCapture<F>,
    governor: Governor,
    element_timeout: Duration,
}

impl<S: Surface, F: ImageSource> Harvester<S, F> {
    pub fn new(
        surface: S,
        images: ImageCapture<F>,
        governor: Governor,
        element_timeout: Duration,
    ) -> Self {
        Self {
            surface,
            images,
            governor,
            element_timeout,
        }
    }

    /// Harvests up to `requested_pages` results pages.
    ///
    /// The surface is closed on every exit path. An error is returned only
    /// when the run aborts; everything else ends in [`PageState::Done`].
    pub async fn run(self, session: &SearchSession, requested_pages: u32) -> Result<RunReport> {
        let mut run = Run {
            harvester: &self,
            session,
            requested_pages,
            dataset: Dataset::new(),
            pages_harvested: 0,
        };

        let mut state = PageState::Init;
        let mut failure = None;
        while !state.is_terminal() {
            state = match run.step(state).await {
                Ok(next) => next,
                Err(e) => {
                    ::log::error!("Harvest aborted: {}", e);
                    failure = Some(e);
                    PageState::Aborted
                }
            };
        }

        let Run {
            dataset,
            pages_harvested,
            ..
        } = run;
        let Self { surface, .. } = self;
        if let Err(e) = surface.close().await {
            ::log::warn!("Failed to close browsing surface: {}", e);
        }

        if let Some(e) = failure {
            return Err(e);
        }

        ::log::info!(
            records = dataset.len(), pages = pages_harvested;
            "Harvest completed: {} listings from {} pages",
            dataset.len(),
            pages_harvested
        );
        Ok(RunReport {
            dataset,
            pages_harvested,
            final_state: state,
        })
    }
}

/// Mutable state of one run
struct Run<'a, S, F> {
    harvester: &'a Harvester<S, F>,
    session: &'a SearchSession,
    requested_pages: u32,
    dataset: Dataset,
    pages_harvested: u32,
}

impl<S: Surface, F: ImageSource> Run<'_, S, F> {
    /// Performs one transition. An `Err` aborts the run.
    async fn step(&mut self, state: PageState) -> Result<PageState> {
        let surface = &self.harvester.surface;
        let governor = &self.harvester.governor;

        match state {
            PageState::Init => {
                if self.requested_pages == 0 {
                    ::log::info!("No pages requested");
                    return Ok(PageState::Done);
                }
                let start = self.session.base_url();
                ::log::info!(url = start.as_str(); "Starting harvest for {}", self.session.destination());
                surface.load(start).await?;
                governor.wait().await?;
                Ok(PageState::HarvestingPage(1))
            }

            PageState::HarvestingPage(page) => {
                ::log::info!(
                    page = page, pages = self.requested_pages;
                    "Processing page {} of {}",
                    page,
                    self.requested_pages
                );
                let anchor = match surface.current_url().await {
                    Ok(anchor) => anchor,
                    Err(e) => {
                        ::log::error!(page = page; "Lost the results page: {}", e);
                        return Ok(PageState::Done);
                    }
                };
                match harvest_summaries(surface, &anchor).await {
                    Ok(summaries) => {
                        self.pages_harvested += 1;
                        Ok(PageState::ProcessingItems {
                            page,
                            summaries,
                            anchor,
                        })
                    }
                    Err(e) => {
                        ::log::error!(page = page; "Could not read listing cards: {}", e);
                        Ok(PageState::Done)
                    }
                }
            }

            PageState::ProcessingItems {
                page,
                summaries,
                anchor,
            } => {
                let context = DetailContext {
                    surface,
                    governor,
                    images: &self.harvester.images,
                    element_timeout: self.harvester.element_timeout,
                };

                for summary in &summaries {
                    match context.extract(summary, &anchor).await {
                        Ok(raw) => {
                            let record = self.dataset.push(raw);
                            ::log::info!(listing_id = record.id.as_str(); "Listing {} processed", record.id);
                        }
                        Err(e) if e.is_fatal() => return Err(e),
                        Err(e) => {
                            let id = listing_id(&summary.detail_link)
                                .unwrap_or_else(|| "unknown".to_string());
                            ::log::error!(listing_id = id.as_str(); "Error processing listing {}: {}", id, e);
                        }
                    }
                }

                if let Err(e) = surface.load(&anchor).await {
                    ::log::error!(page = page; "Could not reload results page: {}", e);
                    return Ok(PageState::Done);
                }
                governor.wait().await?;
                Ok(PageState::AdvancingPage(page))
            }

            PageState::AdvancingPage(page) => {
                if page >= self.requested_pages {
                    ::log::info!(page = page; "Reached the requested page count");
                    return Ok(PageState::Done);
                }

                match surface.find_one(Role::NextPage).await {
                    Ok(Some(_)) => {}
                    Ok(None) => {
                        ::log::info!(page = page; "No next page control, finishing");
                        return Ok(PageState::Done);
                    }
                    Err(e) => {
                        ::log::error!(page = page; "Could not look for the next page control: {}", e);
                        return Ok(PageState::Done);
                    }
                }

                ::log::info!(page = page; "Clicking next page control for page {}", page + 1);
                if let Err(e) = surface.click(Role::NextPage).await {
                    ::log::error!(page = page; "Could not advance to the next page: {}", e);
                    return Ok(PageState::Done);
                }
                governor.wait().await?;
                Ok(PageState::HarvestingPage(page + 1))
            }

            terminal @ (PageState::Done | PageState::Aborted) => Ok(terminal),
        }
    }
}
