//! Page slicing of historical series with next-page links.

use fx_types::{HistoricalSeries, Page, RateSeries};

/// Route the historical endpoint is mounted under; next-page links point here.
pub const HISTORICAL_RATES_PATH: &str = "/api/historical-rates";

/// Slices date-ordered series into pages.
#[derive(Debug, Clone)]
pub struct Paginator {
    base_url: String,
}

impl Paginator {
    /// `public_base_url` is the externally visible origin, e.g.
    /// `http://localhost:3000`.
    pub fn new(public_base_url: impl Into<String>) -> Self {
        let base_url = public_base_url.into().trim_end_matches('/').to_string();
        Self { base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns page `page` (1-based) of `series`, `page_size` dates per page.
    ///
    /// A page past the end is empty rather than an error. Zero inputs are
    /// treated as 1.
    pub fn paginate(&self, series: &HistoricalSeries, page_size: u32, page: u32) -> Page<RateSeries> {
        let page_size = page_size.max(1);
        let page = page.max(1);

        let total = series.rates.len();
        let total_pages = u32::try_from(total.div_ceil(page_size as usize)).unwrap_or(u32::MAX);
        let first = (page as usize - 1).saturating_mul(page_size as usize);

        let items: RateSeries = series
            .rates
            .iter()
            .skip(first)
            .take(page_size as usize)
            .map(|(date, rates)| (*date, rates.clone()))
            .collect();

        let next_page_url = (page < total_pages).then(|| self.page_url(series, page_size, page + 1));

        Page {
            items,
            page_number: page,
            page_size,
            total_pages,
            next_page_url,
        }
    }

    fn page_url(&self, series: &HistoricalSeries, page_size: u32, page: u32) -> String {
        format!(
            "{}{}/{}?from_date={}&to_date={}&page_size={}&page={}",
            self.base_url,
            HISTORICAL_RATES_PATH,
            series.base,
            series.start_date,
            series.end_date,
            page_size,
            page
        )
    }
}
