use async_trait::async_trait;
use reqwest::StatusCode;
use thiserror::Error;
use tracing::{debug, info};

use crate::config::FeedConfig;
use crate::models::{FeedPage, RawDonation};

const BODY_EXCERPT_LEN: usize = 200;

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("request for offset {offset} failed: {reason}")]
    Transport { offset: usize, reason: String },

    #[error("feed returned HTTP {status} for offset {offset}: {body}")]
    Status {
        offset: usize,
        status: u16,
        body: String,
    },

    #[error("malformed feed response at offset {offset}: {reason}")]
    Malformed { offset: usize, reason: String },

    #[error("feed still reported more pages after {0} requests")]
    PageLimitExceeded(usize),
}

/// Source of donation pages for one campaign.
#[async_trait]
pub trait DonationFeed {
    async fn fetch_page(
        &self,
        slug: &str,
        offset: usize,
        limit: usize,
    ) -> Result<FeedPage, FeedError>;
}

pub struct HttpFeed {
    http_client: reqwest::Client,
    base_url: String,
    sort: String,
}

impl HttpFeed {
    pub fn new(config: &FeedConfig) -> Result<Self, FeedError> {
        let http_client = reqwest::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .timeout(config.timeout)
            .build()
            .map_err(|e| FeedError::Transport {
                offset: 0,
                reason: e.to_string(),
            })?;

        Ok(Self {
            http_client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            sort: config.sort.clone(),
        })
    }

    pub fn page_url(&self, slug: &str, offset: usize, limit: usize) -> String {
        format!(
            "{}/{}/donations?limit={}&offset={}&sort={}",
            self.base_url, slug, limit, offset, self.sort
        )
    }
}

#[async_trait]
impl DonationFeed for HttpFeed {
    async fn fetch_page(
        &self,
        slug: &str,
        offset: usize,
        limit: usize,
    ) -> Result<FeedPage, FeedError> {
        let url = self.page_url(slug, offset, limit);
        debug!(url = %url, "requesting donation page");

        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(|e| FeedError::Transport {
                offset,
                reason: e.to_string(),
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| FeedError::Transport {
            offset,
            reason: e.to_string(),
        })?;

        check_status(status, &body, offset)?;
        parse_page(&body, offset)
    }
}

fn check_status(status: StatusCode, body: &str, offset: usize) -> Result<(), FeedError> {
    if status.is_success() {
        return Ok(());
    }

    Err(FeedError::Status {
        offset,
        status: status.as_u16(),
        body: body.chars().take(BODY_EXCERPT_LEN).collect(),
    })
}

/// Parses one page body. Donation amounts must not be negative.
pub fn parse_page(body: &str, offset: usize) -> Result<FeedPage, FeedError> {
    let page: FeedPage = serde_json::from_str(body).map_err(|e| FeedError::Malformed {
        offset,
        reason: e.to_string(),
    })?;

    if let Some(position) = page
        .references
        .donations
        .iter()
        .position(|donation| donation.amount.is_sign_negative() && !donation.amount.is_zero())
    {
        return Err(FeedError::Malformed {
            offset,
            reason: format!(
                "negative amount {} in donation {}",
                page.references.donations[position].amount,
                offset + position
            ),
        });
    }

    Ok(page)
}

/// Pulls every page for `slug`, one request at a time, in offset order.
///
/// The offset advances by `page_size` on every request no matter how many
/// records came back; only `meta.has_next` ends the loop. Any failed page
/// fails the whole fetch.
pub async fn fetch_all<F>(
    feed: &F,
    slug: &str,
    config: &FeedConfig,
) -> Result<Vec<RawDonation>, FeedError>
where
    F: DonationFeed + ?Sized,
{
    let mut donations = Vec::new();
    let mut offset = 0usize;
    let mut requests = 0usize;

    loop {
        if config.max_pages.is_some_and(|max| requests >= max) {
            return Err(FeedError::PageLimitExceeded(requests));
        }

        let page = feed.fetch_page(slug, offset, config.page_size).await?;
        requests += 1;

        debug!(
            offset,
            returned = page.references.donations.len(),
            has_next = page.meta.has_next,
            "received donation page"
        );

        donations.extend(page.references.donations);
        if !page.meta.has_next {
            break;
        }
        offset += config.page_size;
    }

    info!(slug = %slug, requests, donations = donations.len(), "fetched donation history");
    Ok(donations)
}
