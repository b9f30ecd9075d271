use anyhow::{Context, Result};
use reqwest::header::{ACCEPT, LINK};

use crate::config::ExportConfig;
use crate::github::issues::IssueState;
use crate::github::pagination;

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));
const GITHUB_JSON: &str = "application/vnd.github.v3+json";

/// Basic-auth client for one repository's issue listing.
pub struct IssuesClient {
    client: reqwest::Client,
    issues_url: String,
    user: String,
    password: String,
}

impl IssuesClient {
    pub fn new(config: &ExportConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder().user_agent(USER_AGENT).gzip(true);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().context("Failed to create HTTP client")?;

        Ok(IssuesClient {
            client,
            issues_url: config.issues_url(),
            user: config.user.clone(),
            password: config.password.clone(),
        })
    }

    /// Number of result pages for `state`, read from the `last` link of a HEAD response.
    pub async fn page_count(&self, state: IssueState) -> Result<u32> {
        tracing::debug!(url = %self.issues_url, %state, "HEAD issue listing");
        let response = self
            .client
            .head(&self.issues_url)
            .query(&[("state", state.as_str())])
            .basic_auth(&self.user, Some(&self.password))
            .header(ACCEPT, GITHUB_JSON)
            .send()
            .await
            .with_context(|| format!("Failed to read number of {state} issue pages"))?;

        if !response.status().is_success() {
            return Err(anyhow::anyhow!(
                "Failed to read number of {state} issue pages: HTTP {}",
                response.status()
            ));
        }

        let mut entries = Vec::new();
        for value in response.headers().get_all(LINK) {
            let value = value.to_str().context("Link header is not valid text")?;
            tracing::debug!(link = value, "pagination link");
            entries.extend(pagination::parse_link_header(value));
        }

        let pages = pagination::last_page(&entries)?.unwrap_or(1);
        Ok(pagination::normalize_page_count(pages))
    }

    /// Raw JSON payload of one page of the listing for `state`.
    pub async fn fetch_page(&self, state: IssueState, page: u32) -> Result<Vec<u8>> {
        tracing::debug!(url = %self.issues_url, %state, page, "GET issue page");
        let page_param = page.to_string();
        let response = self
            .client
            .get(&self.issues_url)
            .query(&[("state", state.as_str()), ("page", page_param.as_str())])
            .basic_auth(&self.user, Some(&self.password))
            .header(ACCEPT, GITHUB_JSON)
            .send()
            .await
            .with_context(|| format!("Failed to fetch {state} issues page {page}"))?;

        if !response.status().is_success() {
            return Err(anyhow::anyhow!(
                "Failed to fetch {state} issues page {page}: HTTP {}",
                response.status()
            ));
        }

        let body = response
            .bytes()
            .await
            .with_context(|| format!("Failed to read {state} issues page {page}"))?;
        Ok(body.to_vec())
    }
}
