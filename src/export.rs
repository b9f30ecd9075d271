use anyhow::{Context, Result};
use std::future::Future;
use std::io::Write;

use crate::github::client::IssuesClient;
use crate::github::issues::{IssueRecord, IssueState, LabelRecord};

/// Column names, in row order.
pub const COLUMNS: [&str; 6] = ["number", "title", "state", "created", "labels", "comments"];

/// Separator between label names inside the `labels` column.
pub const LABEL_SEPARATOR: char = '+';

/// Open issues are exported before closed ones.
const EXPORT_ORDER: [IssueState; 2] = [IssueState::Open, IssueState::Closed];

/// Paged access to a repository's issue listing
pub trait IssueSource {
    /// Number of pages available for `state`, at least 1
    fn page_count(&self, state: IssueState) -> impl Future<Output = Result<u32>>;
    /// Raw JSON array for one 1-based page
    fn fetch_page(&self, state: IssueState, page: u32) -> impl Future<Output = Result<Vec<u8>>>;
}

impl IssueSource for IssuesClient {
    fn page_count(&self, state: IssueState) -> impl Future<Output = Result<u32>> {
        IssuesClient::page_count(self, state)
    }

    fn fetch_page(&self, state: IssueState, page: u32) -> impl Future<Output = Result<Vec<u8>>> {
        IssuesClient::fetch_page(self, state, page)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FlattenOptions {
    pub delimiter: char,
    pub include_pull_requests: bool,
}

impl Default for FlattenOptions {
    fn default() -> Self {
        FlattenOptions {
            delimiter: ';',
            include_pull_requests: true,
        }
    }
}

/// Rows written per issue state.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct ExportSummary {
    pub open: usize,
    pub closed: usize,
}

/// Writes the column header line.
pub fn write_header<W: Write + ?Sized>(out: &mut W, delimiter: char) -> Result<()> {
    let line = COLUMNS.join(delimiter.to_string().as_str());
    writeln!(out, "{line}").context("Failed to write CSV header")?;
    Ok(())
}

/// Text following the last `/` of a URL path.
fn last_segment(url: &str) -> &str {
    url.rsplit('/').next().unwrap_or(url)
}

/// Extracts the issue number from the issue's API URL,
/// e.g. `https://api.github.com/repos/o/r/issues/42` yields 42.
pub fn issue_number(url: &str) -> Result<u64> {
    let segment = last_segment(url);
    segment
        .parse::<u64>()
        .with_context(|| format!("Issue URL does not end in a number: {url}"))
}

/// Label names taken from each label URL, joined with `+`.
///
/// A label URL ending in `/` names no label and is rejected, like an issue
/// URL without a trailing number.
pub fn label_names(labels: &[LabelRecord]) -> Result<String> {
    let names = labels
        .iter()
        .map(|label| match last_segment(&label.url) {
            "" => Err(anyhow::anyhow!(
                "Label URL does not end in a name: {}",
                label.url
            )),
            name => Ok(name),
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(names.join(LABEL_SEPARATOR.to_string().as_str()))
}

/// Formats one issue as a CSV line without the trailing newline.
///
/// Field values are written as-is: a delimiter or newline inside a title is
/// not quoted.
pub fn format_row(issue: &IssueRecord, delimiter: char) -> Result<String> {
    let fields = [
        issue_number(&issue.url)?.to_string(),
        issue.title.clone(),
        issue.state.clone(),
        issue.created_at.clone(),
        label_names(&issue.labels)?,
        issue.comments.to_string(),
    ];
    Ok(fields.join(delimiter.to_string().as_str()))
}

/// Parses a JSON array of issues and appends one row per issue to `out`.
///
/// Rows keep the order of the array. The sink is neither flushed nor closed.
/// Returns the number of rows written.
pub fn write_issue_rows<W: Write + ?Sized>(
    payload: &[u8],
    out: &mut W,
    options: &FlattenOptions,
) -> Result<usize> {
    let issues: Vec<IssueRecord> =
        serde_json::from_slice(payload).context("Failed to parse issue list JSON")?;

    let mut written = 0;
    for issue in issues
        .iter()
        .filter(|issue| options.include_pull_requests || !issue.is_pull_request())
    {
        let row = format_row(issue, options.delimiter)?;
        writeln!(out, "{row}").context("Failed to write CSV row")?;
        written += 1;
    }
    Ok(written)
}

/// Writes the header, then every page of open issues, then every page of
/// closed issues. The first failure aborts the export.
pub async fn export_issues<S, W>(
    source: &S,
    out: &mut W,
    options: &FlattenOptions,
) -> Result<ExportSummary>
where
    S: IssueSource,
    W: Write + ?Sized,
{
    write_header(&mut *out, options.delimiter)?;

    let mut summary = ExportSummary::default();
    for state in EXPORT_ORDER {
        let pages = source.page_count(state).await?;
        tracing::info!(%state, pages, "exporting issues");

        let mut rows = 0;
        for page in 1..=pages {
            let payload = source.fetch_page(state, page).await?;
            let written = write_issue_rows(&payload, &mut *out, options)
                .with_context(|| format!("Failed to export {state} issues page {page}"))?;
            tracing::debug!(%state, page, rows = written, "page written");
            rows += written;
        }

        match state {
            IssueState::Open => summary.open = rows,
            IssueState::Closed => summary.closed = rows,
        }
    }
    Ok(summary)
}
