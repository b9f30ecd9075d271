use anyhow::{Context, Result};
use reqwest::Url;

/// One entry of a `Link` header: the target URL and its relation names.
#[derive(Debug, Clone, PartialEq)]
pub struct LinkEntry {
    pub url: String,
    pub rels: Vec<String>,
}

impl LinkEntry {
    pub fn has_rel(&self, rel: &str) -> bool {
        self.rels.iter().any(|r| r.eq_ignore_ascii_case(rel))
    }
}

/// Parses a `Link` header value such as
/// `<https://api.github.com/...?page=2>; rel="next", <...?page=5>; rel="last"`.
///
/// Entries without a `<url>` part are skipped. A `rel` parameter may carry
/// several space-separated relation names.
pub fn parse_link_header(value: &str) -> Vec<LinkEntry> {
    value
        .split(',')
        .filter_map(|part| {
            let mut segments = part.split(';');
            let target = segments.next()?.trim();
            let url = target.strip_prefix('<')?.strip_suffix('>')?;

            let rels = segments
                .filter_map(|param| {
                    let (name, value) = param.split_once('=')?;
                    if name.trim().eq_ignore_ascii_case("rel") {
                        Some(value.trim().trim_matches('"').to_string())
                    } else {
                        None
                    }
                })
                .flat_map(|rel| {
                    rel.split_whitespace()
                        .map(str::to_string)
                        .collect::<Vec<_>>()
                })
                .collect();

            Some(LinkEntry {
                url: url.to_string(),
                rels,
            })
        })
        .collect()
}

/// Reads the `page` query parameter of the `last` relation.
///
/// Returns `Ok(None)` when no entry is tagged `last`.
pub fn last_page(entries: &[LinkEntry]) -> Result<Option<u32>> {
    let Some(last) = entries.iter().find(|entry| entry.has_rel("last")) else {
        return Ok(None);
    };

    let url = Url::parse(&last.url).with_context(|| format!("Invalid last-page URL {}", last.url))?;
    let page = url
        .query_pairs()
        .find(|(name, _)| name == "page")
        .map(|(_, value)| value.into_owned())
        .ok_or_else(|| anyhow::anyhow!("Last-page URL has no page parameter: {}", last.url))?;

    let page = page
        .parse::<u32>()
        .with_context(|| format!("Invalid page number `{page}` in {}", last.url))?;
    Ok(Some(page))
}

/// GitHub sometimes reports 0 pages when there is exactly one.
pub fn normalize_page_count(pages: u32) -> u32 {
    if pages == 0 { 1 } else { pages }
}
