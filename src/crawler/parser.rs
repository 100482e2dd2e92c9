//! Listing page extractor
//!
//! This module turns one page of the recording listing into:
//! - the candidate recordings found in its lecture rows
//! - the locator of the next listing page, if the paginator has one
//!
//! The site structure is fixed; the selectors below are the whole contract.

use crate::storage::Recording;
use scraper::{ElementRef, Html, Selector};
use url::Url;

/// Table rows that describe one recording; the class must be exactly `lecture`
pub const ROW_SELECTOR: &str = r#"tr[class="lecture"]"#;

/// Links inside the pagination control
pub const PAGINATOR_LINK_SELECTOR: &str = "div.paginator a[href]";

/// Visible text of the paginator link leading to the next page
pub const NEXT_LABEL: &str = "Neste";

// Cells within a lecture row
const TITLE_CELL: &str = "td.title";
const AUDIO_LINK: &str = "td.audio a[href]";
const COURSE_CELL: &str = "td.course";
const LECTURER_CELL: &str = "td.lecturer";
const ROOM_CELL: &str = "td.room";
const DATE_CELL: &str = "td.date";

/// Everything extracted from one listing page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedPage {
    /// Candidate recordings in document order
    pub recordings: Vec<Recording>,

    /// Raw href of the "next page" link (usually a site-relative path)
    pub next_page: Option<String>,
}

struct ListingSelectors {
    row: Selector,
    paginator_link: Selector,
    title: Selector,
    audio: Selector,
    course: Selector,
    lecturer: Selector,
    room: Selector,
    date: Selector,
}

impl ListingSelectors {
    fn new() -> Result<Self, String> {
        let parse = |css: &str| Selector::parse(css).map_err(|e| format!("bad selector '{}': {:?}", css, e));
        Ok(Self {
            row: parse(ROW_SELECTOR)?,
            paginator_link: parse(PAGINATOR_LINK_SELECTOR)?,
            title: parse(TITLE_CELL)?,
            audio: parse(AUDIO_LINK)?,
            course: parse(COURSE_CELL)?,
            lecturer: parse(LECTURER_CELL)?,
            room: parse(ROOM_CELL)?,
            date: parse(DATE_CELL)?,
        })
    }
}

/// Extracts candidate recordings and the next-page locator from a listing page
///
/// The markup is parsed leniently (html5ever), so unclosed tags and other
/// malformed HTML are accepted. The only failures are an empty body and a
/// body that is not UTF-8. Rows that cannot be mapped to a [`Recording`] are
/// skipped without failing the page.
///
/// Relative audio URLs are resolved against `base_url`.
///
/// # Example
///
/// ```
/// use lecture_crawler::crawler::extract;
///
/// let html = br#"<table><tr class="lecture">
///     <td class="title">Algoritmer</td>
///     <td class="audio"><a href="/audio/1.mp3">mp3</a></td>
/// </tr></table>"#;
/// let page = extract(html, "https://example.com").unwrap();
/// assert_eq!(page.recordings[0].audio_url, "https://example.com/audio/1.mp3");
/// assert_eq!(page.next_page, None);
/// ```
pub fn extract(page: &[u8], base_url: &str) -> Result<ExtractedPage, String> {
    if page.is_empty() {
        return Err("empty response body".to_string());
    }

    let html = std::str::from_utf8(page).map_err(|e| format!("body is not valid UTF-8: {}", e))?;
    let selectors = ListingSelectors::new()?;
    let document = Html::parse_document(html);

    let mut recordings = Vec::new();
    for (index, row) in document.select(&selectors.row).enumerate() {
        match recording_from_row(row, &selectors, base_url) {
            Some(recording) => recordings.push(recording),
            None => tracing::debug!("Skipping lecture row {}: missing title or audio URL", index),
        }
    }

    let next_page = find_next_page(&document, &selectors);

    Ok(ExtractedPage {
        recordings,
        next_page,
    })
}

/// Maps one lecture row to a recording
///
/// Title and a resolvable audio link are required; the other cells are
/// optional.
fn recording_from_row(row: ElementRef<'_>, selectors: &ListingSelectors, base_url: &str) -> Option<Recording> {
    let title = cell_text(row, &selectors.title)?;

    let href = row
        .select(&selectors.audio)
        .next()
        .and_then(|a| a.value().attr("href"))?;
    let audio_url = resolve_url(base_url, href)?;

    Some(Recording {
        title,
        audio_url,
        course_code: cell_text(row, &selectors.course),
        lecturer: cell_text(row, &selectors.lecturer),
        room: cell_text(row, &selectors.room),
        published: cell_text(row, &selectors.date),
    })
}

/// Returns the whitespace-collapsed text of the first matching cell
fn cell_text(row: ElementRef<'_>, selector: &Selector) -> Option<String> {
    row.select(selector)
        .next()
        .map(|cell| collapse_whitespace(&cell.text().collect::<String>()))
        .filter(|s| !s.is_empty())
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn find_next_page(document: &Html, selectors: &ListingSelectors) -> Option<String> {
    document
        .select(&selectors.paginator_link)
        .find(|a| collapse_whitespace(&a.text().collect::<String>()) == NEXT_LABEL)
        .and_then(|a| a.value().attr("href"))
        .map(|href| href.trim().to_string())
        .filter(|href| !href.is_empty())
}

/// Resolves an href from the listing to an absolute URL
///
/// Absolute `http(s)` hrefs are kept as they are. Protocol-relative hrefs
/// (`//host/path`) take the scheme of `base_url`. Anything else is joined to
/// `base_url` by plain concatenation with exactly one `/` between them.
///
/// Returns None if the href should be excluded:
/// - javascript:, mailto:, tel: schemes
/// - data: URIs
/// - fragment-only links
/// - anything that does not form an absolute HTTP(S) URL
pub fn resolve_url(base_url: &str, href: &str) -> Option<String> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    if href.starts_with("javascript:")
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("data:")
    {
        return None;
    }

    if let Ok(absolute) = Url::parse(href) {
        return is_http(&absolute).then(|| href.to_string());
    }

    if href.starts_with("//") {
        let url = Url::parse(base_url).ok()?.join(href).ok()?;
        return is_http(&url).then(|| url.to_string());
    }

    let joined = format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        href.trim_start_matches('/')
    );

    match Url::parse(&joined) {
        Ok(url) if is_http(&url) => Some(joined),
        _ => None,
    }
}

fn is_http(url: &Url) -> bool {
    (url.scheme() == "http" || url.scheme() == "https") && url.has_host()
}
