//! Markup lookups on intermediate landing pages.

use scraper::{ElementRef, Html, Selector};
use shared::domain::INTERMEDIATE_HOSTS;
use url::Url;

/// File hosts a resolved link is expected to point at.
pub const KNOWN_FILE_HOSTS: [&str; 7] = [
    "mega.nz",
    "drive.google.com",
    "1fichier.com",
    "uptobox.com",
    "zippyshare.com",
    "racaty",
    "mediafire.com",
];

const DOWNLOAD_CLASS_MARKERS: [&str; 3] = ["button", "btn", "download"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LandingForm {
    pub action: String,
    pub fields: Vec<(String, String)>,
}

/// Finds the first `<form id="landing">` and collects its named inputs.
///
/// A landing form without a non-empty `action` counts as absent.
pub fn find_landing_form(html: &str) -> Option<LandingForm> {
    let form_selector = Selector::parse("form#landing").ok()?;
    let input_selector = Selector::parse("input[name]").ok()?;

    let document = Html::parse_document(html);
    let form = document.select(&form_selector).next()?;
    let action = form.value().attr("action").filter(|a| !a.is_empty())?;

    let fields = form
        .select(&input_selector)
        .filter_map(|input| {
            let name = input.value().attr("name").filter(|n| !n.is_empty())?;
            let value = input.value().attr("value").unwrap_or_default();
            Some((name.to_string(), value.to_string()))
        })
        .collect();

    Some(LandingForm {
        action: action.to_string(),
        fields,
    })
}

/// `href` of the first anchor styled as a button or download link.
pub fn find_download_anchor(html: &str) -> Option<String> {
    let anchor_selector = Selector::parse("a[class]").ok()?;

    let document = Html::parse_document(html);
    let anchor = document
        .select(&anchor_selector)
        .find(has_download_class)?;
    anchor
        .value()
        .attr("href")
        .filter(|href| !href.is_empty())
        .map(str::to_string)
}

fn has_download_class(anchor: &ElementRef<'_>) -> bool {
    anchor.value().classes().any(|class| {
        let class = class.to_ascii_lowercase();
        DOWNLOAD_CLASS_MARKERS
            .iter()
            .any(|marker| class.contains(marker))
    })
}

pub fn is_intermediate(url: &Url) -> bool {
    let rendered = url.as_str();
    INTERMEDIATE_HOSTS.iter().any(|host| rendered.contains(host))
}

pub fn looks_like_file_host(url: &str) -> bool {
    KNOWN_FILE_HOSTS.iter().any(|host| url.contains(host))
}
