//! Reading item records out of rendered list entries

use crate::dom::selectors as sel;
use crate::dom::{HostPage, NodeHandle};
use crate::error::Result;
use crate::item::{ItemRecord, UNKNOWN_DATE, UNKNOWN_DURATION};
use regex::Regex;
use std::sync::LazyLock;

/// Relative-time markers, weekday and month names, numeric dates
static DATE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?ix)
        \bago\b
        | \bstreamed\b
        | \bpremiere
        | \byesterday\b
        | \btoday\b
        | \b(mon|tues|wednes|thurs|fri|satur|sun)day\b
        | \b(jan|feb|mar|apr|may|jun|jul|aug|sep|sept|oct|nov|dec)[a-z]*\.?\s+\d{1,2}\b
        | \b\d{1,2}[./-]\d{1,2}[./-]\d{2,4}\b
        | \b\d{4}-\d{2}-\d{2}\b",
    )
    .expect("valid regex pattern")
});

/// Whether a metadata label reads like an upload date
pub fn looks_like_date(text: &str) -> bool {
    DATE_PATTERN.is_match(text)
}

/// Pick the upload date among metadata labels.
///
/// Both label lists are scanned from the end. Secondary labels also accept
/// anything with a digit, and as a last resort the third primary label is used.
pub fn pick_upload_date(primary: &[String], secondary: &[String]) -> Option<String> {
    if let Some(date) = primary.iter().rev().find(|text| looks_like_date(text)) {
        return Some(date.clone());
    }
    if let Some(date) = secondary
        .iter()
        .rev()
        .find(|text| looks_like_date(text) || text.chars().any(|c| c.is_ascii_digit()))
    {
        return Some(date.clone());
    }
    primary.get(2).cloned()
}

/// Build the record for the list entry at `position`.
///
/// Returns `Ok(None)` when the entry has no menu button; such entries cannot
/// be acted upon.
pub fn extract_item(page: &dyn HostPage, node: &NodeHandle, position: usize) -> Result<Option<ItemRecord>> {
    let Some(trigger) = page.first_within(node, sel::ITEM_MENU_BUTTON)? else {
        return Ok(None);
    };

    let title = read_title(page, node)?.unwrap_or_else(|| format!("Item {}", position + 1));
    let duration = page
        .text_within(node, sel::ITEM_DURATION)?
        .unwrap_or_else(|| UNKNOWN_DURATION.to_string());

    let primary = texts_within(page, node, sel::ITEM_METADATA_SPAN)?;
    let secondary = texts_within(page, node, sel::ITEM_VIDEO_INFO_SPAN)?;
    let upload_date = pick_upload_date(&primary, &secondary).unwrap_or_else(|| UNKNOWN_DATE.to_string());

    Ok(Some(ItemRecord::new(title, duration, upload_date, trigger, position)))
}

fn read_title(page: &dyn HostPage, node: &NodeHandle) -> Result<Option<String>> {
    let Some(title) = page.first_within(node, sel::ITEM_TITLE)? else {
        return Ok(None);
    };
    let info = page.inspect(&title)?;
    Ok(info
        .trimmed_text()
        .map(str::to_string)
        .or_else(|| info.non_empty_attribute("title").map(str::to_string))
        .or_else(|| info.non_empty_attribute("aria-label").map(str::to_string)))
}

fn texts_within(page: &dyn HostPage, node: &NodeHandle, selector: &str) -> Result<Vec<String>> {
    let mut texts = Vec::new();
    for span in page.query_within(node, selector)? {
        if let Some(text) = page.inspect(&span)?.trimmed_text() {
            texts.push(text.to_string());
        }
    }
    Ok(texts)
}
