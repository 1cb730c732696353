use regex::Regex;
use scraper::{ElementRef, Html, Node, Selector};

use crate::errors::TriageError;

/// Extraction results for one advisory document.
#[derive(Debug, Clone)]
pub struct ParsedAdvisory {
    /// All visible text of the advisory's content container, one line per
    /// block-level element.
    pub full_text: String,
    /// Weakness identifiers mentioned anywhere in the text, deduplicated and
    /// ordered by (length, lexical). The ordering is cosmetic only.
    pub weakness_ids: Vec<String>,
    /// Normalized "vulnerability overview" section, when the document has
    /// one. Callers fall back to `full_text` otherwise.
    pub overview: Option<String>,
}

/// Elements that end a line of visible text when flattening markup.
const BLOCK_TAGS: [&str; 6] = ["br", "div", "h3", "h4", "li", "p"];

struct Patterns {
    weakness: Regex,
    overview_heading: Regex,
    details_heading: Regex,
    subsection: Regex,
    section: Regex,
    newline_runs: Regex,
    space_runs: Regex,
}

impl Patterns {
    fn new() -> Self {
        Self {
            weakness: Regex::new(r"CWE-[0-9]+").expect("weakness pattern"),
            overview_heading: Regex::new(r"(?i)VULNERABILITY\s+OVERVIEW")
                .expect("overview pattern"),
            details_heading: Regex::new(r"VULNERABILITY\s+DETAILS").expect("details pattern"),
            subsection: Regex::new(r"^[0-9]+\.[0-9]+\.[0-9]+\s").expect("subsection pattern"),
            section: Regex::new(r"^[0-9]+\.[0-9]+\s").expect("section pattern"),
            newline_runs: Regex::new(r"\n+").expect("newline pattern"),
            space_runs: Regex::new("[ \u{00a0}]+").expect("space pattern"),
        }
    }
}

/// Parse one advisory's raw HTML. A document without the expected content
/// container is a hard failure; a partially-parsed advisory is worse than a
/// missing one.
pub fn parse(html: &str) -> Result<ParsedAdvisory, TriageError> {
    let patterns = Patterns::new();
    let document = Html::parse_document(html);

    let article_selector = Selector::parse("article.ics-advisory").expect("article selector");
    let article = document
        .select(&article_selector)
        .next()
        .ok_or_else(|| TriageError::Parse("advisory content container not found".into()))?;

    let full_text = visible_text(article);
    let weakness_ids = collect_weakness_ids(&patterns, &full_text);
    let overview = extract_overview(&patterns, article);

    Ok(ParsedAdvisory {
        full_text,
        weakness_ids,
        overview,
    })
}

/// Flattens an element into its visible text, inserting a newline after each
/// block-level element so the output reads line by line.
fn visible_text(element: ElementRef<'_>) -> String {
    let mut out = String::new();
    push_visible_text(element, &mut out);
    out
}

fn push_visible_text(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => out.push_str(&text.text),
            Node::Element(_) => {
                if let Some(child_element) = ElementRef::wrap(child) {
                    push_visible_text(child_element, out);
                }
            }
            _ => {}
        }
    }
    if BLOCK_TAGS.contains(&element.value().name()) {
        out.push('\n');
    }
}

/// Concatenated text content without block newlines, used for heading
/// comparisons.
fn inline_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>()
}

fn collect_weakness_ids(patterns: &Patterns, text: &str) -> Vec<String> {
    let unique: std::collections::BTreeSet<String> = patterns
        .weakness
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect();
    let mut weakness_ids: Vec<String> = unique.into_iter().collect();
    weakness_ids.sort_by(|a, b| a.len().cmp(&b.len()).then_with(|| a.cmp(b)));
    weakness_ids
}

/// Accumulate the "vulnerability overview" section: the matching heading plus
/// following siblings, stopping at a BACKGROUND heading or at the next
/// numbered top-level section. VULNERABILITY DETAILS headings, numbered
/// sub-sections, and "Begin Update"/"End Update" revision markers are part of
/// the section and do not stop accumulation.
fn extract_overview(patterns: &Patterns, article: ElementRef<'_>) -> Option<String> {
    let heading_selector = Selector::parse("h3").expect("heading selector");
    let start = article
        .select(&heading_selector)
        .find(|heading| patterns.overview_heading.is_match(&inline_text(*heading)))?;

    let mut text = inline_text(start);
    text.push('\n');

    for sibling in start.next_siblings() {
        match sibling.value() {
            Node::Element(element) if element.name() == "h3" => {
                let Some(heading) = ElementRef::wrap(sibling) else {
                    continue;
                };
                let heading_text = inline_text(heading);
                if heading_text.contains("BACKGROUND") {
                    break;
                }
                if !patterns.details_heading.is_match(&heading_text)
                    && !patterns.subsection.is_match(&heading_text)
                    && patterns.section.is_match(&heading_text)
                {
                    break;
                }
                push_visible_text(heading, &mut text);
            }
            Node::Element(_) => {
                if let Some(element) = ElementRef::wrap(sibling) {
                    push_visible_text(element, &mut text);
                }
            }
            Node::Text(node_text) => text.push_str(&node_text.text),
            _ => {}
        }
    }

    let collapsed = patterns.newline_runs.replace_all(&text, "\n");
    let collapsed = patterns.space_runs.replace_all(&collapsed, " ");
    Some(collapsed.into_owned())
}
