use scraper::{Html, Selector};
use url::Url;

use crate::errors::TriageError;
use crate::models::AdvisorySummary;

/// One parsed page of the advisory index.
pub struct ListingPage {
    pub summaries: Vec<AdvisorySummary>,
    pub next_url: Option<Url>,
}

struct ListingSelectors {
    items: Selector,
    docid: Selector,
    title_link: Selector,
    next_link: Selector,
}

impl ListingSelectors {
    fn new() -> Self {
        Self {
            items: Selector::parse(".view-ics-advisories .view-content li")
                .expect("items selector"),
            docid: Selector::parse(".views-field-field-ics-docid-advisory .field-content")
                .expect("docid selector"),
            title_link: Selector::parse(".views-field-title .field-content a")
                .expect("title selector"),
            next_link: Selector::parse("li.pager__item--next a").expect("pager selector"),
        }
    }
}

/// Parse one listing page into its advisory summaries and the resolved
/// "next page" URL, if any. A page without entries means the listing markup
/// changed; that is never treated as end-of-pages.
pub fn parse_listing_page(html: &str, page_url: &Url) -> Result<ListingPage, TriageError> {
    let selectors = ListingSelectors::new();
    let document = Html::parse_document(html);

    let mut summaries = Vec::new();
    for item in document.select(&selectors.items) {
        let docid = item
            .select(&selectors.docid)
            .next()
            .map(|element| element.text().collect::<String>().trim().to_string())
            .filter(|docid| !docid.is_empty())
            .ok_or_else(|| {
                TriageError::Listing(format!("Listing entry without a document id on {}", page_url))
            })?;

        let link = item.select(&selectors.title_link).next().ok_or_else(|| {
            TriageError::Listing(format!("Listing entry {} has no title link", docid))
        })?;
        let href = link.value().attr("href").ok_or_else(|| {
            TriageError::Listing(format!("Listing entry {} link has no href", docid))
        })?;
        let url = page_url
            .join(href)
            .map_err(|e| TriageError::Listing(format!("Bad advisory link {:?}: {}", href, e)))?;
        let title = link.text().collect::<String>().trim().to_string();

        summaries.push(AdvisorySummary {
            docid,
            url: url.to_string(),
            title,
        });
    }

    if summaries.is_empty() {
        return Err(TriageError::Listing(format!(
            "No advisory entries found on {}",
            page_url
        )));
    }

    let next_url = match document.select(&selectors.next_link).next() {
        Some(link) => {
            let href = link.value().attr("href").ok_or_else(|| {
                TriageError::Listing(format!("Next-page link without href on {}", page_url))
            })?;
            let resolved = page_url.join(href).map_err(|e| {
                TriageError::Listing(format!("Bad next-page link {:?}: {}", href, e))
            })?;
            Some(resolved)
        }
        None => None,
    };

    Ok(ListingPage { summaries, next_url })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing_html(items: &[(&str, &str, &str)], next_href: Option<&str>) -> String {
        let mut body = String::from(
            "<html><body><div class=\"view-ics-advisories\"><div class=\"view-content\"><ul>",
        );
        for (docid, href, title) in items {
            body.push_str(&format!(
                "<li>\
                 <div class=\"views-field-field-ics-docid-advisory\">\
                 <span class=\"field-content\"> {} </span></div>\
                 <div class=\"views-field-title\">\
                 <span class=\"field-content\"><a href=\"{}\">{}</a></span></div>\
                 </li>",
                docid, href, title
            ));
        }
        body.push_str("</ul></div></div><ul class=\"pager\">");
        if let Some(href) = next_href {
            body.push_str(&format!(
                "<li class=\"pager__item--next\"><a href=\"{}\">Next</a></li>",
                href
            ));
        }
        body.push_str("</ul></body></html>");
        body
    }

    #[test]
    fn test_parse_listing_page_extracts_summaries() {
        let base = Url::parse("https://example.com/ics/advisories").unwrap();
        let html = listing_html(
            &[
                ("ICSA-20-001-01", "/ics/advisories/icsa-20-001-01", "PLC Overflow"),
                ("ICSA-20-002-01", "/ics/advisories/icsa-20-002-01", "HMI Traversal"),
            ],
            Some("?page=1"),
        );

        let page = parse_listing_page(&html, &base).unwrap();
        assert_eq!(page.summaries.len(), 2);
        assert_eq!(page.summaries[0].docid, "ICSA-20-001-01");
        assert_eq!(
            page.summaries[0].url,
            "https://example.com/ics/advisories/icsa-20-001-01"
        );
        assert_eq!(page.summaries[0].title, "PLC Overflow");
        assert_eq!(
            page.next_url.unwrap().as_str(),
            "https://example.com/ics/advisories?page=1"
        );
    }

    #[test]
    fn test_parse_listing_page_without_next_link() {
        let base = Url::parse("https://example.com/ics/advisories?page=1").unwrap();
        let html = listing_html(&[("ICSA-20-003-01", "/ics/advisories/icsa-20-003-01", "RTU Bug")], None);

        let page = parse_listing_page(&html, &base).unwrap();
        assert_eq!(page.summaries.len(), 1);
        assert!(page.next_url.is_none());
    }

    #[test]
    fn test_parse_listing_page_empty_is_fatal() {
        let base = Url::parse("https://example.com/ics/advisories").unwrap();
        let html = "<html><body><div class=\"view-ics-advisories\">\
                    <div class=\"view-content\"><ul></ul></div></div></body></html>";

        let result = parse_listing_page(html, &base);
        assert!(matches!(result, Err(TriageError::Listing(_))));
    }

    #[test]
    fn test_parse_listing_page_entry_without_docid_is_fatal() {
        let base = Url::parse("https://example.com/ics/advisories").unwrap();
        let html = "<html><body><div class=\"view-ics-advisories\"><div class=\"view-content\"><ul>\
                    <li><div class=\"views-field-title\"><span class=\"field-content\">\
                    <a href=\"/x\">No docid</a></span></div></li>\
                    </ul></div></div></body></html>";

        let result = parse_listing_page(html, &base);
        assert!(matches!(result, Err(TriageError::Listing(_))));
    }
}
