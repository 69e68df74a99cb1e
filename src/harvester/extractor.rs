//! Field extraction from fetched catalogue pages
//!
//! Every rule is applied independently. A selector that finds nothing leaves its
//! field at the default value; extraction itself never fails.

use crate::config::SelectorConfig;
use crate::model::{Availability, Record};
use crate::HarvestError;
use scraper::{ElementRef, Html, Selector};

/// One availability classification rule: substring -> status
#[derive(Debug, Clone, Copy)]
pub struct AvailabilityRule {
    pub pattern: &'static str,
    pub availability: Availability,
}

/// Availability rules, checked top to bottom; the first match wins
pub const AVAILABILITY_RULES: &[AvailabilityRule] = &[
    AvailabilityRule {
        pattern: "Ограниченное количество",
        availability: Availability::LimitedStock,
    },
    AvailabilityRule {
        pattern: "Нет в продаже",
        availability: Availability::OutOfStock,
    },
    AvailabilityRule {
        pattern: "Ожидается",
        availability: Availability::Expected,
    },
];

/// Compiled extraction rules
///
/// Built once per run from configuration and shared read-only between fetch
/// tasks; each extraction builds its own `Record`.
#[derive(Debug, Clone)]
pub struct ExtractionRules {
    title: Selector,
    price_block: Selector,
    price_current: Selector,
    price_base: Selector,
    status_block: Selector,
    gallery: Selector,
    slide: Selector,
    collect_images: bool,
    image_base_url: String,
}

impl ExtractionRules {
    /// Compiles the configured selectors
    ///
    /// # Errors
    ///
    /// Returns `HarvestError::Selector` if any selector does not parse.
    pub fn compile(
        selectors: &SelectorConfig,
        collect_images: bool,
        image_base_url: &str,
    ) -> Result<Self, HarvestError> {
        Ok(Self {
            title: parse_selector(&selectors.title)?,
            price_block: parse_selector(&selectors.price_block)?,
            price_current: parse_selector(&selectors.price_current)?,
            price_base: parse_selector(&selectors.price_base)?,
            status_block: parse_selector(&selectors.status_block)?,
            gallery: parse_selector(&selectors.gallery)?,
            slide: parse_selector(&selectors.slide)?,
            collect_images,
            image_base_url: image_base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Extracts a record from a fetched document
    ///
    /// # Example
    ///
    /// ```
    /// use catalog_harvester::config::SelectorConfig;
    /// use catalog_harvester::harvester::ExtractionRules;
    /// use catalog_harvester::Availability;
    ///
    /// let rules = ExtractionRules::compile(
    ///     &SelectorConfig::default(),
    ///     false,
    ///     "https://static.example.com/books",
    /// )
    /// .unwrap();
    /// let html = r#"<h1 itemprop="name"> Dune </h1><div class="_block_x">В наличии</div>"#;
    /// let record = rules.extract(html, "1", "https://example.com/books/1");
    /// assert_eq!(record.title, "Dune");
    /// assert_eq!(record.availability, Availability::InStock);
    /// ```
    pub fn extract(&self, html: &str, identifier: &str, url: &str) -> Record {
        let document = Html::parse_document(html);

        let mut record = Record::empty(identifier, url);
        record.title = self.extract_title(&document);
        record.price = self.extract_price(&document);
        record.availability = classify_availability(self.status_text(&document).as_deref());

        if self.collect_images {
            let slides = self.count_slides(&document);
            record.image_links = image_links(&self.image_base_url, identifier, slides);
        }

        record
    }

    fn extract_title(&self, document: &Html) -> String {
        document
            .select(&self.title)
            .next()
            .map(|element| element_text(&element))
            .unwrap_or_default()
    }

    /// Current price (inner HTML) wins over the base price (text)
    fn extract_price(&self, document: &Html) -> String {
        let Some(block) = document.select(&self.price_block).next() else {
            return String::new();
        };

        if let Some(current) = block.select(&self.price_current).next() {
            return current.inner_html().trim().to_string();
        }

        block
            .select(&self.price_base)
            .next()
            .map(|base| element_text(&base))
            .unwrap_or_default()
    }

    fn status_text(&self, document: &Html) -> Option<String> {
        document
            .select(&self.status_block)
            .next()
            .map(|element| element_text(&element))
    }

    fn count_slides(&self, document: &Html) -> usize {
        document
            .select(&self.gallery)
            .next()
            .map(|gallery| gallery.select(&self.slide).count())
            .unwrap_or(0)
    }
}

/// Classifies status-block text
///
/// A missing block means the item is not sold; a present block with no
/// matching phrase means it is in stock. Matching is case-sensitive.
pub fn classify_availability(status_text: Option<&str>) -> Availability {
    let Some(text) = status_text else {
        return Availability::OutOfStock;
    };

    AVAILABILITY_RULES
        .iter()
        .find(|rule| text.contains(rule.pattern))
        .map(|rule| rule.availability)
        .unwrap_or(Availability::InStock)
}

/// Synthesizes image links for a gallery with `slides` slides
///
/// Produces nothing for an empty gallery; otherwise a cover link followed by
/// one `ph_NN.jpg` link per slide.
pub fn image_links(image_base_url: &str, identifier: &str, slides: usize) -> Vec<String> {
    if slides == 0 {
        return Vec::new();
    }

    let base = image_base_url.trim_end_matches('/');
    let mut links = Vec::with_capacity(slides + 1);
    links.push(format!("{}/{}/cover.jpg", base, identifier));
    links.extend((1..=slides).map(|n| format!("{}/{}/ph_{:02}.jpg", base, identifier, n)));
    links
}

fn parse_selector(selector: &str) -> Result<Selector, HarvestError> {
    Selector::parse(selector).map_err(|e| HarvestError::Selector(format!("'{}': {}", selector, e)))
}

fn element_text(element: &ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}
