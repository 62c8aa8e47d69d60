//! Markup for the results and attachment regions of the page.
//!
//! Text coming from the search API or the user reaches markup only through
//! [`Escaped`]. The card and preview views hold `Escaped` fields, so a
//! template cannot interpolate a raw string by accident.

use std::fmt;

use finder_common::model::{AttachedFile, ResultSet, SearchResult};

const FORMULA_PLACEHOLDER: &str = "Not Available";

/// Text made safe for element content and quoted attribute values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Escaped(String);

impl Escaped {
    pub fn text(raw: &str) -> Self {
        let mut out = String::with_capacity(raw.len());
        for c in raw.chars() {
            match c {
                '&' => out.push_str("&amp;"),
                '<' => out.push_str("&lt;"),
                '>' => out.push_str("&gt;"),
                '"' => out.push_str("&quot;"),
                '\'' => out.push_str("&#39;"),
                _ => out.push(c),
            }
        }
        Self(out)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Escaped {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelevanceBand {
    High,
    Medium,
    Low,
}

impl RelevanceBand {
    pub fn classify(relevance: f64) -> Self {
        if relevance >= 0.8 {
            RelevanceBand::High
        } else if relevance >= 0.6 {
            RelevanceBand::Medium
        } else {
            RelevanceBand::Low
        }
    }

    pub fn css_class(self) -> &'static str {
        match self {
            RelevanceBand::High => "relevance-high",
            RelevanceBand::Medium => "relevance-medium",
            RelevanceBand::Low => "relevance-low",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CardView {
    pub title: Escaped,
    pub location: Escaped,
    pub formula: Escaped,
    pub band: RelevanceBand,
    pub percent: i64,
    pub explanation: Escaped,
    pub business_context: Escaped,
    pub formula_type: Escaped,
    pub sheet_name: Escaped,
    pub cell_location: Escaped,
}

impl CardView {
    pub fn from_result(result: &SearchResult) -> Self {
        let formula = match result.formula.as_deref() {
            Some(f) if !f.is_empty() => Escaped::text(f),
            _ => Escaped::text(FORMULA_PLACEHOLDER),
        };
        Self {
            title: Escaped::text(&result.concept_name),
            location: Escaped::text(&result.location),
            formula,
            band: RelevanceBand::classify(result.relevance),
            percent: (result.relevance * 100.0).round() as i64,
            explanation: Escaped::text(&result.explanation),
            business_context: Escaped::text(&result.business_context),
            formula_type: Escaped::text(&result.formula_type),
            sheet_name: Escaped::text(&result.sheet_name),
            cell_location: Escaped::text(&result.cell_location),
        }
    }

    pub fn relevance_label(&self) -> String {
        format!("{}% relevant", self.percent)
    }

    /// The concept name shows up three times on a card: as the title, as the
    /// first context paragraph and as a tag.
    pub fn to_html(&self) -> String {
        format!(
            r#"
        <div class="result-card">
            <div class="result-header">
                <div>
                    <h3 class="result-title">{title}</h3>
                    <p class="result-location">{location}</p>
                </div>
                <div class="relevance-badge {band}">
                    {label}
                </div>
            </div>

            <div class="formula-container">
                <div class="formula-label">Formula</div>
                <div class="formula-text">{formula}</div>
            </div>

            <p class="result-explanation">{explanation}</p>

            <p class="business-context">{title}</p>

            <p class="result-context">{business_context}</p>

            <span class="formula-type-badge">{formula_type}</span>
            <span class="formula-concept-name-badge">{title}</span>
            <span class="sheet-name-badge">{sheet_name}</span>
            <span class="cell-location-badge">{cell_location}</span>
        </div>
    "#,
            title = self.title,
            location = self.location,
            band = self.band.css_class(),
            label = self.relevance_label(),
            formula = self.formula,
            explanation = self.explanation,
            business_context = self.business_context,
            formula_type = self.formula_type,
            sheet_name = self.sheet_name,
            cell_location = self.cell_location,
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ResultsView {
    Empty,
    Listing {
        count_label: String,
        cards: Vec<CardView>,
    },
}

impl ResultsView {
    /// Keeps the API's order. The header counts the reported `size`, not the
    /// cards.
    pub fn from_result_set(set: &ResultSet) -> Self {
        if set.is_empty() {
            return ResultsView::Empty;
        }
        let suffix = if set.size == 1 { "" } else { "s" };
        ResultsView::Listing {
            count_label: format!("Found {} result{suffix}", set.size),
            cards: set.results.iter().map(CardView::from_result).collect(),
        }
    }

    pub fn to_html(&self) -> String {
        match self {
            ResultsView::Empty => r#"
            <div class="empty-state">
                <h3>No results found</h3>
                <p>Try adjusting your search query or check your spelling.</p>
            </div>
        "#
            .to_string(),
            ResultsView::Listing { count_label, cards } => {
                let cards: String = cards.iter().map(CardView::to_html).collect();
                format!(
                    r#"
        <div class="results-header">
            <h2>Search Results</h2>
            <p class="results-count">{count_label}</p>
        </div>
        {cards}
    "#
                )
            }
        }
    }
}

pub fn render_results(set: &ResultSet) -> String {
    ResultsView::from_result_set(set).to_html()
}

/// `None` means the preview region is hidden.
pub fn render_preview(file: Option<&AttachedFile>) -> Option<String> {
    let file = file?;
    Some(format!(
        r#"
        <div class="attachment-item">
            <span class="attachment-name">{}</span>
            <button class="remove-attachment" data-action="remove-attachment">Remove</button>
        </div>
    "#,
        Escaped::text(&file.name)
    ))
}
