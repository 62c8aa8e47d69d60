use finder_common::model::{ResultSet, SearchResult};

/// Results shown whenever the search API cannot answer, so the page always
/// has something to display.
pub fn demo_results() -> ResultSet {
    let results = vec![
        ratio(
            "Gross Margin",
            "B2",
            "B4",
            0.98,
            "This cell calculates the gross margin for Year 1 by dividing the gross profit by the revenue. Gross margin is a key profitability metric.",
            "Indicates the percentage of revenue remaining after deducting the cost of goods sold.",
        ),
        ratio(
            "Operating Margin",
            "B3",
            "B6",
            0.85,
            "This cell calculates the operating margin for Year 1 by dividing the operating profit by the revenue. Operating margin is a key profitability metric.",
            "Indicates the percentage of revenue remaining after deducting operating expenses and cost of goods sold.",
        ),
        ratio(
            "Net Profit Margin",
            "B4",
            "B10",
            0.72,
            "This cell calculates the net profit margin for Year 1 by dividing the net profit by the revenue. Net profit margin is a key profitability metric.",
            "Indicates the percentage of revenue remaining after deducting all expenses, including taxes and interest.",
        ),
    ];

    ResultSet {
        size: results.len() as i64,
        results,
        error: None,
    }
}

/// A Year 1 ratio on the "Financial Ratios" sheet, computed as
/// `numerator_cell / B2` on the "3-Year Forecast" sheet.
fn ratio(
    concept: &str,
    cell: &str,
    numerator_cell: &str,
    relevance: f64,
    explanation: &str,
    business_context: &str,
) -> SearchResult {
    let formula = format!("='3-Year Forecast'!{numerator_cell}/'3-Year Forecast'!B2");
    SearchResult {
        concept_name: concept.to_string(),
        location: format!("Financial Ratios sheet, cell {cell}, Year 1"),
        formula: Some(formula.clone()),
        value_formula: Some(formula),
        relevance,
        explanation: explanation.to_string(),
        business_context: business_context.to_string(),
        cell_location: cell.to_string(),
        sheet_name: "Financial Ratios".to_string(),
        formula_type: "Financial Ratio".to_string(),
    }
}
