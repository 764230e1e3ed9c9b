//! Results page: a pure function of the price and feedback stores.

use askama::Template;

use crate::models::{PhotoFeedback, PriceResult};
use crate::state::AppStores;

#[derive(Debug, Clone, PartialEq, Eq, Template)]
#[template(path = "results.html")]
pub struct ResultsPage {
    pub unresolved_address: bool,
    pub has_price: bool,
    pub price_text: String,
    pub has_feedback: bool,
    pub score: u8,
    pub max_score: u8,
    pub reason: String,
    pub pros: Vec<String>,
    pub to_fix: Vec<String>,
    pub description: String,
}

impl ResultsPage {
    pub fn new(price: PriceResult, feedback: &PhotoFeedback) -> Self {
        let unresolved_address = price.is_unresolved_address();
        let has_price = !unresolved_address && !price.is_empty();
        let has_feedback = !unresolved_address && !feedback.is_empty();

        Self {
            unresolved_address,
            has_price,
            price_text: if has_price {
                format_pln(price.0)
            } else {
                String::new()
            },
            has_feedback,
            score: feedback.score,
            max_score: PhotoFeedback::MAX_SCORE,
            reason: feedback.reason.clone(),
            pros: feedback.pros.clone(),
            to_fix: feedback.to_fix.clone(),
            description: feedback.description.clone(),
        }
    }

    pub fn from_stores(stores: &AppStores) -> Self {
        Self::new(stores.price.get(), &stores.feedback.get())
    }
}

/// `1234567` -> `1 234 567 PLN`
pub fn format_pln(amount: i64) -> String {
    let digits = amount.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 5);

    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(' ');
        }
        grouped.push(ch);
    }

    let sign = if amount < 0 { "-" } else { "" };
    format!("{sign}{grouped} PLN")
}
