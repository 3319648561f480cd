//! Keyword-based answers to spoken weather questions
//!
//! A question is matched case-insensitively against a small ordered table of
//! keyword rules (see `response_rules`). Keywords match as plain substrings, so
//! "coldest" still counts as "cold". The first rule in table order with any
//! matching keyword answers; with no match the reply is a general summary.

mod response_rules;

use std::sync::LazyLock;

use aho_corasick::AhoCorasick;
use domain::WeatherReading;

use self::response_rules::{RESPONSE_RULES, summary_response};

/// Reply given when no reading is available
pub const NO_DATA_RESPONSE: &str = "Sorry, I couldn't get the current weather data.";

/// What a question was understood to be about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseTopic {
    Temperature,
    Humidity,
    Wind,
    Precipitation,
    /// Clothing advice based on the temperature band
    Clothing,
    /// No keyword matched
    Summary,
}

/// Rule index for each keyword, in automaton pattern order
static KEYWORD_RULES: LazyLock<Vec<usize>> = LazyLock::new(|| {
    RESPONSE_RULES
        .iter()
        .enumerate()
        .flat_map(|(index, rule)| rule.keywords.iter().map(move |_| index))
        .collect()
});

static KEYWORD_MATCHER: LazyLock<AhoCorasick> = LazyLock::new(|| {
    let keywords: Vec<&str> = RESPONSE_RULES
        .iter()
        .flat_map(|rule| rule.keywords.iter().copied())
        .collect();
    #[allow(clippy::expect_used)] // Infallible with valid static patterns
    AhoCorasick::builder()
        .ascii_case_insensitive(true)
        .build(&keywords)
        .expect("Failed to build keyword matcher")
});

/// Turns a transcribed question into a spoken answer
#[derive(Debug, Clone, Copy, Default)]
pub struct QueryResponder;

impl QueryResponder {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Decide which topic a question is about
    #[must_use]
    pub fn classify(&self, query: &str) -> ResponseTopic {
        self.matching_rule(query)
            .map_or(ResponseTopic::Summary, |index| RESPONSE_RULES[index].topic)
    }

    /// Answer a question from the given reading
    ///
    /// Without a reading the answer is always [`NO_DATA_RESPONSE`].
    #[must_use]
    pub fn respond(&self, query: &str, reading: Option<&WeatherReading>) -> String {
        let Some(reading) = reading else {
            return NO_DATA_RESPONSE.to_string();
        };

        match self.matching_rule(query) {
            Some(index) => (RESPONSE_RULES[index].builder)(reading),
            None => summary_response(reading),
        }
    }

    /// Earliest rule with a keyword occurring anywhere in `query`
    fn matching_rule(&self, query: &str) -> Option<usize> {
        KEYWORD_MATCHER
            .find_overlapping_iter(query)
            .map(|m| KEYWORD_RULES[m.pattern().as_usize()])
            .min()
    }
}
