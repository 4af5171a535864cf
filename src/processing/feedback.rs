//! Keyword-gap feedback between a resume and a job description

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Upper bound on missing keywords listed in a report
pub const MAX_MISSING_KEYWORDS: usize = 20;

pub const SUGGESTIONS: [&str; 4] = [
    "Add relevant keywords from the job description.",
    "Clearly highlight matching skills, tools, and achievements.",
    "Use consistent formatting and standard section headers (e.g., Experience, Projects).",
    "Keep it concise, clean, and professional.",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackReport {
    /// Share of distinct job-description tokens found in the resume, 0..=100
    pub match_percent: f64,
    pub matched_keywords: usize,
    pub total_keywords: usize,
    /// Alphabetical, at most `MAX_MISSING_KEYWORDS`
    pub missing_keywords: Vec<String>,
    /// Number of missing keywords before truncation
    pub missing_total: usize,
}

/// Lowercased, whitespace-separated tokens. Punctuation stays attached.
pub fn keyword_set(text: &str) -> BTreeSet<String> {
    text.to_lowercase()
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

/// Compare the vocabulary of `candidate_text` against `reference_text`
pub fn feedback(candidate_text: &str, reference_text: &str) -> FeedbackReport {
    let jd_tokens = keyword_set(reference_text);
    let resume_tokens = keyword_set(candidate_text);

    let matched = jd_tokens.intersection(&resume_tokens).count();
    let total = jd_tokens.len();

    let match_percent = if total > 0 {
        100.0 * matched as f64 / total as f64
    } else {
        0.0
    };

    let missing: Vec<&String> = jd_tokens.difference(&resume_tokens).collect();
    let missing_total = missing.len();

    FeedbackReport {
        match_percent,
        matched_keywords: matched,
        total_keywords: total,
        missing_keywords: missing
            .into_iter()
            .take(MAX_MISSING_KEYWORDS)
            .cloned()
            .collect(),
        missing_total,
    }
}

impl FeedbackReport {
    /// Percentage rounded to one decimal place
    pub fn rounded_percent(&self) -> f64 {
        (self.match_percent * 10.0).round() / 10.0
    }

    pub fn all_keywords_present(&self) -> bool {
        self.missing_total == 0
    }

    pub fn lines(&self) -> Vec<String> {
        let mut lines = Vec::with_capacity(8);
        lines.push(format!(
            "✅ Resume matches about {:.1}% of the job description keywords.",
            self.rounded_percent()
        ));

        if self.all_keywords_present() {
            lines.push("🎯 All job description keywords are present in the resume!".to_string());
        } else {
            lines.push(format!(
                "🔍 Missing keywords (skills or terms): {}.",
                self.missing_keywords.join(", ")
            ));
        }

        lines.push(String::new());
        lines.push("Suggestions:".to_string());
        lines.extend(SUGGESTIONS.iter().map(|s| format!("- {}", s)));
        lines
    }

    pub fn render_text(&self) -> String {
        self.lines().join("\n")
    }
}

impl fmt::Display for FeedbackReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_overlap() {
        let report = feedback(
            "experienced python developer",
            "python developer with sql experience",
        );
        assert_eq!(report.match_percent, 40.0);
        assert_eq!(report.matched_keywords, 2);
        assert_eq!(report.total_keywords, 5);
        assert_eq!(report.missing_keywords, vec!["experience", "sql", "with"]);
    }

    #[test]
    fn test_no_overlap() {
        let report = feedback("java backend engineer", "python developer with sql experience");
        assert_eq!(report.match_percent, 0.0);
        assert_eq!(report.missing_total, 5);
    }

    #[test]
    fn test_identical_text_is_full_match() {
        let text = "Senior Rust engineer, distributed systems and SQL.";
        let report = feedback(text, text);
        assert_eq!(report.match_percent, 100.0);
        assert!(report.missing_keywords.is_empty());
        assert!(report.all_keywords_present());
    }

    #[test]
    fn test_all_reference_tokens_present() {
        let report = feedback("I write Rust and Go every day", "rust go");
        assert_eq!(report.match_percent, 100.0);
        assert!(report.missing_keywords.is_empty());
    }

    #[test]
    fn test_empty_reference_is_zero() {
        let report = feedback("anything at all", "");
        assert_eq!(report.match_percent, 0.0);
        assert_eq!(report.total_keywords, 0);
        assert!(report.missing_keywords.is_empty());

        let report = feedback("", "   \n ");
        assert_eq!(report.match_percent, 0.0);
    }

    #[test]
    fn test_empty_candidate() {
        let report = feedback("", "rust sql");
        assert_eq!(report.match_percent, 0.0);
        assert_eq!(report.missing_keywords, vec!["rust", "sql"]);
    }

    #[test]
    fn test_punctuation_is_not_stripped() {
        let report = feedback("skills", "skills,");
        assert_eq!(report.match_percent, 0.0);
        assert_eq!(report.missing_keywords, vec!["skills,"]);
    }

    #[test]
    fn test_case_insensitive() {
        let report = feedback("PYTHON", "Python");
        assert_eq!(report.match_percent, 100.0);
    }

    #[test]
    fn test_missing_keywords_capped_and_sorted() {
        let reference: Vec<String> = (0..50).map(|i| format!("kw{:02}", i)).collect();
        let report = feedback("", &reference.join(" "));

        assert_eq!(report.missing_keywords.len(), MAX_MISSING_KEYWORDS);
        assert_eq!(report.missing_total, 50);
        assert_eq!(report.missing_keywords[0], "kw00");
        assert_eq!(report.missing_keywords[19], "kw19");
    }

    #[test]
    fn test_render_with_missing_keywords() {
        let report = feedback("experienced python developer", "python developer with sql experience");
        let text = report.render_text();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "✅ Resume matches about 40.0% of the job description keywords.");
        assert_eq!(lines[1], "🔍 Missing keywords (skills or terms): experience, sql, with.");
        assert_eq!(lines[2], "");
        assert_eq!(lines[3], "Suggestions:");
        assert_eq!(lines[4], "- Add relevant keywords from the job description.");
        assert_eq!(lines[7], "- Keep it concise, clean, and professional.");
        assert_eq!(lines.len(), 8);
    }

    #[test]
    fn test_render_all_present() {
        let text = feedback("rust", "rust").to_string();
        assert!(text.contains("100.0%"));
        assert!(text.contains("🎯 All job description keywords are present in the resume!"));
    }

    #[test]
    fn test_rounding_to_one_decimal() {
        let report = feedback("a", "a b c");
        assert_eq!(report.rounded_percent(), 33.3);
        assert!(report.render_text().starts_with("✅ Resume matches about 33.3%"));
    }
}
