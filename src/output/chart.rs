//! Horizontal bar chart of ranking scores

use crate::processing::ranker::RankingEntry;
use colored::Colorize;

pub const CHART_TITLE: &str = "Resume vs Job Description Matching";
pub const X_LABEL: &str = "Similarity Score";
pub const EMPTY_NOTICE: &str = "No resumes to display";

#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    pub name: String,
    pub score: f32,
    /// Bar length as a share of the [0, 1] axis
    pub fraction: f32,
    pub label: String,
}

/// Bars bottom to top: ascending score, so the best candidate is drawn last, at the top
#[derive(Debug, Clone, PartialEq)]
pub struct ChartLayout {
    pub title: String,
    pub x_label: String,
    pub bars: Vec<Bar>,
    pub notice: Option<String>,
}

impl ChartLayout {
    pub fn from_entries(entries: &[RankingEntry]) -> Self {
        let mut bars: Vec<Bar> = entries
            .iter()
            .map(|entry| Bar {
                name: entry.name.clone(),
                score: entry.score,
                fraction: entry.score.clamp(0.0, 1.0),
                label: format!("{:.2}", entry.score),
            })
            .collect();
        // Entries arrive descending; reversing keeps ties in their ranked order top-down
        bars.reverse();
        bars.sort_by(|a, b| a.score.total_cmp(&b.score));

        let notice = bars.is_empty().then(|| EMPTY_NOTICE.to_string());

        Self {
            title: CHART_TITLE.to_string(),
            x_label: X_LABEL.to_string(),
            bars,
            notice,
        }
    }

    /// Axis ticks at 0.0, 0.2, ..., 1.0
    pub fn ticks() -> Vec<(f32, String)> {
        (0..=5)
            .map(|i| {
                let value = i as f32 * 0.2;
                (value, format!("{:.1}", value))
            })
            .collect()
    }

    /// Text rendering for the terminal, best candidate on the first row
    pub fn render_console(&self, bar_width: usize, use_colors: bool) -> String {
        let mut out = String::new();
        out.push_str(&self.title);
        out.push('\n');

        if let Some(notice) = &self.notice {
            out.push_str(&format!("  ({})\n", notice));
            return out;
        }

        let name_width = self
            .bars
            .iter()
            .map(|b| b.name.chars().count())
            .max()
            .unwrap_or(0)
            .min(32);

        for bar in self.bars.iter().rev() {
            let filled = (bar.fraction * bar_width as f32).round() as usize;
            let blocks = "█".repeat(filled);
            let blocks = if use_colors {
                blocks.bright_cyan().to_string()
            } else {
                blocks
            };
            let name: String = bar.name.chars().take(name_width).collect();
            out.push_str(&format!(
                "  {:<width$} │{}{} {}\n",
                name,
                blocks,
                " ".repeat(bar_width - filled),
                bar.label,
                width = name_width
            ));
        }

        out.push_str(&format!(
            "  {:<width$} └{}\n",
            "",
            "─".repeat(bar_width),
            width = name_width
        ));
        out.push_str(&format!(
            "  {:<width$}  0{:>bar$}\n",
            "",
            "1",
            width = name_width,
            bar = bar_width - 1
        ));
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, score: f32) -> RankingEntry {
        RankingEntry { name: name.to_string(), score }
    }

    #[test]
    fn test_bars_ascending_best_on_top() {
        let entries = vec![entry("a", 0.91), entry("b", 0.55), entry("c", 0.12)];
        let chart = ChartLayout::from_entries(&entries);

        let names: Vec<&str> = chart.bars.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(names, vec!["c", "b", "a"]);
        assert_eq!(chart.bars[2].label, "0.91");
        assert!(chart.notice.is_none());
    }

    #[test]
    fn test_ties_keep_rank_order_from_top() {
        let entries = vec![entry("first", 0.5), entry("second", 0.5)];
        let chart = ChartLayout::from_entries(&entries);
        // Top of the chart is the last bar
        assert_eq!(chart.bars[1].name, "first");
        assert_eq!(chart.bars[0].name, "second");
    }

    #[test]
    fn test_fraction_clamped_to_axis() {
        let entries = vec![entry("neg", -0.2), entry("full", 1.0)];
        let chart = ChartLayout::from_entries(&entries);
        assert_eq!(chart.bars[0].fraction, 0.0);
        assert_eq!(chart.bars[0].label, "-0.20");
        assert_eq!(chart.bars[1].fraction, 1.0);
    }

    #[test]
    fn test_empty_chart_has_notice() {
        let chart = ChartLayout::from_entries(&[]);
        assert!(chart.bars.is_empty());
        assert_eq!(chart.notice.as_deref(), Some(EMPTY_NOTICE));
        assert!(chart.render_console(20, false).contains(EMPTY_NOTICE));
    }

    #[test]
    fn test_ticks() {
        let ticks = ChartLayout::ticks();
        assert_eq!(ticks.len(), 6);
        assert_eq!(ticks[0].1, "0.0");
        assert_eq!(ticks[5].1, "1.0");
    }

    #[test]
    fn test_console_rows_best_first() {
        let entries = vec![entry("alice.pdf", 0.8), entry("bob.pdf", 0.4)];
        let text = ChartLayout::from_entries(&entries).render_console(10, false);
        let rows: Vec<&str> = text.lines().collect();

        assert_eq!(rows[0], CHART_TITLE);
        assert!(rows[1].starts_with("  alice.pdf │████████"));
        assert!(rows[1].ends_with(" 0.80"));
        assert!(rows[2].starts_with("  bob.pdf   │████ "));
    }
}
