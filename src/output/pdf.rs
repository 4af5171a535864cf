//! PDF rendering with printpdf's built-in Helvetica faces

use crate::config::PageConfig;
use crate::error::{Result, ResumeRankerError};
use crate::output::chart::ChartLayout;
use crate::output::layout::{layout_combined, layout_single, DocumentLayout, FontWeight, Section};
use crate::processing::feedback::FeedbackReport;
use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Line, Mm, PdfDocument, PdfDocumentReference,
    PdfLayerReference, Point, Rect, Rgb,
};

/// Chart page: 8 x 5 inches
const CHART_WIDTH: f32 = 576.0;
const CHART_HEIGHT: f32 = 360.0;
const CHART_LEFT: f32 = 150.0;
const CHART_RIGHT: f32 = 40.0;
const CHART_TOP: f32 = 45.0;
const CHART_BOTTOM: f32 = 55.0;

pub struct PdfRenderer {
    page: PageConfig,
}

struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
}

fn mm(points: f32) -> Mm {
    Mm(points * 25.4 / 72.0)
}

fn render_err(e: impl std::fmt::Display) -> ResumeRankerError {
    ResumeRankerError::Render(e.to_string())
}

/// Keep only what the built-in fonts can encode (Latin-1); emoji and other symbols are dropped
pub fn sanitize_for_pdf(text: &str) -> String {
    text.chars()
        .filter(|c| matches!(*c as u32, 0x20..=0x7E | 0xA0..=0xFF) || *c == '\t')
        .map(|c| if c == '\t' { ' ' } else { c })
        .collect::<String>()
        .trim_start()
        .to_string()
}

impl PdfRenderer {
    pub fn new(page: PageConfig) -> Self {
        Self { page }
    }

    pub fn feedback_layout(&self, report: &FeedbackReport) -> DocumentLayout {
        let lines: Vec<String> = report.lines().iter().map(|l| sanitize_for_pdf(l)).collect();
        layout_single(&lines, &self.page)
    }

    pub fn combined_layout(&self, reports: &[(String, FeedbackReport)]) -> DocumentLayout {
        let bodies: Vec<Vec<String>> = reports
            .iter()
            .map(|(_, report)| report.lines().iter().map(|l| sanitize_for_pdf(l)).collect())
            .collect();

        let sections: Vec<Section<'_>> = reports
            .iter()
            .zip(bodies.iter())
            .map(|((name, _), lines)| Section {
                heading: sanitize_for_pdf(&format!("Feedback for {}", name)),
                lines,
            })
            .collect();

        layout_combined(&sections, &self.page)
    }

    /// Individual feedback document
    pub fn render_feedback(&self, name: &str, report: &FeedbackReport) -> Result<Vec<u8>> {
        let layout = self.feedback_layout(report);
        render_layout(&format!("Feedback for {}", name), &layout)
    }

    /// All feedback in one document, one section per candidate
    pub fn render_combined(&self, reports: &[(String, FeedbackReport)]) -> Result<Vec<u8>> {
        let layout = if reports.is_empty() {
            let notice = vec!["No feedback available.".to_string()];
            layout_single(&notice, &self.page)
        } else {
            self.combined_layout(reports)
        };
        render_layout("Combined resume feedback", &layout)
    }

    pub fn render_chart(&self, chart: &ChartLayout) -> Result<Vec<u8>> {
        let (doc, page, layer) = PdfDocument::new(&chart.title, mm(CHART_WIDTH), mm(CHART_HEIGHT), "Chart");
        let fonts = add_fonts(&doc)?;
        let layer = doc.get_page(page).get_layer(layer);

        let plot_left = CHART_LEFT;
        let plot_right = CHART_WIDTH - CHART_RIGHT;
        let plot_bottom = CHART_BOTTOM;
        let plot_top = CHART_HEIGHT - CHART_TOP;
        let plot_width = plot_right - plot_left;
        let plot_height = plot_top - plot_bottom;

        layer.set_fill_color(black());
        layer.use_text(
            sanitize_for_pdf(&chart.title),
            13.0,
            mm(plot_left),
            mm(CHART_HEIGHT - 28.0),
            &fonts.bold,
        );
        layer.use_text(
            sanitize_for_pdf(&chart.x_label),
            10.0,
            mm(plot_left + plot_width / 2.0 - 40.0),
            mm(14.0),
            &fonts.regular,
        );

        // Axes
        layer.set_outline_color(black());
        layer.set_outline_thickness(0.8);
        layer.add_line(segment((plot_left, plot_bottom), (plot_right, plot_bottom)));
        layer.add_line(segment((plot_left, plot_bottom), (plot_left, plot_top)));

        for (value, label) in ChartLayout::ticks() {
            let x = plot_left + value * plot_width;
            layer.add_line(segment((x, plot_bottom), (x, plot_bottom - 4.0)));
            layer.use_text(label, 8.0, mm(x - 6.0), mm(plot_bottom - 14.0), &fonts.regular);
        }

        if let Some(notice) = &chart.notice {
            layer.use_text(
                sanitize_for_pdf(notice),
                11.0,
                mm(plot_left + plot_width / 2.0 - 60.0),
                mm(plot_bottom + plot_height / 2.0),
                &fonts.regular,
            );
        } else {
            let slot = plot_height / chart.bars.len() as f32;
            let bar_height = slot * 0.8;

            for (index, bar) in chart.bars.iter().enumerate() {
                let y0 = plot_bottom + index as f32 * slot + (slot - bar_height) / 2.0;
                let x1 = plot_left + bar.fraction * plot_width;
                let text_y = y0 + bar_height / 2.0 - 3.0;

                if bar.fraction > 0.0 {
                    layer.set_fill_color(sky_blue());
                    layer.add_rect(Rect::new(mm(plot_left), mm(y0), mm(x1), mm(y0 + bar_height)));
                }

                layer.set_fill_color(black());
                let name: String = sanitize_for_pdf(&bar.name).chars().take(26).collect();
                layer.use_text(name, 8.0, mm(8.0), mm(text_y), &fonts.regular);
                layer.use_text(
                    bar.label.clone(),
                    8.0,
                    mm(x1 + 0.01 * plot_width),
                    mm(text_y),
                    &fonts.regular,
                );
            }
        }

        doc.save_to_bytes().map_err(render_err)
    }
}

fn add_fonts(doc: &PdfDocumentReference) -> Result<Fonts> {
    Ok(Fonts {
        regular: doc.add_builtin_font(BuiltinFont::Helvetica).map_err(render_err)?,
        bold: doc.add_builtin_font(BuiltinFont::HelveticaBold).map_err(render_err)?,
    })
}

/// Materialize a page plan into PDF bytes
pub fn render_layout(title: &str, layout: &DocumentLayout) -> Result<Vec<u8>> {
    let (doc, first_page, first_layer) =
        PdfDocument::new(title, mm(layout.width), mm(layout.height), "Layer 1");
    let fonts = add_fonts(&doc)?;

    for (index, page) in layout.pages.iter().enumerate() {
        let layer: PdfLayerReference = if index == 0 {
            doc.get_page(first_page).get_layer(first_layer)
        } else {
            let (page_idx, layer_idx) = doc.add_page(mm(layout.width), mm(layout.height), "Layer 1");
            doc.get_page(page_idx).get_layer(layer_idx)
        };

        for line in &page.lines {
            if line.text.is_empty() {
                continue;
            }
            let font = match line.weight {
                FontWeight::Regular => &fonts.regular,
                FontWeight::Bold => &fonts.bold,
            };
            layer.use_text(line.text.clone(), line.font_size, mm(line.x), mm(line.y), font);
        }
    }

    doc.save_to_bytes().map_err(render_err)
}

fn segment(from: (f32, f32), to: (f32, f32)) -> Line {
    Line {
        points: vec![
            (Point::new(mm(from.0), mm(from.1)), false),
            (Point::new(mm(to.0), mm(to.1)), false),
        ],
        is_closed: false,
    }
}

fn black() -> Color {
    Color::Rgb(Rgb::new(0.0, 0.0, 0.0, None))
}

fn sky_blue() -> Color {
    Color::Rgb(Rgb::new(135.0 / 255.0, 206.0 / 255.0, 235.0 / 255.0, None))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::feedback::feedback;
    use crate::processing::ranker::RankingEntry;

    #[test]
    fn test_sanitize_drops_emoji() {
        assert_eq!(
            sanitize_for_pdf("✅ Resume matches about 40.0%"),
            "Resume matches about 40.0%"
        );
        assert_eq!(sanitize_for_pdf("Café\tnaïve"), "Café naïve");
        assert_eq!(sanitize_for_pdf("- plain"), "- plain");
    }

    #[test]
    fn test_feedback_layout_has_no_emoji() {
        let renderer = PdfRenderer::new(PageConfig::default());
        let report = feedback("python", "python sql");
        let layout = renderer.feedback_layout(&report);

        assert_eq!(layout.page_count(), 1);
        assert!(layout.pages[0].lines[0].text.starts_with("Resume matches about 50.0%"));
        assert!(layout.pages[0].lines[1].text.starts_with("Missing keywords"));
    }

    #[test]
    fn test_combined_layout_one_page_per_candidate() {
        let renderer = PdfRenderer::new(PageConfig::default());
        let reports = vec![
            ("a.pdf".to_string(), feedback("rust", "rust go")),
            ("b.pdf".to_string(), feedback("go", "rust go")),
        ];
        let layout = renderer.combined_layout(&reports);

        assert_eq!(layout.page_count(), 2);
        assert_eq!(layout.pages[0].lines[0].text, "Feedback for a.pdf");
        assert_eq!(layout.pages[1].lines[0].text, "Feedback for b.pdf");
    }

    #[test]
    fn test_render_feedback_produces_pdf() {
        let renderer = PdfRenderer::new(PageConfig::default());
        let bytes = renderer.render_feedback("a.pdf", &feedback("rust", "rust")).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_render_combined_empty_still_renders() {
        let renderer = PdfRenderer::new(PageConfig::default());
        let bytes = renderer.render_combined(&[]).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_render_chart_with_and_without_bars() {
        let renderer = PdfRenderer::new(PageConfig::default());
        let entries = vec![
            RankingEntry { name: "a.pdf".to_string(), score: 0.8 },
            RankingEntry { name: "b.pdf".to_string(), score: 0.0 },
        ];
        let bytes = renderer.render_chart(&ChartLayout::from_entries(&entries)).unwrap();
        assert!(bytes.starts_with(b"%PDF"));

        let empty = renderer.render_chart(&ChartLayout::from_entries(&[])).unwrap();
        assert!(empty.starts_with(b"%PDF"));
    }
}
