//! Page layout for feedback documents.
//!
//! Positions are in PDF points with the origin at the bottom-left corner.

use crate::config::PageConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontWeight {
    Regular,
    Bold,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlacedLine {
    pub text: String,
    pub x: f32,
    pub y: f32,
    pub font_size: f32,
    pub weight: FontWeight,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageLayout {
    pub lines: Vec<PlacedLine>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DocumentLayout {
    pub width: f32,
    pub height: f32,
    pub pages: Vec<PageLayout>,
}

/// A titled block of lines in a combined document
pub struct Section<'a> {
    pub heading: String,
    pub lines: &'a [String],
}

struct Cursor<'a> {
    page: &'a PageConfig,
    pages: Vec<PageLayout>,
    y: f32,
}

impl<'a> Cursor<'a> {
    fn new(page: &'a PageConfig) -> Self {
        Self {
            page,
            pages: vec![PageLayout::default()],
            y: page.height - page.top_margin,
        }
    }

    fn top(&self) -> f32 {
        self.page.height - self.page.top_margin
    }

    fn new_page(&mut self) {
        self.pages.push(PageLayout::default());
        self.y = self.top();
    }

    fn place(&mut self, text: &str, font_size: f32, weight: FontWeight) {
        let line = PlacedLine {
            text: text.to_string(),
            x: self.page.left_margin,
            y: self.y,
            font_size,
            weight,
        };
        if let Some(current) = self.pages.last_mut() {
            current.lines.push(line);
        }
    }

    /// Body line: break first if the cursor has dropped under the bottom margin
    fn body_line(&mut self, text: &str, font_size: f32) {
        if self.y < self.page.bottom_margin {
            self.new_page();
        }
        self.place(text, font_size, FontWeight::Regular);
        self.y -= self.page.line_spacing;
    }

    fn finish(self) -> DocumentLayout {
        DocumentLayout {
            width: self.page.width,
            height: self.page.height,
            pages: self.pages,
        }
    }
}

/// One feedback text on as many pages as it needs
pub fn layout_single(lines: &[String], page: &PageConfig) -> DocumentLayout {
    let mut cursor = Cursor::new(page);
    for line in lines {
        cursor.body_line(line, page.font_size);
    }
    cursor.finish()
}

/// Every section starts on a fresh page with a bold heading
pub fn layout_combined(sections: &[Section<'_>], page: &PageConfig) -> DocumentLayout {
    let mut cursor = Cursor::new(page);

    for (index, section) in sections.iter().enumerate() {
        if index > 0 {
            cursor.new_page();
        }
        cursor.place(&section.heading, page.heading_font_size, FontWeight::Bold);
        cursor.y -= page.heading_gap;

        for line in section.lines {
            cursor.body_line(line, page.body_font_size);
        }
    }

    cursor.finish()
}

impl DocumentLayout {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn line_count(&self) -> usize {
        self.pages.iter().map(|p| p.lines.len()).sum()
    }
}
