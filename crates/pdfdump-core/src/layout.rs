use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Placeholder appended for pages that yield no text.
pub const DEFAULT_PLACEHOLDER: &str = "[No text extracted from this page]";

/// Width of the `=` rules around a [`BannerStyle::Ruled`] banner.
pub const DEFAULT_RULE_WIDTH: usize = 80;

/// How each page section is introduced in the output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BannerStyle {
    /// A `PAGE n` line between two `=` rules. Page text follows without a
    /// trailing separator.
    #[default]
    Ruled,
    /// A single `=== PAGE n ===` line. Page text is followed by a blank line.
    Compact,
}

impl fmt::Display for BannerStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BannerStyle::Ruled => f.write_str("ruled"),
            BannerStyle::Compact => f.write_str("compact"),
        }
    }
}

impl FromStr for BannerStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ruled" => Ok(BannerStyle::Ruled),
            "compact" => Ok(BannerStyle::Compact),
            other => Err(format!(
                "unknown banner style '{other}' (expected 'ruled' or 'compact')"
            )),
        }
    }
}

/// What to write for a page that yields no text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmptyPage {
    Placeholder(String),
    /// Write nothing; the section keeps its banner and separator.
    Blank,
}

impl Default for EmptyPage {
    fn default() -> Self {
        EmptyPage::Placeholder(DEFAULT_PLACEHOLDER.to_string())
    }
}

/// Banner style plus empty-page policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    pub banner: BannerStyle,
    pub empty_page: EmptyPage,
    pub rule_width: usize,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            banner: BannerStyle::default(),
            empty_page: EmptyPage::default(),
            rule_width: DEFAULT_RULE_WIDTH,
        }
    }
}

impl Layout {
    pub fn new(banner: BannerStyle) -> Self {
        Self {
            banner,
            ..Self::default()
        }
    }

    pub fn with_empty_page(mut self, empty_page: EmptyPage) -> Self {
        self.empty_page = empty_page;
        self
    }

    /// The banner for 1-based page `number`.
    pub fn banner(&self, number: usize) -> String {
        match self.banner {
            BannerStyle::Ruled => {
                let rule = "=".repeat(self.rule_width);
                format!("\n{rule}\nPAGE {number}\n{rule}\n\n")
            }
            BannerStyle::Compact => format!("=== PAGE {number} ===\n"),
        }
    }

    /// Append the full section (banner, body, separator) for one page.
    pub fn push_section(&self, buf: &mut String, number: usize, text: Option<&str>) {
        buf.push_str(&self.banner(number));
        match (text, &self.empty_page) {
            (Some(text), _) => buf.push_str(text),
            (None, EmptyPage::Placeholder(placeholder)) => buf.push_str(placeholder),
            (None, EmptyPage::Blank) => {}
        }
        if self.banner == BannerStyle::Compact {
            buf.push_str("\n\n");
        }
    }

    /// Count the page banners in `text`.
    pub fn count_banners(&self, text: &str) -> usize {
        match self.banner {
            BannerStyle::Ruled => {
                let rule = "=".repeat(self.rule_width);
                let lines: Vec<&str> = text.lines().collect();
                lines
                    .windows(3)
                    .filter(|w| w[0] == rule && w[1].starts_with("PAGE ") && w[2] == rule)
                    .count()
            }
            BannerStyle::Compact => text
                .lines()
                .filter(|l| l.starts_with("=== PAGE ") && l.ends_with(" ==="))
                .count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ruled_banner_format() {
        let layout = Layout::default();
        let rule = "=".repeat(80);
        assert_eq!(layout.banner(3), format!("\n{rule}\nPAGE 3\n{rule}\n\n"));
    }

    #[test]
    fn compact_banner_format() {
        let layout = Layout::new(BannerStyle::Compact);
        assert_eq!(layout.banner(12), "=== PAGE 12 ===\n");
    }

    #[test]
    fn ruled_section_has_no_trailing_separator() {
        let layout = Layout::default();
        let mut buf = String::new();
        layout.push_section(&mut buf, 1, Some("Hello"));
        assert!(buf.ends_with("\n\nHello"));
    }

    #[test]
    fn compact_section_ends_with_blank_line() {
        let layout = Layout::new(BannerStyle::Compact);
        let mut buf = String::new();
        layout.push_section(&mut buf, 1, Some("Hello"));
        assert_eq!(buf, "=== PAGE 1 ===\nHello\n\n");
    }

    #[test]
    fn empty_page_placeholder() {
        let layout = Layout::default();
        let mut buf = String::new();
        layout.push_section(&mut buf, 2, None);
        assert!(buf.ends_with(DEFAULT_PLACEHOLDER));
    }

    #[test]
    fn empty_page_blank_keeps_banner_and_separator() {
        let layout = Layout::new(BannerStyle::Compact).with_empty_page(EmptyPage::Blank);
        let mut buf = String::new();
        layout.push_section(&mut buf, 1, None);
        assert_eq!(buf, "=== PAGE 1 ===\n\n\n");
    }

    #[test]
    fn count_banners_matches_sections() {
        for banner in [BannerStyle::Ruled, BannerStyle::Compact] {
            let layout = Layout::new(banner);
            let mut buf = String::new();
            for n in 1..=4 {
                layout.push_section(&mut buf, n, Some("body"));
            }
            assert_eq!(layout.count_banners(&buf), 4, "{banner}");
        }
    }

    #[test]
    fn banner_style_parses_case_insensitively() {
        assert_eq!("Compact".parse::<BannerStyle>(), Ok(BannerStyle::Compact));
        assert_eq!("ruled".parse::<BannerStyle>(), Ok(BannerStyle::Ruled));
        assert!("fancy".parse::<BannerStyle>().is_err());
    }
}
