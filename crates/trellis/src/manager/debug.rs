//! Human-readable dumps of the section state.
//!
//! ```
//! use trellis::StateManager;
//! use trellis::testing::RecordingWidget;
//!
//! let manager = StateManager::new(RecordingWidget::new());
//! let dump = manager.debug_tree().to_string();
//! assert!(dump.starts_with("Sections (0 sections, 0 rows)"));
//! ```

use std::fmt;

use crate::generator::SupplementaryRef;
use crate::section::Section;

/// Style options for section tree output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TreeStyle {
    /// ASCII characters for tree branches.
    Ascii,
    /// Unicode box-drawing characters.
    #[default]
    Unicode,
    /// Indentation only.
    Compact,
}

impl TreeStyle {
    /// `(branch, last branch, continuation, blank)` connectors.
    fn connectors(self) -> (&'static str, &'static str, &'static str, &'static str) {
        match self {
            Self::Ascii => ("+-- ", "`-- ", "|   ", "    "),
            Self::Unicode => ("\u{251c}\u{2500}\u{2500} ", "\u{2514}\u{2500}\u{2500} ", "\u{2502}   ", "    "),
            Self::Compact => ("- ", "- ", "  ", "  "),
        }
    }
}

/// Configuration for section tree output.
#[derive(Debug, Clone)]
pub struct TreeFormatOptions {
    /// The style of tree visualization.
    pub style: TreeStyle,
    /// Whether rows are prefixed with their index path.
    pub show_paths: bool,
    /// Whether header and footer lines are printed.
    pub show_supplementary: bool,
    /// Maximum rows printed per section (None for unlimited).
    pub max_rows: Option<usize>,
}

impl Default for TreeFormatOptions {
    fn default() -> Self {
        Self {
            style: TreeStyle::default(),
            show_paths: true,
            show_supplementary: true,
            max_rows: None,
        }
    }
}

impl TreeFormatOptions {
    /// Rows only, without paths.
    pub fn minimal() -> Self {
        Self {
            show_paths: false,
            show_supplementary: false,
            ..Default::default()
        }
    }

    /// Set the tree style.
    pub fn with_style(mut self, style: TreeStyle) -> Self {
        self.style = style;
        self
    }

    /// Set the per-section row limit.
    pub fn with_max_rows(mut self, max_rows: usize) -> Self {
        self.max_rows = Some(max_rows);
        self
    }
}

/// Displays sections, their headers and footers, and their rows as a tree.
///
/// Obtained from [`StateManager::debug_tree`](super::StateManager::debug_tree).
#[derive(Debug, Clone)]
pub struct SectionTreeDebug<'a> {
    sections: &'a [Section],
    options: TreeFormatOptions,
}

impl<'a> SectionTreeDebug<'a> {
    /// Creates a dump of `sections` with default options.
    pub fn new(sections: &'a [Section]) -> Self {
        Self {
            sections,
            options: TreeFormatOptions::default(),
        }
    }

    /// Replaces the format options.
    pub fn with_options(mut self, options: TreeFormatOptions) -> Self {
        self.options = options;
        self
    }

    fn fmt_section(&self, f: &mut fmt::Formatter<'_>, index: usize, section: &Section, is_last: bool) -> fmt::Result {
        let (branch, last, continuation, blank) = self.options.style.connectors();
        writeln!(f, "{}section {index}", if is_last { last } else { branch })?;
        let indent = if is_last { blank } else { continuation };

        let mut lines: Vec<String> = Vec::new();
        if self.options.show_supplementary {
            lines.push(format!("header: {}", supplementary_name(section.header())));
        }

        let limit = self.options.max_rows.unwrap_or(usize::MAX);
        for (row, generator) in section.generators().iter().take(limit).enumerate() {
            let name = generator.reuse_identifier();
            if self.options.show_paths {
                lines.push(format!("[{index}, {row}] {}", name.short_name()));
            } else {
                lines.push(name.short_name().to_string());
            }
        }
        if section.len() > limit {
            lines.push(format!("... {} more", section.len() - limit));
        }

        if self.options.show_supplementary {
            lines.push(format!("footer: {}", supplementary_name(section.footer())));
        }

        let count = lines.len();
        for (i, line) in lines.iter().enumerate() {
            let connector = if i + 1 == count { last } else { branch };
            writeln!(f, "{indent}{connector}{line}")?;
        }
        Ok(())
    }
}

fn supplementary_name(generator: &SupplementaryRef) -> String {
    match generator.reuse_identifier() {
        Some(id) if !generator.is_placeholder() => id.short_name().to_string(),
        _ => "(none)".to_string(),
    }
}

impl fmt::Display for SectionTreeDebug<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rows: usize = self.sections.iter().map(Section::len).sum();
        writeln!(f, "Sections ({} sections, {rows} rows):", self.sections.len())?;
        if self.sections.is_empty() {
            return writeln!(f, "  (empty)");
        }

        let count = self.sections.len();
        for (index, section) in self.sections.iter().enumerate() {
            self.fmt_section(f, index, section, index + 1 == count)?;
        }
        Ok(())
    }
}

impl<W: crate::widget::ListWidget> super::StateManager<W> {
    /// A printable tree of the current sections.
    pub fn debug_tree(&self) -> SectionTreeDebug<'_> {
        SectionTreeDebug::new(self.sections())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::{BaseCellGenerator, BaseSupplementaryGenerator, ConfigurableView};
    use std::rc::Rc;

    #[derive(Default)]
    struct Row;

    impl ConfigurableView for Row {
        type Model = u32;
        fn configure(&mut self, _model: &u32) {}
    }

    #[derive(Default)]
    struct Banner;

    impl ConfigurableView for Banner {
        type Model = ();
        fn configure(&mut self, _model: &()) {}
    }

    fn sample() -> Vec<Section> {
        let mut first = Section::with_header(Rc::new(BaseSupplementaryGenerator::<Banner>::new(())));
        first.push(Rc::new(BaseCellGenerator::<Row>::new(1)));
        first.push(Rc::new(BaseCellGenerator::<Row>::new(2)));
        let mut second = Section::new();
        second.push(Rc::new(BaseCellGenerator::<Row>::new(3)));
        vec![first, second]
    }

    #[test]
    fn test_unicode_tree() {
        let sections = sample();
        let output = SectionTreeDebug::new(&sections).to_string();
        let expected = "\
Sections (2 sections, 3 rows):
├── section 0
│   ├── header: Banner
│   ├── [0, 0] Row
│   ├── [0, 1] Row
│   └── footer: (none)
└── section 1
    ├── header: (none)
    ├── [1, 0] Row
    └── footer: (none)
";
        assert_eq!(output, expected);
    }

    #[test]
    fn test_minimal_ascii_with_limit() {
        let sections = sample();
        let options = TreeFormatOptions::minimal()
            .with_style(TreeStyle::Ascii)
            .with_max_rows(1);
        let output = SectionTreeDebug::new(&sections).with_options(options).to_string();
        let expected = "\
Sections (2 sections, 3 rows):
+-- section 0
|   +-- Row
|   `-- ... 1 more
`-- section 1
    `-- Row
";
        assert_eq!(output, expected);
    }

    #[test]
    fn test_empty() {
        let output = SectionTreeDebug::new(&[]).to_string();
        assert_eq!(output, "Sections (0 sections, 0 rows):\n  (empty)\n");
    }
}
