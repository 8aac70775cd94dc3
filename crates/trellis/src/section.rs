//! Sections: an ordered run of rows with one header and one footer.

use std::fmt;

use crate::generator::{
    CellGeneratorRef, EmptySupplementaryGenerator, SupplementaryRef, same_generator,
};
use crate::widget::ItemCounts;

/// One group of rows plus its header and footer.
///
/// Headers and footers default to [`EmptySupplementaryGenerator`], so every
/// section always has exactly one of each.
#[derive(Clone)]
pub struct Section {
    generators: Vec<CellGeneratorRef>,
    header: SupplementaryRef,
    footer: SupplementaryRef,
}

impl Default for Section {
    fn default() -> Self {
        Self::new()
    }
}

impl Section {
    /// Creates an empty section with placeholder header and footer.
    pub fn new() -> Self {
        Self {
            generators: Vec::new(),
            header: EmptySupplementaryGenerator::shared(),
            footer: EmptySupplementaryGenerator::shared(),
        }
    }

    /// Creates an empty section with `header`.
    pub fn with_header(header: SupplementaryRef) -> Self {
        Self {
            header,
            ..Self::new()
        }
    }

    /// Creates an empty section with `footer`.
    pub fn with_footer(footer: SupplementaryRef) -> Self {
        Self {
            footer,
            ..Self::new()
        }
    }

    /// The row generators, in display order.
    pub fn generators(&self) -> &[CellGeneratorRef] {
        &self.generators
    }

    /// The header generator.
    pub fn header(&self) -> &SupplementaryRef {
        &self.header
    }

    /// The footer generator.
    pub fn footer(&self) -> &SupplementaryRef {
        &self.footer
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.generators.len()
    }

    /// Returns `true` if the section has no rows.
    pub fn is_empty(&self) -> bool {
        self.generators.is_empty()
    }

    /// Returns `true` if the header is not a placeholder.
    pub fn has_header(&self) -> bool {
        !self.header.is_placeholder()
    }

    /// Returns `true` if the footer is not a placeholder.
    pub fn has_footer(&self) -> bool {
        !self.footer.is_placeholder()
    }

    /// Returns `true` if the section has no rows, header or footer.
    pub fn is_blank(&self) -> bool {
        self.is_empty() && !self.has_header() && !self.has_footer()
    }

    /// Position of `generator` in this section, by identity.
    pub fn position_of(&self, generator: &CellGeneratorRef) -> Option<usize> {
        self.generators.iter().position(|g| same_generator(g, generator))
    }

    pub(crate) fn push(&mut self, generator: CellGeneratorRef) {
        self.generators.push(generator);
    }

    pub(crate) fn extend(&mut self, generators: impl IntoIterator<Item = CellGeneratorRef>) {
        self.generators.extend(generators);
    }

    pub(crate) fn insert_all(&mut self, row: usize, generators: Vec<CellGeneratorRef>) {
        self.generators.splice(row..row, generators);
    }

    pub(crate) fn insert(&mut self, row: usize, generator: CellGeneratorRef) {
        self.generators.insert(row, generator);
    }

    pub(crate) fn remove(&mut self, row: usize) -> CellGeneratorRef {
        self.generators.remove(row)
    }

    pub(crate) fn clear(&mut self) {
        self.generators.clear();
    }

    pub(crate) fn set_header(&mut self, header: SupplementaryRef) {
        self.header = header;
    }

    pub(crate) fn set_footer(&mut self, footer: SupplementaryRef) {
        self.footer = footer;
    }
}

impl fmt::Debug for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Section")
            .field(
                "generators",
                &self
                    .generators
                    .iter()
                    .map(|g| g.reuse_identifier().short_name().to_string())
                    .collect::<Vec<_>>(),
            )
            .field("has_header", &self.has_header())
            .field("has_footer", &self.has_footer())
            .finish()
    }
}

impl ItemCounts for Vec<Section> {
    fn number_of_sections(&self) -> usize {
        self.len()
    }

    fn number_of_items(&self, section: usize) -> usize {
        self.get(section).map_or(0, Section::len)
    }
}
