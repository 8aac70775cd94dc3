//! The state manager: ordered sections of generators, kept in sync with a
//! host widget.
//!
//! [`StateManager`] owns the section state and the widget. Every mutation
//! goes through it, and every mutation that changes what the widget shows is
//! mirrored as the smallest positional update that describes it. A full
//! reload only happens through [`StateManager::force_refill`] (or as a
//! fallback when the widget is found out of sync).
//!
//! # Example
//!
//! ```
//! use std::rc::Rc;
//! use trellis::generator::{BaseCellGenerator, CellGeneratorRef, ConfigurableView};
//! use trellis::testing::RecordingWidget;
//! use trellis::StateManager;
//!
//! #[derive(Default)]
//! struct TitleCell;
//!
//! impl ConfigurableView for TitleCell {
//!     type Model = &'static str;
//!     fn configure(&mut self, _model: &&'static str) {}
//! }
//!
//! let mut manager = StateManager::new(RecordingWidget::new());
//! let inbox: CellGeneratorRef = Rc::new(BaseCellGenerator::<TitleCell>::new("Inbox"));
//! let sent: CellGeneratorRef = Rc::new(BaseCellGenerator::<TitleCell>::new("Sent"));
//!
//! manager.add_cell_generator(inbox.clone());
//! manager.add_cell_generator(sent.clone());
//! manager.force_refill();
//!
//! manager.remove(&inbox, None, false).unwrap();
//! assert_eq!(manager.number_of_items(0), 1);
//! assert_eq!(manager.view().item_counts(), &[1]);
//! ```

mod animator;
mod config;
mod debug;

pub use animator::{Animations, Animator, BatchAnimator, ImmediateAnimator};
pub use config::ManagerConfig;
pub use debug::{SectionTreeDebug, TreeFormatOptions, TreeStyle};

use trellis_core::logging::targets;
use trellis_core::{IndexPath, ManagerError, Result, ThreadAffinity};

use crate::generator::{
    CellGeneratorRef, EmptySupplementaryGenerator, SupplementaryRef, same_generator,
};
use crate::section::Section;
use crate::widget::{Completion, ElementKind, ListWidget, ScrollPosition};

/// How the widget follows a state mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WidgetSync {
    /// The widget has not loaded yet; the next reload picks up the state.
    Deferred,
    /// Counts match; issue positional updates.
    Positional,
    /// Counts diverged; issue a full reload instead.
    Reload,
}

/// Owns the section state and the host widget it drives.
///
/// # Identity
///
/// Generators are located by identity ([`same_generator`]), never by model.
/// Lookups are linear scans over sections and rows, which is fine for
/// screen-sized lists.
///
/// # Threading
///
/// The manager is `!Send` (generators are `Rc`), and every mutating call also
/// checks the [`ThreadAffinity`] recorded at construction according to
/// [`ManagerConfig::thread_checks`].
pub struct StateManager<W: ListWidget> {
    view: W,
    sections: Vec<Section>,
    animator: Box<dyn Animator>,
    config: ManagerConfig,
    affinity: ThreadAffinity,
}

impl<W: ListWidget> StateManager<W> {
    /// Creates a manager with the default configuration.
    pub fn new(view: W) -> Self {
        Self::with_config(view, ManagerConfig::default())
    }

    /// Creates a manager with `config`.
    pub fn with_config(view: W, config: ManagerConfig) -> Self {
        let animator: Box<dyn Animator> = if config.animate_updates {
            Box::new(BatchAnimator)
        } else {
            Box::new(ImmediateAnimator)
        };
        Self {
            view,
            sections: Vec::new(),
            animator,
            config,
            affinity: ThreadAffinity::current(),
        }
    }

    /// Replaces the animator used for removals and moves.
    pub fn set_animator(&mut self, animator: Box<dyn Animator>) {
        self.animator = animator;
    }

    /// The active configuration.
    pub fn config(&self) -> &ManagerConfig {
        &self.config
    }

    /// The host widget.
    pub fn view(&self) -> &W {
        &self.view
    }

    /// The host widget, mutably.
    ///
    /// Positional changes made directly on the widget bypass the state; call
    /// [`force_refill`](Self::force_refill) afterwards.
    pub fn view_mut(&mut self) -> &mut W {
        &mut self.view
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    /// All sections, in display order.
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// The section at `index`.
    pub fn section(&self, index: usize) -> Option<&Section> {
        self.sections.get(index)
    }

    /// Number of sections.
    pub fn number_of_sections(&self) -> usize {
        self.sections.len()
    }

    /// Number of rows in `section`, or 0 if it does not exist.
    pub fn number_of_items(&self, section: usize) -> usize {
        self.sections.get(section).map_or(0, Section::len)
    }

    /// Total number of rows across all sections.
    pub fn item_count(&self) -> usize {
        self.sections.iter().map(Section::len).sum()
    }

    /// Returns `true` if there are no sections.
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// The generator at `path`, or `None` if the path is out of bounds.
    pub fn generator_at(&self, path: IndexPath) -> Option<&CellGeneratorRef> {
        self.sections
            .get(path.section())
            .and_then(|section| section.generators().get(path.row()))
    }

    /// The header of `section`.
    pub fn header_at(&self, section: usize) -> Option<&SupplementaryRef> {
        self.sections.get(section).map(Section::header)
    }

    /// The footer of `section`.
    pub fn footer_at(&self, section: usize) -> Option<&SupplementaryRef> {
        self.sections.get(section).map(Section::footer)
    }

    /// Current position of `generator`, by identity.
    pub fn index_path_of(&self, generator: &CellGeneratorRef) -> Option<IndexPath> {
        self.sections
            .iter()
            .enumerate()
            .find_map(|(index, section)| {
                section
                    .position_of(generator)
                    .map(|row| IndexPath::new(index, row))
            })
    }

    /// Returns `true` if `generator` is currently tracked.
    pub fn contains(&self, generator: &CellGeneratorRef) -> bool {
        self.index_path_of(generator).is_some()
    }

    /// Section whose header is `header`, by identity.
    pub fn section_of_header(&self, header: &SupplementaryRef) -> Option<usize> {
        self.sections
            .iter()
            .position(|section| same_generator(section.header(), header))
    }

    /// Section whose footer is `footer`, by identity.
    pub fn section_of_footer(&self, footer: &SupplementaryRef) -> Option<usize> {
        self.sections
            .iter()
            .position(|section| same_generator(section.footer(), footer))
    }

    // -------------------------------------------------------------------------
    // Row mutations
    // -------------------------------------------------------------------------

    /// Appends `generator` to the last section.
    ///
    /// Creates a section with placeholder header and footer if there is none.
    #[tracing::instrument(skip_all, target = "trellis::manager", level = "debug")]
    pub fn add_cell_generator(&mut self, generator: CellGeneratorRef) {
        self.check_thread("add_cell_generator");
        generator.register(&mut self.view);

        let synthesized = self.sections.is_empty();
        let sync = if synthesized {
            self.plan_sync(&[], "add_cell_generator")
        } else {
            self.plan_sync(&[self.sections.len() - 1], "add_cell_generator")
        };

        if synthesized {
            self.sections.push(Section::new());
        }
        let section = self.sections.len() - 1;
        let path = IndexPath::new(section, self.sections[section].len());
        self.sections[section].push(generator);
        tracing::debug!(target: targets::MANAGER, %path, synthesized, "added cell generator");

        self.apply(sync, |view, sections| {
            if synthesized {
                view.insert_sections(&[section], sections);
            } else {
                view.insert_items(&[path]);
            }
        });
    }

    /// Appends each of `generators` to the last section, in order.
    pub fn add_cell_generators(&mut self, generators: impl IntoIterator<Item = CellGeneratorRef>) {
        for generator in generators {
            self.add_cell_generator(generator);
        }
    }

    /// Inserts `generator` right after `after`.
    ///
    /// # Panics
    ///
    /// Panics if `after` is not in the manager. See
    /// [`add_cell_generators_after`](Self::add_cell_generators_after).
    pub fn add_cell_generator_after(&mut self, generator: CellGeneratorRef, after: &CellGeneratorRef) {
        self.add_cell_generators_after(vec![generator], after);
    }

    /// Inserts `generators` contiguously after `after`.
    ///
    /// The widget receives one batched insert for all new rows.
    ///
    /// # Panics
    ///
    /// Panics if `after` is not in the manager. Inserting relative to a
    /// generator that was never added (or was already removed) is a bug in
    /// the caller; state is left unchanged. Use
    /// [`try_add_cell_generators_after`](Self::try_add_cell_generators_after)
    /// to handle the case instead.
    pub fn add_cell_generators_after(&mut self, generators: Vec<CellGeneratorRef>, after: &CellGeneratorRef) {
        if let Err(err) = self.try_add_cell_generators_after(generators, after) {
            panic!("error adding cell generators: {err}; you tried to add generators after a generator that is not in the manager");
        }
    }

    /// Non-panicking form of [`add_cell_generators_after`](Self::add_cell_generators_after).
    ///
    /// Returns the paths of the inserted rows, or
    /// [`ManagerError::GeneratorNotFound`] without touching state.
    #[tracing::instrument(skip_all, target = "trellis::manager", level = "debug")]
    pub fn try_add_cell_generators_after(
        &mut self,
        generators: Vec<CellGeneratorRef>,
        after: &CellGeneratorRef,
    ) -> Result<Vec<IndexPath>> {
        self.check_thread("add_cell_generators_after");
        let anchor = self
            .index_path_of(after)
            .ok_or(ManagerError::GeneratorNotFound)?;
        if generators.is_empty() {
            return Ok(Vec::new());
        }

        for generator in &generators {
            generator.register(&mut self.view);
        }

        let sync = self.plan_sync(&[anchor.section()], "add_cell_generators_after");
        let start = anchor.offset_rows(1);
        let paths = IndexPath::run(start, generators.len());
        self.sections[anchor.section()].insert_all(start.row(), generators);
        tracing::debug!(target: targets::MANAGER, %anchor, count = paths.len(), "inserted cell generators");

        self.apply(sync, |view, _| view.insert_items(&paths));
        Ok(paths)
    }

    /// Reloads the rows of `generators`.
    ///
    /// Generators that are not tracked are skipped. Returns the reloaded paths;
    /// the widget receives one batched reload, or nothing if none were found.
    #[tracing::instrument(skip_all, target = "trellis::manager", level = "debug")]
    pub fn update(&mut self, generators: &[CellGeneratorRef]) -> Vec<IndexPath> {
        self.check_thread("update");
        let paths: Vec<IndexPath> = generators
            .iter()
            .filter_map(|generator| self.index_path_of(generator))
            .collect();

        let skipped = generators.len() - paths.len();
        if skipped > 0 {
            tracing::debug!(target: targets::MANAGER, skipped, "skipping untracked generators in update");
        }
        if paths.is_empty() {
            return paths;
        }

        let mut touched: Vec<usize> = paths.iter().map(IndexPath::section).collect();
        touched.sort_unstable();
        touched.dedup();
        let sync = self.plan_sync(&touched, "update");
        self.apply(sync, |view, _| view.reload_items(&paths));
        paths
    }

    /// Removes `generator` in one animated transaction.
    ///
    /// The row is removed from state and from the widget; if
    /// `remove_empty_section` is set and the section is now empty, the section
    /// is removed from both as well. With `scroll_to`, the widget then scrolls
    /// to the row that took the removed row's place (or the new last row).
    ///
    /// Returns `Ok(None)` if `generator` is not tracked. If the widget is
    /// displaying and its counts for the section do not match state, nothing
    /// is changed and an out-of-sync error is returned.
    #[tracing::instrument(skip_all, target = "trellis::manager", level = "debug")]
    pub fn remove(
        &mut self,
        generator: &CellGeneratorRef,
        scroll_to: Option<ScrollPosition>,
        remove_empty_section: bool,
    ) -> Result<Option<IndexPath>> {
        self.check_thread("remove");
        let Some(path) = self.index_path_of(generator) else {
            tracing::debug!(target: targets::MANAGER, "skipping removal of untracked generator");
            return Ok(None);
        };

        let displaying = self.view.is_displaying();
        if displaying {
            self.verify_widget(&[path.section()])?;
        }

        let scroll_animated = self.config.scroll_animated;
        let sections = &mut self.sections;
        let mut section_removed = false;
        self.animator.perform(
            &mut self.view,
            Box::new(|view: &mut dyn ListWidget| {
                sections[path.section()].remove(path.row());
                if displaying {
                    view.delete_items(&[path]);
                }

                if remove_empty_section && sections[path.section()].is_empty() {
                    sections.remove(path.section());
                    section_removed = true;
                    if displaying {
                        view.delete_sections(&[path.section()]);
                    }
                }

                if let Some(position) = scroll_to
                    && displaying
                    && !section_removed
                {
                    let remaining = sections[path.section()].len();
                    if remaining > 0 {
                        let target = path.with_row(path.row().min(remaining - 1));
                        view.scroll_to_item(target, position, scroll_animated);
                    }
                }
            }),
        );

        tracing::debug!(target: targets::MANAGER, %path, section_removed, "removed cell generator");
        Ok(Some(path))
    }

    /// Moves the row at `from` to `to`.
    ///
    /// `to` is the row's final position: within one section it must be below
    /// the section's current length, across sections it may equal the
    /// destination's length (append).
    #[tracing::instrument(skip_all, target = "trellis::manager", level = "debug")]
    pub fn move_generator(&mut self, from: IndexPath, to: IndexPath) -> Result<()> {
        self.check_thread("move_generator");
        if self.generator_at(from).is_none() {
            return Err(ManagerError::IndexOutOfBounds { path: from });
        }
        let destination_len = self
            .sections
            .get(to.section())
            .map(Section::len)
            .ok_or(ManagerError::SectionOutOfBounds {
                section: to.section(),
                count: self.sections.len(),
            })?;
        let max_row = if from.section() == to.section() {
            destination_len - 1
        } else {
            destination_len
        };
        if to.row() > max_row {
            return Err(ManagerError::IndexOutOfBounds { path: to });
        }
        if from == to {
            return Ok(());
        }

        let displaying = self.view.is_displaying();
        if displaying {
            self.verify_widget(&[from.section(), to.section()])?;
        }

        let sections = &mut self.sections;
        self.animator.perform(
            &mut self.view,
            Box::new(|view: &mut dyn ListWidget| {
                let generator = sections[from.section()].remove(from.row());
                sections[to.section()].insert(to.row(), generator);
                if displaying {
                    view.move_item(from, to);
                }
            }),
        );

        tracing::debug!(target: targets::MANAGER, %from, %to, "moved cell generator");
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Header and footer mutations
    // -------------------------------------------------------------------------

    /// Starts a new section headed by `header`.
    ///
    /// The section has no rows yet; following [`add_cell_generator`](Self::add_cell_generator)
    /// calls fill it.
    #[tracing::instrument(skip_all, target = "trellis::manager", level = "debug")]
    pub fn add_section_header_generator(&mut self, header: SupplementaryRef) {
        self.check_thread("add_section_header_generator");
        header.register(&mut self.view, ElementKind::Header);

        let sync = self.plan_sync(&[], "add_section_header_generator");
        let section = self.sections.len();
        self.sections.push(Section::with_header(header));
        tracing::debug!(target: targets::MANAGER, section, "added section header");

        self.apply(sync, |view, sections| view.insert_sections(&[section], sections));
    }

    /// Attaches `footer` to the next section without an explicit footer.
    ///
    /// Footers are handed out in order: the first section after the last one
    /// that already has a footer receives it. If there is no such section, a
    /// new empty section is appended.
    #[tracing::instrument(skip_all, target = "trellis::manager", level = "debug")]
    pub fn add_section_footer_generator(&mut self, footer: SupplementaryRef) {
        self.check_thread("add_section_footer_generator");
        footer.register(&mut self.view, ElementKind::Footer);

        let sync = self.plan_sync(&[], "add_section_footer_generator");
        let section = self
            .sections
            .iter()
            .rposition(Section::has_footer)
            .map_or(0, |last| last + 1);

        if section < self.sections.len() {
            self.sections[section].set_footer(footer);
            tracing::debug!(target: targets::MANAGER, section, "attached section footer");
            self.apply(sync, |view, _| view.reload_sections(&[section]));
        } else {
            self.sections.push(Section::with_footer(footer));
            tracing::debug!(target: targets::MANAGER, section, "added footer section");
            self.apply(sync, |view, sections| view.insert_sections(&[section], sections));
        }
    }

    /// Appends `generators` to the section headed by `header`.
    ///
    /// Does nothing if `header` is not tracked.
    pub fn add_cell_generators_to_header(&mut self, generators: Vec<CellGeneratorRef>, header: &SupplementaryRef) {
        self.check_thread("add_cell_generators_to_header");
        match self.section_of_header(header) {
            Some(section) => self.append_to_section(section, generators),
            None => tracing::debug!(target: targets::MANAGER, "skipping append to untracked header"),
        }
    }

    /// Appends `generators` to the section closed by `footer`.
    ///
    /// Does nothing if `footer` is not tracked.
    pub fn add_cell_generators_to_footer(&mut self, generators: Vec<CellGeneratorRef>, footer: &SupplementaryRef) {
        self.check_thread("add_cell_generators_to_footer");
        match self.section_of_footer(footer) {
            Some(section) => self.append_to_section(section, generators),
            None => tracing::debug!(target: targets::MANAGER, "skipping append to untracked footer"),
        }
    }

    /// Drops every row of the section headed by `header`. State only.
    pub fn remove_all_generators_from_header(&mut self, header: &SupplementaryRef) {
        self.check_thread("remove_all_generators_from_header");
        if let Some(section) = self.section_of_header(header) {
            self.sections[section].clear();
            tracing::debug!(target: targets::MANAGER, section, "cleared rows under header");
        }
    }

    /// Drops every row of the section closed by `footer`. State only.
    pub fn remove_all_generators_from_footer(&mut self, footer: &SupplementaryRef) {
        self.check_thread("remove_all_generators_from_footer");
        if let Some(section) = self.section_of_footer(footer) {
            self.sections[section].clear();
            tracing::debug!(target: targets::MANAGER, section, "cleared rows above footer");
        }
    }

    // -------------------------------------------------------------------------
    // Bulk state changes
    // -------------------------------------------------------------------------

    /// Drops all rows. State only; call [`force_refill`](Self::force_refill)
    /// to resync the widget.
    ///
    /// Sections that still have a header or footer are kept (empty); sections
    /// left with nothing are removed.
    pub fn clear_cell_generators(&mut self) {
        self.check_thread("clear_cell_generators");
        self.sections.iter_mut().for_each(Section::clear);
        self.prune_blank_sections();
    }

    /// Resets every header to the placeholder. State only.
    pub fn clear_header_generators(&mut self) {
        self.check_thread("clear_header_generators");
        for section in &mut self.sections {
            section.set_header(EmptySupplementaryGenerator::shared());
        }
        self.prune_blank_sections();
    }

    /// Resets every footer to the placeholder. State only.
    pub fn clear_footer_generators(&mut self) {
        self.check_thread("clear_footer_generators");
        for section in &mut self.sections {
            section.set_footer(EmptySupplementaryGenerator::shared());
        }
        self.prune_blank_sections();
    }

    /// Reloads the widget from state.
    pub fn force_refill(&mut self) {
        self.reload(None);
    }

    /// Reloads the widget from state; `completion` runs once the host has
    /// applied the reload.
    pub fn force_refill_with_completion(&mut self, completion: impl FnOnce() + 'static) {
        self.reload(Some(Box::new(completion)));
    }

    // -------------------------------------------------------------------------
    // Widget passthroughs
    // -------------------------------------------------------------------------

    /// Scrolls to `path` if it addresses a row.
    pub fn scroll_to(&mut self, path: IndexPath, position: ScrollPosition) -> Result<()> {
        self.check_thread("scroll_to");
        if self.generator_at(path).is_none() {
            return Err(ManagerError::IndexOutOfBounds { path });
        }
        if self.view.is_displaying() {
            self.view
                .scroll_to_item(path, position, self.config.scroll_animated);
        }
        Ok(())
    }

    /// Clears the selection highlight at `path`.
    pub fn deselect(&mut self, path: IndexPath, animated: bool) {
        self.check_thread("deselect");
        if self.generator_at(path).is_some() {
            self.view.deselect_item(path, animated);
        }
    }

    // -------------------------------------------------------------------------
    // Internals
    // -------------------------------------------------------------------------

    fn check_thread(&self, operation: &str) {
        self.affinity.check(self.config.thread_checks, operation);
    }

    fn append_to_section(&mut self, section: usize, generators: Vec<CellGeneratorRef>) {
        if generators.is_empty() {
            return;
        }
        for generator in &generators {
            generator.register(&mut self.view);
        }

        let sync = self.plan_sync(&[section], "append_to_section");
        let start = IndexPath::new(section, self.sections[section].len());
        let paths = IndexPath::run(start, generators.len());
        self.sections[section].extend(generators);
        tracing::debug!(target: targets::MANAGER, section, count = paths.len(), "appended cell generators");

        self.apply(sync, |view, _| view.insert_items(&paths));
    }

    fn prune_blank_sections(&mut self) {
        let before = self.sections.len();
        self.sections.retain(|section| !section.is_blank());
        tracing::debug!(
            target: targets::MANAGER,
            pruned = before - self.sections.len(),
            remaining = self.sections.len(),
            "cleared state"
        );
    }

    fn reload(&mut self, completion: Option<Completion>) {
        self.check_thread("force_refill");
        tracing::debug!(target: targets::MANAGER, sections = self.sections.len(), "reloading widget");
        self.view.reload_data(&self.sections, completion);
    }

    /// Compares the widget's counts against current state for the sections
    /// in `touched`.
    fn verify_widget(&self, touched: &[usize]) -> Result<()> {
        let actual = self.view.number_of_sections();
        if actual != self.sections.len() {
            return Err(ManagerError::SectionsOutOfSync {
                expected: self.sections.len(),
                actual,
            });
        }
        for &section in touched {
            let expected = self.sections[section].len();
            let actual = self.view.number_of_items(section);
            if actual != expected {
                return Err(ManagerError::OutOfSync {
                    section,
                    expected,
                    actual,
                });
            }
        }
        Ok(())
    }

    /// Decides, before a mutation, how the widget will follow it.
    fn plan_sync(&self, touched: &[usize], operation: &str) -> WidgetSync {
        if !self.view.is_displaying() {
            return WidgetSync::Deferred;
        }
        match self.verify_widget(touched) {
            Ok(()) => WidgetSync::Positional,
            Err(err) if self.config.resync_on_divergence => {
                tracing::warn!(target: targets::MANAGER, %err, operation, "widget diverged from state, reloading");
                WidgetSync::Reload
            }
            Err(err) => {
                tracing::warn!(target: targets::MANAGER, %err, operation, "widget diverged from state, leaving it until the next refill");
                WidgetSync::Deferred
            }
        }
    }

    /// Brings the widget up to date after a mutation planned with `plan_sync`.
    fn apply(&mut self, sync: WidgetSync, positional: impl FnOnce(&mut W, &Vec<Section>)) {
        match sync {
            WidgetSync::Deferred => {}
            WidgetSync::Positional => {
                tracing::trace!(target: targets::WIDGET, "applying positional update");
                positional(&mut self.view, &self.sections);
            }
            WidgetSync::Reload => self.reload(None),
        }
    }
}

static_assertions::assert_not_impl_any!(StateManager<crate::testing::RecordingWidget>: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::{BaseCellGenerator, BaseSupplementaryGenerator, ConfigurableView};
    use crate::testing::{RecordingWidget, WidgetCall};
    use std::rc::Rc;

    #[derive(Default)]
    struct Row;

    impl ConfigurableView for Row {
        type Model = u32;
        fn configure(&mut self, _model: &u32) {}
    }

    #[derive(Default)]
    struct Title;

    impl ConfigurableView for Title {
        type Model = &'static str;
        fn configure(&mut self, _model: &&'static str) {}
    }

    fn row(model: u32) -> CellGeneratorRef {
        Rc::new(BaseCellGenerator::<Row>::new(model))
    }

    fn title(text: &'static str) -> SupplementaryRef {
        Rc::new(BaseSupplementaryGenerator::<Title>::new(text))
    }

    fn loaded() -> StateManager<RecordingWidget> {
        let mut manager = StateManager::new(RecordingWidget::new());
        manager.force_refill();
        manager.view_mut().clear_calls();
        manager
    }

    #[test]
    fn test_add_before_display_defers_widget() {
        let mut manager = StateManager::new(RecordingWidget::new());
        manager.add_cell_generator(row(1));

        assert_eq!(manager.number_of_sections(), 1);
        assert!(
            manager
                .view()
                .calls()
                .iter()
                .all(|call| matches!(call, WidgetCall::RegisterTemplate { .. }))
        );

        manager.force_refill();
        assert_eq!(manager.view().item_counts(), &[1]);
    }

    #[test]
    fn test_add_while_displaying_inserts() {
        let mut manager = loaded();
        manager.add_cell_generator(row(1));
        manager.add_cell_generator(row(2));

        let positional: Vec<_> = manager.view().positional_calls();
        assert_eq!(
            positional,
            vec![
                WidgetCall::InsertSections(vec![0]),
                WidgetCall::InsertItems(vec![IndexPath::new(0, 1)]),
            ]
        );
        assert_eq!(manager.view().item_counts(), &[2]);
    }

    #[test]
    fn test_add_appends_to_last_section() {
        let mut manager = loaded();
        manager.add_section_header_generator(title("first"));
        manager.add_section_header_generator(title("second"));
        manager.add_cell_generator(row(1));

        assert_eq!(manager.number_of_items(0), 0);
        assert_eq!(manager.number_of_items(1), 1);
        assert_eq!(manager.view().item_counts(), &[0, 1]);
    }

    #[test]
    fn test_update_skips_untracked() {
        let mut manager = loaded();
        let a = row(1);
        let b = row(2);
        manager.add_cell_generators([a.clone(), b.clone()]);
        manager.view_mut().clear_calls();

        let reloaded = manager.update(&[b.clone(), row(3)]);
        assert_eq!(reloaded, vec![IndexPath::new(0, 1)]);
        assert_eq!(
            manager.view().calls(),
            &[WidgetCall::ReloadItems(vec![IndexPath::new(0, 1)])]
        );

        manager.view_mut().clear_calls();
        assert!(manager.update(&[row(4)]).is_empty());
        assert!(manager.view().calls().is_empty());
    }

    #[test]
    fn test_remove_untracked_is_noop() {
        let mut manager = loaded();
        manager.add_cell_generator(row(1));
        manager.view_mut().clear_calls();

        assert_eq!(manager.remove(&row(1), None, true), Ok(None));
        assert_eq!(manager.item_count(), 1);
        assert!(manager.view().calls().is_empty());
    }

    #[test]
    fn test_remove_scrolls_to_neighbour() {
        let mut manager = loaded();
        let (a, b) = (row(1), row(2));
        manager.add_cell_generators([a.clone(), b.clone()]);
        manager.view_mut().clear_calls();

        manager.remove(&b, Some(ScrollPosition::Top), false).unwrap();
        assert_eq!(
            manager.view().calls(),
            &[
                WidgetCall::BeginUpdates,
                WidgetCall::DeleteItems(vec![IndexPath::new(0, 1)]),
                WidgetCall::ScrollToItem {
                    path: IndexPath::new(0, 0),
                    position: ScrollPosition::Top,
                    animated: true,
                },
                WidgetCall::EndUpdates,
            ]
        );
    }

    #[test]
    fn test_remove_keeps_empty_section_unless_asked() {
        let mut manager = loaded();
        let a = row(1);
        manager.add_cell_generator(a.clone());

        manager.remove(&a, None, false).unwrap();
        assert_eq!(manager.number_of_sections(), 1);
        assert_eq!(manager.view().item_counts(), &[0]);
    }

    #[test]
    fn test_remove_refuses_when_out_of_sync() {
        let mut manager = loaded();
        let a = row(1);
        manager.add_cell_generators([a.clone(), row(2)]);
        manager.view_mut().set_item_count(0, 5);
        manager.view_mut().clear_calls();

        let err = manager.remove(&a, None, true).unwrap_err();
        assert_eq!(
            err,
            ManagerError::OutOfSync {
                section: 0,
                expected: 2,
                actual: 5
            }
        );
        assert!(manager.contains(&a));
        assert!(manager.view().calls().is_empty());
    }

    #[test]
    fn test_insert_falls_back_to_reload_when_out_of_sync() {
        let mut manager = loaded();
        let a = row(1);
        manager.add_cell_generator(a.clone());
        manager.view_mut().set_item_count(0, 3);
        manager.view_mut().clear_calls();

        manager.add_cell_generator_after(row(2), &a);
        assert_eq!(manager.view().positional_calls(), vec![WidgetCall::ReloadData]);
        assert_eq!(manager.view().item_counts(), &[2]);
    }

    #[test]
    fn test_insert_out_of_sync_without_resync_leaves_widget() {
        let config = ManagerConfig::default().with_resync_on_divergence(false);
        let mut manager = StateManager::with_config(RecordingWidget::new(), config);
        manager.force_refill();
        let a = row(1);
        manager.add_cell_generator(a.clone());
        manager.view_mut().set_item_count(0, 3);
        manager.view_mut().clear_calls();

        manager.add_cell_generator_after(row(2), &a);
        assert!(manager.view().positional_calls().is_empty());
        assert_eq!(manager.number_of_items(0), 2);
    }

    #[test]
    fn test_try_insert_after_missing_anchor() {
        let mut manager = loaded();
        manager.add_cell_generator(row(1));

        let result = manager.try_add_cell_generators_after(vec![row(2)], &row(1));
        assert_eq!(result, Err(ManagerError::GeneratorNotFound));
        assert_eq!(manager.item_count(), 1);
    }

    #[test]
    fn test_move_generator_within_section() {
        let mut manager = loaded();
        let (a, b, c) = (row(1), row(2), row(3));
        manager.add_cell_generators([a.clone(), b.clone(), c.clone()]);
        manager.view_mut().clear_calls();

        manager
            .move_generator(IndexPath::new(0, 0), IndexPath::new(0, 2))
            .unwrap();
        assert_eq!(manager.index_path_of(&a), Some(IndexPath::new(0, 2)));
        assert_eq!(manager.index_path_of(&b), Some(IndexPath::new(0, 0)));
        assert!(manager.view().calls().contains(&WidgetCall::MoveItem {
            from: IndexPath::new(0, 0),
            to: IndexPath::new(0, 2),
        }));
        assert_eq!(manager.index_path_of(&c), Some(IndexPath::new(0, 1)));
    }

    #[test]
    fn test_move_generator_across_sections() {
        let mut manager = loaded();
        manager.add_section_header_generator(title("one"));
        let a = row(1);
        manager.add_cell_generator(a.clone());
        manager.add_section_header_generator(title("two"));

        manager
            .move_generator(IndexPath::new(0, 0), IndexPath::new(1, 0))
            .unwrap();
        assert_eq!(manager.index_path_of(&a), Some(IndexPath::new(1, 0)));
        assert_eq!(manager.view().item_counts(), &[0, 1]);
    }

    #[test]
    fn test_move_generator_rejects_bad_paths() {
        let mut manager = loaded();
        manager.add_cell_generators([row(1), row(2)]);

        assert_eq!(
            manager.move_generator(IndexPath::new(0, 5), IndexPath::new(0, 0)),
            Err(ManagerError::IndexOutOfBounds {
                path: IndexPath::new(0, 5)
            })
        );
        assert_eq!(
            manager.move_generator(IndexPath::new(0, 0), IndexPath::new(0, 2)),
            Err(ManagerError::IndexOutOfBounds {
                path: IndexPath::new(0, 2)
            })
        );
        assert_eq!(
            manager.move_generator(IndexPath::new(0, 0), IndexPath::new(3, 0)),
            Err(ManagerError::SectionOutOfBounds { section: 3, count: 1 })
        );
    }

    #[test]
    fn test_footer_assignment_order() {
        let mut manager = loaded();
        manager.add_section_header_generator(title("h1"));
        manager.add_section_header_generator(title("h2"));
        let f1 = title("f1");
        let f2 = title("f2");
        let f3 = title("f3");

        manager.add_section_footer_generator(f1.clone());
        manager.add_section_footer_generator(f2.clone());
        manager.add_section_footer_generator(f3.clone());

        assert_eq!(manager.section_of_footer(&f1), Some(0));
        assert_eq!(manager.section_of_footer(&f2), Some(1));
        assert_eq!(manager.section_of_footer(&f3), Some(2));
        assert_eq!(manager.number_of_sections(), 3);
        assert_eq!(manager.view().number_of_sections(), 3);
        assert!(manager.view().calls().contains(&WidgetCall::ReloadSections(vec![0])));
    }

    #[test]
    fn test_add_to_header_and_footer() {
        let mut manager = loaded();
        let h1 = title("h1");
        let h2 = title("h2");
        manager.add_section_header_generator(h1.clone());
        manager.add_section_header_generator(h2.clone());
        let footer = title("f");
        manager.add_section_footer_generator(footer.clone());

        manager.add_cell_generators_to_header(vec![row(1), row(2)], &h2);
        manager.add_cell_generators_to_footer(vec![row(3)], &footer);
        manager.add_cell_generators_to_header(vec![row(4)], &title("unknown"));

        assert_eq!(manager.number_of_items(0), 1);
        assert_eq!(manager.number_of_items(1), 2);
        assert_eq!(manager.view().item_counts(), &[1, 2]);

        manager.remove_all_generators_from_header(&h2);
        manager.remove_all_generators_from_footer(&footer);
        assert_eq!(manager.item_count(), 0);
        assert_eq!(manager.number_of_sections(), 2);
    }

    #[test]
    fn test_clear_and_rebuild() {
        let mut manager = loaded();
        manager.add_section_header_generator(title("h"));
        manager.add_cell_generators([row(1), row(2)]);
        manager.view_mut().clear_calls();

        manager.clear_cell_generators();
        assert_eq!(manager.number_of_sections(), 1);
        manager.clear_header_generators();
        manager.clear_footer_generators();
        assert!(manager.is_empty());
        assert!(manager.view().calls().is_empty(), "clearing must not touch the widget");

        manager.add_cell_generator(row(3));
        assert!(manager.view().positional_calls().contains(&WidgetCall::ReloadData));
        manager.force_refill();
        assert_eq!(manager.view().item_counts(), &[1]);
    }

    #[test]
    fn test_force_refill_completion() {
        let mut manager = loaded();
        let done = Rc::new(std::cell::Cell::new(false));
        let flag = done.clone();

        manager.force_refill_with_completion(move || flag.set(true));
        assert!(!done.get());
        manager.view_mut().complete_reloads();
        assert!(done.get());
    }

    #[test]
    fn test_scroll_to_validates_path() {
        let mut manager = loaded();
        manager.add_cell_generator(row(1));

        assert!(manager.scroll_to(IndexPath::new(0, 0), ScrollPosition::Bottom).is_ok());
        assert_eq!(
            manager.scroll_to(IndexPath::new(0, 1), ScrollPosition::Bottom),
            Err(ManagerError::IndexOutOfBounds {
                path: IndexPath::new(0, 1)
            })
        );
    }

    #[test]
    fn test_immediate_animator_skips_transaction() {
        let config = ManagerConfig::default().with_animate_updates(false);
        let mut manager = StateManager::with_config(RecordingWidget::new(), config);
        manager.force_refill();
        let a = row(1);
        manager.add_cell_generator(a.clone());
        manager.view_mut().clear_calls();

        manager.remove(&a, None, true).unwrap();
        assert_eq!(
            manager.view().calls(),
            &[
                WidgetCall::DeleteItems(vec![IndexPath::new(0, 0)]),
                WidgetCall::DeleteSections(vec![0]),
            ]
        );
    }
}
