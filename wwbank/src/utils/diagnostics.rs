//! Soft-failure reporting.
//!
//! Recoverable problems (a skipped record, a dropped Ogg page) do not abort
//! processing. They are collected here and handed back to the caller together
//! with the result, so the caller decides what a partial result is worth.

use std::fmt::Display;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostics<W> {
    warnings: Vec<W>,
}

impl<W> Default for Diagnostics<W> {
    fn default() -> Self {
        Self {
            warnings: Vec::new(),
        }
    }
}

impl<W: Display> Diagnostics<W> {
    pub fn push(&mut self, warning: W) {
        self.warnings.push(warning);
    }

    /// `true` if at least one unit was skipped.
    pub fn soft_failed(&self) -> bool {
        !self.warnings.is_empty()
    }

    pub fn len(&self) -> usize {
        self.warnings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.warnings.is_empty()
    }

    pub fn warnings(&self) -> &[W] {
        &self.warnings
    }

    pub fn iter(&self) -> impl Iterator<Item = &W> {
        self.warnings.iter()
    }

    pub fn into_vec(self) -> Vec<W> {
        self.warnings
    }
}

impl<'a, W> IntoIterator for &'a Diagnostics<W> {
    type Item = &'a W;
    type IntoIter = std::slice::Iter<'a, W>;

    fn into_iter(self) -> Self::IntoIter {
        self.warnings.iter()
    }
}
