// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Optimistic category removal with a single level of undo.

use anyhow::Result;
use serde::Serialize;

use crate::models::Category;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum UndoState {
    #[default]
    Stable,
    PendingDelete(i64),
}

#[derive(Debug, Default)]
pub struct CategoryUndo {
    state: UndoState,
}

impl CategoryUndo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> UndoState {
        self.state
    }

    pub fn should_display_undo(&self) -> bool {
        matches!(self.state, UndoState::PendingDelete(_))
    }

    /// Hide `id` pending confirmation. A deletion that was already pending is
    /// committed first and returned so the caller can delete it for real.
    /// Hiding the category that is already pending changes nothing.
    pub fn hide(&mut self, id: i64) -> Option<i64> {
        if self.state == UndoState::PendingDelete(id) {
            return None;
        }
        let committed = self.clear();
        self.state = UndoState::PendingDelete(id);
        tracing::debug!(category_id = id, ?committed, "category hidden");
        committed
    }

    pub fn undo(&mut self) {
        if let UndoState::PendingDelete(id) = self.state {
            tracing::debug!(category_id = id, "category removal undone");
        }
        self.state = UndoState::Stable;
    }

    /// Leave the pending state without undo; the pending id, if any, is
    /// returned as committed.
    pub fn clear(&mut self) -> Option<i64> {
        match std::mem::take(&mut self.state) {
            UndoState::PendingDelete(id) => Some(id),
            UndoState::Stable => None,
        }
    }

    pub fn visible(&self, categories: &[Category]) -> Vec<Category> {
        match self.state {
            UndoState::PendingDelete(id) => categories
                .iter()
                .filter(|c| c.id != id)
                .cloned()
                .collect(),
            UndoState::Stable => categories.to_vec(),
        }
    }

    /// `hide` that hands the superseded deletion straight to `delete`. If
    /// `delete` fails the previous deletion stays pending.
    pub fn hide_with<F>(&mut self, id: i64, delete: F) -> Result<()>
    where
        F: FnOnce(i64) -> Result<()>,
    {
        match self.state {
            UndoState::PendingDelete(pending) if pending == id => return Ok(()),
            UndoState::PendingDelete(pending) => delete(pending)?,
            UndoState::Stable => {}
        }
        self.hide(id);
        Ok(())
    }

    /// `clear` that hands the pending deletion straight to `delete`. If
    /// `delete` fails the deletion stays pending.
    pub fn clear_with<F>(&mut self, delete: F) -> Result<()>
    where
        F: FnOnce(i64) -> Result<()>,
    {
        if let UndoState::PendingDelete(pending) = self.state {
            delete(pending)?;
            self.state = UndoState::Stable;
        }
        Ok(())
    }
}
