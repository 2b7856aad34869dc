//! Editing session over one open plan document.
//!
//! # Responsibility
//! - Decode the host document once, then apply edit intents in order.
//! - Re-encode and request persistence after every effective edit.
//!
//! # Invariants
//! - The in-memory plan and the host raw text agree after every `apply`.
//! - Edits that change nothing do not touch the host view.
//! - `&mut self` serializes edits; there is never more than one in flight.

use crate::aggregate::{pivot_with, PivotResult};
use crate::codec::{decode, encode};
use crate::host::DocumentView;
use crate::model::{Axis, PlanDocument};
use crate::settings::Settings;
use crate::view::{render, EditIntent, RenderedView, ViewState};
use log::{debug, info};

/// Result of applying one edit intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOutcome {
    /// Plan changed; the host was handed new text and asked to persist.
    Persisted,
    /// Intent was a no-op (same name, bad index, unchanged source, ...).
    Unchanged,
}

/// Session bound to one host document view.
pub struct PlanSession<V: DocumentView> {
    view: V,
    doc: PlanDocument,
    settings: Settings,
}

impl<V: DocumentView> PlanSession<V> {
    /// Opens a session, decoding the view's current text.
    pub fn open(view: V, settings: Settings) -> Self {
        let doc = decode(&view.raw_text());
        info!(
            "event=session_open module=service status=ok rows={} months={}",
            doc.rows.len(),
            doc.months.len()
        );
        Self {
            view,
            doc,
            settings,
        }
    }

    pub fn document(&self) -> &PlanDocument {
        &self.doc
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    /// Host access for replacing the text outside an edit; follow with `reload`.
    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Re-decodes after the host replaced the document text externally.
    pub fn reload(&mut self) {
        self.doc = decode(&self.view.raw_text());
    }

    /// Applies one edit intent and persists when it changed the plan.
    pub fn apply(&mut self, intent: EditIntent) -> EditOutcome {
        let label = intent.label();
        let changed = match intent {
            EditIntent::SetCell {
                member,
                theme,
                month,
                value,
            } => self.doc.upsert_cell(&member, &theme, &month, &value),
            EditIntent::RenameTheme { old_name, new_name } => {
                self.doc.rename_theme(&old_name, &new_name)
            }
            EditIntent::RenameMember { old_name, new_name } => {
                self.doc.rename_member(&old_name, &new_name)
            }
            EditIntent::AddTheme => {
                self.doc.add_theme_named(&self.settings.new_theme_name);
                true
            }
            EditIntent::AddMember => {
                self.doc.add_member_named(&self.settings.new_member_name);
                true
            }
            EditIntent::DeleteTheme { index } => self.doc.delete_theme(index).is_some(),
            EditIntent::DeleteMember { index } => self.doc.delete_member(index).is_some(),
            EditIntent::SetThemeDescription { index, description } => {
                self.doc.set_theme_description(index, &description)
            }
            EditIntent::SetMemberDescription { index, description } => {
                self.doc.set_member_description(index, &description)
            }
            EditIntent::SetMemberRate { index, rate } => self.doc.set_member_rate(index, &rate),
            EditIntent::ReplaceSource { text } => return self.replace_source(text),
        };

        if !changed {
            debug!(
                "event=edit_apply module=service status=noop intent={}",
                label
            );
            return EditOutcome::Unchanged;
        }
        self.persist();
        debug!(
            "event=edit_apply module=service status=ok intent={} rows={}",
            label,
            self.doc.rows.len()
        );
        EditOutcome::Persisted
    }

    /// Source tab edits are stored verbatim, then re-decoded.
    fn replace_source(&mut self, text: String) -> EditOutcome {
        if text == self.view.raw_text() {
            return EditOutcome::Unchanged;
        }
        self.doc = decode(&text);
        self.view.set_raw_text(text);
        self.view.request_persist();
        debug!("event=edit_apply module=service status=ok intent=replace_source");
        EditOutcome::Persisted
    }

    fn persist(&mut self) {
        let text = encode(&mut self.doc);
        self.view.set_raw_text(text);
        self.view.request_persist();
    }

    pub fn pivot(&self, primary: Axis) -> PivotResult {
        pivot_with(&self.doc, primary, self.settings.thresholds())
    }

    pub fn render(&self, state: &ViewState) -> RenderedView {
        render(
            &self.doc,
            &self.view.raw_text(),
            state,
            self.settings.thresholds(),
        )
    }
}
