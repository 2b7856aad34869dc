//! Document lifecycle use-cases outside an editing session.
//!
//! # Responsibility
//! - Create uniquely named documents pre-filled with the template.
//! - Resolve embedded references into read-only plan summaries.
//!
//! # Invariants
//! - Creation never overwrites an existing document.
//! - A missing embed target yields a user-visible warning, not an error.

use crate::aggregate::recompute_totals;
use crate::codec::decode;
use crate::host::{HostError, HostResult, Vault};
use crate::model::{PlanDocument, TotalsCache};
use crate::numeric::format;
use crate::settings::{Settings, DOCUMENT_EXTENSION};
use crate::template::TEMPLATE;
use log::{error, info, warn};
use serde::Serialize;
use std::path::Path;

/// Upper bound on `Untitled n` probes before giving up.
const MAX_CREATE_ATTEMPTS: usize = 10_000;

/// Read-only summary for embedding a plan inside another document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmbedSummary {
    /// File name without extension.
    pub title: String,
    pub period: Option<String>,
    pub member_count: usize,
    pub theme_count: usize,
    pub totals: TotalsCache,
    pub grand_total: f64,
    pub orphan_rows: usize,
}

impl EmbedSummary {
    fn from_document(title: String, doc: &PlanDocument) -> Self {
        let totals = recompute_totals(doc);
        let grand_total = format(totals.values().sum());
        Self {
            title,
            period: doc.period.clone(),
            member_count: doc.members.len(),
            theme_count: doc.themes.len(),
            totals,
            grand_total,
            orphan_rows: doc.orphan_rows().count(),
        }
    }
}

/// Embed lookup outcome.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum EmbedView {
    Found(EmbedSummary),
    /// Inline warning for the host to display.
    Missing { warning: String },
}

/// Document service over a vault implementation.
pub struct DocumentService<V: Vault> {
    vault: V,
    settings: Settings,
}

impl<V: Vault> DocumentService<V> {
    pub fn new(vault: V, settings: Settings) -> Self {
        Self { vault, settings }
    }

    pub fn vault(&self) -> &V {
        &self.vault
    }

    /// Creates `Untitled.hrplan` (or the first free `Untitled n.hrplan`).
    ///
    /// Returns the vault path of the new document.
    ///
    /// # Errors
    /// - Propagates vault failures other than a lost creation race.
    /// - `HostError::AlreadyExists` if every probe is taken.
    pub fn create_new_document(&mut self) -> HostResult<String> {
        for attempt in 0..MAX_CREATE_ATTEMPTS {
            let candidate = self.settings.untitled_file_name(attempt);
            if self.vault.exists(&candidate) {
                continue;
            }
            match self.vault.create(&candidate, TEMPLATE) {
                Ok(()) => {
                    info!(
                        "event=document_create module=service status=ok attempts={}",
                        attempt + 1
                    );
                    return Ok(candidate);
                }
                Err(HostError::AlreadyExists(_)) => continue,
                Err(err) => {
                    error!(
                        "event=document_create module=service status=error error={}",
                        err
                    );
                    return Err(err);
                }
            }
        }
        Err(HostError::AlreadyExists(
            self.settings.untitled_file_name(MAX_CREATE_ATTEMPTS),
        ))
    }

    /// Resolves an embed reference.
    ///
    /// `link` is trimmed and gets the `.hrplan` extension appended when it
    /// lacks one. Returns `None` for an empty link.
    pub fn embed(&self, link: &str) -> Option<EmbedView> {
        let link = link.trim();
        if link.is_empty() {
            return None;
        }
        let path = with_extension(link);

        let raw = match self.vault.read(&path) {
            Ok(raw) => raw,
            Err(err) => {
                warn!(
                    "event=embed_resolve module=service status=error error={}",
                    err
                );
                return Some(EmbedView::Missing {
                    warning: missing_warning(link),
                });
            }
        };

        let doc = decode(&raw);
        let title = Path::new(&path)
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| link.to_string());
        Some(EmbedView::Found(EmbedSummary::from_document(title, &doc)))
    }
}

fn with_extension(link: &str) -> String {
    let suffix = format!(".{DOCUMENT_EXTENSION}");
    if link.ends_with(&suffix) {
        link.to_string()
    } else {
        format!("{link}{suffix}")
    }
}

/// Inline warning shown in place of a missing embed.
pub fn missing_warning(link: &str) -> String {
    format!("⚠️ File not found / ファイルが見つかりません: {link}")
}

#[cfg(test)]
mod tests {
    use super::with_extension;

    #[test]
    fn extension_is_appended_once() {
        assert_eq!(with_extension("plan"), "plan.hrplan");
        assert_eq!(with_extension("dir/plan.hrplan"), "dir/plan.hrplan");
    }
}
