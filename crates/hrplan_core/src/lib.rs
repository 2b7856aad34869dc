//! Core domain logic for HRPlan resource allocation documents.
//! This crate is the single source of truth for plan invariants.

pub mod aggregate;
pub mod codec;
pub mod host;
pub mod logging;
pub mod model;
pub mod numeric;
pub mod service;
pub mod settings;
pub mod template;
pub mod view;

pub use aggregate::{
    pivot, pivot_with, recompute_totals, LoadTag, LoadThresholds, PivotGroup, PivotResult,
    PivotRow, SubtotalCell,
};
pub use codec::{decode, encode};
pub use host::{
    DocumentView, FileDocumentView, FsVault, HostError, HostResult, MemoryDocumentView,
    MemoryVault, Vault,
};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::{AllocationRow, Axis, Member, Month, PlanDocument, Theme, TotalsCache};
pub use service::document_service::{DocumentService, EmbedSummary, EmbedView};
pub use service::plan_session::{EditOutcome, PlanSession};
pub use settings::{Settings, SettingsError, DOCUMENT_EXTENSION};
pub use template::{template_document, TEMPLATE};
pub use view::{ActiveTab, EditIntent, MasterView, RenderedView, ViewState};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
