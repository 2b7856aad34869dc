//! Plan domain model.
//!
//! # Responsibility
//! - Define the in-memory shape of one resource allocation plan.
//! - Own every pure mutation of that shape (no I/O happens here).
//!
//! # Invariants
//! - Theme names and member names are unique within their master list.
//! - Allocation rows may reference names absent from the master lists.
//! - At most one allocation row exists per `(member, theme)` pair after any
//!   mutation in this module.
//!
//! # See also
//! - `crate::codec` for the persisted document format.

pub mod plan;
pub(crate) mod wire;

pub use plan::{
    AllocationRow, Axis, Member, Month, PlanDocument, Theme, TotalsCache, DEFAULT_MONTHS,
    MEMBER_FIELD, NEW_MEMBER_NAME, NEW_THEME_NAME, THEME_FIELD,
};
