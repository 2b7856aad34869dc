//! Core use-case services.
//!
//! # Responsibility
//! - Sequence pure plan mutations with encode and persist requests.
//! - Create new documents and resolve embedded document references.
//! - Keep host storage and UI decoupled from the plan model.

pub mod document_service;
pub mod plan_session;
