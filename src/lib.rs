//! Undo/redo history for a freehand drawing surface.
//!
//! A [`session::DrawingSession`] connects a document surface to a bounded
//! snapshot [`history::History`]. Surface events are classified by the
//! [`triggers`] adapter into coalesced saves; key shortcuts from [`keys`]
//! drive undo/redo through the restore orchestrator.

pub mod codec;
pub mod config;
pub mod error;
pub mod history;
pub mod keys;
pub mod session;
pub mod sketch;
pub mod surface;
pub mod tools;
pub mod triggers;
