//! Native control panel bound to the top-left viewport.
//!
//! The panel is generated from the options JSON schema the same way a
//! schema-driven form would be: one row per UI-exposed field, with ranges
//! and steps taken from the schema. Frame statistics sit above the fields.

/// Schema-driven panel state and pointer handling.
pub mod panel;

pub use panel::{ControlPanel, FieldKind, PanelEdit, PanelField};
