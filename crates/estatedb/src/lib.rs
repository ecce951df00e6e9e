//! # estatedb
//!
//! Typed query/mutation planning layer for a real-estate CRM client.
//!
//! ## Crate layout
//! - `core`: planners, plan values, transaction coordination, and the
//!   execution-service seam.
//! - `schema`: typed bindings for the CRM entities and their registry.
//!
//! The `prelude` module mirrors the surface used by typical caller code.

pub use estatedb_core as core;
pub use estatedb_schema as schema;

//
// Consts
//

/// Workspace version re-export for downstream tooling/tests.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use estatedb_core::{Error, PlanError};
pub use estatedb_schema::registry;

///
/// Prelude
/// using _ brings traits into scope and avoids name conflicts
///

pub mod prelude {
    pub use crate::core::prelude::*;
    pub use crate::schema::{
        Apartment, ApartmentStatus, Client, ClientStatus, Comment, MonthlyTarget, Project,
        PropertyType, Role, Status, Task, TodoStatus, User, registry,
    };
}
