//! Static entity metadata consumed by the planners.

pub mod entity;
pub mod field;
pub mod registry;
pub mod relation;

pub use entity::EntityModel;
pub use field::{FieldKind, FieldModel};
pub use registry::{RegistryError, SchemaRegistry};
pub use relation::{RelationArity, RelationModel};
