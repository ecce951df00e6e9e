//! Typed bindings for the real-estate CRM schema.
//!
//! Seven entities (User, Client, Project, Apartment, Task, Comment,
//! MonthlyTarget), their wire-stable enums, and the schema registry the
//! planners consume. The registry is built once at startup and read-only
//! thereafter; nothing in this crate holds ambient mutable state.

pub mod apartment;
pub mod client;
pub mod comment;
pub mod enums;
pub mod monthly_target;
pub mod project;
pub mod task;
pub mod user;

pub use apartment::Apartment;
pub use client::Client;
pub use comment::Comment;
pub use enums::{
    ApartmentStatus, ClientStatus, EnumParseError, PropertyType, Role, Status, TodoStatus,
};
pub use monthly_target::MonthlyTarget;
pub use project::Project;
pub use task::Task;
pub use user::User;

use estatedb_core::model::{RegistryError, SchemaRegistry};

/// Build the CRM schema registry. Callers construct this once at startup and
/// pass it explicitly into `Db`; relation targets are cross-checked here.
pub fn registry() -> Result<SchemaRegistry, RegistryError> {
    SchemaRegistry::new(&[
        &user::MODEL,
        &client::MODEL,
        &project::MODEL,
        &apartment::MODEL,
        &task::MODEL,
        &comment::MODEL,
        &monthly_target::MODEL,
    ])
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::{Apartment, ApartmentStatus, PropertyType, registry};
    use chrono::{TimeZone, Utc};
    use estatedb_core::{traits::EntityKind, value::Float64};

    #[test]
    fn crm_registry_builds_and_resolves_every_entity() {
        let registry = registry().expect("schema is internally consistent");

        for entity in [
            "User",
            "Client",
            "Project",
            "Apartment",
            "Task",
            "Comment",
            "MonthlyTarget",
        ] {
            assert!(registry.contains(entity), "missing entity {entity}");
        }
    }

    #[test]
    fn unique_selectors_cover_primary_keys_and_emails() {
        let registry = registry().expect("builds");

        let user = registry.entity("User").expect("registered");
        assert!(user.is_unique_selector("id"));
        assert!(user.is_unique_selector("email"));
        assert!(!user.is_unique_selector("name"));

        let apartment = registry.entity("Apartment").expect("registered");
        assert!(apartment.is_unique_selector("id"));
        assert!(!apartment.is_unique_selector("number"));
    }

    #[test]
    fn apartment_rows_round_trip_with_explicit_nulls() {
        let apartment = Apartment {
            id: 7,
            number: "A-12".to_string(),
            floor: 3,
            property_type: PropertyType::Duplex,
            area: Float64::try_new(118.5).expect("finite"),
            price: Float64::try_new(236_000.0).expect("finite"),
            price_per_m2: Float64::try_new(1_991.56).expect("finite"),
            zone: "North".to_string(),
            status: ApartmentStatus::Reserved,
            image: None,
            notes: Some("corner unit".to_string()),
            updated_at: Some(Utc.with_ymd_and_hms(2024, 5, 14, 9, 30, 0).unwrap()),
            project_id: 2,
            client_id: None,
            user_id: Some(4),
        };

        let row = apartment.to_row();
        // soft nulls survive as explicit nulls, not missing keys
        assert!(row.is_selected("image"));
        assert!(row.get("image").expect("selected").is_null());

        let decoded = Apartment::from_row(&row).expect("decodes");
        assert_eq!(decoded, apartment);
    }
}
