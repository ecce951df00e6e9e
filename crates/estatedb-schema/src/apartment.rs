use crate::{
    enums::{ApartmentStatus, PropertyType},
    user::parse_enum,
};
use chrono::{DateTime, Utc};
use estatedb_core::{
    model::{EntityModel, FieldKind, FieldModel, RelationArity, RelationModel},
    response::{ResponseError, Row},
    traits::EntityKind,
    value::Float64,
};
use serde::{Deserialize, Serialize};

///
/// Apartment
/// A sellable unit inside a project, optionally owned by a client and
/// assigned to an agent. The wire field for the property category is
/// `type`; the binding spells it `property_type`.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Apartment {
    pub id: i64,
    pub number: String,
    pub floor: i64,
    #[serde(rename = "type")]
    pub property_type: PropertyType,
    pub area: Float64,
    pub price: Float64,
    pub price_per_m2: Float64,
    pub zone: String,
    pub status: ApartmentStatus,
    pub image: Option<String>,
    pub notes: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
    pub project_id: i64,
    pub client_id: Option<i64>,
    pub user_id: Option<i64>,
}

static FIELDS: [FieldModel; 15] = [
    FieldModel {
        name: "id",
        kind: FieldKind::Int,
        nullable: false,
        unique: true,
    },
    FieldModel {
        name: "number",
        kind: FieldKind::Text,
        nullable: false,
        unique: false,
    },
    FieldModel {
        name: "floor",
        kind: FieldKind::Int,
        nullable: false,
        unique: false,
    },
    FieldModel {
        name: "type",
        kind: FieldKind::Enum {
            values: PropertyType::VALUES,
        },
        nullable: false,
        unique: false,
    },
    FieldModel {
        name: "area",
        kind: FieldKind::Float,
        nullable: false,
        unique: false,
    },
    FieldModel {
        name: "price",
        kind: FieldKind::Float,
        nullable: false,
        unique: false,
    },
    FieldModel {
        name: "price_per_m2",
        kind: FieldKind::Float,
        nullable: false,
        unique: false,
    },
    FieldModel {
        name: "zone",
        kind: FieldKind::Text,
        nullable: false,
        unique: false,
    },
    FieldModel {
        name: "status",
        kind: FieldKind::Enum {
            values: ApartmentStatus::VALUES,
        },
        nullable: false,
        unique: false,
    },
    FieldModel {
        name: "image",
        kind: FieldKind::Text,
        nullable: true,
        unique: false,
    },
    FieldModel {
        name: "notes",
        kind: FieldKind::Text,
        nullable: true,
        unique: false,
    },
    FieldModel {
        name: "updated_at",
        kind: FieldKind::Timestamp,
        nullable: true,
        unique: false,
    },
    FieldModel {
        name: "project_id",
        kind: FieldKind::Int,
        nullable: false,
        unique: false,
    },
    FieldModel {
        name: "client_id",
        kind: FieldKind::Int,
        nullable: true,
        unique: false,
    },
    FieldModel {
        name: "user_id",
        kind: FieldKind::Int,
        nullable: true,
        unique: false,
    },
];

static RELATIONS: [RelationModel; 4] = [
    RelationModel {
        name: "project",
        target: "Project",
        arity: RelationArity::One,
        required: true,
        fk_field: Some("project_id"),
    },
    // Optional owner after purchase or reservation.
    RelationModel {
        name: "client",
        target: "Client",
        arity: RelationArity::One,
        required: false,
        fk_field: Some("client_id"),
    },
    // Optional assigned agent.
    RelationModel {
        name: "user",
        target: "User",
        arity: RelationArity::One,
        required: false,
        fk_field: Some("user_id"),
    },
    // Many-to-many interest link, mirrored by Client.interested_apartments.
    RelationModel {
        name: "interested_clients",
        target: "Client",
        arity: RelationArity::Many,
        required: false,
        fk_field: None,
    },
];

pub static MODEL: EntityModel = EntityModel {
    path: "estatedb_schema::apartment::Apartment",
    entity_name: "Apartment",
    primary_key: &FIELDS[0],
    fields: &FIELDS,
    relations: &RELATIONS,
};

impl EntityKind for Apartment {
    const PATH: &'static str = "estatedb_schema::apartment::Apartment";
    const MODEL: &'static EntityModel = &MODEL;

    fn from_row(row: &Row) -> Result<Self, ResponseError> {
        Ok(Self {
            id: row.int("Apartment", "id")?,
            number: row.text("Apartment", "number")?,
            floor: row.int("Apartment", "floor")?,
            property_type: parse_enum::<PropertyType>(row, "Apartment", "type")?,
            area: row.float("Apartment", "area")?,
            price: row.float("Apartment", "price")?,
            price_per_m2: row.float("Apartment", "price_per_m2")?,
            zone: row.text("Apartment", "zone")?,
            status: parse_enum::<ApartmentStatus>(row, "Apartment", "status")?,
            image: row.opt_text("Apartment", "image")?,
            notes: row.opt_text("Apartment", "notes")?,
            updated_at: row.opt_timestamp("Apartment", "updated_at")?,
            project_id: row.int("Apartment", "project_id")?,
            client_id: row.opt_int("Apartment", "client_id")?,
            user_id: row.opt_int("Apartment", "user_id")?,
        })
    }

    fn to_row(&self) -> Row {
        Row::new()
            .with("id", self.id)
            .with("number", self.number.clone())
            .with("floor", self.floor)
            .with("type", self.property_type)
            .with("area", self.area)
            .with("price", self.price)
            .with("price_per_m2", self.price_per_m2)
            .with("zone", self.zone.clone())
            .with("status", self.status)
            .with("image", self.image.clone())
            .with("notes", self.notes.clone())
            .with("updated_at", self.updated_at)
            .with("project_id", self.project_id)
            .with("client_id", self.client_id)
            .with("user_id", self.user_id)
    }
}
