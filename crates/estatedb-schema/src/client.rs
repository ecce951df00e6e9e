use crate::{enums::ClientStatus, user::parse_enum};
use estatedb_core::{
    model::{EntityModel, FieldKind, FieldModel, RelationArity, RelationModel},
    response::{ResponseError, Row},
    traits::EntityKind,
};
use serde::{Deserialize, Serialize};

///
/// Client
/// A lead or buyer, always owned by the user who created it.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Client {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone_number: String,
    pub provenance: String,
    pub status: ClientStatus,
    pub notes: Option<String>,
    pub created_by_id: i64,
}

static FIELDS: [FieldModel; 8] = [
    FieldModel {
        name: "id",
        kind: FieldKind::Int,
        nullable: false,
        unique: true,
    },
    FieldModel {
        name: "name",
        kind: FieldKind::Text,
        nullable: false,
        unique: false,
    },
    FieldModel {
        name: "email",
        kind: FieldKind::Text,
        nullable: false,
        unique: true,
    },
    FieldModel {
        name: "phone_number",
        kind: FieldKind::Text,
        nullable: false,
        unique: false,
    },
    FieldModel {
        name: "provenance",
        kind: FieldKind::Text,
        nullable: false,
        unique: false,
    },
    FieldModel {
        name: "status",
        kind: FieldKind::Enum {
            values: ClientStatus::VALUES,
        },
        nullable: false,
        unique: false,
    },
    FieldModel {
        name: "notes",
        kind: FieldKind::Text,
        nullable: true,
        unique: false,
    },
    FieldModel {
        name: "created_by_id",
        kind: FieldKind::Int,
        nullable: false,
        unique: false,
    },
];

static RELATIONS: [RelationModel; 3] = [
    RelationModel {
        name: "created_by",
        target: "User",
        arity: RelationArity::One,
        required: true,
        fk_field: Some("created_by_id"),
    },
    // Apartments this client has purchased or reserved.
    RelationModel {
        name: "apartments",
        target: "Apartment",
        arity: RelationArity::Many,
        required: false,
        fk_field: None,
    },
    // Many-to-many interest link, mirrored by Apartment.interested_clients.
    RelationModel {
        name: "interested_apartments",
        target: "Apartment",
        arity: RelationArity::Many,
        required: false,
        fk_field: None,
    },
];

pub static MODEL: EntityModel = EntityModel {
    path: "estatedb_schema::client::Client",
    entity_name: "Client",
    primary_key: &FIELDS[0],
    fields: &FIELDS,
    relations: &RELATIONS,
};

impl EntityKind for Client {
    const PATH: &'static str = "estatedb_schema::client::Client";
    const MODEL: &'static EntityModel = &MODEL;

    fn from_row(row: &Row) -> Result<Self, ResponseError> {
        Ok(Self {
            id: row.int("Client", "id")?,
            name: row.text("Client", "name")?,
            email: row.text("Client", "email")?,
            phone_number: row.text("Client", "phone_number")?,
            provenance: row.text("Client", "provenance")?,
            status: parse_enum::<ClientStatus>(row, "Client", "status")?,
            notes: row.opt_text("Client", "notes")?,
            created_by_id: row.int("Client", "created_by_id")?,
        })
    }

    fn to_row(&self) -> Row {
        Row::new()
            .with("id", self.id)
            .with("name", self.name.clone())
            .with("email", self.email.clone())
            .with("phone_number", self.phone_number.clone())
            .with("provenance", self.provenance.clone())
            .with("status", self.status)
            .with("notes", self.notes.clone())
            .with("created_by_id", self.created_by_id)
    }
}
