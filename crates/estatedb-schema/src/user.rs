use crate::enums::{Role, Status};
use estatedb_core::{
    model::{EntityModel, FieldKind, FieldModel, RelationArity, RelationModel},
    response::{ResponseError, Row},
    traits::EntityKind,
};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

///
/// User
/// CRM account: agents create clients and tasks and get apartments assigned.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone_number: String,
    pub status: Status,
    pub role: Role,
    pub password_hash: String,
    pub notes: Option<String>,
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
        name: "status",
        kind: FieldKind::Enum {
            values: Status::VALUES,
        },
        nullable: false,
        unique: false,
    },
    FieldModel {
        name: "role",
        kind: FieldKind::Enum {
            values: Role::VALUES,
        },
        nullable: false,
        unique: false,
    },
    FieldModel {
        name: "password_hash",
        kind: FieldKind::Text,
        nullable: false,
        unique: false,
    },
    FieldModel {
        name: "notes",
        kind: FieldKind::Text,
        nullable: true,
        unique: false,
    },
];

static RELATIONS: [RelationModel; 3] = [
    RelationModel {
        name: "clients",
        target: "Client",
        arity: RelationArity::Many,
        required: false,
        fk_field: None,
    },
    RelationModel {
        name: "apartments",
        target: "Apartment",
        arity: RelationArity::Many,
        required: false,
        fk_field: None,
    },
    RelationModel {
        name: "tasks",
        target: "Task",
        arity: RelationArity::Many,
        required: false,
        fk_field: None,
    },
];

pub static MODEL: EntityModel = EntityModel {
    path: "estatedb_schema::user::User",
    entity_name: "User",
    primary_key: &FIELDS[0],
    fields: &FIELDS,
    relations: &RELATIONS,
};

impl EntityKind for User {
    const PATH: &'static str = "estatedb_schema::user::User";
    const MODEL: &'static EntityModel = &MODEL;

    fn from_row(row: &Row) -> Result<Self, ResponseError> {
        Ok(Self {
            id: row.int("User", "id")?,
            name: row.text("User", "name")?,
            email: row.text("User", "email")?,
            phone_number: row.text("User", "phone_number")?,
            status: parse_enum::<Status>(row, "User", "status")?,
            role: parse_enum::<Role>(row, "User", "role")?,
            password_hash: row.text("User", "password_hash")?,
            notes: row.opt_text("User", "notes")?,
        })
    }

    fn to_row(&self) -> Row {
        Row::new()
            .with("id", self.id)
            .with("name", self.name.clone())
            .with("email", self.email.clone())
            .with("phone_number", self.phone_number.clone())
            .with("status", self.status)
            .with("role", self.role)
            .with("password_hash", self.password_hash.clone())
            .with("notes", self.notes.clone())
    }
}

// Shared enum decode used by every binding in this crate.
pub(crate) fn parse_enum<T: FromStr>(
    row: &Row,
    entity: &'static str,
    field: &'static str,
) -> Result<T, ResponseError> {
    let variant = row.enum_variant(entity, field)?;

    T::from_str(variant).map_err(|_| ResponseError::UnknownEnumVariant {
        entity: entity.to_string(),
        field: field.to_string(),
        variant: variant.to_string(),
    })
}
