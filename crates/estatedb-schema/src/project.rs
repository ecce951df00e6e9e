use estatedb_core::{
    model::{EntityModel, FieldKind, FieldModel, RelationArity, RelationModel},
    response::{ResponseError, Row},
    traits::EntityKind,
    value::Float64,
};
use serde::{Deserialize, Serialize};

///
/// Project
/// A development holding many apartments.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Project {
    pub id: i64,
    pub name: String,
    pub address: String,
    pub total_surface: Float64,
    pub number_of_apartments: i64,
    pub image: Option<String>,
    pub notes: Option<String>,
}

static FIELDS: [FieldModel; 7] = [
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
        name: "address",
        kind: FieldKind::Text,
        nullable: false,
        unique: false,
    },
    FieldModel {
        name: "total_surface",
        kind: FieldKind::Float,
        nullable: false,
        unique: false,
    },
    FieldModel {
        name: "number_of_apartments",
        kind: FieldKind::Int,
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
];

static RELATIONS: [RelationModel; 1] = [RelationModel {
    name: "apartments",
    target: "Apartment",
    arity: RelationArity::Many,
    required: false,
    fk_field: None,
}];

pub static MODEL: EntityModel = EntityModel {
    path: "estatedb_schema::project::Project",
    entity_name: "Project",
    primary_key: &FIELDS[0],
    fields: &FIELDS,
    relations: &RELATIONS,
};

impl EntityKind for Project {
    const PATH: &'static str = "estatedb_schema::project::Project";
    const MODEL: &'static EntityModel = &MODEL;

    fn from_row(row: &Row) -> Result<Self, ResponseError> {
        Ok(Self {
            id: row.int("Project", "id")?,
            name: row.text("Project", "name")?,
            address: row.text("Project", "address")?,
            total_surface: row.float("Project", "total_surface")?,
            number_of_apartments: row.int("Project", "number_of_apartments")?,
            image: row.opt_text("Project", "image")?,
            notes: row.opt_text("Project", "notes")?,
        })
    }

    fn to_row(&self) -> Row {
        Row::new()
            .with("id", self.id)
            .with("name", self.name.clone())
            .with("address", self.address.clone())
            .with("total_surface", self.total_surface)
            .with("number_of_apartments", self.number_of_apartments)
            .with("image", self.image.clone())
            .with("notes", self.notes.clone())
    }
}
