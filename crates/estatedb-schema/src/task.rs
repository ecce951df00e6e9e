use crate::{enums::TodoStatus, user::parse_enum};
use chrono::{DateTime, Utc};
use estatedb_core::{
    model::{EntityModel, FieldKind, FieldModel, RelationArity, RelationModel},
    response::{ResponseError, Row},
    traits::EntityKind,
};
use serde::{Deserialize, Serialize};

///
/// Task
/// A dated to-do item, optionally attributed to the user who created it.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Task {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub due_date: DateTime<Utc>,
    pub status: TodoStatus,
    pub created_by_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

static FIELDS: [FieldModel; 8] = [
    FieldModel {
        name: "id",
        kind: FieldKind::Int,
        nullable: false,
        unique: true,
    },
    FieldModel {
        name: "title",
        kind: FieldKind::Text,
        nullable: false,
        unique: false,
    },
    FieldModel {
        name: "description",
        kind: FieldKind::Text,
        nullable: true,
        unique: false,
    },
    FieldModel {
        name: "due_date",
        kind: FieldKind::Timestamp,
        nullable: false,
        unique: false,
    },
    FieldModel {
        name: "status",
        kind: FieldKind::Enum {
            values: TodoStatus::VALUES,
        },
        nullable: false,
        unique: false,
    },
    FieldModel {
        name: "created_by_id",
        kind: FieldKind::Int,
        nullable: true,
        unique: false,
    },
    FieldModel {
        name: "created_at",
        kind: FieldKind::Timestamp,
        nullable: false,
        unique: false,
    },
    FieldModel {
        name: "updated_at",
        kind: FieldKind::Timestamp,
        nullable: false,
        unique: false,
    },
];

static RELATIONS: [RelationModel; 2] = [
    RelationModel {
        name: "created_by",
        target: "User",
        arity: RelationArity::One,
        required: false,
        fk_field: Some("created_by_id"),
    },
    RelationModel {
        name: "comments",
        target: "Comment",
        arity: RelationArity::Many,
        required: false,
        fk_field: None,
    },
];

pub static MODEL: EntityModel = EntityModel {
    path: "estatedb_schema::task::Task",
    entity_name: "Task",
    primary_key: &FIELDS[0],
    fields: &FIELDS,
    relations: &RELATIONS,
};

impl EntityKind for Task {
    const PATH: &'static str = "estatedb_schema::task::Task";
    const MODEL: &'static EntityModel = &MODEL;

    fn from_row(row: &Row) -> Result<Self, ResponseError> {
        Ok(Self {
            id: row.int("Task", "id")?,
            title: row.text("Task", "title")?,
            description: row.opt_text("Task", "description")?,
            due_date: row.timestamp("Task", "due_date")?,
            status: parse_enum::<TodoStatus>(row, "Task", "status")?,
            created_by_id: row.opt_int("Task", "created_by_id")?,
            created_at: row.timestamp("Task", "created_at")?,
            updated_at: row.timestamp("Task", "updated_at")?,
        })
    }

    fn to_row(&self) -> Row {
        Row::new()
            .with("id", self.id)
            .with("title", self.title.clone())
            .with("description", self.description.clone())
            .with("due_date", self.due_date)
            .with("status", self.status)
            .with("created_by_id", self.created_by_id)
            .with("created_at", self.created_at)
            .with("updated_at", self.updated_at)
    }
}
