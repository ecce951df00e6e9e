use chrono::{DateTime, Utc};
use estatedb_core::{
    model::{EntityModel, FieldKind, FieldModel, RelationArity, RelationModel},
    response::{ResponseError, Row},
    traits::EntityKind,
};
use serde::{Deserialize, Serialize};

///
/// Comment
/// Free-text note attached to a task.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Comment {
    pub id: i64,
    pub content: String,
    pub task_id: i64,
    pub created_at: DateTime<Utc>,
}

static FIELDS: [FieldModel; 4] = [
    FieldModel {
        name: "id",
        kind: FieldKind::Int,
        nullable: false,
        unique: true,
    },
    FieldModel {
        name: "content",
        kind: FieldKind::Text,
        nullable: false,
        unique: false,
    },
    FieldModel {
        name: "task_id",
        kind: FieldKind::Int,
        nullable: false,
        unique: false,
    },
    FieldModel {
        name: "created_at",
        kind: FieldKind::Timestamp,
        nullable: false,
        unique: false,
    },
];

static RELATIONS: [RelationModel; 1] = [RelationModel {
    name: "task",
    target: "Task",
    arity: RelationArity::One,
    required: true,
    fk_field: Some("task_id"),
}];

pub static MODEL: EntityModel = EntityModel {
    path: "estatedb_schema::comment::Comment",
    entity_name: "Comment",
    primary_key: &FIELDS[0],
    fields: &FIELDS,
    relations: &RELATIONS,
};

impl EntityKind for Comment {
    const PATH: &'static str = "estatedb_schema::comment::Comment";
    const MODEL: &'static EntityModel = &MODEL;

    fn from_row(row: &Row) -> Result<Self, ResponseError> {
        Ok(Self {
            id: row.int("Comment", "id")?,
            content: row.text("Comment", "content")?,
            task_id: row.int("Comment", "task_id")?,
            created_at: row.timestamp("Comment", "created_at")?,
        })
    }

    fn to_row(&self) -> Row {
        Row::new()
            .with("id", self.id)
            .with("content", self.content.clone())
            .with("task_id", self.task_id)
            .with("created_at", self.created_at)
    }
}
