use chrono::{DateTime, Utc};
use estatedb_core::{
    model::{EntityModel, FieldKind, FieldModel},
    response::{ResponseError, Row},
    traits::EntityKind,
    value::Float64,
};
use serde::{Deserialize, Serialize};

///
/// MonthlyTarget
/// Sales goal for one reporting window. No relations.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct MonthlyTarget {
    pub id: i64,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub target: Float64,
}

static FIELDS: [FieldModel; 4] = [
    FieldModel {
        name: "id",
        kind: FieldKind::Int,
        nullable: false,
        unique: true,
    },
    FieldModel {
        name: "start_date",
        kind: FieldKind::Timestamp,
        nullable: false,
        unique: false,
    },
    FieldModel {
        name: "end_date",
        kind: FieldKind::Timestamp,
        nullable: false,
        unique: false,
    },
    FieldModel {
        name: "target",
        kind: FieldKind::Float,
        nullable: false,
        unique: false,
    },
];

pub static MODEL: EntityModel = EntityModel {
    path: "estatedb_schema::monthly_target::MonthlyTarget",
    entity_name: "MonthlyTarget",
    primary_key: &FIELDS[0],
    fields: &FIELDS,
    relations: &[],
};

impl EntityKind for MonthlyTarget {
    const PATH: &'static str = "estatedb_schema::monthly_target::MonthlyTarget";
    const MODEL: &'static EntityModel = &MODEL;

    fn from_row(row: &Row) -> Result<Self, ResponseError> {
        Ok(Self {
            id: row.int("MonthlyTarget", "id")?,
            start_date: row.timestamp("MonthlyTarget", "start_date")?,
            end_date: row.timestamp("MonthlyTarget", "end_date")?,
            target: row.float("MonthlyTarget", "target")?,
        })
    }

    fn to_row(&self) -> Row {
        Row::new()
            .with("id", self.id)
            .with("start_date", self.start_date)
            .with("end_date", self.end_date)
            .with("target", self.target)
    }
}
