//! The `fractals` table and the job document stored in it.
//!
//! A row holds the caller-supplied id and a JSON text blob; the blob is the
//! [`FractalData`] document. API responses are [`FractalJob`], which is the
//! same document with the id attached as `uuid`.

use sea_orm::{
    entity::prelude::*, ActiveModelTrait, ActiveValue::Unchanged, DatabaseConnection, Set, SqlErr,
};
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;

/// Width of the `fractal_id` column.
pub const MAX_ID_LEN: usize = 36;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "fractals")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub fractal_id: String,
    #[sea_orm(column_type = "Text")]
    pub data: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Bounding region and iteration depth of a computation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub xa: f64,
    pub xb: f64,
    pub ya: f64,
    pub yb: f64,
    pub iterations: i64,
}

/// Output image size in pixels.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Dimension {
    pub width: i64,
    pub height: i64,
}

/// The persisted document.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FractalData {
    pub parameter: Parameter,
    pub dimension: Dimension,
    pub checksum: String,
    pub duration: f64,
}

impl FractalData {
    /// A job that has not reported a result yet.
    pub fn pending(parameter: Parameter, dimension: Dimension) -> Self {
        Self { parameter, dimension, checksum: String::new(), duration: 0.0 }
    }

    pub fn encode(&self) -> Result<String, ModelError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn decode(blob: &str) -> Result<Self, ModelError> {
        Ok(serde_json::from_str(blob)?)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FractalJob {
    #[serde(rename = "uuid")]
    pub id: String,
    #[serde(flatten)]
    pub data: FractalData,
}

impl FractalJob {
    pub fn new(id: impl Into<String>, data: FractalData) -> Self {
        Self { id: id.into(), data }
    }

    /// Record a computation result, replacing any earlier one.
    pub fn record_result(&mut self, checksum: String, duration: f64) {
        self.data.checksum = checksum;
        self.data.duration = duration;
    }
}

impl TryFrom<Model> for FractalJob {
    type Error = ModelError;

    fn try_from(m: Model) -> Result<Self, Self::Error> {
        let data = FractalData::decode(&m.data)?;
        Ok(FractalJob { id: m.fractal_id, data })
    }
}

fn db_err(e: DbErr) -> ModelError {
    ModelError::Db(e.to_string())
}

pub async fn find(db: &DatabaseConnection, id: &str) -> Result<Option<FractalJob>, ModelError> {
    let found = Entity::find_by_id(id.to_string()).one(db).await.map_err(db_err)?;
    found.map(FractalJob::try_from).transpose()
}

/// Insert a new row. A primary-key collision is reported as `Duplicate`.
pub async fn insert(db: &DatabaseConnection, job: &FractalJob) -> Result<(), ModelError> {
    let am = ActiveModel {
        fractal_id: Set(job.id.clone()),
        data: Set(job.data.encode()?),
    };
    match Entity::insert(am).exec_without_returning(db).await {
        Ok(_) => Ok(()),
        Err(e) => match e.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => {
                Err(ModelError::Duplicate(job.id.clone()))
            }
            _ => Err(db_err(e)),
        },
    }
}

/// Overwrite the document of an existing row.
pub async fn update(db: &DatabaseConnection, job: &FractalJob) -> Result<(), ModelError> {
    let am = ActiveModel {
        fractal_id: Unchanged(job.id.clone()),
        data: Set(job.data.encode()?),
    };
    match am.update(db).await {
        Ok(_) => Ok(()),
        Err(DbErr::RecordNotUpdated) => Err(ModelError::NotFound(job.id.clone())),
        Err(e) => Err(db_err(e)),
    }
}
