use anyhow::Result;
use sea_orm::{ActiveModelTrait, EntityTrait, Set};

use crate::db::connect_memory;
use crate::errors::ModelError;
use crate::fractal::{self, Dimension, FractalData, FractalJob, Parameter};

fn job(id: &str) -> FractalJob {
    FractalJob::new(
        id,
        FractalData::pending(
            Parameter { xa: -2.5, xb: 1.25, ya: -1.0, yb: 1.0, iterations: 250 },
            Dimension { width: 1024, height: 768 },
        ),
    )
}

#[tokio::test]
async fn insert_then_find_round_trips() -> Result<()> {
    let db = connect_memory().await?;
    fractal::insert(&db, &job("round-trip")).await?;

    let found = fractal::find(&db, "round-trip").await?.expect("row present");
    assert_eq!(found, job("round-trip"));
    Ok(())
}

#[tokio::test]
async fn find_missing_is_none() -> Result<()> {
    let db = connect_memory().await?;
    assert!(fractal::find(&db, "nope").await?.is_none());
    Ok(())
}

#[tokio::test]
async fn duplicate_insert_keeps_first_row() -> Result<()> {
    let db = connect_memory().await?;
    fractal::insert(&db, &job("dup")).await?;

    let mut second = job("dup");
    second.data.parameter.iterations = 1;
    let err = fractal::insert(&db, &second).await.unwrap_err();
    assert!(matches!(err, ModelError::Duplicate(ref id) if id == "dup"));

    let stored = fractal::find(&db, "dup").await?.expect("row present");
    assert_eq!(stored.data.parameter.iterations, 250);
    Ok(())
}

#[tokio::test]
async fn update_overwrites_document() -> Result<()> {
    let db = connect_memory().await?;
    let mut j = job("upd");
    fractal::insert(&db, &j).await?;

    j.record_result("deadbeef".into(), 12.5);
    fractal::update(&db, &j).await?;

    let stored = fractal::find(&db, "upd").await?.expect("row present");
    assert_eq!(stored.data.checksum, "deadbeef");
    assert_eq!(stored.data.duration, 12.5);
    Ok(())
}

#[tokio::test]
async fn update_of_missing_row_is_not_found() -> Result<()> {
    let db = connect_memory().await?;
    let err = fractal::update(&db, &job("ghost")).await.unwrap_err();
    assert!(matches!(err, ModelError::NotFound(_)));
    assert!(fractal::find(&db, "ghost").await?.is_none());
    Ok(())
}

#[tokio::test]
async fn corrupt_blob_surfaces_on_find() -> Result<()> {
    let db = connect_memory().await?;
    fractal::ActiveModel { fractal_id: Set("bad".into()), data: Set("[]".into()) }
        .insert(&db)
        .await?;
    assert!(matches!(fractal::find(&db, "bad").await, Err(ModelError::Codec(_))));
    assert_eq!(fractal::Entity::find().all(&db).await?.len(), 1);
    Ok(())
}
