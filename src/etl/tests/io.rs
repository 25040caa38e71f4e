use crate::config::DbSettings;
use crate::etl::db::{PostgresSink, create_table_sql, quote_ident};
use crate::etl::extract::extract;
use crate::etl::load::{CsvFileSink, TableSink as _};
use crate::etl::observer::TransformEvent;
use crate::etl::transform::{TransformPolicy, transform};
use anyhow::Result;
use polars::prelude::*;

#[test]
fn test_extract_missing_file_is_absent() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let result = extract(&dir.path().join("Car_Insurance_Claim.csv"))?;
    assert!(result.is_none());
    Ok(())
}

#[test]
fn test_extract_keeps_identifier_text() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("claims.csv");
    std::fs::write(
        &path,
        "ID,AGE,CREDIT_SCORE,ANNUAL_MILEAGE,PAST_ACCIDENTS\n\
         00123,34,0.61,12000,0\n\
         04567,NA,,,1\n",
    )?;

    let df = extract(&path)?.ok_or_else(|| anyhow::anyhow!("file exists"))?;
    assert_eq!(df.height(), 2);

    let ids = df.column("ID")?.as_materialized_series();
    assert_eq!(ids.str()?.get(0), Some("00123"));
    assert_eq!(ids.str()?.get(1), Some("04567"));

    assert_eq!(df.column("AGE")?.null_count(), 1);
    assert_eq!(df.column("CREDIT_SCORE")?.null_count(), 1);
    Ok(())
}

#[test]
fn test_extracted_nan_cells_are_filled() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("claims.csv");
    std::fs::write(
        &path,
        "ID,AGE,CREDIT_SCORE,ANNUAL_MILEAGE,PAST_ACCIDENTS\n\
         1,30,0.5,100,0\n\
         2,nan,nan,200,1\n\
         3,40,0.7,nan,0\n",
    )?;

    let raw = extract(&path)?.ok_or_else(|| anyhow::anyhow!("file exists"))?;
    assert_eq!(raw.column("AGE")?.null_count(), 1);
    assert_eq!(raw.column("CREDIT_SCORE")?.null_count(), 1);
    assert_eq!(raw.column("ANNUAL_MILEAGE")?.null_count(), 1);

    let clean = transform(Some(&raw), &TransformPolicy::default(), &|_: &TransformEvent| {})?
        .ok_or_else(|| anyhow::anyhow!("input present"))?;

    let credit = clean.column("credit_score")?.as_materialized_series();
    let credit: Vec<Option<f64>> = credit.f64()?.into_iter().collect();
    assert!(credit.iter().all(|v| v.is_some_and(|v| !v.is_nan())));
    assert!((credit[1].unwrap_or_default() - 0.6).abs() < 1e-9);

    let mileage = clean.column("annual_mileage")?.as_materialized_series();
    assert_eq!(mileage.f64()?.get(2), Some(150.0));

    let groups = clean.column("age_group")?.as_materialized_series();
    assert_eq!(groups.str()?.get(1), Some("26-40"));
    Ok(())
}

#[test]
fn test_csv_sink_writes_header_without_index() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("processed").join("clean.csv");
    let mut df = df!(
        "id" => &["1001", "1002"],
        "age_group" => &[Some("16-25"), None],
        "had_past_accidents" => &[0i32, 1]
    )?;

    let sink = CsvFileSink::new(&path);
    assert!(sink.load(&mut df)?);

    let written = std::fs::read_to_string(&path)?;
    let lines: Vec<&str> = written.lines().collect();
    assert_eq!(lines, ["id,age_group,had_past_accidents", "1001,16-25,0", "1002,,1"]);
    Ok(())
}

#[test]
fn test_csv_sink_unwritable_path_is_error() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let blocker = dir.path().join("not_a_dir");
    std::fs::write(&blocker, "")?;

    let mut df = df!("id" => &["1"])?;
    let sink = CsvFileSink::new(blocker.join("clean.csv"));
    assert!(sink.load(&mut df).is_err());
    Ok(())
}

#[test]
fn test_postgres_sink_unreachable_host_reports_false() -> Result<()> {
    let connection = DbSettings {
        host: "127.0.0.1".to_owned(),
        // Nothing listens on port 1; the connect is refused immediately.
        port: 1,
        ..DbSettings::default()
    };
    let mut df = df!("id" => &["1001"], "had_past_accidents" => &[1i32])?;

    let sink = PostgresSink::new(connection, "car_insurance_claims");
    assert!(!sink.load(&mut df)?);
    Ok(())
}

#[test]
fn test_create_table_sql() -> Result<()> {
    let df = df!(
        "id" => &["1001"],
        "credit_score" => &[0.5],
        "had_past_accidents" => &[1i32],
        "age_group" => &["16-25"]
    )?;

    let sql = create_table_sql(&quote_ident("claims"), &df.schema());
    assert_eq!(
        sql,
        "CREATE TABLE \"claims\" (\"id\" TEXT, \"credit_score\" DOUBLE PRECISION, \
         \"had_past_accidents\" BIGINT, \"age_group\" TEXT)"
    );
    assert_eq!(quote_ident("odd\"name"), "\"odd\"\"name\"");
    Ok(())
}
