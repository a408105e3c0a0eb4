// lumen-core/src/infrastructure/adapters/duckdb.rs

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveTime};
use duckdb::types::{TimeUnit, Value as DuckValue};
use duckdb::{Config, Connection, params_from_iter};
use std::path::Path;
use std::sync::Mutex;
use tracing::{debug, info, instrument};

use crate::domain::error::DomainError;
use crate::domain::record::{Dataset, Record, Value};
use crate::error::LumenError;
use crate::infrastructure::error::InfrastructureError;
use crate::ports::source::{RecordSource, TableStore};

const IN_MEMORY: &str = ":memory:";
// Days from 0001-01-01 to 1970-01-01
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

/// Storage adapter over a DuckDB file. The connection is opened on first use.
pub struct DuckDBConnector {
    db_path: String,
    conn: Mutex<Option<Connection>>,
}

impl DuckDBConnector {
    pub fn new(db_path: impl Into<String>) -> Self {
        Self {
            db_path: db_path.into(),
            conn: Mutex::new(None),
        }
    }

    pub fn in_memory() -> Self {
        Self::new(IN_MEMORY)
    }

    pub fn db_path(&self) -> &str {
        &self.db_path
    }

    fn open(&self) -> Result<Connection, InfrastructureError> {
        let config = Config::default();
        let opened = if self.db_path == IN_MEMORY {
            Connection::open_in_memory_with_flags(config)
        } else {
            if let Some(parent) = Path::new(&self.db_path).parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent)?;
                }
            }
            Connection::open_with_flags(&self.db_path, config)
        };
        debug!(path = %self.db_path, "opening DuckDB connection");
        opened.map_err(|source| InfrastructureError::ConnectionFailed {
            path: self.db_path.clone(),
            source,
        })
    }

    fn with_connection<T>(
        &self,
        f: impl FnOnce(&mut Connection) -> Result<T, LumenError>,
    ) -> Result<T, LumenError> {
        let mut guard = self
            .conn
            .lock()
            .map_err(|_| LumenError::InternalError("DuckDB Mutex Poisoned".into()))?;
        if guard.is_none() {
            *guard = Some(self.open()?);
        }
        let conn = guard
            .as_mut()
            .ok_or_else(|| LumenError::InternalError("DuckDB connection unavailable".into()))?;
        f(conn)
    }
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

fn fetch_column_names(conn: &Connection, table: &str) -> Result<Vec<String>, LumenError> {
    let mut stmt = conn.prepare(&format!(
        "PRAGMA table_info('{}')",
        table.replace('\'', "''")
    ))?;
    let rows = stmt.query_map([], |row| row.get::<_, String>("name"))?;

    let mut columns = Vec::new();
    for row in rows {
        columns.push(row?);
    }
    Ok(columns)
}

fn timestamp_micros(unit: TimeUnit, value: i64) -> i64 {
    match unit {
        TimeUnit::Second => value.saturating_mul(1_000_000),
        TimeUnit::Millisecond => value.saturating_mul(1_000),
        TimeUnit::Microsecond => value,
        TimeUnit::Nanosecond => value / 1_000,
    }
}

fn time_of_day(micros: i64) -> Option<NaiveTime> {
    let secs = u32::try_from(micros.div_euclid(1_000_000)).ok()?;
    let nanos = u32::try_from(micros.rem_euclid(1_000_000) * 1_000).ok()?;
    NaiveTime::from_num_seconds_from_midnight_opt(secs, nanos)
}

fn from_duckdb(value: DuckValue) -> Value {
    match value {
        DuckValue::Null => Value::Null,
        DuckValue::Boolean(b) => Value::Integer(i64::from(b)),
        DuckValue::TinyInt(i) => Value::Integer(i64::from(i)),
        DuckValue::SmallInt(i) => Value::Integer(i64::from(i)),
        DuckValue::Int(i) => Value::Integer(i64::from(i)),
        DuckValue::BigInt(i) => Value::Integer(i),
        DuckValue::UTinyInt(i) => Value::Integer(i64::from(i)),
        DuckValue::USmallInt(i) => Value::Integer(i64::from(i)),
        DuckValue::UInt(i) => Value::Integer(i64::from(i)),
        DuckValue::UBigInt(i) => i64::try_from(i)
            .map(Value::Integer)
            .unwrap_or(Value::Float(i as f64)),
        DuckValue::HugeInt(i) => i64::try_from(i)
            .map(Value::Integer)
            .unwrap_or(Value::Float(i as f64)),
        DuckValue::Float(f) => Value::Float(f64::from(f)),
        DuckValue::Double(f) => Value::Float(f),
        DuckValue::Text(s) | DuckValue::Enum(s) => Value::Text(s),
        DuckValue::Date32(days) => days
            .checked_add(UNIX_EPOCH_DAYS_FROM_CE)
            .and_then(NaiveDate::from_num_days_from_ce_opt)
            .map(Value::Date)
            .unwrap_or(Value::Null),
        DuckValue::Timestamp(unit, raw) => {
            DateTime::from_timestamp_micros(timestamp_micros(unit, raw))
                .map(|ts| Value::Timestamp(ts.naive_utc()))
                .unwrap_or(Value::Null)
        }
        // DECIMAL renders exactly ("5000.00"); metrics only need it as a float
        DuckValue::Decimal(d) => {
            let text = d.to_string();
            text.parse().map(Value::Float).unwrap_or(Value::Text(text))
        }
        DuckValue::Time64(unit, raw) => time_of_day(timestamp_micros(unit, raw))
            .map(|t| Value::Text(t.to_string()))
            .unwrap_or(Value::Null),
        DuckValue::Interval {
            months,
            days,
            nanos,
        } => Value::Text(format!(
            "{} months {} days {} us",
            months,
            days,
            nanos / 1_000
        )),
        DuckValue::Blob(bytes) => Value::Text(String::from_utf8_lossy(&bytes).into_owned()),
        // Nested types (LIST, STRUCT, MAP, ...) have no flat cell form
        other => Value::Text(format!("{:?}", other)),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SqlType {
    BigInt,
    Double,
    Date,
    Timestamp,
    Varchar,
}

impl SqlType {
    fn as_str(self) -> &'static str {
        match self {
            SqlType::BigInt => "BIGINT",
            SqlType::Double => "DOUBLE",
            SqlType::Date => "DATE",
            SqlType::Timestamp => "TIMESTAMP",
            SqlType::Varchar => "VARCHAR",
        }
    }

    /// Narrowest type holding every non-null value of the column.
    fn infer(dataset: &Dataset, column: &str) -> Self {
        let mut inferred: Option<SqlType> = None;
        for value in dataset.records().iter().filter_map(|r| r.get(column)) {
            let this = match value {
                Value::Null => continue,
                Value::Integer(_) => SqlType::BigInt,
                Value::Float(_) => SqlType::Double,
                Value::Date(_) => SqlType::Date,
                Value::Timestamp(_) => SqlType::Timestamp,
                Value::Text(_) => return SqlType::Varchar,
            };
            inferred = Some(match (inferred, this) {
                (None, t) => t,
                (Some(a), b) if a == b => a,
                (Some(SqlType::BigInt), SqlType::Double) | (Some(SqlType::Double), SqlType::BigInt) => {
                    SqlType::Double
                }
                (Some(SqlType::Date), SqlType::Timestamp)
                | (Some(SqlType::Timestamp), SqlType::Date) => SqlType::Timestamp,
                _ => return SqlType::Varchar,
            });
        }
        inferred.unwrap_or(SqlType::Varchar)
    }

    fn bind(self, value: Option<&Value>) -> DuckValue {
        match (self, value) {
            (_, None | Some(Value::Null)) => DuckValue::Null,
            (SqlType::BigInt, Some(Value::Integer(i))) => DuckValue::BigInt(*i),
            (SqlType::Double, Some(Value::Integer(i))) => DuckValue::Double(*i as f64),
            (SqlType::Double, Some(Value::Float(f))) => DuckValue::Double(*f),
            // Dates travel as ISO text and are cast by the engine
            (_, Some(v)) => DuckValue::Text(v.to_string()),
        }
    }
}

#[async_trait]
impl RecordSource for DuckDBConnector {
    #[instrument(skip(self), fields(engine = "duckdb"))]
    async fn load_table(&self, table: &str) -> Result<Dataset, LumenError> {
        self.with_connection(|conn| {
            let columns = fetch_column_names(conn, table)?;

            let mut stmt = conn.prepare(&format!("SELECT * FROM {}", quote_ident(table)))?;
            let mut rows = stmt.query([])?;
            let mut records = Vec::new();
            while let Some(row) = rows.next()? {
                let mut record = Record::new();
                for (idx, column) in columns.iter().enumerate() {
                    record.insert(column.clone(), from_duckdb(row.get::<_, DuckValue>(idx)?));
                }
                records.push(record);
            }

            info!(table, rows = records.len(), "snapshot loaded");
            Ok(Dataset::new(table, columns, records))
        })
    }

    fn engine_name(&self) -> &str {
        "duckdb"
    }
}

#[async_trait]
impl TableStore for DuckDBConnector {
    #[instrument(skip(self, dataset), fields(rows = dataset.len()))]
    async fn replace_table(&self, table: &str, dataset: &Dataset) -> Result<usize, LumenError> {
        if dataset.columns().is_empty() {
            return Err(DomainError::SchemaError(format!(
                "cannot create table '{}' without columns",
                table
            ))
            .into());
        }

        let types: Vec<SqlType> = dataset
            .columns()
            .iter()
            .map(|c| SqlType::infer(dataset, c))
            .collect();
        let definition = dataset
            .columns()
            .iter()
            .zip(&types)
            .map(|(c, t)| format!("{} {}", quote_ident(c), t.as_str()))
            .collect::<Vec<_>>()
            .join(", ");
        let placeholders = types
            .iter()
            .map(|t| format!("CAST(? AS {})", t.as_str()))
            .collect::<Vec<_>>()
            .join(", ");

        self.with_connection(|conn| {
            let tx = conn.transaction()?;
            tx.execute_batch(&format!(
                "CREATE OR REPLACE TABLE {} ({})",
                quote_ident(table),
                definition
            ))?;
            {
                let mut insert = tx.prepare(&format!(
                    "INSERT INTO {} VALUES ({})",
                    quote_ident(table),
                    placeholders
                ))?;
                for record in dataset.records() {
                    let params = dataset
                        .columns()
                        .iter()
                        .zip(&types)
                        .map(|(c, t)| t.bind(record.get(c)));
                    insert.execute(params_from_iter(params))?;
                }
            }
            tx.commit()?;

            info!(table, rows = dataset.len(), "table replaced");
            Ok(dataset.len())
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::domain::quality::{QualityRule, RunContext, ZScoreOutliers};
    use anyhow::Result;
    use chrono::NaiveDateTime;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn campaigns() -> Dataset {
        Dataset::from_records(
            "fact_campaigns",
            vec![
                Record::new()
                    .with("campaign_id", 1)
                    .with("source", "google")
                    .with("spend", 10)
                    .with("date", day(2024, 1, 1)),
                Record::new()
                    .with("campaign_id", 2)
                    .with("source", Value::Null)
                    .with("spend", 2.5)
                    .with("date", Value::Null),
            ],
        )
    }

    #[tokio::test]
    async fn test_replace_then_load() -> Result<()> {
        let connector = DuckDBConnector::in_memory();
        let written = connector.replace_table("fact_campaigns", &campaigns()).await?;
        assert_eq!(written, 2);

        let loaded = connector.load_table("fact_campaigns").await?;
        assert_eq!(loaded.columns(), &["campaign_id", "source", "spend", "date"]);
        assert_eq!(loaded.len(), 2);

        let first = &loaded.records()[0];
        assert_eq!(first.get("campaign_id"), Some(&Value::Integer(1)));
        assert_eq!(first.get("source"), Some(&Value::Text("google".into())));
        // Mixed integer/float column widens to DOUBLE
        assert_eq!(first.get("spend"), Some(&Value::Float(10.0)));
        assert_eq!(first.get("date"), Some(&Value::Date(day(2024, 1, 1))));

        let second = &loaded.records()[1];
        assert_eq!(second.get("source"), Some(&Value::Null));
        assert_eq!(second.get("date"), Some(&Value::Null));
        Ok(())
    }

    #[tokio::test]
    async fn test_replace_overwrites_previous_rows() -> Result<()> {
        let connector = DuckDBConnector::in_memory();
        connector.replace_table("t", &campaigns()).await?;
        let smaller = Dataset::from_records("t", vec![Record::new().with("id", 7)]);
        connector.replace_table("t", &smaller).await?;

        let loaded = connector.load_table("t").await?;
        assert_eq!(loaded.columns(), &["id"]);
        assert_eq!(loaded.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_empty_table_keeps_schema() -> Result<()> {
        let connector = DuckDBConnector::in_memory();
        let dataset = Dataset::new("t", vec!["source".into(), "medium".into()], Vec::new());
        connector.replace_table("t", &dataset).await?;

        let loaded = connector.load_table("t").await?;
        assert!(loaded.is_empty());
        assert!(loaded.has_column("medium"));
        Ok(())
    }

    #[tokio::test]
    async fn test_missing_table_is_database_error() {
        let connector = DuckDBConnector::in_memory();
        let err = connector.load_table("does_not_exist").await.unwrap_err();
        assert!(err.is_database_error());
    }

    #[tokio::test]
    async fn test_no_columns_is_schema_error() {
        let connector = DuckDBConnector::in_memory();
        let dataset = Dataset::new("t", Vec::new(), Vec::new());
        let err = connector.replace_table("t", &dataset).await.unwrap_err();
        assert!(matches!(
            err,
            LumenError::Domain(DomainError::SchemaError(_))
        ));
    }

    #[tokio::test]
    async fn test_file_database_persists() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("nested").join("marketing.duckdb");
        let path = path.to_string_lossy().to_string();

        DuckDBConnector::new(path.clone())
            .replace_table("t", &campaigns())
            .await?;
        let reopened = DuckDBConnector::new(path);
        assert_eq!(reopened.load_table("t").await?.len(), 2);
        assert_eq!(reopened.engine_name(), "duckdb");
        Ok(())
    }

    #[test]
    fn test_value_mapping() {
        assert_eq!(from_duckdb(DuckValue::Boolean(true)), Value::Integer(1));
        assert_eq!(from_duckdb(DuckValue::Date32(0)), Value::Date(day(1970, 1, 1)));
        assert_eq!(from_duckdb(DuckValue::Date32(19_723)), Value::Date(day(2024, 1, 1)));

        let noon: NaiveDateTime = day(2024, 1, 1).and_hms_opt(12, 0, 0).unwrap();
        let micros = noon.and_utc().timestamp_micros();
        assert_eq!(
            from_duckdb(DuckValue::Timestamp(TimeUnit::Microsecond, micros)),
            Value::Timestamp(noon)
        );
        assert_eq!(
            from_duckdb(DuckValue::Timestamp(TimeUnit::Second, micros / 1_000_000)),
            Value::Timestamp(noon)
        );
    }

    #[tokio::test]
    async fn test_decimal_metrics_feed_the_outlier_rule() -> Result<()> {
        let connector = DuckDBConnector::in_memory();
        let mut rows: Vec<String> = (0..24).map(|i| format!("({}, 10.00)", i)).collect();
        rows.push("(24, 5000.00)".to_string());
        let sql = format!(
            "CREATE TABLE spend_daily (campaign_id INTEGER, spend DECIMAL(12,2));
             INSERT INTO spend_daily VALUES {};",
            rows.join(", ")
        );
        connector.with_connection(|conn| Ok(conn.execute_batch(&sql)?))?;

        let loaded = connector.load_table("spend_daily").await?;
        assert_eq!(loaded.records()[0].get("spend"), Some(&Value::Float(10.0)));
        assert_eq!(loaded.records()[24].get("spend"), Some(&Value::Float(5000.0)));

        let ctx = RunContext::now();
        let outcome = ZScoreOutliers::default().evaluate(&loaded, &ctx);
        assert_eq!(outcome.count, 1);
        assert_eq!(
            outcome.flagged[0].get("campaign_id"),
            Some(&Value::Integer(24))
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_time_and_blob_columns_load_as_text() -> Result<()> {
        let connector = DuckDBConnector::in_memory();
        connector.with_connection(|conn| {
            Ok(conn.execute_batch(
                "CREATE TABLE misc AS SELECT TIME '08:30:15' AS sent_at, 'raw'::BLOB AS payload;",
            )?)
        })?;

        let loaded = connector.load_table("misc").await?;
        let row = &loaded.records()[0];
        assert_eq!(row.get("sent_at"), Some(&Value::Text("08:30:15".into())));
        assert_eq!(row.get("payload"), Some(&Value::Text("raw".into())));
        Ok(())
    }

    #[test]
    fn test_time_of_day() {
        assert_eq!(
            time_of_day(30_615_000_000),
            NaiveTime::from_hms_opt(8, 30, 15)
        );
        assert_eq!(time_of_day(-1), None);
    }

    #[test]
    fn test_quote_ident_escapes() {
        assert_eq!(quote_ident("fact_campaigns"), "\"fact_campaigns\"");
        assert_eq!(quote_ident("we\"ird"), "\"we\"\"ird\"");
    }
}
