//! Decoding rows into [`Record`]s.

use crate::error::{SilkError, SilkResult};
use crate::value::{Record, Value};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use rust_decimal::Decimal;
use tokio_postgres::Row;
use tokio_postgres::types::{FromSql, Type};

/// Decode every column of `row`, keyed by column name.
///
/// Booleans, integers and floats keep their kind; numeric, uuid, json and date/time columns
/// are rendered as text (numeric keeps its exact digits); text-like columns pass through.
/// Other types (arrays, intervals, bytea) fail with [`SilkError::Decode`] and should be
/// cast in the query (`tags::text`).
pub(crate) fn to_record(row: &Row) -> SilkResult<Record> {
    let mut record = Record::new();
    for (idx, column) in row.columns().iter().enumerate() {
        let value = decode(row, idx, column.type_())
            .map_err(|e| SilkError::decode(column.name(), e.to_string()))?;
        record.insert(column.name().to_string(), value);
    }
    Ok(record)
}

fn get<'a, T: FromSql<'a>>(row: &'a Row, idx: usize) -> Result<Option<T>, tokio_postgres::Error> {
    row.try_get::<_, Option<T>>(idx)
}

fn decode(row: &Row, idx: usize, ty: &Type) -> Result<Value, tokio_postgres::Error> {
    let value = match *ty {
        Type::BOOL => get::<bool>(row, idx)?.map(Value::Bool),
        Type::INT2 => get::<i16>(row, idx)?.map(Value::from),
        Type::INT4 => get::<i32>(row, idx)?.map(Value::from),
        Type::INT8 => get::<i64>(row, idx)?.map(Value::from),
        Type::OID => get::<u32>(row, idx)?.map(Value::from),
        Type::FLOAT4 => get::<f32>(row, idx)?.map(Value::from),
        Type::FLOAT8 => get::<f64>(row, idx)?.map(Value::from),
        Type::NUMERIC => get::<Decimal>(row, idx)?.map(|v| Value::Text(v.to_string())),
        Type::UUID => get::<uuid::Uuid>(row, idx)?.map(|v| Value::Text(v.to_string())),
        Type::JSON | Type::JSONB => {
            get::<serde_json::Value>(row, idx)?.map(|v| Value::Text(v.to_string()))
        }
        Type::DATE => get::<NaiveDate>(row, idx)?.map(|v| Value::Text(v.to_string())),
        Type::TIME => get::<NaiveTime>(row, idx)?.map(|v| Value::Text(v.to_string())),
        Type::TIMESTAMP => get::<NaiveDateTime>(row, idx)?.map(|v| Value::Text(v.to_string())),
        Type::TIMESTAMPTZ => {
            get::<DateTime<Utc>>(row, idx)?.map(|v| Value::Text(v.to_rfc3339()))
        }
        _ => get::<String>(row, idx)?.map(Value::Text),
    };
    Ok(value.unwrap_or(Value::Null))
}
