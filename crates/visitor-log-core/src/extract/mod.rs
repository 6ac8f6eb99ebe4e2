//! Mapping of raw CSV rows onto canonical visitor fields.

pub mod row;

pub use row::RawRow;

use crate::normalize::{self, FormatError};
use thiserror::Error;

pub const VISIT_DATE_COLUMNS: &[&str] = &["fecha_inicio", "fecha"];
pub const TIME_START_COLUMNS: &[&str] = &["fecha_inicio", "hora_inicio"];
pub const TIME_END_COLUMNS: &[&str] = &["fecha_fin", "hora_fin"];
pub const ID_DOCUMENT_COLUMN: &str = "id_document";
pub const DEFAULT_ID_DOCUMENT: &str = "dni";

const FULL_NAME_COLUMN: &str = "nombre_visita";
const ID_NUMBER_COLUMN: &str = "documento";
const ENTITY_COLUMN: &str = "empresa";
const OFFICE_COLUMN: &str = "area";
const REASON_COLUMN: &str = "motivo";
const HOST_NAME_COLUMN: &str = "contacto";
const HOST_TITLE_COLUMN: &str = "cargo_contacto";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// None of the accepted column names is present in the row.
    #[error("missing column for {field}: expected one of [{}]", .candidates.join(", "))]
    MissingColumn {
        field: &'static str,
        candidates: Vec<&'static str>,
    },
}

impl SchemaError {
    fn missing(field: &'static str, candidates: &[&'static str]) -> Self {
        SchemaError::MissingColumn {
            field,
            candidates: candidates.to_vec(),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractError {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Format(#[from] FormatError),
}

/// Normalized per-row values, before institution and fingerprint are
/// attached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedFields {
    pub full_name: String,
    pub id_document: String,
    pub id_number: String,
    pub date: String,
    pub time_start: String,
    pub time_end: String,
    pub entity: String,
    pub office: String,
    pub reason: String,
    pub host_name: String,
    pub host_title: String,
}

/// Resolve every canonical field of `row`, normalizing dates and times.
pub fn extract(row: &RawRow) -> Result<ExtractedFields, ExtractError> {
    let date = normalize::parse_date(aliased(row, "visit date", VISIT_DATE_COLUMNS)?)?;
    let time_start = normalize::parse_time(aliased(row, "time start", TIME_START_COLUMNS)?)?;
    let time_end = normalize::parse_time(aliased(row, "time end", TIME_END_COLUMNS)?)?;
    let id_document = row
        .get(ID_DOCUMENT_COLUMN)
        .unwrap_or(DEFAULT_ID_DOCUMENT)
        .to_string();

    Ok(ExtractedFields {
        full_name: required(row, "full name", FULL_NAME_COLUMN)?,
        id_document,
        id_number: required(row, "id number", ID_NUMBER_COLUMN)?,
        date,
        time_start,
        time_end,
        entity: required(row, "entity", ENTITY_COLUMN)?,
        office: required(row, "office", OFFICE_COLUMN)?,
        reason: required(row, "reason", REASON_COLUMN)?,
        host_name: required(row, "host name", HOST_NAME_COLUMN)?,
        host_title: row.get(HOST_TITLE_COLUMN).unwrap_or_default().to_string(),
    })
}

fn aliased<'r>(
    row: &'r RawRow,
    field: &'static str,
    aliases: &[&'static str],
) -> Result<&'r str, SchemaError> {
    row.get_first(aliases)
        .map(|(_, value)| value)
        .ok_or_else(|| SchemaError::missing(field, aliases))
}

fn required(row: &RawRow, field: &'static str, column: &'static str) -> Result<String, SchemaError> {
    row.get(column)
        .map(str::to_string)
        .ok_or_else(|| SchemaError::missing(field, &[column]))
}
