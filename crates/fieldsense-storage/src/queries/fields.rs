//! Queries for farmers and fields.

use fieldsense_core::errors::StorageError;
use fieldsense_core::types::{Farmer, Field, NewField};
use rusqlite::{params, Connection, OptionalExtension, Row};

use super::{from_epoch, now_epoch};

pub fn insert_farmer(conn: &Connection, name: &str, location: &str) -> Result<i64, StorageError> {
    conn.execute(
        "INSERT INTO farmers (name, location, created_at) VALUES (?1, ?2, ?3)",
        params![name, location, now_epoch()],
    )
    .map_err(StorageError::sqlite)?;
    Ok(conn.last_insert_rowid())
}

pub fn get_farmer(conn: &Connection, id: i64) -> Result<Option<Farmer>, StorageError> {
    conn.query_row(
        "SELECT id, name, location, created_at FROM farmers WHERE id = ?1",
        params![id],
        |row| {
            Ok(Farmer {
                id: row.get(0)?,
                name: row.get(1)?,
                location: row.get(2)?,
                created_at: from_epoch(row.get(3)?),
            })
        },
    )
    .optional()
    .map_err(StorageError::sqlite)
}

pub fn insert_field(conn: &Connection, field: &NewField) -> Result<i64, StorageError> {
    conn.execute(
        "INSERT INTO fields
            (farmer_id, name, latitude, longitude, crop_type, size_hectares, soil_quality, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            field.farmer_id,
            field.name,
            field.latitude,
            field.longitude,
            field.crop_type,
            field.size_hectares,
            field.soil_quality,
            now_epoch()
        ],
    )
    .map_err(StorageError::sqlite)?;
    Ok(conn.last_insert_rowid())
}

const FIELD_COLUMNS: &str = "id, farmer_id, name, latitude, longitude, crop_type, \
                             size_hectares, soil_quality, created_at";

fn map_field(row: &Row<'_>) -> rusqlite::Result<Field> {
    Ok(Field {
        id: row.get(0)?,
        farmer_id: row.get(1)?,
        name: row.get(2)?,
        latitude: row.get(3)?,
        longitude: row.get(4)?,
        crop_type: row.get(5)?,
        size_hectares: row.get(6)?,
        soil_quality: row.get(7)?,
        created_at: from_epoch(row.get(8)?),
    })
}

pub fn get_field(conn: &Connection, id: i64) -> Result<Option<Field>, StorageError> {
    conn.query_row(
        &format!("SELECT {FIELD_COLUMNS} FROM fields WHERE id = ?1"),
        params![id],
        map_field,
    )
    .optional()
    .map_err(StorageError::sqlite)
}

/// All fields, optionally restricted to one farmer, in id order.
pub fn list_fields(conn: &Connection, farmer_id: Option<i64>) -> Result<Vec<Field>, StorageError> {
    let sql = match farmer_id {
        Some(_) => format!("SELECT {FIELD_COLUMNS} FROM fields WHERE farmer_id = ?1 ORDER BY id"),
        None => format!("SELECT {FIELD_COLUMNS} FROM fields ORDER BY id"),
    };
    let mut stmt = conn.prepare_cached(&sql).map_err(StorageError::sqlite)?;
    let rows = match farmer_id {
        Some(id) => stmt.query_map(params![id], map_field),
        None => stmt.query_map([], map_field),
    }
    .map_err(StorageError::sqlite)?;

    rows.collect::<Result<Vec<_>, _>>()
        .map_err(StorageError::sqlite)
}

pub fn count_fields(conn: &Connection) -> Result<i64, StorageError> {
    conn.query_row("SELECT COUNT(*) FROM fields", [], |row| row.get(0))
        .map_err(StorageError::sqlite)
}
