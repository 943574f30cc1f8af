//! Frame CRUD operations.

use hf_core::{Error, FrameId, Result};
use rusqlite::Connection;

use crate::models::Frame;

const COLS: &str = "id, name, photo";

/// Create a new frame record.
pub fn create_frame(conn: &Connection, name: &str, photo: &str) -> Result<Frame> {
    conn.execute(
        "INSERT INTO frames (name, photo) VALUES (?1, ?2)",
        rusqlite::params![name, photo],
    )
    .map_err(|e| Error::database(e.to_string()))?;

    Ok(Frame {
        id: FrameId::from(conn.last_insert_rowid()),
        name: name.to_string(),
        photo: photo.to_string(),
    })
}

/// Get a frame by primary key.
pub fn get_frame(conn: &Connection, id: FrameId) -> Result<Option<Frame>> {
    let q = format!("SELECT {COLS} FROM frames WHERE id = ?1");
    let result = conn.query_row(&q, [id.get()], Frame::from_row);
    match result {
        Ok(f) => Ok(Some(f)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(Error::database(e.to_string())),
    }
}

/// List all frames ordered by id.
pub fn list_frames(conn: &Connection) -> Result<Vec<Frame>> {
    let q = format!("SELECT {COLS} FROM frames ORDER BY id ASC");
    let mut stmt = conn.prepare(&q).map_err(|e| Error::database(e.to_string()))?;
    let rows = stmt
        .query_map([], Frame::from_row)
        .map_err(|e| Error::database(e.to_string()))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| Error::database(e.to_string()))?;
    Ok(rows)
}

/// List the frames whose id is in `ids`, ordered by id. Unknown ids are
/// skipped and duplicates yield a single row.
pub fn list_frames_by_ids(conn: &Connection, ids: &[FrameId]) -> Result<Vec<Frame>> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }

    let placeholders = vec!["?"; ids.len()].join(", ");
    let q = format!("SELECT {COLS} FROM frames WHERE id IN ({placeholders}) ORDER BY id ASC");
    let mut stmt = conn.prepare(&q).map_err(|e| Error::database(e.to_string()))?;
    let rows = stmt
        .query_map(
            rusqlite::params_from_iter(ids.iter().map(FrameId::get)),
            Frame::from_row,
        )
        .map_err(|e| Error::database(e.to_string()))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| Error::database(e.to_string()))?;
    Ok(rows)
}

/// Change a frame's display name. Returns false if the frame does not exist.
pub fn rename_frame(conn: &Connection, id: FrameId, name: &str) -> Result<bool> {
    let n = conn
        .execute(
            "UPDATE frames SET name = ?1 WHERE id = ?2",
            rusqlite::params![name, id.get()],
        )
        .map_err(|e| Error::database(e.to_string()))?;
    Ok(n > 0)
}

/// Delete a frame by ID. Returns true if a row was deleted.
pub fn delete_frame(conn: &Connection, id: FrameId) -> Result<bool> {
    let n = conn
        .execute("DELETE FROM frames WHERE id = ?1", [id.get()])
        .map_err(|e| Error::database(e.to_string()))?;
    Ok(n > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::init_memory_pool;

    #[test]
    fn create_get_delete() {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();
        let f = create_frame(&conn, "sunset", "frames/sunset.jpg").unwrap();
        assert_eq!(get_frame(&conn, f.id).unwrap().unwrap(), f);

        assert!(delete_frame(&conn, f.id).unwrap());
        assert!(get_frame(&conn, f.id).unwrap().is_none());
        assert!(!delete_frame(&conn, f.id).unwrap());
    }

    #[test]
    fn ids_are_assigned_incrementally() {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();
        let a = create_frame(&conn, "a", "frames/a.png").unwrap();
        let b = create_frame(&conn, "b", "frames/b.png").unwrap();
        assert!(b.id > a.id);
        assert_eq!(list_frames(&conn).unwrap(), vec![a, b]);
    }

    #[test]
    fn by_ids_skips_unknown_and_duplicates() {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();
        let a = create_frame(&conn, "a", "frames/a.png").unwrap();
        let b = create_frame(&conn, "b", "frames/b.png").unwrap();
        create_frame(&conn, "c", "frames/c.png").unwrap();

        let ids = [b.id, a.id, FrameId::from(9999), a.id];
        let found = list_frames_by_ids(&conn, &ids).unwrap();
        assert_eq!(found, vec![a, b]);

        assert!(list_frames_by_ids(&conn, &[]).unwrap().is_empty());
    }

    #[test]
    fn rename() {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();
        let f = create_frame(&conn, "old", "frames/old.png").unwrap();
        assert!(rename_frame(&conn, f.id, "new").unwrap());
        assert_eq!(get_frame(&conn, f.id).unwrap().unwrap().name, "new");
        assert!(!rename_frame(&conn, FrameId::from(424242), "x").unwrap());
    }
}
