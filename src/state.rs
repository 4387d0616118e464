use crate::db::{DbPool, OrmConn};

/// Shared handles cloned into every handler. Entity reads go through the
/// ORM connection; audit writes and membership probes use the raw pool.
#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub orm: OrmConn,
}
