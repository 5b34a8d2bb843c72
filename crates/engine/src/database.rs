//! Database records and the repository seam used to resolve them.

use std::collections::HashMap;
use std::sync::Arc;

use crate::adapter::EngineAdapter;

/// Read-only view of a registered database connection.
///
/// Resolved once per command run and never mutated by this subsystem. The
/// attached adapter determines the engine tag used for formatter and
/// threshold lookups.
#[derive(Clone)]
pub struct Database {
    /// Caller-supplied identifier the repository resolves.
    pub id: i64,
    /// Human-readable connection name.
    pub name: String,
    /// The engine adapter serving this connection.
    pub adapter: Arc<dyn EngineAdapter>,
}

impl Database {
    pub fn new(id: i64, name: impl Into<String>, adapter: Arc<dyn EngineAdapter>) -> Self {
        Self {
            id,
            name: name.into(),
            adapter,
        }
    }

    /// Lowercased engine name, the key into threshold and formatter tables.
    pub fn engine_tag(&self) -> String {
        self.adapter.engine_name().to_lowercase()
    }
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("engine", &self.adapter.engine_name())
            .finish()
    }
}

/// Resolves a database id to a [`Database`] record.
///
/// Persistence of connection records lives outside this subsystem; hosts
/// implement this over whatever store they keep connections in.
pub trait DatabaseRepository: Send + Sync {
    fn find_by_id(&self, id: i64) -> Option<Arc<Database>>;
}

/// In-memory repository over a fixed set of databases.
///
/// The implementation embedders and tests reach for when the connection set
/// is known up front.
#[derive(Default)]
pub struct StaticDatabaseRepository {
    databases: HashMap<i64, Arc<Database>>,
}

impl StaticDatabaseRepository {
    pub fn new(databases: impl IntoIterator<Item = Database>) -> Self {
        Self {
            databases: databases
                .into_iter()
                .map(|db| (db.id, Arc::new(db)))
                .collect(),
        }
    }
}

impl DatabaseRepository for StaticDatabaseRepository {
    fn find_by_id(&self, id: i64) -> Option<Arc<Database>> {
        self.databases.get(&id).cloned()
    }
}
