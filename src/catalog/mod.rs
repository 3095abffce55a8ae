use std::sync::atomic::{AtomicU16, Ordering};
use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use lazy_static::lazy_static;
use log::info;

use crate::common::{
    TableId, CATALOG_TABLES_TABLE_ID, DEFAULT_STRING_LEN, USER_DATA_TABLE_ID_START,
};
use crate::error::{Error, Result};
use crate::tuple::schema::{TupleDesc, Type};

pub const CATALOG_TABLES_NAME: &str = "system_catalog_tables";

lazy_static! {
    pub static ref CATALOG_TABLES_SCHEMA: Arc<TupleDesc> = Arc::new(TupleDesc::merge(
        &TupleDesc::single(Type::Int, "table_id"),
        &TupleDesc::single(Type::String(DEFAULT_STRING_LEN), "table_name"),
    ));
}

/// Registry of the schemas known to the engine. Each schema is built once and
/// handed out as a shared reference, so every reader of a table sees the same
/// `TupleDesc` instance.
pub struct Catalog {
    next_table_id: AtomicU16,
    table_name_to_id: DashMap<String, TableId>,
    table_id_to_schema: DashMap<TableId, Arc<TupleDesc>>,
}

impl Catalog {
    pub fn new() -> Self {
        let this = Self {
            next_table_id: AtomicU16::new(USER_DATA_TABLE_ID_START),
            table_name_to_id: DashMap::new(),
            table_id_to_schema: DashMap::new(),
        };
        this.table_name_to_id
            .insert(CATALOG_TABLES_NAME.to_owned(), CATALOG_TABLES_TABLE_ID);
        this.table_id_to_schema
            .insert(CATALOG_TABLES_TABLE_ID, Arc::clone(&CATALOG_TABLES_SCHEMA));
        this
    }

    pub fn get_table_id(&self, table_name: &str) -> Option<TableId> {
        self.table_name_to_id.get(table_name).map(|kv| *kv.value())
    }

    pub fn get_schema(&self, table_name: &str) -> Option<Arc<TupleDesc>> {
        self.get_table_id(table_name)
            .and_then(|id| self.get_schema_by_id(id))
    }

    pub fn get_schema_by_id(&self, table_id: TableId) -> Option<Arc<TupleDesc>> {
        self.table_id_to_schema
            .get(&table_id)
            .map(|schema| Arc::clone(schema.value()))
    }

    pub fn list_tables(&self) -> Vec<String> {
        let mut tables: Vec<String> = self
            .table_name_to_id
            .iter()
            .map(|s| s.key().to_owned())
            .collect();
        tables.sort();
        tables
    }

    pub fn create_table(&self, table_name: &str, schema: TupleDesc) -> Result<TableId> {
        match self.table_name_to_id.entry(table_name.to_owned()) {
            Entry::Occupied(_) => Err(Error::TableExists(table_name.to_owned())),
            Entry::Vacant(vacant) => {
                let table_id = self.generate_table_id()?;
                info!(
                    "Created table {} ({}) with schema [{}]",
                    table_name, table_id, schema
                );
                self.table_id_to_schema.insert(table_id, Arc::new(schema));
                vacant.insert(table_id);
                Ok(table_id)
            }
        }
    }

    fn generate_table_id(&self) -> Result<TableId> {
        self.next_table_id
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |prev| {
                if prev == TableId::MAX {
                    None
                } else {
                    Some(prev + 1)
                }
            })
            .map_err(|_| {
                Error::Schema(
                    "Cannot create new table. TableId space is already exhausted".to_owned(),
                )
            })
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new()
    }
}
