pub type TableId = u16;
pub type PageNo = u32;
pub type PageId = (TableId, PageNo);
pub type SlotNo = u16;

pub const PAGE_SIZE: usize = 4096;

/// Width in bytes of a stored integer column.
pub const INT_LEN: usize = std::mem::size_of::<i32>();
/// Width in bytes reserved per character of a string column.
pub const CHAR_WIDTH: usize = 1;
/// Declared max length of a string column, in bytes.
pub type StringLen = u16;

/// Max length used when a string column is declared without one.
pub const DEFAULT_STRING_LEN: StringLen = 128;

pub const CATALOG_TABLES_TABLE_ID: TableId = 1;
pub const USER_DATA_TABLE_ID_START: TableId = 10;
