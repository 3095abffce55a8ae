use std::fmt::Display;

use crate::common::{PageId, SlotNo};

/// Physical location of a stored tuple: the page holding it and its slot on that page.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct RecordId {
    page_id: PageId,
    slot: SlotNo,
}

impl RecordId {
    pub fn new(page_id: PageId, slot: SlotNo) -> Self {
        Self { page_id, slot }
    }

    pub fn page_id(&self) -> PageId {
        self.page_id
    }

    pub fn slot(&self) -> SlotNo {
        self.slot
    }
}

impl Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (table_id, page_no) = self.page_id;
        write!(f, "({}, {}):{}", table_id, page_no, self.slot)
    }
}
