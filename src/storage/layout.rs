use log::debug;

use crate::common::{PageNo, SlotNo, TableId};
use crate::error::{Error, Result};
use crate::tuple::record_id::RecordId;
use crate::tuple::schema::TupleDesc;

/// How rows of a fixed-width schema are laid out on a page: a header bitmap
/// with one bit per slot, followed by the slots themselves.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SlotLayout {
    page_size: usize,
    tuple_size: usize,
    slots_per_page: usize,
    header_bytes: usize,
}

impl SlotLayout {
    pub fn for_schema(schema: &TupleDesc, page_size: usize) -> Result<Self> {
        let tuple_size = schema.byte_size();
        let overflow = || {
            Error::Schema(format!(
                "layout of {}-byte rows in {}-byte pages overflows",
                tuple_size, page_size
            ))
        };
        let page_bits = page_size.checked_mul(8).ok_or_else(overflow)?;
        // every slot costs its row plus one header bit
        let slot_bits = tuple_size
            .checked_mul(8)
            .and_then(|bits| bits.checked_add(1))
            .ok_or_else(overflow)?;
        let slots_per_page = (page_bits / slot_bits).min(SlotNo::MAX as usize);
        if slots_per_page == 0 {
            return Err(Error::Schema(format!(
                "a row of {} bytes does not fit into a page of {} bytes",
                tuple_size, page_size
            )));
        }
        let header_bytes = (slots_per_page + 7) / 8;

        debug!(
            "Layout for [{}]: {} slots of {} bytes, {} header bytes",
            schema, slots_per_page, tuple_size, header_bytes
        );
        Ok(Self {
            page_size,
            tuple_size,
            slots_per_page,
            header_bytes,
        })
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn tuple_size(&self) -> usize {
        self.tuple_size
    }

    pub fn slots_per_page(&self) -> usize {
        self.slots_per_page
    }

    pub fn header_bytes(&self) -> usize {
        self.header_bytes
    }

    /// Byte offset of `slot` from the start of its page.
    pub fn slot_offset(&self, slot: SlotNo) -> usize {
        self.header_bytes + slot as usize * self.tuple_size
    }

    /// Location of the `ordinal`-th row of a table whose pages are filled in order.
    pub fn record_id(&self, table_id: TableId, ordinal: usize) -> RecordId {
        let page_no = (ordinal / self.slots_per_page) as PageNo;
        let slot = (ordinal % self.slots_per_page) as SlotNo;
        RecordId::new((table_id, page_no), slot)
    }
}
