//! Generic record list.
//!
//! # Layout
//!
//! | Offset | Width | Field    | Description                        |
//! |--------|-------|----------|------------------------------------|
//! | 0      | 4     | size     | Byte size of the list incl. header |
//! | 4      | 4     | count    | Number of elements                 |
//! | 8      | ...   | elements | `count` self-sized records         |

use std::ops::{Index, IndexMut};

use serde::{Deserialize, Serialize};

use crate::error::{Result, SharcError};
use crate::field::{FieldReader, FieldWriter};
use crate::types::CodecContext;

/// Size of the list header (`size` + `count`).
pub const LIST_HEADER_LEN: usize = 8;

/// A record type that can live inside a [`RecordList`].
///
/// Every record starts with a u32 holding its own serialized size. Decoders
/// are handed a reader positioned on that field and may stop short of the
/// declared size; the owning list resumes at `start + size`.
pub trait Record: Sized {
    /// Record name used in diagnostics.
    const KIND: &'static str;

    /// Length of the fixed header; smaller declared sizes are malformed.
    const HEADER_LEN: usize;

    fn decode(reader: &mut FieldReader<'_>, ctx: &CodecContext) -> Result<Self>;

    /// Append the record, with its computed size field, to `writer`.
    fn encode(&self, writer: &mut FieldWriter, ctx: &CodecContext) -> Result<()>;

    /// Serialize the record on its own.
    fn to_bytes(&self, ctx: &CodecContext) -> Result<Vec<u8>> {
        let mut writer = FieldWriter::new(ctx.byte_order);
        self.encode(&mut writer, ctx)?;
        Ok(writer.into_bytes())
    }
}

/// Ordered, owned sequence of records of one type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordList<T> {
    items: Vec<T>,
}

impl<T> Default for RecordList<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T> RecordList<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Append a record at the end.
    pub fn push(&mut self, item: T) {
        self.items.push(item);
    }

    /// Insert a record, shifting later records back. `index` is clamped to the length.
    pub fn insert(&mut self, index: usize, item: T) {
        let index = index.min(self.items.len());
        self.items.insert(index, item);
    }

    /// Remove and return the record at `index`, if any.
    pub fn remove(&mut self, index: usize) -> Option<T> {
        (index < self.items.len()).then(|| self.items.remove(index))
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.items.get_mut(index)
    }

    /// Index of the first record matching `predicate`.
    pub fn position(&self, predicate: impl FnMut(&T) -> bool) -> Option<usize> {
        self.items.iter().position(predicate)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.items.iter_mut()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}

impl<T: Record> RecordList<T> {
    /// Decode a list starting at the reader's cursor.
    ///
    /// On success the cursor sits at `start + size` of the list.
    pub fn decode(reader: &mut FieldReader<'_>, ctx: &CodecContext) -> Result<Self> {
        let start = reader.position();
        let size = reader.read_len()?;
        let count = reader.read_len()?;

        if size < LIST_HEADER_LEN {
            return Err(SharcError::malformed_record(
                "list",
                start,
                format!("declared size {size} is below the {LIST_HEADER_LEN} byte header"),
            ));
        }

        // Never trust `count` for the allocation; every element needs its header.
        let mut items = Vec::with_capacity(count.min(reader.remaining() / T::HEADER_LEN));
        for _ in 0..count {
            let item_start = reader.position();
            let item_size = reader.peek_u32()? as usize;
            if item_size < T::HEADER_LEN {
                return Err(SharcError::malformed_record(
                    T::KIND,
                    item_start,
                    format!(
                        "declared size {item_size} is below the {} byte header",
                        T::HEADER_LEN
                    ),
                ));
            }

            let item = T::decode(reader, ctx)?;
            reader.seek(end_of(item_start, item_size)?)?;
            items.push(item);
        }

        reader.seek(end_of(start, size)?)?;
        tracing::trace!(kind = T::KIND, count, size, offset = start, "Decoded record list");
        Ok(Self { items })
    }

    /// Encode the list and return its serialized length.
    pub fn encode(&self, writer: &mut FieldWriter, ctx: &CodecContext) -> Result<usize> {
        let start = writer.begin_sized();
        writer.write_len(self.items.len())?;
        for item in &self.items {
            item.encode(writer, ctx)?;
        }
        writer.finish_sized(start)
    }
}

fn end_of(start: usize, size: usize) -> Result<usize> {
    start
        .checked_add(size)
        .ok_or(SharcError::LengthOverflow { length: size })
}

impl<T> Index<usize> for RecordList<T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        &self.items[index]
    }
}

impl<T> IndexMut<usize> for RecordList<T> {
    fn index_mut(&mut self, index: usize) -> &mut T {
        &mut self.items[index]
    }
}

impl<T> From<Vec<T>> for RecordList<T> {
    fn from(items: Vec<T>) -> Self {
        Self { items }
    }
}

impl<T> FromIterator<T> for RecordList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

impl<T> Extend<T> for RecordList<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.items.extend(iter);
    }
}

impl<T> IntoIterator for RecordList<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a RecordList<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
