//! Record format of a stored [`Directory`].
//!
//! A record is the plain concatenation of its entries, each written as
//! `name (string), size, mode, dev, ino (varints)`. There is no header and no
//! entry count: a record ends where its last entry ends.

use duindex_common::Directory;

use crate::{
	buffer::{Buffer, Reader},
	StorageError,
};

/// Initial entry capacity of decoded directories.
const DECODE_CAPACITY: usize = 8;

pub fn encode(dir: &Directory) -> Vec<u8> {
	let mut b = Buffer::new();
	for ent in dir {
		b.put_string(&ent.name);
		b.put_varint(ent.size);
		b.put_varint(ent.mode as u64);
		b.put_varint(ent.dev);
		b.put_varint(ent.ino);
	}
	b.into_inner()
}

/// Decodes a record into a directory in stored order. A record that does not
/// hold a whole number of entries is [`StorageError::Corruption`].
pub fn decode(data: &[u8]) -> Result<Directory, StorageError> {
	let mut dir = Directory::with_capacity(DECODE_CAPACITY)?;
	let mut b = Reader::new(data);

	while !b.is_exhausted() {
		let name = b.get_string()?;
		let size = b.get_varint()?;
		let mode = b.get_varint()?;
		let dev = b.get_varint()?;
		let ino = b.get_varint()?;

		let mode = u32::try_from(mode)
			.map_err(|_| StorageError::Corruption(format!("mode {:#o} of {:?} out of range", mode, name)))?;
		dir.add_entry(&name, size, mode, dev, ino)?;
	}

	Ok(dir)
}
