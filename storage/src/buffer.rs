//! Growable byte buffer with the two primitives records are made of:
//! variable-length unsigned integers and length-prefixed strings.
//!
//! Integers use a prefix encoding where the first byte decides the length:
//!
//! | first byte | length | value                                  |
//! |------------|--------|----------------------------------------|
//! | 0..=240    | 1      | the byte itself                        |
//! | 241..=248  | 2      | 240 + 256 * (A0 - 241) + A1            |
//! | 249        | 3      | 2288 + 256 * A1 + A2                   |
//! | 250..=255  | 4..=9  | next A0 - 247 bytes, big endian        |

use std::io::{self, Cursor, Read};

use byteorder::{BigEndian, ByteOrder, ReadBytesExt};

use crate::StorageError;

#[derive(Debug, Default)]
pub struct Buffer {
	data: Vec<u8>,
}

impl Buffer {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn put_varint(&mut self, v: u64) {
		if v <= 240 {
			self.data.push(v as u8);
		} else if v <= 2287 {
			let v = v - 240;
			self.data.push((v / 256 + 241) as u8);
			self.data.push((v % 256) as u8);
		} else if v <= 67823 {
			let v = v - 2288;
			self.data.push(249);
			self.data.push((v / 256) as u8);
			self.data.push((v % 256) as u8);
		} else {
			let n = (8 - v.leading_zeros() as usize / 8).max(3);
			let mut raw = [0u8; 8];
			BigEndian::write_uint(&mut raw[..n], v, n);
			self.data.push((247 + n) as u8);
			self.data.extend_from_slice(&raw[..n]);
		}
	}

	pub fn put_string(&mut self, s: &str) {
		self.put_varint(s.len() as u64);
		self.data.extend_from_slice(s.as_bytes());
	}

	pub fn into_inner(self) -> Vec<u8> {
		self.data
	}
}

/// Bounds-checked reader over an encoded byte string. Every read that would go
/// past the end fails with [`StorageError::Corruption`].
pub struct Reader<'a> {
	cursor: Cursor<&'a [u8]>,
}

impl<'a> Reader<'a> {
	pub fn new(data: &'a [u8]) -> Self {
		Self {
			cursor: Cursor::new(data),
		}
	}

	pub fn position(&self) -> u64 {
		self.cursor.position()
	}

	pub fn remaining(&self) -> u64 {
		(self.cursor.get_ref().len() as u64).saturating_sub(self.cursor.position())
	}

	pub fn is_exhausted(&self) -> bool {
		self.remaining() == 0
	}

	pub fn get_varint(&mut self) -> Result<u64, StorageError> {
		let a0 = self.cursor.read_u8().map_err(truncated)?;
		let v = match a0 {
			0..=240 => a0 as u64,
			241..=248 => {
				let a1 = self.cursor.read_u8().map_err(truncated)?;
				240 + 256 * (a0 as u64 - 241) + a1 as u64
			},
			249 => {
				let rest = self.cursor.read_u16::<BigEndian>().map_err(truncated)?;
				2288 + rest as u64
			},
			_ => {
				let n = a0 as usize - 247;
				self.cursor.read_uint::<BigEndian>(n).map_err(truncated)?
			},
		};
		Ok(v)
	}

	pub fn get_string(&mut self) -> Result<String, StorageError> {
		let len = self.get_varint()?;
		if len > self.remaining() {
			return Err(StorageError::Corruption(format!(
				"string of {} bytes at offset {} runs past end of record",
				len, self.position(),
			)));
		}
		let mut raw = vec![0u8; len as usize];
		self.cursor.read_exact(&mut raw).map_err(truncated)?;
		String::from_utf8(raw)
			.map_err(|e| StorageError::Corruption(format!("name is not UTF-8: {}", e)))
	}
}

fn truncated(e: io::Error) -> StorageError {
	StorageError::Corruption(format!("record ends mid-field: {}", e))
}
