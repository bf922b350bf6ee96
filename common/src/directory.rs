//! In-memory listing of one directory's children.
//!
//! A [`Directory`] is built once by the scanner (entries in insertion order) and
//! serialized, or decoded from a stored record and sorted largest first for
//! browsing.

use std::slice;

use thiserror::Error;

/// Longest name kept in an [`Entry`], in bytes.
pub const MAX_NAME_LEN: usize = 255;

/// Mask and value of the directory bits in [`Entry::mode`].
pub const S_IFMT: u32 = 0o170000;
pub const S_IFDIR: u32 = 0o040000;

/// One child of a directory.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Entry {
	pub name: String,
	pub size: u64,
	pub mode: u32,
	pub dev: u64,
	pub ino: u64,
}

impl Entry {
	pub fn is_dir(&self) -> bool {
		self.mode & S_IFMT == S_IFDIR
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DirError {
	#[error("Out of memory")]
	OutOfMemory,
	#[error("Entry not found: {0}")]
	NotFound(String),
}

#[derive(Debug, Clone, Default)]
pub struct Directory {
	entries: Vec<Entry>,
	total_size: u64,
	cursor: usize,
}

impl Directory {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_capacity(capacity: usize) -> Result<Self, DirError> {
		let mut entries = Vec::new();
		entries.try_reserve_exact(capacity)
			.map_err(|_| DirError::OutOfMemory)?;
		Ok(Self {
			entries,
			total_size: 0,
			cursor: 0,
		})
	}

	/// Appends an entry. Names longer than [`MAX_NAME_LEN`] bytes are cut at the
	/// last character boundary that fits. If growing the storage fails the
	/// directory is left untouched.
	pub fn add_entry(&mut self, name: &str, size: u64, mode: u32, dev: u64, ino: u64) -> Result<(), DirError> {
		if self.entries.len() == self.entries.capacity() {
			let additional = self.entries.capacity().max(1);
			self.entries.try_reserve_exact(additional)
				.map_err(|_| DirError::OutOfMemory)?;
		}

		self.entries.push(Entry {
			name: truncate_name(name).to_owned(),
			size,
			mode,
			dev,
			ino,
		});
		self.total_size = self.total_size.saturating_add(size);
		Ok(())
	}

	/// First entry called exactly `name`.
	pub fn find_by_name(&self, name: &str) -> Result<&Entry, DirError> {
		self.entries.iter()
			.find(|ent| ent.name == name)
			.ok_or_else(|| DirError::NotFound(name.to_owned()))
	}

	/// Largest first. Entries of equal size keep their relative order.
	pub fn sort_by_size_descending(&mut self) {
		self.entries.sort_by(|a, b| b.size.cmp(&a.size));
	}

	pub fn total_size(&self) -> u64 {
		self.total_size
	}

	/// Advances the read cursor. Returns `None` once every entry was returned,
	/// until [`Directory::rewind`] is called.
	pub fn next_entry(&mut self) -> Option<&Entry> {
		let ent = self.entries.get(self.cursor)?;
		self.cursor += 1;
		Some(ent)
	}

	pub fn rewind(&mut self) {
		self.cursor = 0;
	}

	pub fn entries(&self) -> &[Entry] {
		&self.entries
	}

	pub fn iter(&self) -> slice::Iter<'_, Entry> {
		self.entries.iter()
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	pub fn capacity(&self) -> usize {
		self.entries.capacity()
	}
}

impl PartialEq for Directory {
	// The cursor is read state, not content.
	fn eq(&self, other: &Self) -> bool {
		self.entries == other.entries && self.total_size == other.total_size
	}
}

impl Eq for Directory {}

impl<'a> IntoIterator for &'a Directory {
	type Item = &'a Entry;
	type IntoIter = slice::Iter<'a, Entry>;

	fn into_iter(self) -> Self::IntoIter {
		self.entries.iter()
	}
}

fn truncate_name(name: &str) -> &str {
	if name.len() <= MAX_NAME_LEN {
		return name;
	}
	let mut end = MAX_NAME_LEN;
	while !name.is_char_boundary(end) {
		end -= 1;
	}
	&name[..end]
}
