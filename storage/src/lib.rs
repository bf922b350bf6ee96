use std::path::Path;

use duindex_common::*;
use guard::guard;
use tracing::{debug, warn};

pub mod buffer;
pub mod codec;
pub mod key;
pub mod resolve;
pub mod scan;
pub mod store;
mod error;

pub use error::StorageError;
pub use key::RecordKey;
pub use store::{KvStore, MemoryStore};


/// A stored anchor: a literal path and the object it was indexed from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Anchor {
	pub path: String,
	pub key: RecordKey,
}

/// Directory records keyed by `(dev, ino)`, plus the anchor paths resolution
/// starts from.
pub struct Index<S = sled::Tree> {
	records: S,
	anchors: S,
}

impl Index<sled::Tree> {
	pub fn load(path: impl AsRef<Path>) -> Result<Self, sled::Error> {
		let sled = sled::open(path.as_ref())?;
		let records = sled.open_tree("records")?;
		let anchors = sled.open_tree("anchors")?;
		Ok(Self {
			records,
			anchors,
		})
	}

	pub fn flush(&self) -> Result<(), StorageError> {
		self.records.flush()?;
		self.anchors.flush()?;
		Ok(())
	}
}

impl<S: KvStore> Index<S> {
	pub fn new(records: S, anchors: S) -> Self {
		Self {
			records,
			anchors,
		}
	}

	pub fn write_record(&self, dir: &Directory, dev: u64, ino: u64) -> Result<(), StorageError> {
		let key = RecordKey::new(dev, ino);
		let raw = codec::encode(dir);
		debug!(%key, entries = dir.len(), bytes = raw.len(), "Writing record");
		self.records.put(&key.to_bytes(), &raw)
	}

	/// Reads and decodes the record of `(dev, ino)` in stored order.
	pub fn read_record(&self, dev: u64, ino: u64) -> Result<Directory, StorageError> {
		let key = RecordKey::new(dev, ino);
		guard!(let Some(dir) = self.fetch_record(key)? else {
			warn!(%key, "Id not found in database");
			return Err(StorageError::PathNotFound(key.to_string()));
		});
		Ok(dir)
	}

	/// Reads the record of `(dev, ino)` sorted largest first, ready for browsing.
	pub fn open_dir_at(&self, dev: u64, ino: u64) -> Result<Directory, StorageError> {
		let mut dir = self.read_record(dev, ino)?;
		dir.sort_by_size_descending();
		Ok(dir)
	}

	pub(crate) fn fetch_record(&self, key: RecordKey) -> Result<Option<Directory>, StorageError> {
		guard!(let Some(raw) = self.records.get(&key.to_bytes())? else { return Ok(None) });
		debug!(%key, bytes = raw.len(), "Read record");
		codec::decode(&raw).map(Some)
	}

	pub fn add_anchor(&self, path: &str, dev: u64, ino: u64) -> Result<(), StorageError> {
		let key = RecordKey::new(dev, ino);
		debug!(path, %key, "Writing anchor");
		self.anchors.put(path.as_bytes(), &key.to_anchor_value())
	}

	/// Every stored anchor, ordered by path.
	pub fn anchors(&self) -> Result<Vec<Anchor>, StorageError> {
		self.anchors.scan()?
			.into_iter()
			.map(|(path, value)| {
				let path = String::from_utf8(path)
					.map_err(|_| StorageError::Corruption(String::from("anchor path is not UTF-8")))?;
				let key = RecordKey::parse_anchor_value(&value)?;
				Ok(Anchor { path, key })
			})
			.collect()
	}
}
