//! Key-value backends records and anchors are kept in.

use std::{cell::RefCell, collections::BTreeMap};

use crate::StorageError;

/// Byte-keyed store with point reads and writes.
pub trait KvStore {
	fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StorageError>;
	fn put(&self, key: &[u8], value: &[u8]) -> Result<(), StorageError>;
	/// Every pair in key order.
	fn scan(&self) -> Result<Vec<(Vec<u8>, Vec<u8>)>, StorageError>;
}

impl KvStore for sled::Tree {
	fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StorageError> {
		Ok(sled::Tree::get(self, key)?.map(|v| v.to_vec()))
	}

	fn put(&self, key: &[u8], value: &[u8]) -> Result<(), StorageError> {
		self.insert(key, value)?;
		Ok(())
	}

	fn scan(&self) -> Result<Vec<(Vec<u8>, Vec<u8>)>, StorageError> {
		self.iter()
			.map(|kv| -> Result<_, StorageError> {
				let (k, v) = kv?;
				Ok((k.to_vec(), v.to_vec()))
			})
			.collect()
	}
}

/// Store that lives only as long as the value, for tests and dry runs.
#[derive(Debug, Default)]
pub struct MemoryStore {
	map: RefCell<BTreeMap<Vec<u8>, Vec<u8>>>,
}

impl MemoryStore {
	pub fn new() -> Self {
		Self::default()
	}
}

impl KvStore for MemoryStore {
	fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StorageError> {
		Ok(self.map.borrow().get(key).cloned())
	}

	fn put(&self, key: &[u8], value: &[u8]) -> Result<(), StorageError> {
		self.map.borrow_mut().insert(key.to_owned(), value.to_owned());
		Ok(())
	}

	fn scan(&self) -> Result<Vec<(Vec<u8>, Vec<u8>)>, StorageError> {
		Ok(self.map.borrow().iter().map(|(k, v)| (k.clone(), v.clone())).collect())
	}
}

impl<T: KvStore + ?Sized> KvStore for &T {
	fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StorageError> {
		(**self).get(key)
	}

	fn put(&self, key: &[u8], value: &[u8]) -> Result<(), StorageError> {
		(**self).put(key, value)
	}

	fn scan(&self) -> Result<Vec<(Vec<u8>, Vec<u8>)>, StorageError> {
		(**self).scan()
	}
}
