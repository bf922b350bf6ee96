use duindex_common::DirError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
	#[error("Out of memory")]
	OutOfMemory,
	#[error("Path not found: {0}")]
	PathNotFound(String),
	#[error("Corrupt record: {0}")]
	Corruption(String),
	#[error(transparent)]
	Backend(#[from] sled::Error),
	#[error("I/O error: {0}")]
	Io(#[from] std::io::Error),
}

impl StorageError {
	pub fn is_not_found(&self) -> bool {
		matches!(self, StorageError::PathNotFound(_))
	}
}

impl From<DirError> for StorageError {
	fn from(e: DirError) -> Self {
		match e {
			DirError::OutOfMemory => StorageError::OutOfMemory,
			DirError::NotFound(name) => StorageError::PathNotFound(name),
		}
	}
}
