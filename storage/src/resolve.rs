//! Resolution of absolute paths to stored directory records.
//!
//! The store knows no path except the anchors written at index time, so a path
//! is resolved in two steps: find the longest anchored prefix, then walk the
//! remaining components through the `(dev, ino)` of each child entry.

use std::{fs, iter, path::Path};

use duindex_common::Directory;
use guard::guard;
use tracing::{debug, warn};

use crate::{Index, KvStore, RecordKey, StorageError};

impl<S: KvStore> Index<S> {
	/// Canonicalizes `path` and resolves it with [`Index::resolve`].
	pub fn open_dir(&self, path: impl AsRef<Path>) -> Result<Directory, StorageError> {
		let path = path.as_ref();
		let canon = fs::canonicalize(path).map_err(|e| {
			warn!(?path, "Error converting path: {}", e);
			StorageError::PathNotFound(path.display().to_string())
		})?;
		guard!(let Some(canon_str) = canon.to_str() else {
			warn!(?canon, "Path is not valid UTF-8");
			return Err(StorageError::PathNotFound(canon.display().to_string()));
		});
		self.resolve(canon_str)
	}

	/// Finds the directory record for an absolute, canonical path. The result is
	/// sorted largest first.
	///
	/// A final component naming a file resolves to the directory holding it.
	#[tracing::instrument(skip(self))]
	pub fn resolve(&self, path: &str) -> Result<Directory, StorageError> {
		let (anchor, prefix) = self.find_anchor(path)?;
		let mut dir = self.open_dir_at(anchor.dev, anchor.ino)?;

		let mut components = path[prefix.len()..]
			.split('/')
			.filter(|c| !c.is_empty())
			.peekable();

		while let Some(name) = components.next() {
			guard!(let Ok(ent) = dir.find_by_name(name) else {
				warn!(path, name, "Path component not found in database");
				return Err(StorageError::PathNotFound(path.to_owned()));
			});
			let key = RecordKey::new(ent.dev, ent.ino);
			let is_dir = ent.is_dir();

			let mut next = match self.fetch_record(key)? {
				Some(next) => next,
				None if components.peek().is_none() && !is_dir => {
					debug!(path, name, "Final component is not a directory");
					return Ok(dir);
				},
				None => {
					warn!(path, name, %key, "Id not found in database");
					return Err(StorageError::PathNotFound(path.to_owned()));
				},
			};
			next.sort_by_size_descending();
			dir = next;
		}

		Ok(dir)
	}

	/// Longest prefix of `path` stored as an anchor, and the identity it maps to.
	pub fn find_anchor<'p>(&self, path: &'p str) -> Result<(RecordKey, &'p str), StorageError> {
		if !path.starts_with('/') {
			warn!(path, "Path is not absolute");
			return Err(StorageError::PathNotFound(path.to_owned()));
		}
		for prefix in anchor_prefixes(path) {
			if let Some(raw) = self.anchors.get(prefix.as_bytes())? {
				let key = RecordKey::parse_anchor_value(&raw)?;
				debug!(prefix, %key, "Found anchor");
				return Ok((key, prefix));
			}
		}
		warn!(path, "Path not found in database");
		Err(StorageError::PathNotFound(path.to_owned()))
	}
}

/// `"/a/b/c"`, `"/a/b"`, `"/a"`, `"/"`.
fn anchor_prefixes(path: &str) -> impl Iterator<Item = &str> {
	iter::successors(Some(path).filter(|p| !p.is_empty()), |prev| {
		if prev.len() <= 1 {
			return None;
		}
		match prev.rfind('/')? {
			i if i > 1 => Some(&prev[..i]),
			_ => prev.get(..1),
		}
	})
}

#[cfg(test)]
mod tests {
	use super::anchor_prefixes;

	#[test]
	fn prefixes_stop_at_separators() {
		let all: Vec<_> = anchor_prefixes("/data/sub/file.txt").collect();
		assert_eq!(all, ["/data/sub/file.txt", "/data/sub", "/data", "/"]);
	}

	#[test]
	fn prefixes_of_root_and_empty() {
		assert_eq!(anchor_prefixes("/").collect::<Vec<_>>(), ["/"]);
		assert_eq!(anchor_prefixes("").count(), 0);
	}

	#[test]
	fn prefixes_without_separator() {
		assert_eq!(anchor_prefixes("é").collect::<Vec<_>>(), ["é"]);
		assert_eq!(anchor_prefixes("ab").collect::<Vec<_>>(), ["ab"]);
		assert_eq!(anchor_prefixes("éa/b").collect::<Vec<_>>(), ["éa/b", "éa"]);
	}

	#[test]
	fn trailing_separator() {
		let all: Vec<_> = anchor_prefixes("/a/b/").collect();
		assert_eq!(all, ["/a/b/", "/a/b", "/a", "/"]);
	}
}
