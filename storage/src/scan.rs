//! Populates an [`Index`] from the filesystem.
//!
//! Every directory under the root gets one record keyed by its `(dev, ino)`;
//! the root itself is stored as an anchor. Symlinks are recorded but never
//! followed.

use std::{
	fs, io,
	os::unix::fs::MetadataExt,
	path::{Path, PathBuf},
};

use duindex_common::Directory;
use guard::guard;
use tracing::{info, trace, warn};
use walkdir::WalkDir;

use crate::{Index, KvStore, StorageError};

#[derive(Debug, Clone, Default)]
pub struct ScanOptions {
	/// Do not descend into directories on other devices than the root.
	pub one_file_system: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanReport {
	pub dirs: u64,
	pub files: u64,
	pub total_size: u64,
	/// Entries or directories that could not be read.
	pub skipped: u64,
}

#[tracing::instrument(skip(index, options))]
pub fn index_path<S: KvStore>(index: &Index<S>, root: &Path, options: &ScanOptions) -> Result<ScanReport, StorageError> {
	let root = fs::canonicalize(root).map_err(|e| {
		warn!(?root, "Error converting path: {}", e);
		StorageError::PathNotFound(root.display().to_string())
	})?;
	let root_str = root.to_str()
		.ok_or_else(|| StorageError::PathNotFound(root.display().to_string()))?;
	let meta = fs::symlink_metadata(&root)?;
	if !meta.is_dir() {
		warn!(root = root_str, "Not a directory");
		return Err(StorageError::PathNotFound(root_str.to_owned()));
	}

	let report = Scanner::new(index, options, meta.dev()).run(&root)?;
	index.add_anchor(root_str, meta.dev(), meta.ino())?;

	info!(root = root_str, dirs = report.dirs, files = report.files, total_size = report.total_size, "Indexed");
	Ok(report)
}

/// A directory whose children are still being walked.
struct OpenDir {
	path: PathBuf,
	depth: usize,
	name: String,
	mode: u32,
	dev: u64,
	ino: u64,
	dir: Directory,
	unreadable: bool,
}

struct Scanner<'a, S> {
	index: &'a Index<S>,
	options: &'a ScanOptions,
	root_dev: u64,
	open: Vec<OpenDir>,
	report: ScanReport,
}

impl<'a, S: KvStore> Scanner<'a, S> {
	fn new(index: &'a Index<S>, options: &'a ScanOptions, root_dev: u64) -> Self {
		Self {
			index,
			options,
			root_dev,
			open: Vec::new(),
			report: ScanReport::default(),
		}
	}

	/// Walks `root` depth first. A directory's record is written once the walk
	/// leaves it, when its total is known.
	fn run(mut self, root: &Path) -> Result<ScanReport, StorageError> {
		let mut walker = WalkDir::new(root).follow_links(false).into_iter();

		while let Some(item) = walker.next() {
			let dent = match item {
				Ok(dent) => dent,
				Err(e) => {
					let in_open_dir = self.open.last()
						.map_or(false, |d| e.path() == Some(d.path.as_path()));
					if in_open_dir && self.open.len() == 1 {
						return Err(io::Error::from(e).into());
					}
					if in_open_dir {
						if let Some(d) = self.open.last_mut() {
							d.unreadable = true;
						}
					}
					warn!("Skipping unreadable entry: {}", e);
					self.report.skipped += 1;
					continue;
				},
			};

			let depth = dent.depth();
			self.close_to(depth)?;

			let meta = match dent.metadata() {
				Ok(m) => m,
				Err(e) => {
					warn!(path = ?dent.path(), "Error reading metadata: {}", e);
					self.report.skipped += 1;
					continue;
				},
			};
			let name = dent.file_name().to_string_lossy().into_owned();

			if !dent.file_type().is_dir() {
				self.report.files += 1;
				trace!(path = ?dent.path(), size = meta.len(), "Entry");
				self.add_to_parent(&name, meta.len(), meta.mode(), meta.dev(), meta.ino())?;
			} else if depth > 0 && self.options.one_file_system && meta.dev() != self.root_dev {
				trace!(path = ?dent.path(), "Skipping directory on other device");
				walker.skip_current_dir();
				self.add_to_parent(&name, 0, meta.mode(), meta.dev(), meta.ino())?;
			} else {
				self.open.push(OpenDir {
					path: dent.path().to_owned(),
					depth,
					name,
					mode: meta.mode(),
					dev: meta.dev(),
					ino: meta.ino(),
					dir: Directory::new(),
					unreadable: false,
				});
			}
		}

		self.close_to(0)?;
		Ok(self.report)
	}

	/// Closes every open directory at `depth` or deeper.
	fn close_to(&mut self, depth: usize) -> Result<(), StorageError> {
		while self.open.last().map_or(false, |d| d.depth >= depth) {
			guard!(let Some(done) = self.open.pop() else { break });

			let size = if done.unreadable {
				0
			} else {
				self.index.write_record(&done.dir, done.dev, done.ino)?;
				self.report.dirs += 1;
				done.dir.total_size()
			};

			if self.open.is_empty() {
				self.report.total_size = size;
			} else {
				self.add_to_parent(&done.name, size, done.mode, done.dev, done.ino)?;
			}
		}
		Ok(())
	}

	fn add_to_parent(&mut self, name: &str, size: u64, mode: u32, dev: u64, ino: u64) -> Result<(), StorageError> {
		guard!(let Some(parent) = self.open.last_mut() else { return Ok(()) });
		parent.dir.add_entry(name, size, mode, dev, ino)?;
		Ok(())
	}
}
