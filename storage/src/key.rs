//! Keys and anchor values as stored in the key-value store.

use crate::StorageError;

/// Identity of a filesystem object, and the key its record is stored under
/// (`"<dev>/<ino>"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
#[display(fmt = "{}/{}", dev, ino)]
pub struct RecordKey {
	pub dev: u64,
	pub ino: u64,
}

impl RecordKey {
	pub fn new(dev: u64, ino: u64) -> Self {
		Self { dev, ino }
	}

	pub fn to_bytes(self) -> Vec<u8> {
		self.to_string().into_bytes()
	}

	/// Value stored under an anchor path: `"<dev> <ino>"`.
	pub fn to_anchor_value(self) -> Vec<u8> {
		format!("{} {}", self.dev, self.ino).into_bytes()
	}

	pub fn parse_anchor_value(raw: &[u8]) -> Result<Self, StorageError> {
		let malformed = || StorageError::Corruption(format!(
			"malformed anchor value {:?}", String::from_utf8_lossy(raw),
		));
		let text = std::str::from_utf8(raw).map_err(|_| malformed())?;
		let mut fields = text.split_ascii_whitespace();
		let dev = fields.next().and_then(|f| f.parse().ok()).ok_or_else(malformed)?;
		let ino = fields.next().and_then(|f| f.parse().ok()).ok_or_else(malformed)?;
		if fields.next().is_some() {
			return Err(malformed());
		}
		Ok(Self { dev, ino })
	}
}
