use std::path::PathBuf;

use duindex_storage::*;

fn main() {
	let path = std::env::args().nth(1)
		.expect("Database path not specified");
	let index = Index::load(PathBuf::from(path))
		.expect("Failed to load index");
	for anchor in index.anchors().expect("Failed to read anchors") {
		println!("{} ({})", anchor.path, anchor.key);
		print_directory(&index, 1, anchor.key);
	}
}

fn print_directory(index: &Index, level: usize, key: RecordKey) {
	let dir = match index.open_dir_at(key.dev, key.ino) {
		Ok(dir) => dir,
		Err(_) => return,
	};
	for ent in &dir {
		print!("{}", "  ".repeat(level));
		if ent.is_dir() {
			println!(" - {}/ {}", ent.name, ent.size);
			print_directory(index, level + 1, RecordKey::new(ent.dev, ent.ino));
		} else {
			println!(" - {} {}", ent.name, ent.size);
		}
	}
}
