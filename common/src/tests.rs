use super::*;

fn sample() -> Directory {
	let mut dir = Directory::with_capacity(2).unwrap();
	dir.add_entry("small", 10, 0o100644, 1, 11).unwrap();
	dir.add_entry("big", 300, S_IFDIR | 0o755, 1, 12).unwrap();
	dir.add_entry("medium", 42, 0o100644, 1, 13).unwrap();
	dir
}

#[test]
fn total_size_is_sum_of_sizes() {
	let sizes = [0u64, 1, 7, 4096, 1 << 40, 3];
	let mut dir = Directory::new();
	for (i, size) in sizes.iter().enumerate() {
		dir.add_entry(&format!("f{i}"), *size, 0, 0, i as u64).unwrap();
	}
	assert_eq!(dir.total_size(), sizes.iter().sum::<u64>());
	assert_eq!(dir.len(), sizes.len());
}

#[test]
fn growth_keeps_entries() {
	for capacity in [1usize, 2, 8] {
		for count in [0u64, 1, 2, 3, 9, 17, 64, 100] {
			let mut dir = Directory::with_capacity(capacity).unwrap();
			for i in 0..count {
				dir.add_entry(&format!("entry-{i}"), i * 3, 0o100600, 7, 1000 + i).unwrap();
			}
			assert_eq!(dir.len() as u64, count);
			assert!(dir.capacity() >= dir.len());
			for (i, ent) in dir.iter().enumerate() {
				let i = i as u64;
				assert_eq!(ent.name, format!("entry-{i}"));
				assert_eq!(ent.size, i * 3);
				assert_eq!(ent.dev, 7);
				assert_eq!(ent.ino, 1000 + i);
			}
		}
	}
}

#[test]
fn zero_capacity_grows() {
	let mut dir = Directory::with_capacity(0).unwrap();
	dir.add_entry("a", 1, 0, 0, 1).unwrap();
	dir.add_entry("b", 2, 0, 0, 2).unwrap();
	assert_eq!(dir.len(), 2);
	assert_eq!(dir.total_size(), 3);
}

#[test]
fn find_by_name() {
	let dir = sample();
	let ent = dir.find_by_name("big").unwrap();
	assert_eq!(ent.ino, 12);
	assert!(ent.is_dir());
	assert_eq!(dir.find_by_name("missing"), Err(DirError::NotFound(String::from("missing"))));
	assert_eq!(dir.find_by_name("Big"), Err(DirError::NotFound(String::from("Big"))));
}

#[test]
fn find_by_name_returns_first_duplicate() {
	let mut dir = Directory::new();
	dir.add_entry("x", 1, 0, 0, 1).unwrap();
	dir.add_entry("x", 2, 0, 0, 2).unwrap();
	assert_eq!(dir.find_by_name("x").unwrap().ino, 1);
}

#[test]
fn sort_descending() {
	let mut dir = sample();
	dir.add_entry("zero", 0, 0, 1, 14).unwrap();
	dir.add_entry("huge", 1 << 33, 0, 1, 15).unwrap();
	dir.sort_by_size_descending();
	for pair in dir.entries().windows(2) {
		assert!(pair[0].size >= pair[1].size);
	}
	assert_eq!(dir.entries()[0].name, "huge");
	assert_eq!(dir.entries()[4].name, "zero");
}

#[test]
fn sort_keeps_insertion_order_for_ties() {
	let mut dir = Directory::new();
	for name in ["a", "b", "c", "d"] {
		dir.add_entry(name, 5, 0, 0, 0).unwrap();
	}
	dir.add_entry("e", 6, 0, 0, 0).unwrap();
	dir.sort_by_size_descending();
	let names: Vec<_> = dir.iter().map(|e| e.name.as_str()).collect();
	assert_eq!(names, ["e", "a", "b", "c", "d"]);
}

#[test]
fn cursor_reads_and_rewinds() {
	let mut dir = sample();
	let mut names = Vec::new();
	while let Some(ent) = dir.next_entry() {
		names.push(ent.name.clone());
	}
	assert_eq!(names, ["small", "big", "medium"]);
	assert!(dir.next_entry().is_none());

	dir.rewind();
	assert_eq!(dir.next_entry().map(|e| e.name.as_str()), Some("small"));
}

#[test]
fn long_names_are_truncated() {
	let mut dir = Directory::new();
	let long = "n".repeat(MAX_NAME_LEN + 20);
	dir.add_entry(&long, 1, 0, 0, 1).unwrap();
	assert_eq!(dir.entries()[0].name.len(), MAX_NAME_LEN);

	// A multi-byte character straddling the limit is dropped whole
	let mut name = "a".repeat(MAX_NAME_LEN - 1);
	name.push('é');
	dir.add_entry(&name, 1, 0, 0, 2).unwrap();
	assert_eq!(dir.entries()[1].name, "a".repeat(MAX_NAME_LEN - 1));

	let exact = "b".repeat(MAX_NAME_LEN);
	dir.add_entry(&exact, 1, 0, 0, 3).unwrap();
	assert_eq!(dir.entries()[2].name, exact);
}

#[test]
fn equality_ignores_cursor() {
	let mut a = sample();
	let b = sample();
	a.next_entry();
	assert_eq!(a, b);
}
