use std::path::PathBuf;

use anyhow::Context;
use duindex_storage::{
	scan::{self, ScanOptions},
	Index,
};
use structopt::StructOpt;
use tracing::info;

#[derive(Debug, StructOpt)]
struct Options {
	#[structopt(short, long, default_value = "duindex.db", help = "Index database to use")]
	database: PathBuf,
	#[structopt(subcommand)]
	command: Command,
}

#[derive(Debug, StructOpt)]
enum Command {
	/// Scan a directory tree and store its sizes
	Index {
		path: PathBuf,
		#[structopt(short = "x", long, help = "Don't cross filesystem boundaries")]
		one_file_system: bool,
	},
	/// List the children of an indexed directory, largest first
	Ls {
		#[structopt(default_value = ".")]
		path: PathBuf,
		#[structopt(short, long, help = "Show sizes in bytes")]
		bytes: bool,
	},
	/// List the indexed roots
	Anchors,
}

fn main() -> anyhow::Result<()> {
	let options = Options::from_args();

	tracing_subscriber::fmt()
		.with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
		.init();

	let index = Index::load(&options.database)
		.with_context(|| format!("Failed to open database {}", options.database.display()))?;

	match options.command {
		Command::Index { path, one_file_system } => {
			let report = scan::index_path(&index, &path, &ScanOptions { one_file_system })
				.with_context(|| format!("Failed to index {}", path.display()))?;
			index.flush().context("Failed to flush database")?;
			info!(?report, "Done");
			println!(
				"{}: {} in {} files, {} directories",
				path.display(), humanize(report.total_size), report.files, report.dirs,
			);
		},
		Command::Ls { path, bytes } => {
			let mut dir = index.open_dir(&path)
				.with_context(|| format!("Failed to open {}", path.display()))?;
			while let Some(ent) = dir.next_entry() {
				let size = if bytes { ent.size.to_string() } else { humanize(ent.size) };
				let suffix = if ent.is_dir() { "/" } else { "" };
				println!("{:>10} {}{}", size, ent.name, suffix);
			}
			let total = dir.total_size();
			println!("{:>10} total", if bytes { total.to_string() } else { humanize(total) });
		},
		Command::Anchors => {
			for anchor in index.anchors()? {
				println!("{}\t{}", anchor.key, anchor.path);
			}
		},
	}

	Ok(())
}

fn humanize(size: u64) -> String {
	const UNITS: [&str; 7] = ["B", "K", "M", "G", "T", "P", "E"];
	let mut value = size as f64;
	let mut unit = 0;
	while value >= 1024.0 && unit < UNITS.len() - 1 {
		value /= 1024.0;
		unit += 1;
	}
	if unit == 0 {
		format!("{}{}", size, UNITS[0])
	} else {
		format!("{:.1}{}", value, UNITS[unit])
	}
}

#[cfg(test)]
mod tests {
	use super::humanize;

	#[test]
	fn human_sizes() {
		assert_eq!(humanize(0), "0B");
		assert_eq!(humanize(1023), "1023B");
		assert_eq!(humanize(1024), "1.0K");
		assert_eq!(humanize(1536), "1.5K");
		assert_eq!(humanize(5 * 1024 * 1024 * 1024), "5.0G");
		assert_eq!(humanize(u64::MAX), "16.0E");
	}
}
