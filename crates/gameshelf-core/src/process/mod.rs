//! Folder processing - canonical-name guard, resolution, rename

use crate::catalog::{Candidate, CatalogError, SearchCatalog};
use crate::normalize;
use crate::resolve::{self, Console, Resolution};
use anyhow::{Context, Result};
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;
use walkdir::WalkDir;

// `<title> (<4-digit year>)` - folders already in this form are left alone.
static CANONICAL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^.+ \(\d{4}\)$").unwrap());

/// Outcome counters for one full run.
///
/// After a run, `total == renamed + skipped + errors`.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct RunStats {
    pub total: u32,
    pub renamed: u32,
    pub skipped: u32,
    pub errors: u32,
}

/// Whether a folder name already carries the canonical `Title (Year)` form.
pub fn is_canonical(name: &str) -> bool {
    CANONICAL.is_match(name)
}

/// Compose the rename target for a resolved candidate.
///
/// Undated titles stay bare rather than gaining a "(TBA)" suffix.
pub fn target_name(candidate: &Candidate) -> String {
    match candidate.release_year {
        Some(year) => format!("{} ({year})", candidate.name),
        None => candidate.name.clone(),
    }
}

/// Walks the folders directly under a root and renames each to canonical
/// form, one at a time.
pub struct FolderProcessor<'a, C> {
    catalog: &'a mut C,
    dry_run: bool,
}

impl<'a, C: SearchCatalog> FolderProcessor<'a, C> {
    pub fn new(catalog: &'a mut C, dry_run: bool) -> Self {
        Self { catalog, dry_run }
    }

    /// Process every directory directly under `root`, sequentially.
    ///
    /// Per-folder failures are tallied and reported; only authentication
    /// failures (and an unreadable root) abort the run.
    pub fn run(&mut self, root: &Path, console: &mut dyn Console) -> Result<RunStats> {
        let mut stats = RunStats::default();

        for entry in WalkDir::new(root).min_depth(1).max_depth(1) {
            let entry = entry
                .with_context(|| format!("Failed to read directory entry in {}", root.display()))?;
            if !entry.file_type().is_dir() {
                continue;
            }
            let Some(name) = entry.file_name().to_str() else {
                eprintln!("Warning: skipping non-UTF-8 folder name {:?}", entry.file_name());
                continue;
            };
            stats.total += 1;
            self.process_folder(root, name, console, &mut stats)?;
        }

        Ok(stats)
    }

    fn process_folder(
        &mut self,
        root: &Path,
        name: &str,
        console: &mut dyn Console,
        stats: &mut RunStats,
    ) -> Result<()> {
        if is_canonical(name) {
            println!("Skipping {name} - already properly named");
            stats.skipped += 1;
            return Ok(());
        }

        let resolution = match self.search_variants(name)? {
            Some((variant, candidates)) => resolve::resolve(&variant, candidates, console),
            None => Resolution::NoMatch,
        };

        match resolution {
            Resolution::Matched(candidate) => self.rename(root, name, &candidate, stats),
            Resolution::NoMatch => {
                println!("Could not find game info for: {name}");
                stats.errors += 1;
            }
            Resolution::Skipped => {
                println!("Skipped by choice: {name}");
                stats.errors += 1;
            }
        }
        Ok(())
    }

    /// Try each query variant in order until one yields candidates.
    ///
    /// A failed search on one variant is reported and the next variant is
    /// tried; an authentication failure aborts the run.
    fn search_variants(&mut self, name: &str) -> Result<Option<(String, Vec<Candidate>)>> {
        for variant in normalize::query_variants(name) {
            match self.catalog.search(&variant) {
                Ok(candidates) if !candidates.is_empty() => {
                    return Ok(Some((variant, candidates)));
                }
                Ok(_) => {}
                Err(err @ CatalogError::Auth(_)) => return Err(err.into()),
                Err(CatalogError::Search(reason)) => {
                    eprintln!("Warning: search for '{variant}' failed: {reason}");
                }
            }
        }
        Ok(None)
    }

    fn rename(&self, root: &Path, name: &str, candidate: &Candidate, stats: &mut RunStats) {
        let target = target_name(candidate);
        if self.dry_run {
            println!("Would rename: {name} -> {target}");
            stats.renamed += 1;
            return;
        }

        let target_path = root.join(&target);
        if target != name && target_path.exists() {
            eprintln!("Error renaming {name}: target '{target}' already exists");
            stats.errors += 1;
            return;
        }

        match std::fs::rename(root.join(name), &target_path) {
            Ok(()) => {
                println!("Renamed: {name} -> {target}");
                stats.renamed += 1;
            }
            Err(err) => {
                eprintln!("Error renaming {name}: {err}");
                stats.errors += 1;
            }
        }
    }
}
