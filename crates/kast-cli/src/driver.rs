//! Subcommand implementations. Each returns its result for the binary to
//! print, so the same code paths run under test.

use anyhow::{Context, Result, bail};
use kast::ast::deep_copy::deep_copy_with_mapping;
use kast::ast::render::render;
use kast::ast::stats::{self, TreeStats};
use kast::ast::validate::{find_roots, validate};
use kast::ast::{AstArena, NodeId};
use kast::common::Diagnostic;
use kast::common::diagnostics::diagnostic_codes;
use rayon::prelude::*;
use serde::Serialize;
use std::fmt::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::args::{CopyArgs, DumpArgs};
use crate::config::KastConfig;

pub fn read_arena(path: &Path) -> Result<AstArena> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read tree: {}", path.display()))?;
    let arena = serde_json::from_str(&source)
        .with_context(|| format!("failed to parse tree: {}", path.display()))?;
    Ok(arena)
}

pub fn write_arena(path: &Path, arena: &AstArena) -> Result<()> {
    let json = serde_json::to_string_pretty(arena).context("failed to serialize tree")?;
    std::fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))
}

/// The requested root, or the only unowned node when none was requested.
pub fn resolve_root(arena: &AstArena, requested: Option<u32>) -> Result<NodeId> {
    if let Some(index) = requested {
        let id = NodeId(index);
        if !arena.contains(id) {
            bail!("node #{index} is not in the tree ({} nodes)", arena.len());
        }
        return Ok(id);
    }
    match find_roots(arena).as_slice() {
        [root] => Ok(*root),
        [] => bail!("the tree has no root node"),
        roots => {
            let listed: Vec<String> = roots.iter().map(|id| format!("#{}", id.0)).collect();
            bail!(
                "the tree has {} roots ({}); pass --root",
                roots.len(),
                listed.join(", ")
            )
        }
    }
}

/// Refuse to walk a tree that `validate` rejects.
///
/// Dangling ids, ownership cycles and nesting past `MAX_TREE_DEPTH` would
/// otherwise panic or never terminate in the walkers below.
pub fn ensure_well_formed(arena: &AstArena, root: NodeId, path: &Path) -> Result<()> {
    let file = path.display().to_string();
    let problems: Vec<Diagnostic> = validate(arena, root, &file)
        .into_iter()
        .filter(|d| d.is_error() || d.code == diagnostic_codes::TREE_TOO_DEEP)
        .collect();
    let Some(first) = problems.first() else {
        return Ok(());
    };
    bail!(
        "{file}#{}: {} (K{}); {} problem(s) under root #{}, run `kast check` for details",
        first.node,
        first.message_text,
        first.code,
        problems.len(),
        root.0
    )
}

#[tracing::instrument(skip_all, fields(file = %args.file.display()))]
pub fn dump(args: &DumpArgs, config: &KastConfig) -> Result<String> {
    let arena = read_arena(&args.file)?;
    let root = resolve_root(&arena, args.root)?;
    ensure_well_formed(&arena, root, &args.file)?;
    let options = config.render_options(args);
    Ok(render(&arena, root, &options))
}

/// Expand directories into the `*.json` files below them, sorted by path.
pub fn collect_tree_files(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_file() {
            files.push(path.clone());
            continue;
        }
        if !path.is_dir() {
            bail!("no such file or directory: {}", path.display());
        }
        let mut found: Vec<PathBuf> = WalkDir::new(path)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .map(|entry| entry.into_path())
            .filter(|file| file.extension().is_some_and(|ext| ext == "json"))
            .collect();
        found.sort();
        debug!(dir = %path.display(), files = found.len(), "collected trees");
        files.extend(found);
    }
    Ok(files)
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileStats {
    pub path: String,
    pub roots: usize,
    pub stats: TreeStats,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct StatsReport {
    pub files: Vec<FileStats>,
    pub total: TreeStats,
}

fn file_stats(path: &Path) -> Result<FileStats> {
    let arena = read_arena(path)?;
    let roots = find_roots(&arena);
    let mut total = TreeStats::default();
    for &root in &roots {
        ensure_well_formed(&arena, root, path)?;
        total.merge(&stats::count(&arena, root));
    }
    Ok(FileStats {
        path: path.display().to_string(),
        roots: roots.len(),
        stats: total,
    })
}

#[tracing::instrument(skip_all, fields(paths = paths.len()))]
pub fn stats(paths: &[PathBuf]) -> Result<StatsReport> {
    let files = collect_tree_files(paths)?;
    let per_file: Vec<FileStats> = files
        .par_iter()
        .map(|path| file_stats(path))
        .collect::<Result<_>>()?;

    let mut total = TreeStats::default();
    for file in &per_file {
        total.merge(&file.stats);
    }
    info!(files = per_file.len(), nodes = total.total, "counted trees");
    Ok(StatsReport {
        files: per_file,
        total,
    })
}

pub fn format_stats(report: &StatsReport) -> String {
    let mut out = String::new();
    for file in &report.files {
        let _ = writeln!(
            out,
            "{}: {} nodes in {} trees",
            file.path, file.stats.total, file.roots
        );
    }
    let _ = writeln!(
        out,
        "total: {} nodes in {} files",
        report.total.total,
        report.files.len()
    );
    let width = report
        .total
        .kinds
        .keys()
        .chain(report.total.categories.keys())
        .map(|name| name.len())
        .max()
        .unwrap_or(0);
    out.push_str("kinds:\n");
    for (name, count) in &report.total.kinds {
        let _ = writeln!(out, "  {name:<width$}  {count}");
    }
    out.push_str("categories:\n");
    for (name, count) in &report.total.categories {
        let _ = writeln!(out, "  {name:<width$}  {count}");
    }
    out
}

#[derive(Debug, Clone, Default)]
pub struct CheckReport {
    pub files: usize,
    pub diagnostics: Vec<Diagnostic>,
}

impl CheckReport {
    pub fn error_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.is_error()).count()
    }

    pub fn warning_count(&self) -> usize {
        self.diagnostics.len() - self.error_count()
    }

    pub fn failed(&self, warnings_as_errors: bool) -> bool {
        if warnings_as_errors {
            !self.diagnostics.is_empty()
        } else {
            self.error_count() > 0
        }
    }
}

fn check_file(path: &Path) -> Result<Vec<Diagnostic>> {
    let arena = read_arena(path)?;
    let file = path.display().to_string();
    let mut diagnostics = Vec::new();
    for root in find_roots(&arena) {
        diagnostics.extend(validate(&arena, root, &file));
    }
    Ok(diagnostics)
}

#[tracing::instrument(skip_all, fields(paths = paths.len()))]
pub fn check(paths: &[PathBuf]) -> Result<CheckReport> {
    let files = collect_tree_files(paths)?;
    let per_file: Vec<Vec<Diagnostic>> = files
        .par_iter()
        .map(|path| check_file(path))
        .collect::<Result<_>>()?;
    Ok(CheckReport {
        files: files.len(),
        diagnostics: per_file.into_iter().flatten().collect(),
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CopyOutcome {
    pub root: NodeId,
    pub copied: usize,
}

/// Deep copy the subtree at `--root` and write the arena, original nodes
/// included, to `--output`.
#[tracing::instrument(skip_all, fields(file = %args.file.display(), root = args.root))]
pub fn copy(args: &CopyArgs) -> Result<CopyOutcome> {
    let mut arena = read_arena(&args.file)?;
    let root = resolve_root(&arena, Some(args.root))?;
    ensure_well_formed(&arena, root, &args.file)?;
    let copied = deep_copy_with_mapping(&mut arena, root);
    write_arena(&args.output, &arena)?;
    Ok(CopyOutcome {
        root: copied.root,
        copied: copied.copies.len(),
    })
}
