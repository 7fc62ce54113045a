//! Traversal benchmarks.
//!
//! Measures visitor dispatch, in-place transformation, deep copy and
//! validation over synthetic trees of nested blocks.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use kast::ast::deep_copy::deep_copy;
use kast::ast::validate::validate;
use kast::ast::*;

/// A block of `width` statements, each a nested block down to `depth`,
/// with unit literals at the leaves.
fn nested_blocks(arena: &mut AstArena, width: usize, depth: usize) -> NodeId {
    let unit = arena.builtin(BuiltinType::Unit);
    let statements: Vec<NodeId> = (0..width)
        .map(|_| {
            if depth == 0 {
                arena.alloc(UnitLiteral {
                    annotations: NodeList::new(),
                })
            } else {
                nested_blocks(arena, width, depth - 1)
            }
        })
        .collect();
    arena.alloc(Block {
        annotations: NodeList::new(),
        statements: statements.into(),
        ty: unit,
    })
}

/// Touches every node without changing anything.
struct Identity;

impl TransformerVoid for Identity {}

/// Replaces every unit literal with a fresh one.
struct Refresh;

impl TransformerVoid for Refresh {
    fn transform_unit_literal(&mut self, arena: &mut AstArena, _id: NodeId) -> TransformResult {
        TransformResult::Replaced(arena.alloc(UnitLiteral {
            annotations: NodeList::new(),
        }))
    }
}

const SHAPES: &[(&str, usize, usize)] = &[("wide", 64, 2), ("deep", 2, 12), ("mixed", 8, 4)];

fn bench_visit(c: &mut Criterion) {
    let mut group = c.benchmark_group("visit");
    for &(name, width, depth) in SHAPES {
        let mut arena = AstArena::new();
        let root = nested_blocks(&mut arena, width, depth);
        group.bench_with_input(BenchmarkId::new("count", name), &root, |b, &root| {
            b.iter(|| black_box(stats::count(&arena, root)));
        });
    }
    group.finish();
}

fn bench_transform(c: &mut Criterion) {
    let mut group = c.benchmark_group("transform");
    for &(name, width, depth) in SHAPES {
        let mut arena = AstArena::new();
        let root = nested_blocks(&mut arena, width, depth);
        group.bench_with_input(BenchmarkId::new("identity", name), &root, |b, &root| {
            b.iter(|| black_box(arena.transform_void(root, &mut Identity)));
        });
        group.bench_with_input(BenchmarkId::new("refresh_leaves", name), &root, |b, &root| {
            b.iter_batched(
                || arena.clone(),
                |mut arena| black_box(arena.transform_void(root, &mut Refresh)),
                criterion::BatchSize::LargeInput,
            );
        });
    }
    group.finish();
}

fn bench_tools(c: &mut Criterion) {
    let mut group = c.benchmark_group("tools");
    for &(name, width, depth) in SHAPES {
        let mut arena = AstArena::new();
        let root = nested_blocks(&mut arena, width, depth);
        group.bench_with_input(BenchmarkId::new("validate", name), &root, |b, &root| {
            b.iter(|| black_box(validate(&arena, root, "bench")));
        });
        group.bench_with_input(BenchmarkId::new("deep_copy", name), &root, |b, &root| {
            b.iter_batched(
                || arena.clone(),
                |mut arena| black_box(deep_copy(&mut arena, root)),
                criterion::BatchSize::LargeInput,
            );
        });
    }
    group.finish();
}

criterion_group!(traversal_benches, bench_visit, bench_transform, bench_tools);
criterion_main!(traversal_benches);
