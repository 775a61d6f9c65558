//! Benchmarks for the transform pipeline.
//!
//! Measures fixpoint runs over synthetic compilation units shaped like real
//! recompiler output: chains of single-use temporaries feeding calls, plus variables
//! assigned from sibling classes that type inference has to widen.

extern crate unvirt;

use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;
use unvirt::prelude::*;

fn build_registry() -> TypeRegistry {
    let registry = TypeRegistry::with_core_types();
    let object = TypeRef::named("System", "Object");
    registry
        .register(TypeDef::new("Media", "Stream", Some(object.clone())))
        .unwrap();
    registry
        .register(TypeDef::new(
            "Media",
            "FileStream",
            Some(TypeRef::named("Media", "Stream")),
        ))
        .unwrap();
    registry
        .register(TypeDef::new(
            "Media",
            "MemoryStream",
            Some(TypeRef::named("Media", "Stream")),
        ))
        .unwrap();
    registry
}

/// One block of `temp = ldc n; call Write(temp)` pairs plus two stream assignments.
fn build_unit(statement_pairs: usize) -> CilUnit {
    let object = TypeRef::named("System", "Object");
    let int32 = TypeRef::named("System", "Int32");

    let mut unit = CilUnit::new();
    let mut statements = Vec::new();

    let stream_var = unit.new_variable("loc_s", object.clone());
    for name in ["FileStream", "MemoryStream"] {
        let value = unit
            .instruction(
                CilOp::Newobj,
                Some(CilOperand::Member(MemberRef::new(
                    TypeRef::named("Media", name),
                    ".ctor",
                ))),
                vec![],
                Some(TypeRef::named("Media", name)),
            )
            .unwrap();
        statements.push(unit.assignment(stream_var, value).unwrap());
    }

    for index in 0..statement_pairs {
        let temp = unit.new_variable(format!("loc_{index}"), object.clone());
        let value = unit
            .instruction(
                CilOp::Ldc,
                Some(CilOperand::Int(index as i64)),
                vec![],
                Some(int32.clone()),
            )
            .unwrap();
        statements.push(unit.assignment(temp, value).unwrap());

        let read = unit.variable_expression(temp).unwrap();
        let call = unit
            .instruction(
                CilOp::Call,
                Some(CilOperand::Member(MemberRef::new(
                    TypeRef::named("Media", "Stream"),
                    "Write",
                ))),
                vec![read],
                None,
            )
            .unwrap();
        statements.push(unit.expression_statement(call).unwrap());
    }

    unit.new_block(CfgNodeId::new(0), statements).unwrap();
    unit
}

fn bench_pipeline_small(c: &mut Criterion) {
    let registry = build_registry();
    let recompiler = Recompiler::new(&registry, PipelineConfig::default());

    c.bench_function("pipeline_unit_16_pairs", |b| {
        b.iter(|| {
            let mut unit = build_unit(16);
            let outcome = recompiler.process_unit(black_box(&mut unit));
            black_box(outcome)
        });
    });
}

fn bench_pipeline_large(c: &mut Criterion) {
    let registry = build_registry();
    let recompiler = Recompiler::new(&registry, PipelineConfig::default());

    c.bench_function("pipeline_unit_256_pairs", |b| {
        b.iter(|| {
            let mut unit = build_unit(256);
            let outcome = recompiler.process_unit(black_box(&mut unit));
            black_box(outcome)
        });
    });
}

fn bench_batch_parallel(c: &mut Criterion) {
    let registry = build_registry();
    let recompiler = Recompiler::new(&registry, PipelineConfig::default());

    c.bench_function("pipeline_batch_64_units", |b| {
        b.iter(|| {
            let mut units: Vec<CilUnit> = (0..64).map(|_| build_unit(16)).collect();
            let outcomes = recompiler.run(black_box(&mut units));
            black_box(outcomes)
        });
    });
}

criterion_group!(
    benches,
    bench_pipeline_small,
    bench_pipeline_large,
    bench_batch_parallel
);
criterion_main!(benches);
