//! Benchmarks for the service registry

use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use service_registry::{Constructible, Constructor, ParamType, Registry, Value, provides};
use std::hint::black_box;
use std::sync::Arc;

trait Operand: Send + Sync {
    fn value(&self) -> i64;
}

struct Literal(i64);

impl Operand for Literal {
    fn value(&self) -> i64 {
        self.0
    }
}

impl Constructible for Literal {
    fn constructors() -> Vec<Constructor<Self>> {
        vec![
            Constructor::new(|args| Ok(Literal(*args.get::<i64>("value")?))).param::<i64>("value"),
        ]
    }
}

struct Zero;

impl Operand for Zero {
    fn value(&self) -> i64 {
        0
    }
}

impl Constructible for Zero {
    fn constructors() -> Vec<Constructor<Self>> {
        vec![Constructor::new(|_| Ok(Zero))]
    }
}

struct Sum {
    lhs: Arc<dyn Operand>,
    rhs: Arc<dyn Operand>,
}

impl Operand for Sum {
    fn value(&self) -> i64 {
        self.lhs.value() + self.rhs.value()
    }
}

impl Constructible for Sum {
    fn constructors() -> Vec<Constructor<Self>> {
        vec![
            Constructor::new(|args| {
                Ok(Sum {
                    lhs: args.get("lhs")?,
                    rhs: args.get("rhs")?,
                })
            })
            .param::<dyn Operand>("lhs")
            .param::<dyn Operand>("rhs"),
        ]
    }
}

provides!(Literal => dyn Operand);
provides!(Zero => dyn Operand);
provides!(Sum => dyn Operand);

fn bench_registration(c: &mut Criterion) {
    let mut group = c.benchmark_group("registration");

    group.bench_function("register_default", |b| {
        b.iter(|| {
            let registry = Registry::new();
            registry.register::<dyn Operand, Zero>();
            black_box(registry)
        })
    });

    group.bench_function("register_with_overrides", |b| {
        b.iter(|| {
            let registry = Registry::new();
            registry
                .register_named::<dyn Operand, Sum>("sum")
                .with_dependency("lhs", "five")
                .with_dependency("rhs", "six");
            black_box(registry)
        })
    });

    group.bench_function("register_signature", |b| {
        b.iter(|| {
            let registry = Registry::new();
            let registration = registry
                .register_named::<dyn Operand, Literal>("five")
                .with_constructor_signature(&[ParamType::of::<i64>()], vec![Value::new(5i64)]);
            black_box(registration.is_ok());
            black_box(registry)
        })
    });

    group.finish();
}

fn bench_resolution(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolution");
    group.throughput(Throughput::Elements(1));

    let registry = Registry::new();
    registry.register::<dyn Operand, Zero>();
    registry.register_named::<dyn Operand, Zero>("singleton").as_singleton();
    registry
        .register_named::<dyn Operand, Literal>("five")
        .with_constructor("value", 5i64);
    registry
        .register_named::<dyn Operand, Literal>("six")
        .with_constructor("value", 6i64);
    registry
        .register_named::<dyn Operand, Sum>("sum")
        .with_dependency("lhs", "five")
        .with_dependency("rhs", "six");

    group.bench_function("resolve_by_type", |b| {
        b.iter(|| black_box(registry.resolve::<dyn Operand>().unwrap()))
    });

    group.bench_function("resolve_singleton", |b| {
        b.iter(|| black_box(registry.resolve_named::<dyn Operand>("singleton").unwrap()))
    });

    group.bench_function("resolve_graph", |b| {
        b.iter(|| black_box(registry.resolve_named::<dyn Operand>("sum").unwrap().value()))
    });

    group.bench_function("resolve_missing", |b| {
        b.iter(|| black_box(registry.resolve_named::<dyn Operand>("missing").is_err()))
    });

    group.finish();
}

fn bench_concurrent(c: &mut Criterion) {
    use std::thread;

    let mut group = c.benchmark_group("concurrent");

    group.bench_function("concurrent_reads_4", |b| {
        let registry = Registry::new();
        registry.register::<dyn Operand, Zero>().as_singleton();

        b.iter(|| {
            let handles: Vec<_> = (0..4)
                .map(|_| {
                    let registry = registry.clone();
                    thread::spawn(move || {
                        for _ in 0..100 {
                            let _ = registry.resolve::<dyn Operand>().unwrap();
                        }
                    })
                })
                .collect();

            for h in handles {
                h.join().unwrap();
            }
        })
    });

    group.finish();
}

criterion_group!(benches, bench_registration, bench_resolution, bench_concurrent);

criterion_main!(benches);
