//! Performance benchmarks for the cart engine.
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use cart_engine::{
    project, Cart, CartLine, CartMutation, LineId, Money, MutationIntent, UpdateLineInput,
    VariantId,
};

/// Build a confirmed cart with the given number of priced lines.
fn confirmed_cart(lines: usize) -> Cart {
    let mut cart = Cart::empty();
    for n in 0..lines {
        cart.lines.push(
            CartLine::new(
                LineId::new(format!("line-{n}")),
                VariantId::new(format!("variant-{n}")),
                (n as u32 % 5) + 1,
                format!("Product {n}"),
            )
            .with_unit_cost(Money::new(9.99 + n as f64, "EUR")),
        );
    }
    cart.total_quantity = cart.computed_total_quantity();
    cart
}

/// One single-line quantity update per line, the worst realistic case
/// of many concurrent steppers.
fn update_intents(lines: usize) -> Vec<MutationIntent> {
    (0..lines)
        .map(|n| {
            MutationIntent::new(
                CartMutation::UpdateLines {
                    lines: vec![UpdateLineInput::new(
                        LineId::new(format!("line-{n}")),
                        (n as u32 % 7) + 1,
                    )],
                },
                n as u64 + 1,
            )
        })
        .collect()
}

fn bench_projection(c: &mut Criterion) {
    let mut group = c.benchmark_group("projection");

    for lines in [1usize, 10, 50, 200].iter() {
        let cart = confirmed_cart(*lines);
        let intents = update_intents(*lines);
        group.throughput(Throughput::Elements(*lines as u64));
        group.bench_with_input(BenchmarkId::new("overlay_all_lines", lines), lines, |b, _| {
            b.iter(|| black_box(project(black_box(&cart), black_box(&intents))));
        });
        group.bench_with_input(BenchmarkId::new("passthrough", lines), lines, |b, _| {
            b.iter(|| black_box(project(black_box(&cart), &[])));
        });
    }

    group.finish();
}

fn bench_fetch_key(c: &mut Criterion) {
    let ids: Vec<LineId> = (0..4).map(|n| LineId::new(format!("line-{n}"))).collect();
    c.bench_function("fetch_key/for_lines", |b| {
        b.iter(|| {
            black_box(cart_engine::FetchKey::for_lines(black_box(&ids)));
        });
    });
}

criterion_group!(benches, bench_projection, bench_fetch_key);
criterion_main!(benches);
