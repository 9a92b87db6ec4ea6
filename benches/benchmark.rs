use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use serde_json::{Value, json};

use selectattrfirst::filter::{Filter, SelectAttrFirstFilter};
use selectattrfirst::interpreter::Interpreter;
use selectattrfirst::value::Kwargs;

// ------------- Data -------------
fn contents(len: usize, featured_at: Option<usize>) -> Value {
    let items: Vec<Value> = (0..len)
        .map(|i| {
            let image = if Some(i) == featured_at { json!(format!("img-{i}.png")) } else { Value::Null };
            json!({"id": i, "post": {"featured_image": image, "views": i * 7}})
        })
        .collect();
    Value::Array(items)
}

fn select_first(c: &mut Criterion) {
    let interpreter = Interpreter::new();
    let kwargs = Kwargs::new();
    let truthy = [json!("post.featured_image")];

    let early = contents(10_000, Some(3));
    c.bench_function("selectattrfirst early match", |b| {
        b.iter(|| SelectAttrFirstFilter.filter(black_box(&early), &interpreter, &truthy, &kwargs))
    });

    let late = contents(10_000, Some(9_990));
    c.bench_function("selectattrfirst late match", |b| {
        b.iter(|| SelectAttrFirstFilter.filter(black_box(&late), &interpreter, &truthy, &kwargs))
    });

    let none = contents(10_000, None);
    let gt = [json!("post.views"), json!("gt"), json!(1_000_000)];
    c.bench_function("selectattrfirst no match", |b| {
        b.iter(|| SelectAttrFirstFilter.filter(black_box(&none), &interpreter, &gt, &kwargs))
    });
}

criterion_group!(benches, select_first);
criterion_main!(benches);
