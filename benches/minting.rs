//! Benchmarks for identifier minting and batch rendering.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use cubeweave::backend::WriteBatch;
use cubeweave::graph::{Iri, Literal, Term, Triple};
use cubeweave::store::IdentifierMinter;
use cubeweave::vocab::{cc, prov, rdf, schema};

fn bench_slugify(c: &mut Criterion) {
    c.bench_function("slugify_column_name", |bench| {
        bench.iter(|| black_box(IdentifierMinter::slugify("Zürich Straße / NO₂ Konzentration (µg/m³)")))
    });
}

fn bench_candidates(c: &mut Criterion) {
    let mut minter = IdentifierMinter::seeded(0);
    let parent = Iri::new("https://example.org/cube-project/ubd/table/measurements").unwrap();

    c.bench_function("retry_candidate", |bench| {
        bench.iter(|| black_box(minter.retry_candidate(&parent, Some("Pollutant Code"))))
    });
}

fn bench_render_batch(c: &mut Criterion) {
    let mut batch = WriteBatch::new();
    for doc in 0..20 {
        let graph = Iri::new(format!("https://example.org/dimension-mapping/{doc}")).unwrap();
        let mut triples = vec![Triple::new(graph.clone(), rdf::type_, prov::Dictionary)];
        for entry in 0..50 {
            let node = Term::Blank(format!("e{entry}"));
            triples.push(Triple::new(graph.clone(), prov::hadDictionaryMember, node.clone()));
            triples.push(Triple::new(node.clone(), prov::pairKey, Literal::simple(format!("raw \"{entry}\""))));
            triples.push(Triple::new(node, schema::about, cc::sharedDimension));
        }
        batch.replace(graph, triples);
    }
    batch.drop_graph(Iri::new("https://example.org/table/gone").unwrap());

    c.bench_function("render_batch_20x150", |bench| {
        bench.iter(|| black_box(batch.to_sparql_update()))
    });
}

criterion_group!(benches, bench_slugify, bench_candidates, bench_render_batch);
criterion_main!(benches);
