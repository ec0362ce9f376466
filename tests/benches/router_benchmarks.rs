//! # Facet Router Benchmarks
//!
//! | Group | Measures |
//! |-------|----------|
//! | fr-02 Selector Registry | Blob parsing, route updates, proxy dispatch |
//! | fr-03 Deployment Factory | Address prediction, deterministic creation |

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use fr_01_execution_host::prelude::*;
use fr_02_selector_registry::prelude::*;
use fr_03_deployment_factory::prelude::*;
use fr_tests::fixtures::*;
use rand::RngCore;

// ============================================================================
// FR-02: Selector Registry
// ============================================================================

fn signature_blob(count: usize) -> String {
    (0..count).map(|i| format!("f{i}(uint256,address);")).collect()
}

fn bench_blob_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("fr-02-blob-parsing");
    for count in [1, 16, 128] {
        let blob = signature_blob(count);
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::new("parse", count), &blob, |b, blob| {
            b.iter(|| black_box(parse_signature_blob(blob).map(|tokens| tokens.len())))
        });
    }
    group.finish();
}

fn bench_registry_updates(c: &mut Criterion) {
    let mut group = c.benchmark_group("fr-02-registry");
    let tokens = parse_signature_blob(&signature_blob(256)).unwrap_or_default();
    let first = Address::new([1; 20]);
    let second = Address::new([2; 20]);

    group.throughput(Throughput::Elements(tokens.len() as u64));
    group.bench_function("add_then_replace", |b| {
        b.iter(|| {
            let mut registry = FunctionRegistry::new();
            for token in &tokens {
                registry.set_function(token.id, &token.signature, first);
            }
            for token in &tokens {
                registry.set_function(token.id, &token.signature, second);
            }
            black_box(registry.len())
        })
    });
    group.bench_function("add_then_remove", |b| {
        b.iter(|| {
            let mut registry = FunctionRegistry::new();
            for token in &tokens {
                registry.set_function(token.id, &token.signature, first);
            }
            for token in &tokens {
                registry.set_function(token.id, &token.signature, Address::ZERO);
            }
            black_box(registry.is_empty())
        })
    });
    group.finish();
}

fn bench_proxy_dispatch(c: &mut Criterion) {
    let mut group = c.benchmark_group("fr-02-dispatch");
    let mut fixture = RouterFixture::new();
    let proxy = fixture.router.proxy;
    let test_contract = fixture.test_contract;
    let _ = fixture.client(OWNER).update_contract(
        test_contract,
        &signature_list(&TestContract.functions()),
        "Add TestContract",
    );
    let _ = fixture.host.transact(
        OWNER,
        proxy,
        U256::zero(),
        set_call(&Bytes::from_slice(&[7; 64])),
    );

    let get = encode_call("get()", &()).unwrap_or_default();
    group.bench_function("routed_get", |b| {
        b.iter(|| black_box(fixture.host.call(OTHER, proxy, get.clone())))
    });
    group.bench_function("direct_get", |b| {
        b.iter(|| black_box(fixture.host.call(OTHER, test_contract, get.clone())))
    });
    let total = encode_call("totalFunctions()", &()).unwrap_or_default();
    group.bench_function("query_total_functions", |b| {
        b.iter(|| black_box(fixture.host.call(OTHER, proxy, total.clone())))
    });
    group.finish();
}

// ============================================================================
// FR-03: Deployment Factory
// ============================================================================

fn bench_address_prediction(c: &mut Criterion) {
    let mut group = c.benchmark_group("fr-03-prediction");
    let deployer = Address::new([0x0f; 20]);
    let code = test_contract_code();
    let salt = Hash::new([0x5a; 32]);
    let call = set_call(&Bytes::from_slice(&[1; 64]));

    group.bench_function("predict_code", |b| {
        b.iter(|| black_box(AddressPredictor::predict_code(deployer, code.as_slice(), salt)))
    });
    group.bench_function("predict_code_with_call", |b| {
        b.iter(|| {
            black_box(AddressPredictor::predict_code_with_call(
                deployer,
                code.as_slice(),
                salt,
                call.as_slice(),
            ))
        })
    });
    group.finish();
}

fn bench_deterministic_creation(c: &mut Criterion) {
    let mut group = c.benchmark_group("fr-03-creation");
    let mut host = Host::new(VmConfig::default(), test_catalog());
    let factory = host
        .deploy(OWNER, GenericFactory.init_code(Bytes::new()), U256::zero())
        .contract_address
        .unwrap_or(Address::ZERO);
    let code = test_contract_code();
    let mut rng = rand::thread_rng();

    group.bench_function("create_contract", |b| {
        b.iter(|| {
            let mut salt = [0u8; 32];
            rng.fill_bytes(&mut salt);
            let created = FactoryClient::new(&mut host, factory, OWNER)
                .create_contract(&code, Hash::new(salt))
                .map(|(address, _)| address);
            black_box(created)
        })
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_blob_parsing,
    bench_registry_updates,
    bench_proxy_dispatch,
    bench_address_prediction,
    bench_deterministic_creation,
);
criterion_main!(benches);
