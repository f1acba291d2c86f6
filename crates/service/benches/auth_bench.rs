use criterion::{criterion_group, criterion_main, Criterion};
use std::sync::Arc;

use service::auth::domain::{LoginInput, RegisterInput};
use service::auth::repository::memory::InMemoryUserRepository;
use service::auth::service::{AuthConfig, AuthService};
use service::auth::store::{HashingConfig, UserStore};
use service::auth::token::TokenIssuer;

fn bench_login(c: &mut Criterion) {
    let store = UserStore::new(Arc::new(InMemoryUserRepository::default()), HashingConfig::default()).unwrap();
    let svc = AuthService::new(store, TokenIssuer::new("secret", None), AuthConfig::default());

    // pre-create user outside of the benchmark using a tokio runtime
    let rt = tokio::runtime::Runtime::new().unwrap();
    let _ = rt.block_on(svc.register(RegisterInput::new("bench@example.com", "Benchmark1")));

    c.bench_function("auth_login_verify", |b| {
        b.iter(|| {
            let _ = rt.block_on(svc.login(LoginInput::new("bench@example.com", "Benchmark1"))).unwrap();
        });
    });

    c.bench_function("auth_login_unknown_email", |b| {
        b.iter(|| {
            let _ = rt.block_on(svc.login(LoginInput::new("nobody@example.com", "Benchmark1")));
        });
    });
}

fn bench_issue(c: &mut Criterion) {
    let issuer = TokenIssuer::new("secret", None);
    let id = uuid::Uuid::new_v4();
    c.bench_function("token_issue", |b| b.iter(|| issuer.issue(id, "bench@example.com").unwrap()));
}

criterion_group!(benches, bench_login, bench_issue);
criterion_main!(benches);
