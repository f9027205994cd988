//! Benchmarks for message parsing and serialization.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use slirc_proto::mode::{parse_modes, render_modes};
use slirc_proto::{Message, ModeContext, Prefix};

const SIMPLE_MESSAGE: &str = "PING :robustirc.net";

const PREFIX_MESSAGE: &str = ":nick!user@robust/0x13b5aa0a2bcfb8ad PRIVMSG #channel :Hello, world!";

const NUMERIC_RESPONSE: &str = ":robustirc.net 353 nick = #channel :@alice bob carol dave";

fn benchmark_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("Message Parsing");

    for (name, line) in [
        ("simple_ping", SIMPLE_MESSAGE),
        ("with_prefix", PREFIX_MESSAGE),
        ("numeric_response", NUMERIC_RESPONSE),
    ] {
        group.bench_function(name, |b| {
            b.iter(|| {
                let msg: Message = black_box(line).parse().unwrap();
                black_box(msg)
            })
        });
    }

    group.finish();
}

fn benchmark_serialization(c: &mut Criterion) {
    let msg = Message::new("PRIVMSG", ["#channel", "Hello, world!"])
        .with_prefix(Prefix::user("nick", "user", "robust/0x13b5aa0a2bcfb8ad"));

    c.bench_function("serialize_privmsg", |b| {
        b.iter(|| black_box(&msg).to_string())
    });
}

fn benchmark_modes(c: &mut Criterion) {
    c.bench_function("parse_render_modes", |b| {
        b.iter(|| {
            let changes = parse_modes(ModeContext::Channel, black_box("+nt-s+o"), &["alice"]);
            render_modes(&changes)
        })
    });
}

criterion_group!(benches, benchmark_parsing, benchmark_serialization, benchmark_modes);
criterion_main!(benches);
