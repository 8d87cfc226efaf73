use criterion::{black_box, criterion_group, criterion_main, Criterion};
use hub_tools::{parse_tool_config, FILESYSTEM_TOOL_PACKAGE};

fn bench_parse_tool_config(c: &mut Criterion) {
    let source = format!(
        r#"{{"toolServers": [
            {{"name": "fs", "command": "npx",
              "args": ["-y", "{FILESYSTEM_TOOL_PACKAGE}", "/srv/files"]}},
            {{"name": "excel", "command": "uvx", "args": ["excel-server"]}},
            {{"name": "search", "command": "uvx", "args": ["search-server", "--strict"],
              "description": "web search"}}
        ]}}"#
    );

    c.bench_function("parse_tool_config_1000", |b| {
        b.iter(|| {
            for _ in 0..1000 {
                let specs = parse_tool_config(black_box(&source)).unwrap();
                black_box(specs);
            }
        })
    });
}

fn bench_command_line(c: &mut Criterion) {
    let source = format!(
        r#"{{"toolServers": [
            {{"name": "fs", "command": "npx",
              "args": ["-y", "{FILESYSTEM_TOOL_PACKAGE}", "/srv/files", "--readonly"]}}
        ]}}"#
    );
    let specs = parse_tool_config(&source).unwrap();

    c.bench_function("command_line_1000", |b| {
        b.iter(|| {
            for _ in 0..1000 {
                let argv = black_box(&specs[0]).command_line();
                black_box(argv);
            }
        })
    });
}

criterion_group!(benches, bench_parse_tool_config, bench_command_line);
criterion_main!(benches);
