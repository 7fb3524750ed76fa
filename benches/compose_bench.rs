use criterion::{black_box, criterion_group, criterion_main, Criterion};

use codeshot::cache::CacheKey;
use codeshot::compose::{compose, prepare_source};
use codeshot::highlight::{Highlighter, SyntectHighlighter};
use codeshot::theme::{resolve_background, resolve_theme};
use codeshot::RenderRequest;
use serde_json::json;

const SNIPPET: &str = r#"import { useState } from 'react';

export function Counter({ initial }) {
const [count, setCount] = useState(initial);
return (
<button onClick={() => setCount(count + 1)}>
Clicked {count} times
</button>
);
}
"#;

fn bench_compose(c: &mut Criterion) {
    let request = RenderRequest {
        theme: "dracula".into(),
        ..RenderRequest::with_code(SNIPPET)
    };
    let theme = resolve_theme(&request.theme);
    let background = resolve_background(&request.background, &request.gradient_angle);
    let source = prepare_source(&request.code, &request.language);
    let highlighter = SyntectHighlighter::new();
    let highlighted = highlighter.highlight(&source, &request.language);

    c.bench_function("compose_document", |b| {
        b.iter(|| {
            compose(
                black_box(&request),
                theme,
                &background,
                &source,
                &highlighted,
            )
        })
    });
}

fn bench_highlight(c: &mut Criterion) {
    let highlighter = SyntectHighlighter::new();
    let source = prepare_source(SNIPPET, "javascript");

    c.bench_function("highlight_javascript", |b| {
        b.iter(|| highlighter.highlight(black_box(&source), "javascript"))
    });
}

fn bench_cache_key(c: &mut Criterion) {
    let payload = json!({
        "code": SNIPPET,
        "language": "javascript",
        "theme": "dracula",
        "background": ["#ff0000", "#0000ff"],
        "showLineNumbers": true
    });

    c.bench_function("cache_key_derive", |b| {
        b.iter(|| CacheKey::derive(black_box(&payload)))
    });
}

criterion_group!(benches, bench_compose, bench_highlight, bench_cache_key);
criterion_main!(benches);
