//! Rendering from many threads at once.

use std::sync::Arc;
use std::thread;

use fstr::{args, ColorChoice, Engine, FormatSpec, Registry, Value, ValueKind};

const THREADS: usize = 8;
const ROUNDS: usize = 500;

const FORMATS: [&str; 5] = [
    "{} + {} = {sum}",
    "{0:>6}|{1:<6}|",
    "{0:#x} {1:b}",
    "{sum?>100(big):(small)} {0}",
    "[{0:^9}]",
];

fn render_round(engine: &Engine, format: &str, t: usize, i: usize) -> String {
    engine.render(format, &args!(t, i, sum = t + i))
}

#[test]
fn test_concurrent_renders_match_sequential() {
    let engine = Arc::new(
        Engine::builder()
            .cache_capacity(3)
            .colors(ColorChoice::Never)
            .registry(Arc::new(Registry::new()))
            .build(),
    );

    let expected: Vec<Vec<String>> = (0..THREADS)
        .map(|t| {
            (0..ROUNDS)
                .map(|i| render_round(&engine, FORMATS[i % FORMATS.len()], t, i))
                .collect()
        })
        .collect();
    engine.cache().clear();

    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let engine = Arc::clone(&engine);
            thread::spawn(move || {
                (0..ROUNDS)
                    .map(|i| render_round(&engine, FORMATS[i % FORMATS.len()], t, i))
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    for (t, handle) in handles.into_iter().enumerate() {
        assert_eq!(handle.join().unwrap(), expected[t], "thread {}", t);
    }
    assert!(engine.cache().len() <= 3);
}

#[test]
fn test_registration_while_rendering() {
    let registry = Arc::new(Registry::new());
    let engine = Arc::new(
        Engine::builder()
            .colors(ColorChoice::Never)
            .registry(Arc::clone(&registry))
            .build(),
    );

    let renderers: Vec<_> = (0..4)
        .map(|t| {
            let engine = Arc::clone(&engine);
            thread::spawn(move || {
                for i in 0..ROUNDS {
                    let out = engine.render("{:>5}", &args!(t * ROUNDS + i));
                    assert_eq!(out.chars().count(), 5.max(out.trim_start().chars().count()));
                }
            })
        })
        .collect();

    for n in 0..50 {
        registry.register_verb(
            format!("verb{}", n),
            |value: &Value, _: &FormatSpec| value.to_string(),
            "",
        );
    }
    registry.register_formatter(ValueKind::Uint, |value: &Value, _: &FormatSpec| {
        format!("u{}", value)
    });

    for handle in renderers {
        handle.join().unwrap();
    }
    assert!(registry.verbs().len() >= 50);
    assert_eq!(engine.render("{}", &args!(7u8)), "u7");
}
