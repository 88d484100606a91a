//! Property-based tests for parsing and rendering using proptest.

use std::sync::Arc;

use fstr::{parse, validate, Args, ColorChoice, Engine, Registry, Value};
use proptest::prelude::*;

// ============================================================================
// Test helpers
// ============================================================================

fn engine(cache_capacity: usize) -> Engine {
    Engine::builder()
        .cache_capacity(cache_capacity)
        .colors(ColorChoice::Never)
        .registry(Arc::new(Registry::new()))
        .build()
}

// Text without braces or anything the engine would treat specially.
fn literal_strategy() -> impl Strategy<Value = String> {
    "[^{}]{0,40}"
}

// Format strings mixing literals, placeholders and escapes.
fn format_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop_oneof![
            "[a-z ]{0,5}",
            Just("{}".to_string()),
            Just("{0}".to_string()),
            Just("{1:>4}".to_string()),
            Just("{name}".to_string()),
            Just("{{".to_string()),
            Just("}}".to_string()),
            Just("{:x}".to_string()),
            Just("{0?empty?(e):(n)}".to_string()),
        ],
        0..8,
    )
    .prop_map(|parts| parts.concat())
}

// ============================================================================
// Property tests
// ============================================================================

proptest! {
    /// Text without braces renders unchanged.
    #[test]
    fn literal_text_is_identity(text in literal_strategy()) {
        prop_assert_eq!(engine(16).render(&text, &Args::new()), text);
    }

    /// Every template has one more segment than placeholders.
    #[test]
    fn segments_outnumber_placeholders_by_one(format in "\\PC{0,40}") {
        let template = parse(&format);
        prop_assert_eq!(template.segments().len(), template.placeholders().len() + 1);
    }

    /// Rendering never panics, whatever the input.
    #[test]
    fn render_never_panics(format in "\\PC{0,40}", n in any::<i64>()) {
        let _ = engine(16).render(&format, &Args::from([n]));
    }

    /// Any width, precision and fill renders without panicking.
    #[test]
    fn oversized_layout_never_panics(
        width in prop_oneof![0u64..64, any::<u64>()],
        precision in prop_oneof![0u64..64, any::<u64>()],
        fill in any::<char>(),
    ) {
        let engine = engine(16);
        for tag in ["", "f", "e", "g", "%", "x"] {
            let format = format!("{{:{}>{}.{}{}}}", fill, width, precision, tag);
            let _ = engine.render(&format, &Args::from([1.5]));
            let _ = engine.render(&format, &Args::from(["text"]));
        }
    }

    /// Auto placeholders take arguments in order; extras are ignored and
    /// missing ones render as sentinels.
    #[test]
    fn auto_placeholders_consume_in_order(
        values in prop::collection::vec(any::<u32>(), 0..6),
        placeholders in 0usize..6,
    ) {
        let format = vec!["{}"; placeholders].join(",");
        let args: Args = values.iter().copied().collect();
        let expected: Vec<String> = (0..placeholders)
            .map(|i| values.get(i).map_or("<no value>".to_string(), u32::to_string))
            .collect();
        prop_assert_eq!(engine(16).render(&format, &args), expected.join(","));
    }

    /// Right-aligning then trimming the fill recovers the input.
    #[test]
    fn right_align_round_trips(text in "[a-z]{0,12}", width in 0usize..20) {
        let format = format!("{{:*>{}}}", width);
        let rendered = engine(16).render(&format, &Args::from([text.as_str()]));
        prop_assert!(rendered.chars().count() >= text.chars().count());
        prop_assert_eq!(rendered.trim_start_matches('*'), text.as_str());
    }

    /// Hex output matches the standard library.
    #[test]
    fn hex_matches_std(n in any::<u64>()) {
        let engine = engine(16);
        prop_assert_eq!(engine.render("{:x}", &Args::from([n])), format!("{:x}", n));
        let expected = format!("{:#X}", n).replacen("0x", "0X", 1);
        prop_assert_eq!(engine.render("{:#X}", &Args::from([n])), expected);
    }

    /// Cached and uncached engines agree.
    #[test]
    fn cache_is_transparent(
        format in format_strategy(),
        a in any::<i32>(),
        b in "[a-z]{0,6}",
    ) {
        let cached = engine(4);
        let uncached = engine(0);
        for round in 0..3 {
            let args = Args::new()
                .with(a.wrapping_add(round))
                .with(b.as_str())
                .named("name", b.as_str());
            prop_assert_eq!(cached.render(&format, &args), uncached.render(&format, &args));
        }
    }

    /// The validator accepts everything built from balanced pieces.
    #[test]
    fn validator_accepts_generated_formats(format in format_strategy()) {
        prop_assert!(validate(&format).is_ok());
    }

    /// Field chains resolve the same in one step or two.
    #[test]
    fn field_chain_is_transitive(inner in any::<i64>(), key in "[a-z]{1,6}") {
        let nested = Value::map([(key.as_str(), Value::map([("leaf", inner)]))]);
        let engine = engine(16);
        let format = format!("{{0.{}.leaf}}", key);
        let direct = engine.render(&format, &Args::new().with(nested.clone()));
        let first = fstr::walk(&nested, &[key.as_str()]).value().cloned().unwrap_or(Value::Nil);
        let stepwise = engine.render("{0.leaf}", &Args::new().with(first));
        prop_assert_eq!(direct, stepwise);
    }
}
