// Property-based tests for generator invariants.
//
// Three categories:
// 1. Structure: no compound statement is ever emitted with an empty body,
//    every line is indented by whole indentation units, function definitions
//    sit at module level and key dispatch never runs outside `handle(key)`
// 2. Features: `keyboard` is required exactly when a keyboard block is used
// 3. Determinism: the same program always produces byte-identical output
//
// Uses proptest with explicit configuration to prevent CI flakiness.

use cbc::ast::{Block, Program};
use cbc::context::Feature;
use proptest::prelude::*;

// ── Block program generator ─────────────────────────────────────────────────

fn arb_leaf() -> impl Strategy<Value = Block> {
    prop_oneof![
        (0u32..100).prop_map(|x| Block::new("control_wait").with_field("x", x)),
        Just(Block::new("control_cloneStart")),
        Just(Block::new("control_nextSence")),
        prop_oneof![Just("all"), Just("this script"), Just("other scripts")]
            .prop_map(|m| Block::new("control_stop").with_field("STOP_OPTION", m)),
        Just(Block::new("control_wait2")),
        Just(Block::new("event_mouse_move")),
        prop_oneof![Just("a"), Just("space")]
            .prop_map(|k| Block::new("event_keyboard").with_field("x", k)),
        Just(Block::new("event_keyboard_combo").with_field("combo", "ctrl+x")),
    ]
}

fn arb_condition() -> impl Strategy<Value = Option<Block>> {
    prop::option::of(prop_oneof![
        prop::bool::ANY.prop_map(|t| {
            Block::new("logic_boolean").with_field("BOOL", if t { "TRUE" } else { "FALSE" })
        }),
        (0i32..5, 0i32..5).prop_map(|(a, b)| {
            Block::new("logic_compare")
                .with_field("OP", "LT")
                .with_input("A", Block::new("math_number").with_field("NUM", a))
                .with_input("B", Block::new("math_number").with_field("NUM", b))
        }),
    ])
}

fn with_condition(block: Block, cond: Option<Block>) -> Block {
    match cond {
        Some(c) => block.with_input("CONDITION", c),
        None => block,
    }
}

fn arb_block() -> impl Strategy<Value = Block> {
    arb_leaf().prop_recursive(3, 32, 3, |inner| {
        let stack = prop::collection::vec(inner, 0..3);
        prop_oneof![
            stack
                .clone()
                .prop_map(|s| Block::new("control_for").with_statements("DO", s)),
            (1u32..10, stack.clone()).prop_map(|(n, s)| {
                Block::new("control_forX")
                    .with_field("DEFAULT_TIMES", n)
                    .with_statements("DO", s)
            }),
            (arb_condition(), stack.clone()).prop_map(|(c, s)| {
                with_condition(Block::new("control_if"), c).with_statements("DO", s)
            }),
            (arb_condition(), stack.clone(), prop::option::of(stack.clone())).prop_map(
                |(c, d, e)| {
                    let b = with_condition(Block::new("control_else"), c).with_statements("DO", d);
                    match e {
                        Some(e) => b.with_statements("ELSE", e),
                        None => b,
                    }
                }
            ),
            (arb_condition(), stack.clone()).prop_map(|(c, s)| {
                with_condition(Block::new("control_until"), c).with_statements("DO", s)
            }),
            (prop_oneof![Just("w"), Just("up")], stack).prop_map(|(k, s)| {
                Block::new("event_keyboard")
                    .with_field("x", k)
                    .with_statements("DO", s)
            }),
        ]
    })
}

fn arb_program() -> impl Strategy<Value = Program> {
    prop::collection::vec(prop::collection::vec(arb_block(), 1..4), 0..4).prop_map(Program::new)
}

// ── Helpers ─────────────────────────────────────────────────────────────────

fn generate(program: &Program, indent: &str) -> cbc::GenerateResult {
    let registry = cbc::Registry::builtin();
    let options = cbc::GenerateOptions {
        indent: indent.to_string(),
        ..cbc::GenerateOptions::default()
    };
    cbc::generate(program, &registry, &options)
}

fn leading_spaces(line: &str) -> usize {
    line.len() - line.trim_start_matches(' ').len()
}

fn uses_keyboard(block: &Block) -> bool {
    block.kind.starts_with("event_keyboard")
        || block.inputs.values().any(uses_keyboard)
        || block.statements.values().flatten().any(uses_keyboard)
}

// ── Properties ──────────────────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 200,
        max_shrink_iters: 200,
        .. ProptestConfig::default()
    })]

    #[test]
    fn compound_statements_never_have_empty_bodies(program in arb_program()) {
        let result = generate(&program, "    ");
        prop_assert!(!cbc::diag::has_errors(&result.diagnostics), "{:?}", result.diagnostics);

        let py = &result.generated.python_source;
        let lines: Vec<&str> = py.lines().collect();
        for (i, line) in lines.iter().enumerate() {
            if line.trim_start().starts_with('#') || !line.ends_with(':') {
                continue;
            }
            // Comments do not count as a body.
            let next = lines[i + 1..]
                .iter()
                .find(|l| !l.trim_start().starts_with('#'));
            prop_assert!(next.is_some(), "compound header without body:\n{}", py);
            prop_assert!(
                leading_spaces(next.unwrap()) > leading_spaces(line),
                "empty body after line {}:\n{}",
                i + 1,
                py
            );
        }
    }

    #[test]
    fn indentation_uses_whole_units(program in arb_program(), width in 1usize..=4) {
        let unit = " ".repeat(width);
        let result = generate(&program, &unit);
        for line in result.generated.python_source.lines() {
            prop_assert_eq!(leading_spaces(line) % width, 0, "line {:?}", line);
        }
        prop_assert!(result.generated.python_source.ends_with('\n'));
    }

    #[test]
    fn keyboard_feature_tracks_keyboard_blocks(program in arb_program()) {
        let expected = program.stacks.iter().flatten().any(uses_keyboard);
        let result = generate(&program, "    ");
        let features = &result.generated.features;
        prop_assert_eq!(features.contains(&Feature::Keyboard), expected);
        prop_assert!(features.len() <= 1);
        let handlers = result.generated.python_source.matches("def handle(key):").count();
        prop_assert_eq!(handlers, usize::from(expected));
    }

    #[test]
    fn definitions_stay_at_module_level(program in arb_program()) {
        let result = generate(&program, "    ");
        let py = &result.generated.python_source;
        for line in py.lines() {
            if line.trim_start().starts_with("def ") {
                prop_assert_eq!(leading_spaces(line), 0, "indented definition:\n{}", py);
            }
            prop_assert!(
                !line.starts_with("if key =="),
                "key dispatch outside handle(key):\n{}",
                py
            );
        }
    }

    #[test]
    fn generation_is_deterministic(program in arb_program()) {
        let first = generate(&program, "    ").generated.python_source;
        let second = generate(&program, "    ").generated.python_source;
        prop_assert_eq!(first, second);
    }

    #[test]
    fn wait_until_is_two_lines(cond in arb_condition()) {
        let block = with_condition(Block::new("control_wait2"), cond);
        let result = generate(&Program::new(vec![vec![block]]), "    ");
        let body = &result.generated.body;
        prop_assert_eq!(body.lines().count(), 2);
        prop_assert!(body.starts_with("while not ("));
        prop_assert!(body.ends_with("):\n    pass\n"));
    }
}
