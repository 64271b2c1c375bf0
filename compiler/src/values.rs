// values.rs — Stock value blocks
//
// Numbers, booleans, text and the logic operators. These fill expression
// slots such as CONDITION and TIMES; each returns inline text together with
// its precedence so the caller can parenthesise correctly.

use crate::ast::{Block, FieldValue};
use crate::codegen::{Generator, Order};
use crate::registry::{Emitter, Registry};

pub fn install(registry: &mut Registry) {
    registry.register("math_number", Emitter::Value(number));
    registry.register("logic_boolean", Emitter::Value(boolean));
    registry.register("text", Emitter::Value(text));
    registry.register("logic_negate", Emitter::Value(negate));
    registry.register("logic_compare", Emitter::Value(compare));
    registry.register("logic_operation", Emitter::Value(operation));
}

fn number(block: &Block, _: &mut Generator<'_>) -> (String, Order) {
    let code = block.field_text("NUM");
    let negative = code.trim().parse::<f64>().is_ok_and(|n| n < 0.0);
    let order = if negative { Order::UnarySign } else { Order::Atomic };
    (code, order)
}

fn boolean(block: &Block, _: &mut Generator<'_>) -> (String, Order) {
    let truthy = match block.fields.get("BOOL") {
        Some(FieldValue::Bool(b)) => *b,
        Some(other) => other.to_string().eq_ignore_ascii_case("true"),
        None => false,
    };
    let code = if truthy { "True" } else { "False" };
    (code.to_string(), Order::Atomic)
}

fn text(block: &Block, _: &mut Generator<'_>) -> (String, Order) {
    (quote(&block.field_text("TEXT")), Order::Atomic)
}

fn negate(block: &Block, gen: &mut Generator<'_>) -> (String, Order) {
    let arg = gen
        .value_to_code(block, "BOOL", Order::LogicalNot)
        .unwrap_or_else(|| "True".to_string());
    (format!("not {}", arg), Order::LogicalNot)
}

fn compare(block: &Block, gen: &mut Generator<'_>) -> (String, Order) {
    let op = match block.field_text("OP").as_str() {
        "NEQ" => "!=",
        "LT" => "<",
        "LTE" => "<=",
        "GT" => ">",
        "GTE" => ">=",
        _ => "==",
    };
    let a = gen
        .value_to_code(block, "A", Order::Relational)
        .unwrap_or_else(|| "0".to_string());
    let b = gen
        .value_to_code(block, "B", Order::Relational)
        .unwrap_or_else(|| "0".to_string());
    (format!("{} {} {}", a, op, b), Order::Relational)
}

fn operation(block: &Block, gen: &mut Generator<'_>) -> (String, Order) {
    let (op, order) = if block.field_text("OP") == "OR" {
        ("or", Order::LogicalOr)
    } else {
        ("and", Order::LogicalAnd)
    };
    let a = gen.value_to_code(block, "A", order);
    let b = gen.value_to_code(block, "B", order);
    // With one side missing, the neutral element keeps the other side's meaning.
    let (a, b) = match (a, b) {
        (None, None) => ("False".to_string(), "False".to_string()),
        (a, b) => {
            let neutral = if op == "and" { "True" } else { "False" };
            (
                a.unwrap_or_else(|| neutral.to_string()),
                b.unwrap_or_else(|| neutral.to_string()),
            )
        }
    };
    (format!("{} {} {}", a, op, b), order)
}

/// Single-quoted Python string literal.
fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('\'');
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            _ => out.push(c),
        }
    }
    out.push('\'');
    out
}
