// control.rs — Generators for the control block category
//
// Loops, conditionals, waits, stop, clones and scene switching. Each
// generator is a template substitution over the block's fields and the
// already-rendered text of its slots.

use crate::ast::Block;
use crate::codegen::{Generator, Order};
use crate::registry::{Emitter, Registry};

pub fn install(registry: &mut Registry) {
    registry.register("control_wait", Emitter::Statement(wait));
    registry.register("control_for", Emitter::Statement(forever));
    registry.register("control_forX", Emitter::Statement(repeat_times));
    registry.register("control_if", Emitter::Statement(if_then));
    registry.register("control_else", Emitter::Statement(if_else));
    registry.register("control_wait2", Emitter::Statement(wait_until));
    registry.register("control_until", Emitter::Statement(repeat_until));
    registry.register("control_stop", Emitter::Statement(stop));
    registry.register("control_cloneStart", Emitter::Statement(clone_start));
    registry.register("control_clone", Emitter::Statement(clone));
    registry.register("control_cloneDEL", Emitter::Statement(delete_clone));
    registry.register("control_senceSet", Emitter::Statement(set_scene));
    registry.register("control_nextSence", Emitter::Statement(next_scene));
}

/// The CONDITION slot, or `False` when nothing is connected.
fn condition(block: &Block, gen: &mut Generator<'_>) -> String {
    gen.value_to_code(block, "CONDITION", Order::None)
        .unwrap_or_else(|| "False".to_string())
}

fn wait(block: &Block, _: &mut Generator<'_>) -> String {
    format!("CoronaEngine.wait({})\n", block.field_text("x"))
}

fn forever(block: &Block, gen: &mut Generator<'_>) -> String {
    format!("while True:\n{}", gen.loop_body(block, "DO"))
}

fn repeat_times(block: &Block, gen: &mut Generator<'_>) -> String {
    let times = gen
        .value_to_code(block, "TIMES", Order::None)
        .unwrap_or_else(|| block.field_text("DEFAULT_TIMES"));
    format!("for _ in range({}):\n{}", times, gen.loop_body(block, "DO"))
}

fn if_then(block: &Block, gen: &mut Generator<'_>) -> String {
    let cond = condition(block, gen);
    format!("if {}:\n{}", cond, gen.branch(block, "DO"))
}

fn if_else(block: &Block, gen: &mut Generator<'_>) -> String {
    let cond = condition(block, gen);
    let mut code = format!("if {}:\n{}", cond, gen.branch(block, "DO"));
    // Absent ELSE means no else clause; present but empty still gets `pass`.
    if block.has_statement_slot("ELSE") {
        code.push_str("else:\n");
        code.push_str(&gen.branch(block, "ELSE"));
    }
    code
}

fn wait_until(block: &Block, gen: &mut Generator<'_>) -> String {
    let cond = condition(block, gen);
    format!("while not ({}):\n{}", cond, gen.pass_line())
}

fn repeat_until(block: &Block, gen: &mut Generator<'_>) -> String {
    let cond = condition(block, gen);
    format!("while not ({}):\n{}", cond, gen.loop_body(block, "DO"))
}

fn stop(block: &Block, _: &mut Generator<'_>) -> String {
    format!("CoronaEngine.stop(\"{}\")\n", block.field_text("STOP_OPTION"))
}

fn clone_start(_: &Block, _: &mut Generator<'_>) -> String {
    "CoronaEngine.cloneStart()\n".to_string()
}

fn clone(block: &Block, _: &mut Generator<'_>) -> String {
    format!("CoronaEngine.clone({})\n", block.field_text("x"))
}

fn delete_clone(_: &Block, _: &mut Generator<'_>) -> String {
    "CoronaEngine.deleteClone()\n".to_string()
}

fn set_scene(block: &Block, _: &mut Generator<'_>) -> String {
    format!("CoronaEngine.setScene({})\n", block.field_text("x"))
}

fn next_scene(_: &Block, _: &mut Generator<'_>) -> String {
    "CoronaEngine.nextScene()\n".to_string()
}
