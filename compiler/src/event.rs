// event.rs — Generators for the event block category
//
// Game start, broadcasts, keyboard and mouse events. Keyboard blocks head
// stacks that are routed into the `handle(key)` dispatch function built by
// the prelude; mouse blocks are standalone handler stubs.

use crate::ast::Block;
use crate::codegen::{has_statement, indent_block, Generator};
use crate::context::Feature;
use crate::registry::{Emitter, Registry};

pub fn install(registry: &mut Registry) {
    registry.register("event_gameStart", Emitter::Statement(game_start));
    registry.register("event_RB", Emitter::Statement(rb));
    registry.register("event_broadcast", Emitter::Statement(broadcast));
    registry.register("event_broadcastWait", Emitter::Statement(broadcast_wait));
    registry.register(
        "event_keyboard",
        Emitter::Handler(Feature::Keyboard, keyboard),
    );
    registry.register(
        "event_keyboard_combo",
        Emitter::Handler(Feature::Keyboard, keyboard_combo),
    );
    registry.register("event_mouse_click", Emitter::Declaration(mouse_click));
    registry.register("event_mouse_move", Emitter::Declaration(mouse_move));
    registry.register("event_mouse_wheel", Emitter::Declaration(mouse_wheel));
    registry.register(
        "event_mouse_contextmenu",
        Emitter::Declaration(mouse_contextmenu),
    );
}

fn game_start(_: &Block, _: &mut Generator<'_>) -> String {
    "CoronaEngine.gameStart()\n".to_string()
}

fn rb(block: &Block, _: &mut Generator<'_>) -> String {
    format!("CoronaEngine.RB(\"{}\")\n", block.field_text("x"))
}

fn broadcast(block: &Block, _: &mut Generator<'_>) -> String {
    format!("CoronaEngine.broadcast(\"{}\")\n", block.field_text("x"))
}

fn broadcast_wait(block: &Block, _: &mut Generator<'_>) -> String {
    format!("CoronaEngine.broadcastWait(\"{}\")\n", block.field_text("x"))
}

fn keyboard(block: &Block, gen: &mut Generator<'_>) -> String {
    gen.need(Feature::Keyboard);
    let key = block.field_text("x");
    // The body is indented here rather than by `statement_to_code`: the
    // whole stack is re-indented again when placed inside `handle(key)`.
    let mut body = gen.statement_body(block, "DO");
    if !has_statement(&body) {
        body.push_str("pass\n");
    }
    format!("if key == '{}':\n{}", key, indent_block(&body, gen.indent_unit()))
}

/// Key combinations are declared but not dispatched yet.
fn keyboard_combo(block: &Block, gen: &mut Generator<'_>) -> String {
    gen.need(Feature::Keyboard);
    format!("# key combo: {}\n", block.field_text("combo"))
}

fn handler_stub(comment: &str, signature: &str, gen: &Generator<'_>) -> String {
    format!("# {}\ndef {}:\n{}", comment, signature, gen.pass_line())
}

fn mouse_click(block: &Block, gen: &mut Generator<'_>) -> String {
    let button = block.field_text("button");
    handler_stub(
        &format!("on mouse click: {}", button),
        &format!("on_mouse_click_{}()", button),
        gen,
    )
}

fn mouse_move(_: &Block, gen: &mut Generator<'_>) -> String {
    handler_stub("on mouse move", "on_mouse_move(x, y)", gen)
}

fn mouse_wheel(_: &Block, gen: &mut Generator<'_>) -> String {
    handler_stub("on mouse wheel", "on_mouse_wheel(delta)", gen)
}

fn mouse_contextmenu(_: &Block, gen: &mut Generator<'_>) -> String {
    handler_stub("on context menu", "on_mouse_contextmenu(x, y)", gen)
}
