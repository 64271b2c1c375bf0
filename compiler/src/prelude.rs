// prelude.rs — Final program assembly
//
// Runs once per generation, after the whole block tree has been emitted.
// Prepends the runtime import and one prelude per required feature, then the
// hoisted declarations, then the program body.
//
// Preconditions: `features` is the complete set declared during emission.
// Postconditions: no compound statement in the output has an empty body.
// Failure modes: none.
// Side effects: none.

use std::collections::{BTreeMap, BTreeSet};

use crate::codegen::{has_statement, prefix_lines};
use crate::context::Feature;

pub const HEADER: &str = "import CoronaEngine\n";

/// Everything the assembly step reads from a finished generation run.
pub struct Assembly<'a> {
    pub header: bool,
    pub indent: &'a str,
    pub features: &'a BTreeSet<Feature>,
    /// Stacks routed to each feature's dispatch handler, in program order.
    pub handlers: &'a BTreeMap<Feature, Vec<String>>,
    pub declarations: &'a [String],
    pub body: &'a str,
}

/// Join all sections, separated by one blank line.
pub fn assemble(a: &Assembly<'_>) -> String {
    let mut sections: Vec<String> = Vec::new();
    if a.header {
        sections.push(HEADER.to_string());
    }

    let required: BTreeSet<Feature> = a
        .features
        .iter()
        .chain(a.handlers.keys())
        .copied()
        .collect();
    for feature in required {
        let routed = a.handlers.get(&feature).map(Vec::as_slice).unwrap_or(&[]);
        sections.push(feature_prelude(feature, routed, a.indent));
    }

    sections.extend(a.declarations.iter().cloned());
    if !a.body.is_empty() {
        sections.push(a.body.to_string());
    }
    sections.join("\n")
}

/// Runtime-support text for one feature.
pub fn feature_prelude(feature: Feature, routed: &[String], indent: &str) -> String {
    match feature {
        Feature::Keyboard => {
            let mut body = routed.concat();
            if !has_statement(&body) {
                body.push_str("pass\n");
            }
            format!("def handle(key):\n{}", prefix_lines(&body, indent))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assemble_with(
        features: &[Feature],
        handlers: BTreeMap<Feature, Vec<String>>,
        declarations: &[String],
        body: &str,
    ) -> String {
        let features: BTreeSet<Feature> = features.iter().copied().collect();
        assemble(&Assembly {
            header: true,
            indent: "    ",
            features: &features,
            handlers: &handlers,
            declarations,
            body,
        })
    }

    #[test]
    fn header_then_body() {
        let out = assemble_with(&[], BTreeMap::new(), &[], "CoronaEngine.gameStart()\n");
        assert_eq!(out, "import CoronaEngine\n\nCoronaEngine.gameStart()\n");
    }

    #[test]
    fn keyboard_handler_without_routed_stacks_passes() {
        let out = assemble_with(&[Feature::Keyboard], BTreeMap::new(), &[], "");
        assert_eq!(out, "import CoronaEngine\n\ndef handle(key):\n    pass\n");
    }

    #[test]
    fn comment_only_handler_still_gets_pass() {
        let handlers = BTreeMap::from([(Feature::Keyboard, vec!["# key combo: ctrl+c\n".to_string()])]);
        let out = assemble_with(&[Feature::Keyboard], handlers, &[], "");
        assert_eq!(
            out,
            "import CoronaEngine\n\ndef handle(key):\n    # key combo: ctrl+c\n    pass\n"
        );
    }

    #[test]
    fn routed_stacks_are_concatenated_in_order() {
        let handlers = BTreeMap::from([(
            Feature::Keyboard,
            vec![
                "if key == 'a':\n    pass\n".to_string(),
                "if key == 'b':\n    pass\n".to_string(),
            ],
        )]);
        let out = feature_prelude(Feature::Keyboard, &handlers[&Feature::Keyboard], "  ");
        assert_eq!(
            out,
            "def handle(key):\n  if key == 'a':\n      pass\n  if key == 'b':\n      pass\n"
        );
    }

    #[test]
    fn declarations_precede_body() {
        let decls = vec!["def on_mouse_move(x, y):\n    pass\n".to_string()];
        let out = assemble_with(&[], BTreeMap::new(), &decls, "CoronaEngine.wait(1)\n");
        assert_eq!(
            out,
            "import CoronaEngine\n\ndef on_mouse_move(x, y):\n    pass\n\nCoronaEngine.wait(1)\n"
        );
    }
}
