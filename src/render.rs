//! ASCII rendering of a class model.

use umlkit_core::models::RelationshipType;
use umlkit_core::snapshot::{ClassSnapshot, Snapshot};

const FIELD: char = '▪';
const METHOD: char = 'ƒ';

/// Arrow drawn between source and destination.
fn arrow(kind: RelationshipType) -> &'static str {
    match kind {
        RelationshipType::Aggregation => "◇───",
        RelationshipType::Composition => "◆───",
        RelationshipType::Inheritance => "───▷",
        RelationshipType::Realization => "┄┄┄▷",
    }
}

/// Render classes with their members, then relationships.
///
/// Example output:
/// ```text
/// Animal
/// ├── ▪ name
/// └── ƒ move(dx, dy)
/// Dog
///
/// Dog ───▷ Animal (inheritance)
/// ```
pub fn render_model(snapshot: &Snapshot) -> String {
    let mut output = String::new();
    for class in &snapshot.classes {
        render_class(&mut output, class);
    }

    if !snapshot.relationships.is_empty() {
        output.push('\n');
        for rel in &snapshot.relationships {
            output.push_str(&format!(
                "{} {} {} ({})\n",
                rel.source,
                arrow(rel.kind),
                rel.destination,
                rel.kind
            ));
        }
    }
    output
}

fn render_class(output: &mut String, class: &ClassSnapshot) {
    output.push_str(&class.name);
    output.push('\n');

    let fields = class.fields.iter().map(|f| (FIELD, f.name.clone()));
    let methods = class.methods.iter().map(|m| {
        let params: Vec<&str> = m.params.iter().map(|p| p.name.as_str()).collect();
        (METHOD, format!("{}({})", m.name, params.join(", ")))
    });
    let members: Vec<(char, String)> = fields.chain(methods).collect();

    for (i, (symbol, label)) in members.iter().enumerate() {
        let branch = if i == members.len() - 1 {
            "└── "
        } else {
            "├── "
        };
        output.push_str(branch);
        output.push(*symbol);
        output.push(' ');
        output.push_str(label);
        output.push('\n');
    }
}
