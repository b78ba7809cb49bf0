//! Fragment closure resolution.

use apollo_compiler::ast::{
    Definition, Document, FragmentDefinition, OperationDefinition, Selection,
};
use apollo_compiler::Node;
use std::collections::{BTreeSet, HashMap, HashSet};

type FragmentIndex<'a> = HashMap<&'a str, &'a Node<FragmentDefinition>>;

/// Iterates over the operation definitions of a document, in document order.
pub fn operations(document: &Document) -> impl Iterator<Item = &Node<OperationDefinition>> {
    document
        .definitions
        .iter()
        .filter_map(|definition| match definition {
            Definition::OperationDefinition(operation) => Some(operation),
            _ => None,
        })
}

/// Names of every fragment transitively reachable from an operation.
///
/// Spreads are followed through fields, inline fragments and the bodies of the
/// fragments they name. A fragment already collected is never walked again, so
/// cyclic fragments terminate. Spreads of fragments the document does not
/// define are still reported; they just have no body to walk.
#[must_use]
pub fn fragments_used_by(operation: &OperationDefinition, document: &Document) -> BTreeSet<String> {
    let index = fragment_index(document);
    let mut found = BTreeSet::new();
    collect_spreads(&operation.selection_set, &index, &mut found);
    found
}

/// Builds the canonical document for one operation: the operation first, then
/// each fragment in its closure exactly once, sorted by name.
#[must_use]
pub fn assemble_operation_document(
    document: &Document,
    operation: &Node<OperationDefinition>,
) -> Document {
    let closure = fragments_used_by(operation, document);
    let mut seen = HashSet::new();

    let mut fragments: Vec<&Node<FragmentDefinition>> = document
        .definitions
        .iter()
        .filter_map(|definition| match definition {
            Definition::FragmentDefinition(fragment)
                if closure.contains(fragment.name.as_str())
                    && seen.insert(fragment.name.as_str()) =>
            {
                Some(fragment)
            }
            _ => None,
        })
        .collect();
    fragments.sort_by(|a, b| a.name.as_str().cmp(b.name.as_str()));

    let mut assembled = Document::new();
    assembled
        .definitions
        .push(Definition::OperationDefinition(operation.clone()));
    assembled.definitions.extend(
        fragments
            .into_iter()
            .map(|fragment| Definition::FragmentDefinition(fragment.clone())),
    );
    assembled
}

/// First definition wins when a fragment name is defined more than once.
fn fragment_index(document: &Document) -> FragmentIndex<'_> {
    let mut index = HashMap::new();
    for definition in &document.definitions {
        if let Definition::FragmentDefinition(fragment) = definition {
            index.entry(fragment.name.as_str()).or_insert(fragment);
        }
    }
    index
}

fn collect_spreads(selections: &[Selection], index: &FragmentIndex<'_>, found: &mut BTreeSet<String>) {
    for selection in selections {
        match selection {
            Selection::Field(field) => collect_spreads(&field.selection_set, index, found),
            Selection::InlineFragment(inline) => {
                collect_spreads(&inline.selection_set, index, found);
            }
            Selection::FragmentSpread(spread) => {
                let name = spread.fragment_name.as_str();
                if !found.insert(name.to_string()) {
                    continue;
                }
                match index.get(name) {
                    Some(fragment) => collect_spreads(&fragment.selection_set, index, found),
                    None => tracing::warn!(fragment = name, "Spread of undefined fragment"),
                }
            }
        }
    }
}
