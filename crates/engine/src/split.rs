//! Duplicate-name detection and per-operation splitting.

use graphql_persist_canonical::ast::{Definition, Document};
use std::collections::HashSet;

/// One operation with every fragment of the document it came from.
#[derive(Debug, Clone)]
pub struct SeparatedOperation {
    /// `None` for an anonymous operation
    pub name: Option<String>,
    pub document: Document,
}

/// Names defined more than once, in the order their second definition appears.
///
/// Operations and fragments share one namespace here. Anonymous operations
/// have no name and are never reported.
#[must_use]
pub fn duplicate_definition_names(document: &Document) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut duplicates: Vec<String> = Vec::new();

    for definition in &document.definitions {
        let name = match definition {
            Definition::OperationDefinition(operation) => match &operation.name {
                Some(name) => name.as_str(),
                None => continue,
            },
            Definition::FragmentDefinition(fragment) => fragment.name.as_str(),
            _ => continue,
        };

        if !seen.insert(name) && !duplicates.iter().any(|known| known == name) {
            tracing::warn!(name, "Duplicate operation name");
            duplicates.push(name.to_string());
        }
    }

    duplicates
}

/// Splits a document into one sub-document per operation.
///
/// Each sub-document holds the operation followed by every fragment definition
/// of the input, in input order. Type system definitions are dropped.
#[must_use]
pub fn separate_operations(document: &Document) -> Vec<SeparatedOperation> {
    let fragments: Vec<&Definition> = document
        .definitions
        .iter()
        .filter(|definition| matches!(definition, Definition::FragmentDefinition(_)))
        .collect();

    document
        .definitions
        .iter()
        .filter_map(|definition| match definition {
            Definition::OperationDefinition(operation) => Some(operation),
            _ => None,
        })
        .map(|operation| {
            let mut separated = Document::new();
            separated
                .definitions
                .push(Definition::OperationDefinition(operation.clone()));
            separated
                .definitions
                .extend(fragments.iter().map(|&fragment| fragment.clone()));

            SeparatedOperation {
                name: operation.name.as_ref().map(ToString::to_string),
                document: separated,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use graphql_persist_canonical::parse_document;

    #[test]
    fn test_no_duplicates() {
        let document = parse_document("query A { a } query B { b } fragment f on T { x }").unwrap();
        assert!(duplicate_definition_names(&document).is_empty());
    }

    #[test]
    fn test_duplicates_reported_once_in_order() {
        let document = parse_document(
            r"
            query B { b }
            query A { a }
            query A { a2 }
            mutation B { b2 }
            query A { a3 }
            ",
        )
        .unwrap();
        assert_eq!(duplicate_definition_names(&document), vec!["A", "B"]);
    }

    #[test]
    fn test_operation_and_fragment_share_namespace() {
        let document = parse_document("query shared { a } fragment shared on T { x }").unwrap();
        assert_eq!(duplicate_definition_names(&document), vec!["shared"]);
    }

    #[test]
    fn test_anonymous_operations_are_not_duplicates() {
        let document = parse_document("{ a } { b }").unwrap();
        assert!(duplicate_definition_names(&document).is_empty());
    }

    #[test]
    fn test_separate_keeps_all_fragments() {
        let document = parse_document(
            r"
            fragment f on T { x }
            query A { t { ...f } }
            query B { b }
            fragment g on T { y }
            type Query { a: Int }
            ",
        )
        .unwrap();

        let separated = separate_operations(&document);
        assert_eq!(separated.len(), 2);
        assert_eq!(separated[0].name.as_deref(), Some("A"));
        assert_eq!(separated[1].name.as_deref(), Some("B"));

        for part in &separated {
            assert_eq!(part.document.definitions.len(), 3);
            assert!(matches!(
                part.document.definitions[0],
                Definition::OperationDefinition(_)
            ));
        }
    }

    #[test]
    fn test_separate_anonymous_operations() {
        let document = parse_document("{ a } { b }").unwrap();
        let separated = separate_operations(&document);
        assert_eq!(separated.len(), 2);
        assert!(separated.iter().all(|part| part.name.is_none()));
    }
}
