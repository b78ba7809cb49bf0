//! Canonical signatures.
//!
//! The signature of an operation is the printed text of its assembled
//! document. Printing goes through apollo-compiler's serializer, which only
//! looks at the AST (never at source locations or comments), so structurally
//! equal documents always print identically.

use crate::{CanonicalError, Result};
use apollo_compiler::ast::{Definition, Document, FragmentDefinition};
use apollo_compiler::Node;
use std::collections::HashSet;

/// Path label attached to documents parsed from memory.
const SOURCE_LABEL: &str = "operation.graphql";

/// Parses GraphQL text into a document, failing on any syntax error.
pub fn parse_document(source: &str) -> Result<Document> {
    Document::parse(source, SOURCE_LABEL)
        .map_err(|with_errors| CanonicalError::Syntax(with_errors.errors.to_string()))
}

/// Computes the manifest key for an operation document.
///
/// Definitions are put in canonical order before printing: operations first,
/// in document order, then fragments sorted by name with later duplicates of a
/// name dropped. Type system definitions do not take part. For a document built
/// by [`assemble_operation_document`](crate::assemble_operation_document) the
/// reordering is a no-op.
#[must_use]
pub fn signature_of(document: &Document) -> String {
    canonical_order(document).to_string()
}

fn canonical_order(document: &Document) -> Document {
    let mut seen = HashSet::new();
    let mut fragments: Vec<&Node<FragmentDefinition>> = Vec::new();
    let mut ordered = Document::new();

    for definition in &document.definitions {
        match definition {
            Definition::OperationDefinition(_) => ordered.definitions.push(definition.clone()),
            Definition::FragmentDefinition(fragment) => {
                if seen.insert(fragment.name.as_str()) {
                    fragments.push(fragment);
                }
            }
            _ => {}
        }
    }

    fragments.sort_by(|a, b| a.name.as_str().cmp(b.name.as_str()));
    ordered.definitions.extend(
        fragments
            .into_iter()
            .map(|fragment| Definition::FragmentDefinition(fragment.clone())),
    );
    ordered
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{assemble_operation_document, operations};

    #[test]
    fn test_parse_error() {
        let result = parse_document("query A { author { ");
        assert!(matches!(result, Err(CanonicalError::Syntax(_))));
    }

    #[test]
    fn test_whitespace_does_not_matter() {
        let compact = parse_document("query A{author{firstName lastName}}").unwrap();
        let spread = parse_document(
            "\n  query   A {\n    author {\n      firstName\n      lastName\n    }\n  }\n",
        )
        .unwrap();
        assert_eq!(signature_of(&compact), signature_of(&spread));
    }

    #[test]
    fn test_comments_do_not_matter() {
        let plain = parse_document("query A { a }").unwrap();
        let commented = parse_document("# leading\nquery A { a # trailing\n }").unwrap();
        assert_eq!(signature_of(&plain), signature_of(&commented));
    }

    #[test]
    fn test_definition_order_does_not_matter() {
        let first = parse_document(
            r"
            query A { person { ...b ...a } }
            fragment a on Person { x }
            fragment b on Person { y }
            ",
        )
        .unwrap();
        let second = parse_document(
            r"
            fragment b on Person { y }
            fragment a on Person { x }
            query A { person { ...b ...a } }
            ",
        )
        .unwrap();

        assert_eq!(signature_of(&first), signature_of(&second));
    }

    #[test]
    fn test_selection_order_matters() {
        let first = parse_document("query A { a b }").unwrap();
        let second = parse_document("query A { b a }").unwrap();
        assert_ne!(signature_of(&first), signature_of(&second));
    }

    #[test]
    fn test_assembled_document_is_already_canonical() {
        let document = parse_document(
            r"
            fragment z on T { z }
            query A { t { ...z ...y } }
            fragment y on T { y }
            ",
        )
        .unwrap();
        let operation = operations(&document).next().unwrap();
        let assembled = assemble_operation_document(&document, operation);

        assert_eq!(signature_of(&assembled), assembled.to_string());
    }

    #[test]
    fn test_signature_keeps_operation_text() {
        let document = parse_document("query ListOfAuthors { author { firstName } }").unwrap();
        let signature = signature_of(&document);
        assert!(signature.contains("ListOfAuthors"));
        assert!(signature.contains("firstName"));
    }
}
