//! Query transforms applied before a signature is computed.
//!
//! A transform is a pure function from document to document. The input is
//! never modified: AST nodes are reference counted, so a transform clones the
//! document and rewrites only the nodes it touches (copy-on-write through
//! [`Node::make_mut`]).

use apollo_compiler::ast::{Definition, DirectiveList, Document, Field, Selection};
use apollo_compiler::{name, Node};
use std::fmt;
use std::sync::Arc;

/// A pure document-to-document rewrite.
pub trait QueryTransformer: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Returns the rewritten document. Must be deterministic.
    fn transform(&self, document: &Document) -> Document;
}

/// Plain functions and closures compose as transformers.
impl<F> QueryTransformer for F
where
    F: Fn(&Document) -> Document + Send + Sync,
{
    fn name(&self) -> &'static str {
        std::any::type_name::<F>()
    }

    fn transform(&self, document: &Document) -> Document {
        self(document)
    }
}

/// An ordered list of transformers, applied left to right.
///
/// The pipeline neither reorders nor deduplicates its transformers, and an
/// empty pipeline returns the document unchanged.
#[derive(Clone, Default)]
pub struct TransformPipeline {
    transformers: Vec<Arc<dyn QueryTransformer>>,
}

impl TransformPipeline {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a transformer to the end of the pipeline.
    #[must_use]
    pub fn with(mut self, transformer: impl QueryTransformer + 'static) -> Self {
        self.push(transformer);
        self
    }

    pub fn push(&mut self, transformer: impl QueryTransformer + 'static) {
        self.transformers.push(Arc::new(transformer));
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.transformers.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.transformers.len()
    }

    /// Names of the transformers in application order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.transformers.iter().map(|t| t.name())
    }

    /// Feeds the document through every transformer in order.
    #[must_use]
    pub fn apply(&self, document: &Document) -> Document {
        self.transformers
            .iter()
            .fold(document.clone(), |current, transformer| {
                tracing::trace!(transformer = transformer.name(), "Applying query transformer");
                transformer.transform(&current)
            })
    }
}

impl fmt::Debug for TransformPipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

/// Adds a `__typename` field to every selection set below an operation's root.
///
/// Operation root selection sets are left alone; fragment roots, nested field
/// selection sets and inline fragments all receive the field. A set that
/// already selects `__typename` (aliased or not) is not touched, so applying
/// the transform twice gives the same document as applying it once.
#[derive(Debug, Clone, Copy, Default)]
pub struct AddTypename;

impl QueryTransformer for AddTypename {
    fn name(&self) -> &'static str {
        "add-typename"
    }

    fn transform(&self, document: &Document) -> Document {
        let mut transformed = document.clone();

        for definition in &mut transformed.definitions {
            match definition {
                Definition::OperationDefinition(operation) => {
                    let selections = with_typename(&operation.selection_set, true);
                    operation.make_mut().selection_set = selections;
                }
                Definition::FragmentDefinition(fragment) => {
                    let selections = with_typename(&fragment.selection_set, false);
                    fragment.make_mut().selection_set = selections;
                }
                _ => {}
            }
        }

        transformed
    }
}

fn with_typename(selections: &[Selection], is_root: bool) -> Vec<Selection> {
    let mut rewritten: Vec<Selection> = selections
        .iter()
        .map(|selection| match selection {
            Selection::Field(field) if !field.selection_set.is_empty() => {
                let nested = with_typename(&field.selection_set, false);
                let mut field = field.clone();
                field.make_mut().selection_set = nested;
                Selection::Field(field)
            }
            Selection::InlineFragment(inline) => {
                let nested = with_typename(&inline.selection_set, false);
                let mut inline = inline.clone();
                inline.make_mut().selection_set = nested;
                Selection::InlineFragment(inline)
            }
            Selection::Field(_) | Selection::FragmentSpread(_) => selection.clone(),
        })
        .collect();

    let has_typename = selections.iter().any(|selection| {
        matches!(selection, Selection::Field(field) if field.name.as_str() == "__typename")
    });

    if !is_root && !has_typename {
        rewritten.push(Selection::Field(typename_field()));
    }

    rewritten
}

fn typename_field() -> Node<Field> {
    Node::new(Field {
        alias: None,
        name: name!("__typename"),
        arguments: Vec::new(),
        directives: DirectiveList::default(),
        selection_set: Vec::new(),
    })
}
