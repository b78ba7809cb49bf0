use crate::{ExtractError, Result, SourceLocation};
use graphql_persist_types::{file_extension, Language};
use serde::{Deserialize, Serialize};
use std::path::Path;
use swc_core::common::{sync::Lrc, FileName, SourceFile, SourceMap, Spanned};
use swc_core::ecma::ast::{EsVersion, Expr, Program, TaggedTpl, Tpl};
use swc_core::ecma::parser::{parse_file_as_program, EsSyntax, Syntax, TsSyntax};
use swc_core::ecma::visit::{Visit, VisitWith};

/// Tag used when nothing else is configured.
const DEFAULT_TAG: &str = "gql";

/// Configuration for tagged template extraction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractConfig {
    /// Identifiers recognised as GraphQL template tags (`gql` by default)
    pub tag_identifiers: Vec<String>,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            tag_identifiers: vec![DEFAULT_TAG.to_string()],
        }
    }
}

/// One tagged template literal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaggedLiteral {
    /// Cooked text of the literal with each `${...}` placeholder replaced by a
    /// single space
    pub body: String,
    /// Source text between the backticks, placeholders and escapes included
    pub raw: String,
    /// Location of the body in the original source
    pub location: SourceLocation,
}

/// Finds every template literal tagged with one of `config.tag_identifiers`.
///
/// Only plain identifier tags count (`gql\`...\``); member expressions and call
/// expressions are ignored. Literals are returned in source order.
///
/// `jsx` enables JSX syntax; see [`Language::allows_jsx`].
#[tracing::instrument(skip(source, config), fields(len = source.len()))]
pub fn find_tagged_literals(
    source: &str,
    language: Language,
    jsx: bool,
    config: &ExtractConfig,
) -> Result<Vec<TaggedLiteral>> {
    let cm: Lrc<SourceMap> = Lrc::default();
    let fm = cm.new_source_file(Lrc::new(FileName::Anon), source.to_string());

    let mut recovered = Vec::new();
    let program = match language {
        Language::TypeScript => parse(&fm, typescript_syntax(jsx), &mut recovered)?,
        // Flow annotations are close enough to TypeScript for swc to read them.
        Language::JavaScript | Language::GraphQL => {
            match parse(&fm, es_syntax(jsx), &mut recovered) {
                Ok(program) => program,
                Err(error) => {
                    tracing::debug!(%error, "Retrying JavaScript source with TypeScript syntax");
                    recovered.clear();
                    parse(&fm, typescript_syntax(jsx), &mut recovered).map_err(|_| error)?
                }
            }
        }
    };

    if !recovered.is_empty() {
        tracing::debug!(count = recovered.len(), "Recovered from script syntax errors");
    }

    let mut collector = TaggedTemplateCollector {
        tags: &config.tag_identifiers,
        source,
        start: fm.start_pos.0,
        found: Vec::new(),
    };
    program.visit_with(&mut collector);

    tracing::debug!(literals = collector.found.len(), "Tagged literals found");
    Ok(collector.found)
}

fn es_syntax(jsx: bool) -> Syntax {
    Syntax::Es(EsSyntax {
        jsx,
        decorators: true,
        ..Default::default()
    })
}

fn typescript_syntax(tsx: bool) -> Syntax {
    Syntax::Typescript(TsSyntax {
        tsx,
        decorators: true,
        ..Default::default()
    })
}

fn parse(
    fm: &SourceFile,
    syntax: Syntax,
    recovered: &mut Vec<swc_core::ecma::parser::error::Error>,
) -> Result<Program> {
    parse_file_as_program(fm, syntax, EsVersion::latest(), None, recovered).map_err(|e| {
        ExtractError::Script {
            message: e.kind().msg().to_string(),
            offset: e.span().lo.0.saturating_sub(fm.start_pos.0) as usize,
        }
    })
}

/// Extracts GraphQL text from a source string.
///
/// GraphQL sources are returned as a single block. For JavaScript-family
/// sources each tagged literal becomes one block with its placeholders
/// stripped. `extension` decides whether JSX is enabled.
pub fn extract_from_source(
    source: &str,
    language: Language,
    extension: &str,
    config: &ExtractConfig,
) -> Result<Vec<String>> {
    if !language.requires_extraction() {
        return Ok(vec![source.to_string()]);
    }

    let literals = find_tagged_literals(source, language, language.allows_jsx(extension), config)?;
    Ok(literals.into_iter().map(|literal| literal.body).collect())
}

/// Reads a file and extracts its tagged literals.
///
/// GraphQL files hold no template literals and yield nothing. Files whose
/// extension is not a known language are parsed as JavaScript.
#[tracing::instrument(skip(config), fields(path = %path.display()))]
pub fn extract_from_file(path: &Path, config: &ExtractConfig) -> Result<Vec<String>> {
    let extension = file_extension(path).unwrap_or_default();
    let language = match Language::from_extension(extension) {
        Some(Language::GraphQL) => {
            tracing::debug!("GraphQL file has no tagged literals");
            return Ok(Vec::new());
        }
        Some(Language::TypeScript) => Language::TypeScript,
        Some(Language::JavaScript) | None => Language::JavaScript,
    };

    let source = std::fs::read_to_string(path).map_err(|source| ExtractError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    extract_from_source(&source, language, extension, config)
}

struct TaggedTemplateCollector<'a> {
    tags: &'a [String],
    source: &'a str,
    start: u32,
    found: Vec<TaggedLiteral>,
}

impl TaggedTemplateCollector<'_> {
    fn is_graphql_tag(&self, tag: &Expr) -> bool {
        match tag {
            Expr::Ident(ident) => self.tags.iter().any(|t| t.as_str() == &*ident.sym),
            _ => false,
        }
    }

    fn record(&mut self, node: &TaggedTpl) {
        let lo = node.tpl.span.lo.0.saturating_sub(self.start) as usize;
        let hi = node.tpl.span.hi.0.saturating_sub(self.start) as usize;

        let Some(raw) = self.source.get(lo..hi) else {
            tracing::warn!(lo, hi, "Template span outside source, skipping");
            return;
        };

        let (offset, raw) = match raw.strip_prefix('`') {
            Some(rest) => (lo + 1, rest.strip_suffix('`').unwrap_or(rest)),
            None => (lo, raw),
        };

        self.found.push(TaggedLiteral {
            body: cooked_body(&node.tpl),
            raw: raw.to_string(),
            location: SourceLocation::new(offset, raw.len()),
        });
    }
}

/// Joins the literal's quasis with a space where each placeholder was.
///
/// A quasi with an invalid escape has no cooked value; its raw text is used.
fn cooked_body(tpl: &Tpl) -> String {
    tpl.quasis
        .iter()
        .map(|quasi| match &quasi.cooked {
            Some(cooked) => cooked.to_string_lossy().into_owned(),
            None => quasi.raw.to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

impl Visit for TaggedTemplateCollector<'_> {
    fn visit_tagged_tpl(&mut self, node: &TaggedTpl) {
        if self.is_graphql_tag(&node.tag) {
            self.record(node);
        }
        node.visit_children_with(self);
    }
}
