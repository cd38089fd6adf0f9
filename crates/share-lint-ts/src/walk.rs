//! Syntax tree walk shared by the JavaScript-family extractors.
//!
//! The JavaScript, TypeScript and TSX grammars agree on the node kinds used
//! here, so one walk serves all three.

use share_lint_core::{ExtractError, ImportKind, ImportReference};
use tracing::trace;
use tree_sitter::{Language, Node, Parser};

/// Parses `source` with `language` and collects every module reference.
pub(crate) fn extract_imports(
    language: &Language,
    language_id: &'static str,
    source: &str,
) -> Result<Vec<ImportReference>, ExtractError> {
    let mut parser = Parser::new();
    parser
        .set_language(language)
        .map_err(|e| ExtractError::Language {
            language: language_id,
            message: e.to_string(),
        })?;

    let src = source.as_bytes();
    let tree = parser
        .parse(src, None)
        .ok_or(ExtractError::Parse {
            language: language_id,
        })?;

    let mut imports = Vec::new();
    let mut cursor = tree.walk();

    // Pre-order walk keeps the references in source order.
    loop {
        if let Some(reference) = reference_at(&cursor.node(), src) {
            imports.push(reference);
        }

        if cursor.goto_first_child() {
            continue;
        }
        loop {
            if cursor.goto_next_sibling() {
                break;
            }
            if !cursor.goto_parent() {
                trace!("{language_id}: {} module references", imports.len());
                return Ok(imports);
            }
        }
    }
}

fn reference_at(node: &Node<'_>, src: &[u8]) -> Option<ImportReference> {
    match node.kind() {
        "import_statement" => {
            let source = node.child_by_field_name("source")?;
            literal(&source, src, ImportKind::Import)
        }
        "export_statement" => {
            let source = node.child_by_field_name("source")?;
            literal(&source, src, ImportKind::ReExport)
        }
        "import_require_clause" => {
            let source = node
                .child_by_field_name("source")
                .or_else(|| first_child_of_kind(node, "string"))?;
            literal(&source, src, ImportKind::ImportEquals)
        }
        "call_expression" => {
            let function = node.child_by_field_name("function")?;
            let kind = match function.kind() {
                "import" => ImportKind::DynamicImport,
                "identifier" if text(&function, src) == "require" => ImportKind::Require,
                _ => return None,
            };
            let arguments = node.child_by_field_name("arguments")?;
            let first = arguments.named_child(0)?;
            literal(&first, src, kind)
        }
        _ => None,
    }
}

/// Builds a reference from a `string` node; other literal forms are skipped.
fn literal(node: &Node<'_>, src: &[u8], kind: ImportKind) -> Option<ImportReference> {
    if node.kind() != "string" {
        return None;
    }

    let start = node.start_byte();
    let end = node.end_byte();
    if end < start + 2 {
        return None;
    }

    let module = std::str::from_utf8(&src[start + 1..end - 1]).ok()?;
    let position = node.start_position();

    Some(ImportReference {
        module: module.to_owned(),
        kind,
        start,
        end,
        line: position.row + 1,
        column: position.column + 1,
    })
}

fn first_child_of_kind<'t>(node: &Node<'t>, kind: &str) -> Option<Node<'t>> {
    let mut cursor = node.walk();
    let found = node.children(&mut cursor).find(|c| c.kind() == kind);
    found
}

fn text<'a>(node: &Node<'_>, src: &'a [u8]) -> &'a str {
    std::str::from_utf8(&src[node.start_byte()..node.end_byte()]).unwrap_or("")
}
