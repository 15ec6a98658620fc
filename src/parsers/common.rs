use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tree_sitter::{Language, Node as TSNode, Parser, Tree};

use crate::core::{path, CallRef, FileRecord, ImportRef, Symbol};

pub struct TreeSitterParser {
    parser: Parser,
}

impl TreeSitterParser {
    pub fn new(language: Language) -> Result<Self> {
        let mut parser = Parser::new();
        parser.set_language(language)?;
        Ok(Self { parser })
    }

    pub fn parse_source(&mut self, source: &str, file_path: &Path) -> Result<Tree> {
        self.parser
            .parse(source, None)
            .ok_or_else(|| anyhow::anyhow!("Failed to parse file: {}", file_path.display()))
    }
}

/// Buffered read sized to the file.
pub fn read_source(file_path: &Path) -> Result<String> {
    let file = File::open(file_path)
        .with_context(|| format!("Failed to open {}", file_path.display()))?;
    let file_size = file.metadata()?.len() as usize;

    let mut reader =
        BufReader::with_capacity(if file_size < 8192 { file_size.max(1) } else { 8192 }, file);

    let mut content = String::with_capacity(file_size);
    reader
        .read_to_string(&mut content)
        .with_context(|| format!("Failed to read {} as UTF-8", file_path.display()))?;
    Ok(content)
}

pub fn extract_text<'a>(node: &TSNode, source: &'a [u8]) -> &'a str {
    std::str::from_utf8(&source[node.byte_range()]).unwrap_or("")
}

pub fn find_child_by_kind<'a>(node: &'a TSNode, kind: &str) -> Option<TSNode<'a>> {
    let mut cursor = node.walk();
    let found = node.children(&mut cursor).find(|child| child.kind() == kind);
    found
}

fn line_of(node: &TSNode) -> usize {
    node.start_position().row + 1
}

/// Walks a whole JavaScript/TypeScript syntax tree and collects the facts a
/// [`FileRecord`] holds. Both grammars share these node kinds.
pub struct RecordExtractor<'s> {
    source: &'s [u8],
    record: FileRecord,
}

impl<'s> RecordExtractor<'s> {
    pub fn new(file_path: &Path, source: &'s str) -> Self {
        let path = file_path.to_string_lossy().replace('\\', "/");
        Self {
            source: source.as_bytes(),
            record: FileRecord::new(path),
        }
    }

    pub fn extract(mut self, root: &TSNode) -> FileRecord {
        self.visit(root);
        self.record
    }

    fn visit(&mut self, node: &TSNode) {
        match node.kind() {
            "import_statement" => self.record_import(node),
            "export_statement" => self.record_export(node),
            "function_declaration" | "generator_function_declaration" => {
                self.record_function(node)
            }
            "call_expression" => self.record_call(node),
            "arrow_function" => self.record.arrow_functions += 1,
            "jsx_element" | "jsx_self_closing_element" => self.record.jsx_elements += 1,
            _ => {}
        }

        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            self.visit(&child);
        }
    }

    fn text(&self, node: &TSNode) -> &'s str {
        extract_text(node, self.source)
    }

    fn push_import(&mut self, specifier_node: &TSNode, statement: &TSNode) {
        let specifier = path::strip_quotes(self.text(specifier_node));
        if specifier.is_empty() {
            return;
        }
        self.record.imports.push(ImportRef {
            specifier: specifier.to_string(),
            content: self.text(statement).to_string(),
            line: line_of(statement),
        });
    }

    fn record_import(&mut self, node: &TSNode) {
        if let Some(source) = node.child_by_field_name("source") {
            self.push_import(&source, node);
        }
    }

    fn record_export(&mut self, node: &TSNode) {
        // `export { a } from './a'` and `export * from './b'` depend on the
        // re-exported module.
        if let Some(source) = node.child_by_field_name("source") {
            self.push_import(&source, node);
        }

        let mut names = Vec::new();
        if let Some(declaration) = node.child_by_field_name("declaration") {
            if let Some(name) = declaration.child_by_field_name("name") {
                names.push(self.text(&name));
            } else {
                // lexical declarations: `export const a = 1, b = 2`
                let mut cursor = declaration.walk();
                for declarator in declaration.children(&mut cursor) {
                    if declarator.kind() == "variable_declarator" {
                        if let Some(name) = declarator.child_by_field_name("name") {
                            names.push(self.text(&name));
                        }
                    }
                }
            }
        } else if let Some(clause) = find_child_by_kind(node, "export_clause") {
            let mut cursor = clause.walk();
            for specifier in clause.children(&mut cursor) {
                if specifier.kind() != "export_specifier" {
                    continue;
                }
                let exported = specifier
                    .child_by_field_name("alias")
                    .or_else(|| specifier.child_by_field_name("name"));
                if let Some(exported) = exported {
                    names.push(self.text(&exported));
                }
            }
        } else if let Some(value) = node.child_by_field_name("value") {
            if value.kind() == "identifier" {
                names.push(self.text(&value));
            } else {
                names.push("default");
            }
        }

        let content = self.text(node);
        let line = line_of(node);
        for name in names {
            self.record.exports.push(Symbol {
                name: name.to_string(),
                content: content.to_string(),
                line,
            });
        }
    }

    fn record_function(&mut self, node: &TSNode) {
        if let Some(name) = node.child_by_field_name("name") {
            self.record.functions.push(Symbol {
                name: self.text(&name).to_string(),
                content: self.text(node).to_string(),
                line: line_of(node),
            });
        }
    }

    fn record_call(&mut self, node: &TSNode) {
        let Some(function) = node.child_by_field_name("function") else {
            return;
        };
        let callee = self.text(&function);

        // `require('./x')` and `import('./x')` are imports as well as calls.
        if callee == "require" || function.kind() == "import" {
            if let Some(argument) = node
                .child_by_field_name("arguments")
                .and_then(|args| args.named_child(0))
                .filter(|arg| arg.kind() == "string")
            {
                self.push_import(&argument, node);
            }
        }

        if callee.is_empty() {
            return;
        }
        self.record.calls.push(CallRef {
            callee: callee.to_string(),
            content: self.text(node).to_string(),
            line: line_of(node),
        });
    }
}
