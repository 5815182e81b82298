//! C# parser using tree-sitter
//!
//! Walks the whole syntax tree and turns every `attribute` node (type,
//! member, parameter, return and assembly targets alike) into an
//! [`AttributeUsage`].

use crate::extractor::{AttributeArgument, AttributeName, AttributeUsage};
use crate::models::Location;
use crate::parsers::ParseResult;
use anyhow::{Context, Result};
use std::path::Path;
use tree_sitter::{Node, Parser};

/// Parse a C# file and extract all attribute usages
pub fn parse(path: &Path) -> Result<ParseResult> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read file: {}", path.display()))?;

    parse_source(&source, path)
}

/// Parse C# source code directly (useful for testing)
pub fn parse_source(source: &str, path: &Path) -> Result<ParseResult> {
    let mut parser = Parser::new();
    let language = tree_sitter_c_sharp::LANGUAGE;
    parser
        .set_language(&language.into())
        .context("Failed to set C# language")?;

    let tree = parser
        .parse(source, None)
        .context("Failed to parse C# source")?;

    let root = tree.root_node();
    let source_bytes = source.as_bytes();

    let attributes = collect_attribute_nodes(root)
        .into_iter()
        .map(|node| parse_attribute_node(&node, source_bytes, path))
        .collect();

    Ok(ParseResult {
        attributes,
        has_syntax_errors: root.has_error(),
    })
}

/// All `attribute` nodes in document order (iterative, deep trees are fine)
fn collect_attribute_nodes(root: Node<'_>) -> Vec<Node<'_>> {
    let mut nodes = Vec::new();
    let mut cursor = root.walk();

    loop {
        let node = cursor.node();
        if node.kind() == "attribute" {
            nodes.push(node);
        }

        if cursor.goto_first_child() {
            continue;
        }

        loop {
            if cursor.goto_next_sibling() {
                break;
            }
            if !cursor.goto_parent() {
                return nodes;
            }
        }
    }
}

fn parse_attribute_node(node: &Node, source: &[u8], path: &Path) -> AttributeUsage {
    let name_node = node.child_by_field_name("name").or_else(|| {
        node.named_children(&mut node.walk())
            .find(|c| is_name_kind(c.kind()))
    });

    let name = name_node.and_then(|n| name_shape(&n, source));
    let display_name = name_node
        .and_then(|n| node_text(&n, source))
        .unwrap_or_default()
        .to_string();

    let arguments = node
        .named_children(&mut node.walk())
        .find(|c| c.kind() == "attribute_argument_list")
        .map(|list| {
            list.named_children(&mut list.walk())
                .filter(|c| c.kind() == "attribute_argument")
                .map(|arg| parse_argument_node(&arg, source))
                .collect()
        })
        .unwrap_or_default();

    let start = node.start_position();
    let location = Location::new(path, start.row as u32 + 1, start.column as u32 + 1)
        .with_span(node.start_byte(), node.end_byte());

    AttributeUsage {
        name,
        display_name,
        arguments,
        location,
    }
}

fn is_name_kind(kind: &str) -> bool {
    matches!(
        kind,
        "identifier" | "generic_name" | "qualified_name" | "alias_qualified_name"
    )
}

fn node_text<'s>(node: &Node, source: &'s [u8]) -> Option<&'s str> {
    if node.is_missing() {
        return None;
    }
    node.utf8_text(source).ok().filter(|t| !t.is_empty())
}

/// Map a name node onto one of the known name shapes
fn name_shape(node: &Node, source: &[u8]) -> Option<AttributeName> {
    match node.kind() {
        "identifier" => node_text(node, source).map(|t| AttributeName::Simple(t.to_string())),
        "generic_name" => {
            generic_identifier(node, source).map(|t| AttributeName::Generic(t.to_string()))
        }
        "qualified_name" => {
            let mut segments = Vec::new();
            collect_segments(node, source, &mut segments);
            Some(AttributeName::Qualified(segments))
        }
        "alias_qualified_name" => {
            let alias = node
                .child_by_field_name("alias")
                .or_else(|| node.named_children(&mut node.walk()).next())
                .and_then(|n| node_text(&n, source))?;
            let name = node
                .child_by_field_name("name")
                .or_else(|| node.named_children(&mut node.walk()).last())
                .and_then(|n| simple_segment(&n, source))?;
            Some(AttributeName::AliasQualified {
                alias: alias.to_string(),
                name: name.to_string(),
            })
        }
        _ => None,
    }
}

fn generic_identifier<'s>(node: &Node, source: &'s [u8]) -> Option<&'s str> {
    node.child_by_field_name("name")
        .or_else(|| {
            node.named_children(&mut node.walk())
                .find(|c| c.kind() == "identifier")
        })
        .and_then(|n| node_text(&n, source))
}

fn simple_segment<'s>(node: &Node, source: &'s [u8]) -> Option<&'s str> {
    match node.kind() {
        "identifier" => node_text(node, source),
        "generic_name" => generic_identifier(node, source),
        _ => None,
    }
}

/// Dotted segments left to right; type argument lists are not descended into
fn collect_segments(node: &Node, source: &[u8], segments: &mut Vec<String>) {
    for child in node.named_children(&mut node.walk()) {
        match child.kind() {
            "qualified_name" => collect_segments(&child, source, segments),
            "alias_qualified_name" => {
                for part in child.named_children(&mut child.walk()) {
                    if let Some(text) = simple_segment(&part, source) {
                        segments.push(text.to_string());
                    }
                }
            }
            _ => {
                if let Some(text) = simple_segment(&child, source) {
                    segments.push(text.to_string());
                }
            }
        }
    }
}

fn parse_argument_node(node: &Node, source: &[u8]) -> AttributeArgument {
    AttributeArgument {
        name: argument_name(node, source).map(str::to_string),
        numeric_literal: first_numeric_literal(node, source).map(str::to_string),
    }
}

/// Name of a `Name = value` / `Name: value` argument
fn argument_name<'s>(node: &Node, source: &'s [u8]) -> Option<&'s str> {
    if let Some(name) = node.child_by_field_name("name") {
        return node_text(&name, source);
    }

    // Older grammars wrap the name in name_equals / name_colon
    if let Some(wrapper) = node
        .named_children(&mut node.walk())
        .find(|c| matches!(c.kind(), "name_equals" | "name_colon"))
    {
        return wrapper
            .named_children(&mut wrapper.walk())
            .find(|c| c.kind() == "identifier")
            .and_then(|n| node_text(&n, source));
    }

    let children: Vec<Node> = node.children(&mut node.walk()).collect();
    if let [first, second, ..] = children.as_slice() {
        if first.kind() == "identifier" && matches!(second.kind(), "=" | ":") {
            return node_text(first, source);
        }
    }

    // `Name = value` parsed as an assignment expression
    let named: Vec<Node> = node.named_children(&mut node.walk()).collect();
    let [expr] = named.as_slice() else {
        return None;
    };
    if expr.kind() == "assignment_expression" {
        let left = expr.child_by_field_name("left")?;
        let operator = left.next_sibling()?;
        if left.kind() == "identifier" && operator.utf8_text(source).ok() == Some("=") {
            return node_text(&left, source);
        }
    }

    None
}

fn first_numeric_literal<'s>(node: &Node, source: &'s [u8]) -> Option<&'s str> {
    if matches!(node.kind(), "integer_literal" | "real_literal") {
        return node_text(node, source);
    }
    node.named_children(&mut node.walk())
        .find_map(|child| first_numeric_literal(&child, source))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractor::COST_ARGUMENT_NAME;
    use std::path::PathBuf;

    fn parse_cs(source: &str) -> ParseResult {
        parse_source(source, &PathBuf::from("Debt.cs")).expect("should parse C# source")
    }

    fn cost_literal(usage: &AttributeUsage) -> Option<&str> {
        usage
            .arguments
            .iter()
            .find(|a| a.name.as_deref() == Some(COST_ARGUMENT_NAME))
            .and_then(|a| a.numeric_literal.as_deref())
    }

    #[test]
    fn test_class_attribute() {
        let source = r#"
using System;

[ManualTechnicalDebt(SqaleRemediationDaysEffort = 5)]
public class LegacyService
{
}
"#;
        let result = parse_cs(source);
        assert_eq!(result.attributes.len(), 1);

        let usage = &result.attributes[0];
        assert_eq!(
            usage.name,
            Some(AttributeName::Simple("ManualTechnicalDebt".to_string()))
        );
        assert_eq!(usage.display_name, "ManualTechnicalDebt");
        assert_eq!(cost_literal(usage), Some("5"));
        assert_eq!(usage.location.line, 4);
        assert_eq!(usage.location.column, 2);
        assert_eq!(usage.location.file, PathBuf::from("Debt.cs"));
        assert!(!result.has_syntax_errors);
    }

    #[test]
    fn test_qualified_attribute_name() {
        let source = r#"
[Company.Debt.ManualTechnicalDebtAttribute(SqaleRemediationDaysEffort = 20)]
public class Old { }
"#;
        let result = parse_cs(source);
        assert_eq!(result.attributes.len(), 1);

        let usage = &result.attributes[0];
        let name = usage.name.as_ref().expect("name shape");
        assert!(matches!(name, AttributeName::Qualified(_)));
        assert_eq!(name.simple_name(), Some("ManualTechnicalDebtAttribute"));
        assert_eq!(usage.display_name, "Company.Debt.ManualTechnicalDebtAttribute");
        assert_eq!(cost_literal(usage), Some("20"));
    }

    #[test]
    fn test_attributes_on_members_and_lists() {
        let source = r#"
namespace App
{
    [Serializable, ManualTechnicalDebt(SqaleRemediationDaysEffort = 2)]
    public class Report
    {
        [ManualTechnicalDebt(SqaleRemediationDaysEffort = 13)]
        public void Render([NotNull] string title) { }

        [Obsolete("use Total2")]
        public int Total { get; set; }
    }
}
"#;
        let result = parse_cs(source);
        let names: Vec<_> = result
            .attributes
            .iter()
            .filter_map(|a| a.name.as_ref().and_then(|n| n.simple_name()))
            .collect();
        assert_eq!(
            names,
            vec![
                "Serializable",
                "ManualTechnicalDebt",
                "ManualTechnicalDebt",
                "NotNull",
                "Obsolete"
            ]
        );
        assert_eq!(cost_literal(&result.attributes[2]), Some("13"));
        assert!(result.attributes[0].arguments.is_empty());
    }

    #[test]
    fn test_assembly_attribute() {
        let source = r#"
[assembly: ManualTechnicalDebt(SqaleRemediationDaysEffort = 3)]
"#;
        let result = parse_cs(source);
        assert_eq!(result.attributes.len(), 1);
        assert_eq!(cost_literal(&result.attributes[0]), Some("3"));
    }

    #[test]
    fn test_positional_and_string_arguments() {
        let source = r#"
[ManualTechnicalDebt(40, Reason = "tangled")]
public class Tangled { }
"#;
        let result = parse_cs(source);
        let usage = &result.attributes[0];
        assert_eq!(usage.arguments.len(), 2);
        assert_eq!(usage.arguments[0].name, None);
        assert_eq!(usage.arguments[0].numeric_literal.as_deref(), Some("40"));
        assert_eq!(usage.arguments[1].name.as_deref(), Some("Reason"));
        assert_eq!(usage.arguments[1].numeric_literal, None);
        assert_eq!(cost_literal(usage), None);
    }

    #[test]
    fn test_no_attributes() {
        let source = r#"
public class Clean
{
    public int Add(int a, int b) => a + b;
}
"#;
        assert!(parse_cs(source).is_empty());
    }
}
