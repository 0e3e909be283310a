//! 从模型输出的markdown中提取表格记录与校验备注

use markdown::mdast::{Node, Table};
use markdown::{ParseOptions, to_mdast};
use regex::Regex;
use std::sync::LazyLock;

use crate::generator::state::Record;

static BULLET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:[-*+•]|\d+[.)])\s+(.+)$").expect("bullet pattern is valid")
});

/// 解析文本中的第一张GFM表格，解析不到时返回空列表
///
/// 模型经常把表格包在```markdown代码块中，正文里找不到表格时会再解析一次代码块内容。
pub fn parse_first_table(text: &str) -> Vec<Record> {
    let Some(root) = parse(text) else {
        return Vec::new();
    };

    if let Some(table) = find_first_table(&root) {
        return table_records(table);
    }

    fenced_blocks(&root)
        .into_iter()
        .find_map(|code| {
            let inner = parse(&code)?;
            find_first_table(&inner).map(table_records)
        })
        .unwrap_or_default()
}

/// 提取 "Verification Notes" 标题之后的列表项
pub fn parse_notes(text: &str) -> Vec<String> {
    let mut lines = text.lines();
    if !lines
        .by_ref()
        .any(|line| line.to_lowercase().contains("verification notes"))
    {
        return Vec::new();
    }

    let mut notes = Vec::new();
    for line in lines {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match BULLET.captures(line) {
            Some(caps) => notes.push(caps[1].trim().to_string()),
            None if notes.is_empty() && !line.starts_with('#') && !line.starts_with('|') => {
                continue;
            }
            None => break,
        }
    }
    notes
}

fn parse(text: &str) -> Option<Node> {
    match to_mdast(text, &ParseOptions::gfm()) {
        Ok(root) => Some(root),
        Err(e) => {
            tracing::debug!("markdown parse failed: {}", e);
            None
        }
    }
}

fn find_first_table(node: &Node) -> Option<&Table> {
    if let Node::Table(table) = node {
        return Some(table);
    }
    node.children()?.iter().find_map(find_first_table)
}

fn fenced_blocks(root: &Node) -> Vec<String> {
    root.children()
        .map(|children| {
            children
                .iter()
                .filter_map(|child| match child {
                    Node::Code(code)
                        if matches!(code.lang.as_deref(), None | Some("markdown" | "md")) =>
                    {
                        Some(code.value.clone())
                    }
                    _ => None,
                })
                .collect()
        })
        .unwrap_or_default()
}

fn table_records(table: &Table) -> Vec<Record> {
    let mut rows = table.children.iter().map(row_cells);
    let Some(header) = rows.next() else {
        return Vec::new();
    };

    rows.filter(|cells| cells.iter().any(|cell| !cell.is_empty()))
        .map(|cells| {
            let fields = header
                .iter()
                .enumerate()
                .map(|(i, column)| (column.clone(), cells.get(i).cloned().unwrap_or_default()))
                .collect();
            Record::new(fields)
        })
        .collect()
}

fn row_cells(row: &Node) -> Vec<String> {
    row.children()
        .map(|cells| cells.iter().map(cell_text).collect())
        .unwrap_or_default()
}

fn cell_text(node: &Node) -> String {
    let mut text = String::new();
    push_text(node, &mut text);
    text.trim().to_string()
}

fn push_text(node: &Node, out: &mut String) {
    match node {
        Node::Text(text) => out.push_str(&text.value),
        Node::InlineCode(code) => out.push_str(&code.value),
        Node::Break(_) => out.push(' '),
        Node::Link(link) => {
            let mut label = String::new();
            for child in &link.children {
                push_text(child, &mut label);
            }
            let label = label.trim();
            if label.is_empty() || label == link.url {
                out.push_str(&link.url);
            } else {
                out.push_str(&format!("{} <{}>", label, link.url));
            }
        }
        other => {
            if let Some(children) = other.children() {
                for child in children {
                    push_text(child, out);
                }
            }
        }
    }
}
