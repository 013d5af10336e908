//! 项目统计：文件数、行数、扩展名分布

use compact_str::CompactString;
use rustc_hash::FxHashMap;

use super::doc_tree::{DocTree, Node};

pub const UNKNOWN_EXTENSION: &str = "unknown";

const ISSUE_MARKERS: [&str; 2] = ["TODO", "FIXME"];

pub fn count_files(tree: &DocTree) -> usize {
    tree.iter().filter(|n| !n.is_folder()).count()
}

/// Empty or not-yet-loaded content counts as zero lines.
pub fn line_count(content: Option<&str>) -> usize {
    match content {
        Some(text) if !text.is_empty() => text.split('\n').count(),
        _ => 0,
    }
}

pub fn count_lines(tree: &DocTree) -> usize {
    tree.iter().map(|n| line_count(n.content())).sum()
}

pub fn file_extension(name: &str) -> &str {
    match name.rsplit_once('.') {
        Some((_, ext)) if !ext.is_empty() => ext,
        _ => UNKNOWN_EXTENSION,
    }
}

pub fn file_types_histogram(tree: &DocTree) -> FxHashMap<CompactString, usize> {
    let mut types: FxHashMap<CompactString, usize> = FxHashMap::default();
    for node in tree.iter() {
        if let Node::File(file) = node.as_ref() {
            *types
                .entry(CompactString::from(file_extension(&file.name)))
                .or_default() += 1;
        }
    }
    types
}

pub fn count_issues(tree: &DocTree) -> usize {
    tree.iter()
        .filter_map(|n| n.content())
        .flat_map(str::lines)
        .filter(|line| ISSUE_MARKERS.iter().any(|m| line.contains(m)))
        .count()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileTypeCount {
    pub name: CompactString,
    pub count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectStats {
    pub total_files: usize,
    pub total_lines: usize,
    /// 按数量降序，数量相同按名称排序
    pub file_types: Vec<FileTypeCount>,
    pub issues_count: usize,
}

impl ProjectStats {
    pub fn collect(tree: &DocTree) -> Self {
        let mut file_types: Vec<FileTypeCount> = file_types_histogram(tree)
            .into_iter()
            .map(|(name, count)| FileTypeCount { name, count })
            .collect();
        file_types.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name)));

        Self {
            total_files: count_files(tree),
            total_lines: count_lines(tree),
            file_types,
            issues_count: count_issues(tree),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/models/stats.rs"]
mod tests;
