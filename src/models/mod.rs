//! 数据模型层

pub mod doc_tree;
pub mod sample;
pub mod stats;

pub use doc_tree::{
    DocTree, DocTreeError, DocTreeRow, FileDoc, FolderDoc, Node, NodeId, NodeRef, Parent,
};
pub use sample::{indexed_project, sample_project};
pub use stats::{
    count_files, count_issues, count_lines, file_extension, file_types_histogram, line_count,
    FileTypeCount, ProjectStats,
};
