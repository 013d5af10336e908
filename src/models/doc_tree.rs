//! 文档树数据模型
//!
//! 不可变的文件/文件夹树：所有修改返回新的根，未受影响的子树通过 `Arc` 共享。

use compact_str::CompactString;
use rustc_hash::FxHashSet;
use std::{borrow::Borrow, fmt, sync::Arc};

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(CompactString);

impl NodeId {
    pub fn new(id: impl Into<CompactString>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for NodeId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for NodeId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for NodeId {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

pub type NodeRef = Arc<Node>;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileDoc {
    pub id: NodeId,
    pub name: CompactString,
    /// `None` 表示内容尚未加载
    pub content: Option<String>,
    pub language: Option<CompactString>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FolderDoc {
    pub id: NodeId,
    pub name: CompactString,
    pub children: Vec<NodeRef>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Node {
    File(FileDoc),
    Folder(FolderDoc),
}

impl Node {
    pub fn file(id: impl Into<NodeId>, name: impl Into<CompactString>) -> Self {
        Node::File(FileDoc {
            id: id.into(),
            name: name.into(),
            content: None,
            language: None,
        })
    }

    pub fn folder(
        id: impl Into<NodeId>,
        name: impl Into<CompactString>,
        children: Vec<NodeRef>,
    ) -> Self {
        Node::Folder(FolderDoc {
            id: id.into(),
            name: name.into(),
            children,
        })
    }

    /// Builder helper; ignored on folders.
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        if let Node::File(file) = &mut self {
            file.content = Some(content.into());
        }
        self
    }

    /// Builder helper; ignored on folders.
    pub fn with_language(mut self, language: impl Into<CompactString>) -> Self {
        if let Node::File(file) = &mut self {
            file.language = Some(language.into());
        }
        self
    }

    pub fn into_ref(self) -> NodeRef {
        Arc::new(self)
    }

    pub fn id(&self) -> &NodeId {
        match self {
            Node::File(f) => &f.id,
            Node::Folder(d) => &d.id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Node::File(f) => &f.name,
            Node::Folder(d) => &d.name,
        }
    }

    pub fn is_folder(&self) -> bool {
        matches!(self, Node::Folder(_))
    }

    pub fn content(&self) -> Option<&str> {
        match self {
            Node::File(f) => f.content.as_deref(),
            Node::Folder(_) => None,
        }
    }

    pub fn language(&self) -> Option<&str> {
        match self {
            Node::File(f) => f.language.as_deref(),
            Node::Folder(_) => None,
        }
    }

    pub fn children(&self) -> &[NodeRef] {
        match self {
            Node::File(_) => &[],
            Node::Folder(d) => &d.children,
        }
    }

    fn renamed(&self, name: CompactString) -> Node {
        match self {
            Node::File(f) => Node::File(FileDoc {
                name,
                ..f.clone()
            }),
            Node::Folder(d) => Node::Folder(FolderDoc {
                id: d.id.clone(),
                name,
                children: d.children.clone(),
            }),
        }
    }
}

/// 插入/移动的目标位置
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Parent {
    Root,
    Folder(NodeId),
}

impl Parent {
    pub const ROOT_SENTINEL: &'static str = "root";
}

impl From<&str> for Parent {
    fn from(s: &str) -> Self {
        if s == Parent::ROOT_SENTINEL {
            Parent::Root
        } else {
            Parent::Folder(NodeId::from(s))
        }
    }
}

impl fmt::Display for Parent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Parent::Root => f.write_str(Parent::ROOT_SENTINEL),
            Parent::Folder(id) => write!(f, "{id}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocTreeError {
    NotFound(NodeId),
    InvalidTarget(NodeId),
    DuplicateId(NodeId),
    MoveIntoDescendant(NodeId),
}

impl fmt::Display for DocTreeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocTreeError::NotFound(id) => write!(f, "node not found: {id}"),
            DocTreeError::InvalidTarget(id) => {
                write!(f, "node has the wrong kind for this operation: {id}")
            }
            DocTreeError::DuplicateId(id) => write!(f, "node id already exists: {id}"),
            DocTreeError::MoveIntoDescendant(id) => {
                write!(f, "cannot move node into its own subtree: {id}")
            }
        }
    }
}

impl std::error::Error for DocTreeError {}

enum Rewrite {
    Keep,
    Replace(NodeRef),
    Remove,
}

/// Rebuilds only the path from the top level down to `id`.
/// Returns `None` when nothing changed.
fn rewrite(
    nodes: &[NodeRef],
    id: &str,
    edit: &mut dyn FnMut(&NodeRef) -> Rewrite,
) -> Option<Vec<NodeRef>> {
    for (idx, node) in nodes.iter().enumerate() {
        if node.id().as_str() == id {
            return match edit(node) {
                Rewrite::Keep => None,
                Rewrite::Replace(new_node) => {
                    let mut out = nodes.to_vec();
                    out[idx] = new_node;
                    Some(out)
                }
                Rewrite::Remove => {
                    let mut out = nodes.to_vec();
                    out.remove(idx);
                    Some(out)
                }
            };
        }

        if let Node::Folder(folder) = node.as_ref() {
            if let Some(children) = rewrite(&folder.children, id, edit) {
                let mut out = nodes.to_vec();
                out[idx] = Arc::new(Node::Folder(FolderDoc {
                    id: folder.id.clone(),
                    name: folder.name.clone(),
                    children,
                }));
                return Some(out);
            }
        }
    }
    None
}

fn find_in<'a>(nodes: &'a [NodeRef], id: &str) -> Option<&'a NodeRef> {
    for node in nodes {
        if node.id().as_str() == id {
            return Some(node);
        }
        if let Some(found) = find_in(node.children(), id) {
            return Some(found);
        }
    }
    None
}

fn parent_in(nodes: &[NodeRef], id: &str, parent: &Parent) -> Option<Parent> {
    for node in nodes {
        if node.id().as_str() == id {
            return Some(parent.clone());
        }
        if let Node::Folder(folder) = node.as_ref() {
            let here = Parent::Folder(folder.id.clone());
            if let Some(found) = parent_in(&folder.children, id, &here) {
                return Some(found);
            }
        }
    }
    None
}

#[derive(Clone, Debug, Default)]
pub struct DocTree {
    roots: Arc<Vec<NodeRef>>,
}

impl PartialEq for DocTree {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other) || self.roots == other.roots
    }
}

impl Eq for DocTree {}

impl DocTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_nodes(nodes: Vec<NodeRef>) -> Self {
        Self {
            roots: Arc::new(nodes),
        }
    }

    fn with_roots(roots: Vec<NodeRef>) -> Self {
        Self::from_nodes(roots)
    }

    pub fn roots(&self) -> &[NodeRef] {
        &self.roots
    }

    /// 同一个根（未发生任何修改）
    pub fn ptr_eq(&self, other: &DocTree) -> bool {
        Arc::ptr_eq(&self.roots, &other.roots)
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Total node count, files and folders.
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn iter(&self) -> Iter<'_> {
        Iter {
            stack: self.roots.iter().rev().collect(),
        }
    }

    pub fn find(&self, id: &str) -> Option<&NodeRef> {
        find_in(&self.roots, id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.find(id).is_some()
    }

    pub fn parent_of(&self, id: &str) -> Option<Parent> {
        parent_in(&self.roots, id, &Parent::Root)
    }

    pub fn try_update_content(
        &self,
        id: &str,
        content: impl Into<String>,
    ) -> Result<DocTree, DocTreeError> {
        match self.find(id).map(|n| n.as_ref()) {
            None => return Err(DocTreeError::NotFound(NodeId::from(id))),
            Some(Node::Folder(_)) => return Err(DocTreeError::InvalidTarget(NodeId::from(id))),
            Some(Node::File(_)) => {}
        }

        let mut content = Some(content.into());
        let roots = rewrite(&self.roots, id, &mut |node| match node.as_ref() {
            Node::File(file) => Rewrite::Replace(Arc::new(Node::File(FileDoc {
                content: content.take(),
                ..file.clone()
            }))),
            Node::Folder(_) => Rewrite::Keep,
        });

        Ok(roots.map(Self::with_roots).unwrap_or_else(|| self.clone()))
    }

    pub fn update_content(&self, id: &str, content: impl Into<String>) -> DocTree {
        self.try_update_content(id, content)
            .unwrap_or_else(|err| self.absorb("update_content", err))
    }

    pub fn try_insert(&self, parent: &Parent, node: NodeRef) -> Result<DocTree, DocTreeError> {
        let mut incoming = FxHashSet::default();
        let mut stack = vec![&node];
        while let Some(current) = stack.pop() {
            let id = current.id();
            if !incoming.insert(id.clone()) || self.contains(id.as_str()) {
                return Err(DocTreeError::DuplicateId(id.clone()));
            }
            stack.extend(current.children().iter());
        }

        match parent {
            Parent::Root => {
                let mut roots = self.roots.as_ref().clone();
                roots.push(node);
                Ok(Self::with_roots(roots))
            }
            Parent::Folder(parent_id) => {
                match self.find(parent_id.as_str()).map(|n| n.as_ref()) {
                    None => return Err(DocTreeError::NotFound(parent_id.clone())),
                    Some(Node::File(_)) => {
                        return Err(DocTreeError::InvalidTarget(parent_id.clone()))
                    }
                    Some(Node::Folder(_)) => {}
                }

                let mut node = Some(node);
                let roots = rewrite(&self.roots, parent_id.as_str(), &mut |target| {
                    match (target.as_ref(), node.take()) {
                        (Node::Folder(folder), Some(child)) => {
                            let mut children = folder.children.clone();
                            children.push(child);
                            Rewrite::Replace(Arc::new(Node::Folder(FolderDoc {
                                id: folder.id.clone(),
                                name: folder.name.clone(),
                                children,
                            })))
                        }
                        _ => Rewrite::Keep,
                    }
                });
                Ok(roots.map(Self::with_roots).unwrap_or_else(|| self.clone()))
            }
        }
    }

    pub fn insert(&self, parent: &Parent, node: NodeRef) -> DocTree {
        self.try_insert(parent, node)
            .unwrap_or_else(|err| self.absorb("insert", err))
    }

    pub fn try_remove(&self, id: &str) -> Result<DocTree, DocTreeError> {
        rewrite(&self.roots, id, &mut |_| Rewrite::Remove)
            .map(Self::with_roots)
            .ok_or_else(|| DocTreeError::NotFound(NodeId::from(id)))
    }

    pub fn remove(&self, id: &str) -> DocTree {
        self.try_remove(id)
            .unwrap_or_else(|err| self.absorb("remove", err))
    }

    /// Appends externally produced nodes to the top level. Does not deduplicate.
    pub fn merge(&self, nodes: impl IntoIterator<Item = NodeRef>) -> DocTree {
        let mut roots = self.roots.as_ref().clone();
        let before = roots.len();
        roots.extend(nodes);
        if roots.len() == before {
            return self.clone();
        }

        let merged = Self::with_roots(roots);
        let duplicates = merged.duplicate_ids();
        if !duplicates.is_empty() {
            tracing::warn!(count = duplicates.len(), "merge introduced duplicate node ids");
        }
        merged
    }

    pub fn try_rename(
        &self,
        id: &str,
        name: impl Into<CompactString>,
    ) -> Result<DocTree, DocTreeError> {
        let name = name.into();
        let node = self
            .find(id)
            .ok_or_else(|| DocTreeError::NotFound(NodeId::from(id)))?;
        if node.name() == name.as_str() {
            return Ok(self.clone());
        }

        let roots = rewrite(&self.roots, id, &mut |node| {
            Rewrite::Replace(Arc::new(node.renamed(name.clone())))
        });
        Ok(roots.map(Self::with_roots).unwrap_or_else(|| self.clone()))
    }

    pub fn rename(&self, id: &str, name: impl Into<CompactString>) -> DocTree {
        self.try_rename(id, name)
            .unwrap_or_else(|err| self.absorb("rename", err))
    }

    pub fn try_move_to(&self, id: &str, new_parent: &Parent) -> Result<DocTree, DocTreeError> {
        let node = self
            .find(id)
            .cloned()
            .ok_or_else(|| DocTreeError::NotFound(NodeId::from(id)))?;

        if let Parent::Folder(parent_id) = new_parent {
            if parent_id.as_str() == id || find_in(node.children(), parent_id.as_str()).is_some()
            {
                return Err(DocTreeError::MoveIntoDescendant(node.id().clone()));
            }
            match self.find(parent_id.as_str()).map(|n| n.as_ref()) {
                None => return Err(DocTreeError::NotFound(parent_id.clone())),
                Some(Node::File(_)) => return Err(DocTreeError::InvalidTarget(parent_id.clone())),
                Some(Node::Folder(_)) => {}
            }
        }

        if self.parent_of(id).as_ref() == Some(new_parent) {
            return Ok(self.clone());
        }

        self.try_remove(id)?.try_insert(new_parent, node)
    }

    pub fn move_to(&self, id: &str, new_parent: &Parent) -> DocTree {
        self.try_move_to(id, new_parent)
            .unwrap_or_else(|err| self.absorb("move_to", err))
    }

    pub fn duplicate_ids(&self) -> Vec<NodeId> {
        let mut seen = FxHashSet::default();
        let mut duplicates = Vec::new();
        for node in self.iter() {
            if !seen.insert(node.id()) {
                duplicates.push(node.id().clone());
            }
        }
        duplicates
    }

    fn absorb(&self, op: &'static str, err: DocTreeError) -> DocTree {
        tracing::debug!(op, error = %err, "doc tree operation ignored");
        self.clone()
    }
}

/// 前序深度优先遍历
pub struct Iter<'a> {
    stack: Vec<&'a NodeRef>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a NodeRef;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children().iter().rev());
        Some(node)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocTreeRow {
    pub id: NodeId,
    pub depth: u16,
    pub name: CompactString,
    pub is_folder: bool,
    pub is_expanded: bool,
}

impl DocTree {
    pub fn flatten_for_view(&self, expanded: &FxHashSet<NodeId>) -> Vec<DocTreeRow> {
        let mut result = Vec::new();
        let mut stack: Vec<(&NodeRef, u16)> = self.roots.iter().rev().map(|n| (n, 0)).collect();

        while let Some((node, depth)) = stack.pop() {
            let is_expanded = node.is_folder() && expanded.contains(node.id());
            result.push(DocTreeRow {
                id: node.id().clone(),
                depth,
                name: CompactString::from(node.name()),
                is_folder: node.is_folder(),
                is_expanded,
            });

            if is_expanded {
                for child in node.children().iter().rev() {
                    stack.push((child, depth + 1));
                }
            }
        }

        result
    }
}

#[cfg(test)]
#[path = "../../tests/unit/models/doc_tree.rs"]
mod tests;
