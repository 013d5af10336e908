//! 内置示例项目与模拟索引结果

use super::doc_tree::{DocTree, Node, NodeRef};

const MAIN_JS: &str = "// Main application entry point
import { initApp } from './app';
import { setupDatabase } from './database';

// Initialize application components
async function main() {
  try {
    await setupDatabase();
    await initApp();
    console.log('Application started successfully');
  } catch (error) {
    console.error('Failed to start application:', error);
  }
}

main();";

const APP_JS: &str = "// Application setup
export async function initApp() {
  console.log('Initializing application...');
  // TODO: load plugins from config
  return true;
}";

const DATABASE_JS: &str = "// Database connection
export async function setupDatabase() {
  console.log('Connecting to database...');
  return { connected: true };
}";

const MODULES_INDEX_JS: &str = "// Module registry
export { scanFiles } from './fileScanner';";

const FILE_SCANNER_JS: &str = "// Walks a directory and collects file entries
export function scanFiles(entries) {
  const files = [];
  for (const entry of entries) {
    if (entry.isDirectory) {
      files.push(...scanFiles(entry.children));
    } else {
      files.push({ name: entry.name, size: entry.size });
    }
  }
  return files;
}";

const DEFAULT_JSON: &str = "{
  \"port\": 3000,
  \"database\": {
    \"host\": \"localhost\",
    \"port\": 5432
  }
}";

const README_MD: &str = "# Project Overview

This is a sample project for demonstrating the agent workbench.

## Usage

Provide a prompt describing what you want to do with your codebase, and the agent will:
- Analyze your project structure
- Understand the system architecture
- Make appropriate modifications
- Generate new code as needed
- Fix bugs and improve existing code";

/// The project shown before anything has been indexed.
pub fn sample_project() -> DocTree {
    DocTree::from_nodes(vec![
        Node::folder(
            "root-1",
            "src",
            vec![
                Node::file("file-1", "main.js")
                    .with_language("javascript")
                    .with_content(MAIN_JS)
                    .into_ref(),
                Node::file("file-2", "app.js")
                    .with_language("javascript")
                    .with_content(APP_JS)
                    .into_ref(),
                Node::folder(
                    "folder-1",
                    "modules",
                    vec![
                        Node::file("file-3", "index.js")
                            .with_language("javascript")
                            .with_content(MODULES_INDEX_JS)
                            .into_ref(),
                        Node::file("file-4", "fileScanner.js")
                            .with_language("javascript")
                            .with_content(FILE_SCANNER_JS)
                            .into_ref(),
                    ],
                )
                .into_ref(),
                Node::file("file-5", "database.js")
                    .with_language("javascript")
                    .with_content(DATABASE_JS)
                    .into_ref(),
            ],
        )
        .into_ref(),
        Node::folder(
            "root-2",
            "config",
            vec![Node::file("file-6", "default.json")
                .with_language("json")
                .with_content(DEFAULT_JSON)
                .into_ref()],
        )
        .into_ref(),
        Node::file("root-3", "README.md")
            .with_language("markdown")
            .with_content(README_MD)
            .into_ref(),
    ])
}

/// Canned result of a simulated project scan. Identities are namespaced by
/// `run` so repeated scans never collide.
pub fn indexed_project(run: u64) -> Vec<NodeRef> {
    let id = |local: &str| format!("index-{run}-{local}");
    vec![
        Node::folder(
            id("src"),
            "src",
            vec![
                Node::file(id("index-js"), "index.js")
                    .with_content("// Main entry point")
                    .with_language("javascript")
                    .into_ref(),
                Node::file(id("app-js"), "app.js")
                    .with_content("// App configuration")
                    .with_language("javascript")
                    .into_ref(),
            ],
        )
        .into_ref(),
        Node::folder(
            id("public"),
            "public",
            vec![Node::file(id("index-html"), "index.html")
                .with_content("<!DOCTYPE html><html></html>")
                .with_language("html")
                .into_ref()],
        )
        .into_ref(),
    ]
}
