//! Output formatting
//!
//! Renders visible tree rows and task listings for the terminal, and
//! serializes the same data as JSON.

use bugomattic_core::reporting::{LinkOptions, NodeRef, NormalizedConfig, Task, TaskCategory};
use bugomattic_core::{BugomatticError, HighlightMarker, Result, VisibleRow};
use colored::*;
use serde::Serialize;

/// A task flattened for output, with its link resolved
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskEntry {
    pub id: String,
    pub category: TaskCategory,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
}

impl TaskEntry {
    pub fn new(task: &Task, options: &LinkOptions) -> Self {
        Self {
            id: task.id.clone(),
            category: task.category,
            title: task.display_title(),
            instructions: task.instructions.clone(),
            details: task.details.clone(),
            href: task.link.as_ref().map(|link| link.href(options)),
        }
    }
}

/// Everything `bugomattic tasks` reports about one node
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeReport {
    pub node: NodeRef,
    /// Names from the product down to the node
    pub breadcrumb: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub tasks: Vec<TaskEntry>,
    pub learn_more: Vec<LearnMoreEntry>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LearnMoreEntry {
    pub text: String,
    pub href: String,
}

impl NodeReport {
    pub fn new(config: &NormalizedConfig, node: &NodeRef, options: &LinkOptions) -> Self {
        let breadcrumb = config
            .ancestors(node)
            .iter()
            .rev()
            .chain(std::iter::once(node))
            .filter_map(|n| config.name(n).map(str::to_string))
            .collect();

        let tasks = TaskCategory::ALL
            .into_iter()
            .flat_map(|category| config.tasks_for(node, category))
            .map(|task| TaskEntry::new(task, options))
            .collect();

        let learn_more = config
            .learn_more_links(node)
            .iter()
            .map(|link| LearnMoreEntry {
                text: link.display_text(),
                href: link.href(options),
            })
            .collect();

        Self {
            node: node.clone(),
            breadcrumb,
            description: config.description(node).map(str::to_string),
            tasks,
            learn_more,
        }
    }
}

/// Terminal renderer for trees and task listings
pub struct OutputFormatter {
    marker: HighlightMarker,
}

impl OutputFormatter {
    pub fn new(marker: HighlightMarker) -> Self {
        Self { marker }
    }

    /// One line per row, indented by depth
    pub fn render_tree(&self, rows: &[VisibleRow]) -> String {
        let mut out = String::new();
        for row in rows {
            out.push_str(&self.render_row(row));
            out.push('\n');
        }
        out
    }

    fn render_row(&self, row: &VisibleRow) -> String {
        let indent = "  ".repeat(row.depth);
        let glyph = if !row.has_children {
            "•"
        } else if row.is_expanded {
            "▾"
        } else {
            "▸"
        };
        let label = self.marker.render(&row.label);
        let label = if matches!(row.node, NodeRef::Product(_)) {
            label.bold()
        } else {
            label.normal()
        };
        format!(
            "{indent}{} {} {}",
            glyph.dimmed(),
            label,
            format!("({})", row.node.id()).dimmed()
        )
    }

    pub fn print_tree(&self, rows: &[VisibleRow]) {
        print!("{}", self.render_tree(rows));
    }

    pub fn print_report(&self, report: &NodeReport) {
        println!("{}", report.breadcrumb.join(" › ").bold());
        if let Some(description) = &report.description {
            println!("{}", description.dimmed());
        }

        for category in TaskCategory::ALL {
            println!("\n{}", category.label().underline());
            let mut tasks = report
                .tasks
                .iter()
                .filter(|task| task.category == category)
                .peekable();
            if tasks.peek().is_none() {
                println!("  {}", "(none)".dimmed());
            }
            for task in tasks {
                println!("  • {}", task.title);
                if let Some(instructions) = &task.instructions {
                    println!("    {instructions}");
                }
                if let Some(href) = &task.href {
                    println!("    {}", href.blue());
                }
            }
        }

        if !report.learn_more.is_empty() {
            println!("\n{}", "Learn more".underline());
            for link in &report.learn_more {
                println!("  • {}: {}", link.text, link.href.blue());
            }
        }
    }
}

/// Pretty-print any serializable value as JSON
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", to_json(value)?);
    Ok(())
}

pub fn to_json<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value)
        .map_err(|e| BugomatticError::internal_error(format!("Failed to serialize JSON: {e}")))
}
