//! CLI command implementations
//!
//! Commands that work on a reporting config live in this file. The
//! `config` subcommands are in `commands/config.rs`.

pub mod config;

use bugomattic_core::reporting::{NodeRef, NormalizedConfig, RawConfig, normalize};
use bugomattic_core::{
    BoundedCache, BugomatticError, BugomatticToolConfig, CacheConfiguration, ConfigLoader,
    HighlightMarker, Result, TriageSession,
};
use serde::Serialize;
use std::io::{self, BufRead};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

use crate::output::{NodeReport, OutputFormatter, print_json};
use crate::{DataFormat, OutputFormat};

/// Global options shared by every command
pub struct Context {
    config_path: Option<PathBuf>,
    use_colors: bool,
}

impl Context {
    pub fn new(config_path: Option<PathBuf>, use_colors: bool) -> Self {
        Self {
            config_path,
            use_colors,
        }
    }

    /// Load the tool config file and layer `overrides` on top of it
    pub fn tool_config(&self, overrides: BugomatticToolConfig) -> Result<BugomatticToolConfig> {
        let file_config = ConfigLoader::load(self.config_path.as_deref(), None)?;
        let mut config = overrides;
        config.merge_with(file_config);
        Ok(config)
    }

    /// Markers used when the config file does not set any
    pub fn default_marker(&self) -> HighlightMarker {
        if self.use_colors {
            HighlightMarker::ansi()
        } else {
            HighlightMarker::brackets()
        }
    }

    fn formatter(&self, tool: &BugomatticToolConfig) -> OutputFormatter {
        OutputFormatter::new(tool.highlight_marker(self.default_marker()))
    }
}

fn with_file(file: Option<PathBuf>) -> BugomatticToolConfig {
    BugomatticToolConfig {
        reporting_config: file,
        ..Default::default()
    }
}

fn reporting_path(tool: &BugomatticToolConfig) -> Result<&Path> {
    tool.reporting_config.as_deref().ok_or_else(|| {
        BugomatticError::config_error(
            "No reporting config given. Pass a file or set 'reportingConfig' in .bugomatticrc.json",
        )
    })
}

/// Read, validate, and normalize a reporting config
fn load_snapshot(path: &Path) -> Result<Arc<NormalizedConfig>> {
    let start = Instant::now();
    let raw = RawConfig::from_path(path)?;
    let config = normalize(&raw)?;
    let stats = config.stats();
    info!(
        "Loaded {} ({} products, {} features, {} tasks) in {:?}",
        path.display(),
        stats.products,
        stats.features,
        stats.tasks,
        start.elapsed()
    );
    Ok(Arc::new(config))
}

fn resolve_node(config: &NormalizedConfig, id: &str) -> Result<NodeRef> {
    config
        .resolve(id)
        .ok_or_else(|| BugomatticError::unknown_node(id))
}

/// Normalize command implementation
pub fn normalize_command(ctx: &Context, file: Option<PathBuf>, format: DataFormat) -> Result<()> {
    let tool = ctx.tool_config(with_file(file))?;
    let config = load_snapshot(reporting_path(&tool)?)?;

    match format {
        DataFormat::Json => print_json(config.as_ref()),
        DataFormat::Yaml => {
            let yaml = serde_yaml::to_string(config.as_ref()).map_err(|e| {
                BugomatticError::internal_error(format!("Failed to serialize YAML: {e}"))
            })?;
            print!("{yaml}");
            Ok(())
        }
    }
}

/// Validate command implementation
pub fn validate_command(ctx: &Context, file: Option<PathBuf>) -> Result<()> {
    let tool = ctx.tool_config(with_file(file))?;
    let path = reporting_path(&tool)?;
    debug!("Validating reporting config: {}", path.display());

    let config = load_snapshot(path)?;
    let stats = config.stats();
    println!("✅ Reporting config is valid");
    println!("   Products: {}", stats.products);
    println!("   Feature groups: {}", stats.feature_groups);
    println!("   Features: {}", stats.features);
    println!("   Tasks: {}", stats.tasks);
    Ok(())
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SearchOutput<'a> {
    results: &'a bugomattic_core::SearchResults,
    rows: Vec<bugomattic_core::VisibleRow>,
}

/// Search command implementation
pub fn search_command(
    ctx: &Context,
    file: Option<PathBuf>,
    term: String,
    format: OutputFormat,
) -> Result<()> {
    let tool = ctx.tool_config(with_file(file))?;
    let config = load_snapshot(reporting_path(&tool)?)?;

    let mut session = TriageSession::new(config);
    session.set_search_term(&term);

    match format {
        OutputFormat::Json => print_json(&SearchOutput {
            results: session.results(),
            rows: session.visible_tree(),
        }),
        OutputFormat::Human => {
            if session.results().is_empty() {
                println!("No features match '{term}'");
                return Ok(());
            }
            ctx.formatter(&tool).print_tree(&session.visible_tree());
            println!(
                "\n{} feature(s) match '{term}'",
                session.results().features.len()
            );
            Ok(())
        }
    }
}

/// Tree command implementation
pub fn tree_command(
    ctx: &Context,
    file: Option<PathBuf>,
    expand: Vec<String>,
    all: bool,
    search: Option<String>,
) -> Result<()> {
    let tool = ctx.tool_config(with_file(file))?;
    let config = load_snapshot(reporting_path(&tool)?)?;

    let mut session = TriageSession::new(Arc::clone(&config));
    // Changing the term collapses everything, so it goes first
    if let Some(term) = &search {
        session.set_search_term(term);
    }

    if all {
        let branches = config
            .products
            .keys()
            .cloned()
            .map(NodeRef::Product)
            .chain(config.feature_groups.keys().cloned().map(NodeRef::FeatureGroup));
        for node in branches {
            session.expand(&node);
        }
    }
    for id in &expand {
        let node = resolve_node(&config, id)?;
        session.expand(&node);
    }

    ctx.formatter(&tool).print_tree(&session.visible_tree());
    Ok(())
}

/// Tasks command implementation
pub fn tasks_command(
    ctx: &Context,
    file: Option<PathBuf>,
    node_id: String,
    format: OutputFormat,
) -> Result<()> {
    let tool = ctx.tool_config(with_file(file))?;
    let config = load_snapshot(reporting_path(&tool)?)?;

    let node = resolve_node(&config, &node_id)?;
    let report = NodeReport::new(&config, &node, &tool.link_options());

    match format {
        OutputFormat::Json => print_json(&report),
        OutputFormat::Human => {
            ctx.formatter(&tool).print_report(&report);
            Ok(())
        }
    }
}

/// Interactive command implementation
///
/// Each stdin line is a search term; an empty line clears the search.
/// Rendered trees are kept in a bounded cache keyed by term.
pub fn interactive_command(
    ctx: &Context,
    file: Option<PathBuf>,
    cache_size: Option<usize>,
) -> Result<()> {
    let overrides = BugomatticToolConfig {
        reporting_config: file,
        cache: cache_size.map(|max_entries| CacheConfiguration {
            max_entries: Some(max_entries),
        }),
        ..Default::default()
    };
    let tool = ctx.tool_config(overrides)?;
    let config = load_snapshot(reporting_path(&tool)?)?;
    let formatter = ctx.formatter(&tool);

    let mut session = TriageSession::new(config);
    let mut cache: BoundedCache<String, String> = BoundedCache::new(tool.cache_max_entries());

    for line in io::stdin().lock().lines() {
        let line = line?;
        let term = line.trim();

        let rendered = cache.get_or_insert_with(term.to_string(), || {
            session.set_search_term(term);
            let rows = session.visible_tree();
            if session.results().is_active() && session.results().is_empty() {
                format!("No features match '{term}'\n")
            } else {
                formatter.render_tree(&rows)
            }
        });

        println!("> {term}");
        print!("{rendered}");
    }

    let stats = cache.stats();
    debug!(
        "Response cache: {} hits, {} misses, {}/{} entries",
        stats.hits, stats.misses, stats.entries, stats.max_entries
    );
    Ok(())
}

/// Schema command implementation
pub fn schema_command(tool: bool) -> Result<()> {
    let schema = if tool {
        BugomatticToolConfig::json_schema()
    } else {
        RawConfig::json_schema()
    };
    print_json(&schema)
}
