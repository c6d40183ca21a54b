//! Reporting destinations and supplementary links
//!
//! Both link kinds are sum types. Every consumer (href construction, display
//! text) matches exhaustively, so a new destination type fails to compile
//! until each site handles it.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Default Slack workspace used to build channel links
pub const DEFAULT_SLACK_BASE_URL: &str = "https://a8c.slack.com/channels/";

/// Where a task sends the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type", rename_all = "lowercase", rename_all_fields = "camelCase")]
pub enum TaskLink {
    /// New issue in a GitHub repository
    Github {
        /// `owner/name`
        repository: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        template: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        labels: Option<Vec<String>>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        project_slugs: Option<Vec<String>>,
    },
    /// Slack channel, without the leading `#`
    Slack { channel: String },
    /// P2 blog subdomain on wordpress.com
    P2 { subdomain: String },
    /// Anything else
    General { href: String },
}

/// Reference material shown next to a taxonomy node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type", rename_all = "lowercase", rename_all_fields = "camelCase")]
pub enum LearnMoreLink {
    Slack {
        channel: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        display_text: Option<String>,
    },
    P2 {
        subdomain: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        display_text: Option<String>,
    },
    General {
        href: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        display_text: Option<String>,
    },
}

/// Environment-specific parts of link construction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkOptions {
    /// Prefix a channel name is appended to
    pub slack_base_url: String,
}

impl Default for LinkOptions {
    fn default() -> Self {
        Self {
            slack_base_url: DEFAULT_SLACK_BASE_URL.to_string(),
        }
    }
}

impl LinkOptions {
    fn slack_href(&self, channel: &str) -> String {
        let channel = channel.trim_start_matches('#');
        if self.slack_base_url.ends_with('/') {
            format!("{}{channel}", self.slack_base_url)
        } else {
            format!("{}/{channel}", self.slack_base_url)
        }
    }
}

fn p2_href(subdomain: &str) -> String {
    format!("https://{subdomain}.wordpress.com")
}

impl TaskLink {
    /// Destination URL
    pub fn href(&self, options: &LinkOptions) -> String {
        match self {
            TaskLink::Github {
                repository,
                template,
                labels,
                project_slugs,
            } => github_new_issue_href(
                repository,
                template.as_deref(),
                labels.as_deref().unwrap_or_default(),
                project_slugs.as_deref().unwrap_or_default(),
            ),
            TaskLink::Slack { channel } => options.slack_href(channel),
            TaskLink::P2 { subdomain } => p2_href(subdomain),
            TaskLink::General { href } => href.clone(),
        }
    }

    /// Text for a link whose task has no title
    pub fn default_display_text(&self) -> String {
        match self {
            TaskLink::Github { repository, .. } => format!("Open an issue in {repository}"),
            TaskLink::Slack { channel } => format!("#{}", channel.trim_start_matches('#')),
            TaskLink::P2 { subdomain } => format!("+{subdomain}"),
            TaskLink::General { href } => href.clone(),
        }
    }

    /// Short destination type name
    pub fn kind(&self) -> &'static str {
        match self {
            TaskLink::Github { .. } => "github",
            TaskLink::Slack { .. } => "slack",
            TaskLink::P2 { .. } => "p2",
            TaskLink::General { .. } => "general",
        }
    }
}

impl LearnMoreLink {
    pub fn href(&self, options: &LinkOptions) -> String {
        match self {
            LearnMoreLink::Slack { channel, .. } => options.slack_href(channel),
            LearnMoreLink::P2 { subdomain, .. } => p2_href(subdomain),
            LearnMoreLink::General { href, .. } => href.clone(),
        }
    }

    /// Explicit display text, or one derived from the destination
    pub fn display_text(&self) -> String {
        match self {
            LearnMoreLink::Slack {
                display_text: Some(text),
                ..
            }
            | LearnMoreLink::P2 {
                display_text: Some(text),
                ..
            }
            | LearnMoreLink::General {
                display_text: Some(text),
                ..
            } => text.clone(),
            LearnMoreLink::Slack {
                channel,
                display_text: None,
            } => format!("#{}", channel.trim_start_matches('#')),
            LearnMoreLink::P2 {
                subdomain,
                display_text: None,
            } => format!("+{subdomain}"),
            LearnMoreLink::General {
                href,
                display_text: None,
            } => href.clone(),
        }
    }
}

/// `https://github.com/<repo>/issues/new` with the optional query parameters
/// GitHub understands for issue forms.
fn github_new_issue_href(
    repository: &str,
    template: Option<&str>,
    labels: &[String],
    project_slugs: &[String],
) -> String {
    let base = format!("https://github.com/{repository}/issues/new");

    let mut query = url::form_urlencoded::Serializer::new(String::new());
    if let Some(template) = template {
        query.append_pair("template", template);
    }
    if !labels.is_empty() {
        query.append_pair("labels", &labels.join(","));
    }
    if !project_slugs.is_empty() {
        let owner = repository.split('/').next().unwrap_or(repository);
        let projects: Vec<String> = project_slugs
            .iter()
            .map(|slug| format!("{owner}/{slug}"))
            .collect();
        query.append_pair("projects", &projects.join(","));
    }

    let query = query.finish();
    if query.is_empty() {
        base
    } else {
        format!("{base}?{query}")
    }
}
