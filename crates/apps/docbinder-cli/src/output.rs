//! Output formatting for CLI.

use colored::Colorize;
use serde::Serialize;

/// Output format for CLI commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable output.
    #[default]
    Human,
    /// JSON output.
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "human" | "text" => Ok(Self::Human),
            "json" => Ok(Self::Json),
            _ => Err(format!("Unknown format: {}. Use 'human' or 'json'.", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Human => write!(f, "human"),
            Self::Json => write!(f, "json"),
        }
    }
}

/// Trait for renderable output.
pub trait Render {
    /// Render as human-readable string.
    fn render_human(&self) -> String;

    /// Render as JSON string.
    fn render_json(&self) -> String;

    /// Render in the specified format.
    fn render(&self, format: OutputFormat) -> String {
        match format {
            OutputFormat::Human => self.render_human(),
            OutputFormat::Json => self.render_json(),
        }
    }
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "yes"
    } else {
        "no"
    }
}

// =============================================================================
// Setup
// =============================================================================

/// Output for `init`.
#[derive(Debug, Serialize)]
pub struct InitOutput {
    pub base_dir: String,
    pub config_path: String,
    pub database: String,
    pub index_dir: String,
}

impl Render for InitOutput {
    fn render_human(&self) -> String {
        format!(
            "{} {}\n{} {}\n{} {}",
            "Initialized:".green().bold(),
            self.base_dir,
            "Configuration saved to:".green(),
            self.config_path,
            "Search index:".bold(),
            self.index_dir
        )
    }

    fn render_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}

/// Output for `user add`.
#[derive(Debug, Serialize)]
pub struct UserOutput {
    pub id: i64,
    pub username: String,
    pub full_name: String,
    pub email: String,
    pub superuser: bool,
    pub permissions: Vec<String>,
    pub groups: Vec<String>,
    pub program: Option<String>,
}

impl Render for UserOutput {
    fn render_human(&self) -> String {
        let mut lines = vec![
            format!("{} {} (#{})", "User added:".green().bold(), self.username, self.id),
            format!("{} {}", "Name:".bold(), self.full_name),
            format!("{} {}", "Email:".bold(), self.email),
        ];
        if self.superuser {
            lines.push(format!("{} {}", "Superuser:".bold(), "yes".yellow()));
        }
        lines.push(format!(
            "{} {}",
            "Permissions:".bold(),
            if self.permissions.is_empty() {
                "none".dimmed().to_string()
            } else {
                self.permissions.join(", ")
            }
        ));
        if !self.groups.is_empty() {
            lines.push(format!("{} {}", "Groups:".bold(), self.groups.join(", ")));
        }
        if let Some(program) = &self.program {
            lines.push(format!("{} {}", "Program:".bold(), program));
        }
        lines.join("\n")
    }

    fn render_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}

/// Output for `program add` and `type add`.
#[derive(Debug, Serialize)]
pub struct NamedOutput {
    pub kind: &'static str,
    pub id: i64,
    pub name: String,
}

impl Render for NamedOutput {
    fn render_human(&self) -> String {
        format!(
            "{} {} (#{})",
            format!("Added {}:", self.kind).green().bold(),
            self.name,
            self.id
        )
    }

    fn render_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}

// =============================================================================
// Documents
// =============================================================================

/// A document with its references resolved to names.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentOutput {
    pub id: i64,
    pub title: String,
    pub document_type: String,
    pub programs: Vec<String>,
    pub file: Option<String>,
    pub hyperlink: Option<String>,
    pub notes: String,
    pub authors: String,
    pub uploader: Option<String>,
    pub created: String,
    pub confidential: bool,
    pub deleted: bool,
    pub url: String,
}

impl DocumentOutput {
    fn detail_lines(&self) -> Vec<String> {
        let mut lines = vec![
            format!("{} {}", "Type:".bold(), self.document_type),
            format!(
                "{} {}",
                "Programs:".bold(),
                if self.programs.is_empty() {
                    "none".dimmed().to_string()
                } else {
                    self.programs.join(", ")
                }
            ),
        ];
        if let Some(file) = &self.file {
            lines.push(format!("{} {}", "File:".bold(), file));
        }
        if let Some(link) = &self.hyperlink {
            lines.push(format!("{} {}", "Link:".bold(), link));
        }
        lines.push(format!("{} {}", "Authors:".bold(), self.authors));
        if let Some(uploader) = &self.uploader {
            lines.push(format!("{} {}", "Uploaded by:".bold(), uploader));
        }
        lines.push(format!("{} {}", "Created:".bold(), self.created));
        lines.push(format!("{} {}", "Confidential:".bold(), yes_no(self.confidential)));
        if self.deleted {
            lines.push(format!("{} {}", "Deleted:".bold(), "yes".red()));
        }
        if !self.notes.is_empty() {
            lines.push(format!("{}\n  {}", "Notes:".bold(), self.notes.replace('\n', "\n  ")));
        }
        lines.push(format!("{} {}", "URL:".bold(), self.url.dimmed()));
        lines
    }
}

impl Render for DocumentOutput {
    fn render_human(&self) -> String {
        let mut lines = vec![format!("{} \"{}\"", format!("#{}", self.id).bold(), self.title)];
        lines.extend(self.detail_lines());
        lines.join("\n")
    }

    fn render_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}

/// What a saving command did to a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SaveAction {
    Uploaded,
    Updated,
    Deleted,
}

impl SaveAction {
    fn label(self) -> &'static str {
        match self {
            Self::Uploaded => "Uploaded:",
            Self::Updated => "Updated:",
            Self::Deleted => "Deleted:",
        }
    }
}

/// Output for `upload`, `edit` and `delete --yes`.
#[derive(Debug, Serialize)]
pub struct SaveOutput {
    pub action: SaveAction,
    pub document: DocumentOutput,
}

impl Render for SaveOutput {
    fn render_human(&self) -> String {
        let mut lines = vec![format!(
            "{} \"{}\" (#{})",
            self.action.label().green().bold(),
            self.document.title,
            self.document.id
        )];
        lines.extend(self.document.detail_lines());
        lines.join("\n")
    }

    fn render_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}

/// Output for `delete` without `--yes`: what would be deleted.
#[derive(Debug, Serialize)]
pub struct DeletePreviewOutput {
    pub confirm_required: bool,
    pub document: DocumentOutput,
}

impl Render for DeletePreviewOutput {
    fn render_human(&self) -> String {
        let mut lines = vec![format!(
            "{} \"{}\" (#{})",
            "About to delete:".yellow().bold(),
            self.document.title,
            self.document.id
        )];
        lines.extend(self.document.detail_lines());
        lines.push(String::new());
        lines.push(format!(
            "{}",
            format!("Run 'docbinder delete {} --yes' to confirm.", self.document.id).dimmed()
        ));
        lines.join("\n")
    }

    fn render_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}

/// One row of `list`.
#[derive(Debug, Serialize)]
pub struct DocumentRow {
    pub id: i64,
    pub title: String,
    pub document_type: String,
    pub created: String,
    pub has_file: bool,
    pub deleted: bool,
}

/// Output for `list`.
#[derive(Debug, Serialize)]
pub struct ListOutput {
    pub documents: Vec<DocumentRow>,
    pub total: usize,
}

impl Render for ListOutput {
    fn render_human(&self) -> String {
        if self.documents.is_empty() {
            return "No documents found.".dimmed().to_string();
        }

        let mut lines = vec![format!("{} ({})", "Documents".bold(), self.total)];
        for doc in &self.documents {
            let marker = if doc.has_file { "file" } else { "link" };
            let mut line = format!(
                "  {} \"{}\" {} {} {}",
                format!("#{}", doc.id).bold(),
                doc.title,
                doc.document_type.cyan(),
                marker.dimmed(),
                doc.created.dimmed()
            );
            if doc.deleted {
                line.push_str(&format!(" {}", "[deleted]".red()));
            }
            lines.push(line);
        }
        lines.join("\n")
    }

    fn render_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}

/// One search hit.
#[derive(Debug, Serialize)]
pub struct HitOutput {
    pub id: i64,
    pub title: String,
    pub score: f32,
    pub deleted: bool,
}

/// Output for `search`.
#[derive(Debug, Serialize)]
pub struct SearchOutput {
    pub query: String,
    pub hits: Vec<HitOutput>,
}

impl Render for SearchOutput {
    fn render_human(&self) -> String {
        if self.hits.is_empty() {
            return format!("{} \"{}\"", "No matches for".dimmed(), self.query);
        }

        let mut lines = vec![format!(
            "{} {} for \"{}\"",
            self.hits.len().to_string().bold(),
            if self.hits.len() == 1 { "match" } else { "matches" },
            self.query
        )];
        for hit in &self.hits {
            let mut line = format!(
                "  {} \"{}\" {}",
                format!("#{}", hit.id).bold(),
                hit.title,
                format!("({:.2})", hit.score).dimmed()
            );
            if hit.deleted {
                line.push_str(&format!(" {}", "[deleted]".red()));
            }
            lines.push(line);
        }
        lines.join("\n")
    }

    fn render_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}

/// Output for `reindex`.
#[derive(Debug, Serialize)]
pub struct ReindexOutput {
    pub indexed: usize,
    pub elapsed_ms: u128,
}

impl Render for ReindexOutput {
    fn render_human(&self) -> String {
        format!(
            "{} {} documents in {} ms",
            "Reindexed:".green().bold(),
            self.indexed,
            self.elapsed_ms
        )
    }

    fn render_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}
