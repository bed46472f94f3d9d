//! The `[jinja]` table: template syntax and output options.
use serde::Deserialize;

/// Template engine options.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields, default)]
pub struct JinjaConfig {
    /// Opening delimiter of statement blocks.
    pub block_start_string: String,
    /// Closing delimiter of statement blocks.
    pub block_end_string: String,
    /// Opening delimiter of expressions.
    pub variable_start_string: String,
    /// Closing delimiter of expressions.
    pub variable_end_string: String,
    /// Opening delimiter of comments.
    pub comment_start_string: String,
    /// Closing delimiter of comments.
    pub comment_end_string: String,
    /// Prefix marking a whole line as a statement.
    pub line_statement_prefix: Option<String>,
    /// Prefix marking the rest of a line as a comment.
    pub line_comment_prefix: Option<String>,
    /// Remove the first newline after a block tag.
    pub trim_blocks: bool,
    /// Strip leading whitespace before a block tag.
    pub lstrip_blocks: bool,
    /// Line ending of the template's own lines in rendered output.
    pub newline_sequence: NewlineSequence,
    /// Keep the template's final newline instead of stripping it.
    pub keep_trailing_newline: bool,
    /// Fixed autoescape policy; `None` selects by file extension.
    pub autoescape: Option<bool>,
    /// Extension-based autoescape policy used when `autoescape` is unset.
    pub select_autoescape: SelectAutoescape,
}

impl Default for JinjaConfig {
    fn default() -> Self {
        Self {
            block_start_string: "{%".to_string(),
            block_end_string: "%}".to_string(),
            variable_start_string: "{{".to_string(),
            variable_end_string: "}}".to_string(),
            comment_start_string: "{#".to_string(),
            comment_end_string: "#}".to_string(),
            line_statement_prefix: None,
            line_comment_prefix: None,
            trim_blocks: false,
            lstrip_blocks: false,
            newline_sequence: NewlineSequence::Lf,
            keep_trailing_newline: false,
            autoescape: None,
            select_autoescape: SelectAutoescape::default(),
        }
    }
}

impl JinjaConfig {
    /// Decide whether output of the template `name` is HTML-escaped.
    #[must_use]
    pub fn autoescape_for(&self, name: &str) -> bool {
        self.autoescape
            .unwrap_or_else(|| self.select_autoescape.select(name))
    }
}

/// Line ending written to rendered files.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub enum NewlineSequence {
    /// `\n`
    #[default]
    #[serde(rename = "\n")]
    Lf,
    /// `\r\n`
    #[serde(rename = "\r\n")]
    CrLf,
    /// `\r`
    #[serde(rename = "\r")]
    Cr,
}

impl NewlineSequence {
    /// The literal line ending.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Lf => "\n",
            Self::CrLf => "\r\n",
            Self::Cr => "\r",
        }
    }

    /// Rewrite every line ending in template source `text` to this sequence.
    ///
    /// Applied when a template is loaded, so line breaks inside substituted
    /// values are left as they are.
    #[must_use]
    pub fn apply(self, text: String) -> String {
        if self == Self::Lf && !text.contains('\r') {
            return text;
        }
        text.replace("\r\n", "\n")
            .replace('\r', "\n")
            .replace('\n', self.as_str())
    }
}

/// Autoescape selection by template file extension.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields, default)]
pub struct SelectAutoescape {
    /// Extensions for which escaping is enabled.
    pub enabled_extensions: Vec<String>,
    /// Extensions for which escaping is disabled.
    pub disabled_extensions: Vec<String>,
    /// Policy for every other template.
    pub default: bool,
}

impl Default for SelectAutoescape {
    fn default() -> Self {
        Self {
            enabled_extensions: vec!["html".to_string(), "htm".to_string(), "xml".to_string()],
            disabled_extensions: Vec::new(),
            default: false,
        }
    }
}

impl SelectAutoescape {
    /// Apply the policy to the template `name` (case-insensitively).
    #[must_use]
    pub fn select(&self, name: &str) -> bool {
        let name = name.to_lowercase();
        let matches = |exts: &[String]| {
            exts.iter()
                .any(|ext| name.ends_with(&format!(".{}", ext.trim_start_matches('.').to_lowercase())))
        };
        if matches(&self.enabled_extensions) {
            true
        } else if matches(&self.disabled_extensions) {
            false
        } else {
            self.default
        }
    }
}
