//! Theme system for human-mode output.

use console::Style;

use crate::content::FormatKind;

/// Visual theme for snip's human-mode output.
///
/// Centralizes colors and styles for consistent rendering.
#[derive(Debug, Clone)]
pub struct SnipTheme {
    // Status colors
    pub accent: Style,
    pub success: Style,
    pub error: Style,
    pub warning: Style,
    pub muted: Style,

    // Component styles
    pub header: Style,
    pub label: Style,
    pub value: Style,
    pub name: Style,
    pub command: Style,

    // Kind badges
    pub text: Style,
    pub file_list: Style,
    pub image: Style,
    pub audio: Style,
}

impl Default for SnipTheme {
    fn default() -> Self {
        Self {
            accent: Style::new().blue(),
            success: Style::new().green().bold(),
            error: Style::new().red().bold(),
            warning: Style::new().yellow().bold(),
            muted: Style::new().dim(),
            header: Style::new().bold().underlined(),
            label: Style::new().dim(),
            value: Style::new().bold(),
            name: Style::new().cyan().bold(),
            command: Style::new().green(),
            text: Style::new().green(),
            file_list: Style::new().blue(),
            image: Style::new().magenta(),
            audio: Style::new().yellow(),
        }
    }
}

impl SnipTheme {
    /// Style for a content kind badge.
    pub fn kind(&self, kind: FormatKind) -> Style {
        match kind {
            FormatKind::Text => self.text.clone(),
            FormatKind::FileList => self.file_list.clone(),
            FormatKind::Image => self.image.clone(),
            FormatKind::Audio => self.audio.clone(),
        }
    }
}
