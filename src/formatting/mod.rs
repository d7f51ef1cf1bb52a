use crate::scoring::HexColor;
use colored::*;
use std::env;
use std::io::IsTerminal;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorMode {
    Auto,   // Detect based on terminal
    Always, // Force colors on
    Never,  // Force colors off
}

impl ColorMode {
    pub fn should_use_color(&self) -> bool {
        match self {
            Self::Always => true,
            Self::Never => false,
            Self::Auto => detect_color_support(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormattingConfig {
    pub color: ColorMode,
}

impl Default for FormattingConfig {
    fn default() -> Self {
        Self {
            color: ColorMode::Auto,
        }
    }
}

impl FormattingConfig {
    pub fn from_env() -> Self {
        let mut config = Self::default();

        // no-color.org
        if env::var("NO_COLOR").is_ok() {
            config.color = ColorMode::Never;
        }

        if let Ok(val) = env::var("CLICOLOR") {
            if val == "0" {
                config.color = ColorMode::Never;
            }
        }

        if let Ok(val) = env::var("CLICOLOR_FORCE") {
            if val == "1" {
                config.color = ColorMode::Always;
            }
        }

        config
    }

    /// Environment defaults, narrowed by `--plain` and the `[display]` table.
    ///
    /// Either switch can only turn colour off; `CLICOLOR_FORCE` is still
    /// respected when neither does.
    pub fn resolve(plain: bool, config_color: Option<bool>) -> Self {
        if plain || config_color == Some(false) {
            Self::plain()
        } else {
            Self::from_env()
        }
    }

    /// No colours or background fills.
    pub fn plain() -> Self {
        Self {
            color: ColorMode::Never,
        }
    }

    pub fn use_color(&self) -> bool {
        self.color.should_use_color()
    }

    /// Make `colored` follow this configuration for the rest of the process.
    pub fn apply(&self) {
        colored::control::set_override(self.use_color());
    }

    pub fn header(&self, text: &str) -> String {
        if self.use_color() {
            text.blue().bold().to_string()
        } else {
            text.to_string()
        }
    }

    pub fn bold(&self, text: &str) -> String {
        if self.use_color() {
            text.bold().to_string()
        } else {
            text.to_string()
        }
    }

    pub fn dim(&self, text: &str) -> String {
        if self.use_color() {
            text.dimmed().to_string()
        } else {
            text.to_string()
        }
    }

    /// Dark text on a hex background, as the matrix and score badges use.
    pub fn fill(&self, text: &str, color: HexColor) -> String {
        if self.use_color() {
            let (r, g, b) = color.rgb();
            text.truecolor(0, 0, 0).on_truecolor(r, g, b).to_string()
        } else {
            text.to_string()
        }
    }
}

fn detect_color_support() -> bool {
    if let Ok(term) = env::var("TERM") {
        if term == "dumb" {
            return false;
        }
    }

    std::io::stdout().is_terminal()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_never_colors() {
        let config = FormattingConfig::plain();
        assert!(!config.use_color());
        assert_eq!(config.fill("High", HexColor::new("#f7d4a3")), "High");
        assert_eq!(config.header("Matrix"), "Matrix");
    }

    #[test]
    fn test_resolve_plain_wins() {
        assert_eq!(FormattingConfig::resolve(true, Some(true)), FormattingConfig::plain());
        assert_eq!(FormattingConfig::resolve(false, Some(false)), FormattingConfig::plain());
    }
}
