use std::io::{BufRead, Write};
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::parse::Parser;
use crate::session::{Interpreter, PromptSource};

/// Embedded default configuration.
const DEFAULT_CONFIG: &str = include_str!("../config.default.toml");

/// Location of the optional user overlay.
const USER_CONFIG: &str = "~/.config/shnake/config.toml";

// ── Final (merged) config types ──

#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub prompt: PromptConfig,
    #[serde(default)]
    pub parser: ParserConfig,
    #[serde(default)]
    pub log: LogConfig,
}

/// Interactive prompts (PS1/PS2).
#[derive(Debug, Deserialize, Serialize, Default)]
pub struct PromptConfig {
    #[serde(default)]
    pub primary: String,
    #[serde(default)]
    pub secondary: String,
}

#[derive(Debug, Deserialize, Serialize, Default)]
pub struct ParserConfig {
    /// Accept redirectors; `false` selects the plain command-list grammar.
    #[serde(default)]
    pub redirectors: bool,
}

#[derive(Debug, Deserialize, Serialize, Default)]
pub struct LogConfig {
    #[serde(default)]
    pub level: String,
    /// Log file path (`~` allowed). Empty means stderr.
    #[serde(default)]
    pub file: String,
}

// ── Overlay types (user config that merges with defaults) ──

#[derive(Debug, Deserialize, Default)]
struct ConfigOverlay {
    #[serde(default)]
    prompt: PromptOverlay,
    #[serde(default)]
    parser: ParserOverlay,
    #[serde(default)]
    log: LogOverlay,
}

#[derive(Debug, Deserialize, Default)]
struct PromptOverlay {
    primary: Option<String>,
    secondary: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct ParserOverlay {
    redirectors: Option<bool>,
}

#[derive(Debug, Deserialize, Default)]
struct LogOverlay {
    level: Option<String>,
    file: Option<String>,
}

/// Expand a leading `~` in a configured path.
pub fn expand_path(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).as_ref())
}

impl Config {
    /// Load the default embedded configuration.
    pub fn default_config() -> Self {
        toml::from_str(DEFAULT_CONFIG).expect("embedded default config must parse")
    }

    /// Load configuration with resolution order:
    /// 1. Start with embedded defaults
    /// 2. Merge user overlay from ~/.config/shnake/config.toml (if exists)
    ///
    /// Every key the user file sets overrides the default; omitted keys keep it.
    pub fn load() -> Self {
        let mut config = Self::default_config();
        if let Some(overlay) = Self::load_overlay() {
            config.apply_overlay(overlay);
        }
        config
    }

    /// Try to load the user overlay.
    fn load_overlay() -> Option<ConfigOverlay> {
        let content = std::fs::read_to_string(expand_path(USER_CONFIG)).ok()?;
        match toml::from_str(&content) {
            Ok(overlay) => Some(overlay),
            Err(e) => {
                eprintln!("shnake: config parse error: {e}");
                None
            }
        }
    }

    /// Apply an overlay on top of this config (scalars override).
    fn apply_overlay(&mut self, overlay: ConfigOverlay) {
        let p = overlay.prompt;
        if let Some(v) = p.primary {
            self.prompt.primary = v;
        }
        if let Some(v) = p.secondary {
            self.prompt.secondary = v;
        }

        if let Some(v) = overlay.parser.redirectors {
            self.parser.redirectors = v;
        }

        let l = overlay.log;
        if let Some(v) = l.level {
            self.log.level = v;
        }
        if let Some(v) = l.file {
            self.log.file = v;
        }
    }

    /// The grammar this configuration selects.
    pub fn parser(&self) -> Parser {
        Parser::new().with_redirectors(self.parser.redirectors)
    }

    pub fn interpreter(&self) -> Interpreter {
        Interpreter::new(self.parser())
    }

    /// An interactive line source using the configured prompts.
    pub fn prompt_source<R: BufRead, W: Write>(&self, reader: R, writer: W) -> PromptSource<R, W> {
        PromptSource::new(reader, writer)
            .with_prompts(self.prompt.primary.clone(), self.prompt.secondary.clone())
    }

    /// Apply an overlay from a TOML string. Used for testing.
    #[cfg(test)]
    fn apply_overlay_str(&mut self, toml_str: &str) {
        let overlay: ConfigOverlay = toml::from_str(toml_str).unwrap();
        self.apply_overlay(overlay);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_parses() {
        let config = Config::default_config();
        assert_eq!(config.prompt.primary, "$ ");
        assert_eq!(config.prompt.secondary, "> ");
        assert!(config.parser.redirectors);
        assert_eq!(config.log.level, "warn");
        assert!(config.log.file.is_empty());
    }

    #[test]
    fn default_parser_has_redirectors() {
        assert!(Config::default_config().parser().redirectors());
    }

    #[test]
    fn overlay_overrides_prompt() {
        let mut config = Config::default_config();
        config.apply_overlay_str(
            r#"
            [prompt]
            primary = "phpsploit > "
        "#,
        );
        assert_eq!(config.prompt.primary, "phpsploit > ");
        // untouched key keeps its default
        assert_eq!(config.prompt.secondary, "> ");
    }

    #[test]
    fn overlay_disables_redirectors() {
        let mut config = Config::default_config();
        config.apply_overlay_str(
            r#"
            [parser]
            redirectors = false
        "#,
        );
        assert!(!config.parser().redirectors());
    }

    #[test]
    fn overlay_unrelated_sections_untouched() {
        let mut config = Config::default_config();
        config.apply_overlay_str(
            r#"
            [log]
            level = "debug"
            file = "~/shnake.log"
        "#,
        );
        assert_eq!(config.log.level, "debug");
        assert_eq!(config.log.file, "~/shnake.log");
        assert!(config.parser.redirectors);
        assert_eq!(config.prompt.primary, "$ ");
    }

    #[test]
    fn empty_overlay_changes_nothing() {
        let mut config = Config::default_config();
        config.apply_overlay_str("");
        assert_eq!(config.prompt.primary, "$ ");
        assert!(config.parser.redirectors);
    }

    #[test]
    fn prompt_source_uses_configured_prompts() {
        let mut config = Config::default_config();
        config.apply_overlay_str(
            r#"
            [prompt]
            primary = "% "
        "#,
        );
        let src = config.prompt_source(std::io::Cursor::new(""), Vec::new());
        assert_eq!(src.primary(), "% ");
        assert_eq!(src.secondary(), "> ");
    }

    #[test]
    fn expand_path_keeps_absolute_paths() {
        assert_eq!(expand_path("/var/log/x"), PathBuf::from("/var/log/x"));
    }
}
