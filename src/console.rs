// src/console.rs

//! Plain, line-oriented progress messages on stdout.
//!
//! These are printed whether or not the status bar is active, so piped and
//! CI output still shows which config is building and how it ended. Colour
//! is only emitted when stdout is a terminal and `NO_COLOR` is unset.

use std::io::{IsTerminal, Write};

use anstream::{AutoStream, ColorChoice};
use anstyle::{AnsiColor, Color, Style};

use crate::engine::RunSummary;
use crate::types::BuildConfig;

const RULE: &str = "========================================";

#[derive(Debug, Clone, Copy)]
pub struct Theme {
    pub info: Style,
    pub success: Style,
    pub warning: Style,
    pub error: Style,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            info: Style::new().fg_color(Some(Color::Ansi(AnsiColor::BrightBlue))),
            success: Style::new().fg_color(Some(Color::Ansi(AnsiColor::BrightGreen))),
            warning: Style::new().fg_color(Some(Color::Ansi(AnsiColor::BrightYellow))),
            error: Style::new()
                .fg_color(Some(Color::Ansi(AnsiColor::BrightRed)))
                .bold(),
        }
    }
}

pub fn resolve_color_enabled(is_tty: bool) -> bool {
    std::env::var_os("NO_COLOR").is_none() && is_tty
}

pub struct Console {
    out: Box<dyn Write + Send>,
    color_enabled: bool,
    theme: Theme,
}

impl Console {
    pub fn new(out: Box<dyn Write + Send>, color_enabled: bool) -> Self {
        Self {
            out,
            color_enabled,
            theme: Theme::default(),
        }
    }

    pub fn stdout() -> Self {
        let color_enabled = resolve_color_enabled(std::io::stdout().is_terminal());
        let choice = if color_enabled {
            ColorChoice::AlwaysAnsi
        } else {
            ColorChoice::Never
        };
        Self::new(
            Box::new(AutoStream::new(std::io::stdout(), choice)),
            color_enabled,
        )
    }

    fn line(&mut self, style: Style, text: &str) {
        let result = if self.color_enabled {
            writeln!(self.out, "{}{}{}", style.render(), text, style.render_reset())
        } else {
            writeln!(self.out, "{text}")
        };
        // Progress messages are best effort; a closed stdout must not abort a build.
        let _ = result.and_then(|()| self.out.flush());
    }

    pub fn info(&mut self, text: &str) {
        self.line(self.theme.info, text);
    }

    pub fn success(&mut self, text: &str) {
        self.line(self.theme.success, text);
    }

    pub fn warning(&mut self, text: &str) {
        self.line(self.theme.warning, text);
    }

    pub fn error(&mut self, text: &str) {
        self.line(self.theme.error, text);
    }

    pub fn plain(&mut self, text: &str) {
        let _ = writeln!(self.out, "{text}").and_then(|()| self.out.flush());
    }

    /// Header printed before each config.
    pub fn config_banner(
        &mut self,
        index: usize,
        total: usize,
        config: &BuildConfig,
        build_dir: &str,
    ) {
        self.info("");
        self.info(RULE);
        self.info(&format!("[{index}/{total}] Building: {config}"));
        self.info(&format!("Config: {}", config.source_file.display()));
        self.info(&format!("Dir: {build_dir}"));
        self.info(RULE);
    }

    /// Final report.
    pub fn summary(&mut self, summary: &RunSummary) {
        self.plain("");
        self.plain(RULE);
        if summary.interrupted {
            self.warning(&format!(
                "Interrupted after {}/{} configs",
                summary.outcomes.len(),
                summary.total
            ));
        }
        self.plain(&format!(
            "Build Summary: {}/{} Succeeded",
            summary.succeeded(),
            summary.total
        ));
        self.plain(&format!("Artifacts: {}", summary.output_dir.display()));

        let failed = summary.failed_names();
        if !failed.is_empty() {
            self.error(&format!("Failed: {}", failed.join(", ")));
        } else if !summary.interrupted {
            self.success("All builds successful!");
        }
    }
}
