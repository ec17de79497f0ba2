use std::io::Write;

use beni::{EmitError, Emitter, RunMetrics, TokenKind};

mod ansi {
    pub const RESET: &str = "\x1b[0m";
    pub const DIM: &str = "\x1b[2m";
    pub const BOLD: &str = "\x1b[1m";

    pub const RED: &str = "\x1b[31m";
    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const BLUE: &str = "\x1b[34m";
    pub const MAGENTA: &str = "\x1b[35m";
    pub const CYAN: &str = "\x1b[36m";
    pub const GRAY: &str = "\x1b[90m";

    /// Wraps text in an SGR code, or leaves it alone when colour is off.
    #[derive(Clone, Copy)]
    pub struct Palette(pub bool);

    impl Palette {
        pub fn paint(self, s: impl AsRef<str>, style: &str) -> String {
            if self.0 { format!("{style}{}{RESET}", s.as_ref()) } else { s.as_ref().to_string() }
        }
    }
}

fn kind_color(kind: TokenKind) -> &'static str {
    if kind.is_a(TokenKind::Keyword) {
        ansi::BLUE
    } else if kind.is_a(TokenKind::Name) {
        ansi::CYAN
    } else if kind.is_a(TokenKind::LiteralString) {
        ansi::GREEN
    } else if kind.is_a(TokenKind::Literal) {
        ansi::MAGENTA
    } else if kind.is_a(TokenKind::Comment) {
        ansi::GRAY
    } else if kind == TokenKind::Error {
        ansi::RED
    } else {
        ansi::YELLOW
    }
}

/// Prints each token as `=== Kind: "text"`.
pub struct Printer<W: Write> {
    out: W,
    palette: ansi::Palette,
}

impl<W: Write> Printer<W> {
    pub fn new(out: W, color: bool) -> Self {
        Self { out, palette: ansi::Palette(color) }
    }

    pub fn header(&mut self, name: &str) -> std::io::Result<()> {
        writeln!(self.out, "{}", self.palette.paint(name, ansi::BOLD))
    }

    pub fn metrics(&mut self, metrics: &RunMetrics) -> std::io::Result<()> {
        let p = self.palette;
        writeln!(
            self.out,
            "{} {} tokens  {} {} steps  {} {} delegations (depth {})  {} {} fallbacks  {} {:?}",
            p.paint("│", ansi::DIM),
            p.paint(metrics.tokens.to_string(), ansi::GREEN),
            p.paint("│", ansi::DIM),
            p.paint(metrics.steps.to_string(), ansi::BLUE),
            p.paint("│", ansi::DIM),
            p.paint(metrics.delegations.to_string(), ansi::CYAN),
            metrics.max_depth,
            p.paint("│", ansi::DIM),
            p.paint(metrics.fallbacks.to_string(), if metrics.fallbacks > 0 { ansi::RED } else { ansi::GRAY }),
            p.paint("│", ansi::DIM),
            metrics.elapsed,
        )
    }

    pub fn flush(&mut self) -> std::io::Result<()> {
        self.out.flush()
    }
}

impl<W: Write> Emitter for Printer<W> {
    fn emit(&mut self, kind: TokenKind, text: &str) -> Result<(), EmitError> {
        let label = self.palette.paint(kind.name(), kind_color(kind));
        writeln!(self.out, "=== {label}: {text:?}").map_err(EmitError::new)
    }
}
