// Console narration for the reset run
//
// Progress lines go to stdout for the operator; diagnostics go through
// tracing (stderr). Output is best-effort: a closed stdout never aborts a run.

use std::fmt::Display;
use std::io::{self, Stdout, Write};

use super::constants::{
    ICON_DONE, ICON_FAIL, ICON_OK, ICON_PROGRESS, ICON_START, ICON_STEPS, ICON_TALLY,
    REMEDIATION_STEPS,
};

const RULE_WIDTH: usize = 40;

/// Line-oriented writer prefixing messages with status icons
pub struct Console<W: Write> {
    out: W,
}

impl Console<Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> Console<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }

    /// Write a raw line
    pub fn line(&mut self, text: impl Display) {
        let _ = writeln!(self.out, "{}", text);
    }

    pub fn blank(&mut self) {
        let _ = writeln!(self.out);
    }

    pub fn banner(&mut self, title: impl Display) {
        self.line(format_args!("{} {}", ICON_START, title));
        self.line("=".repeat(RULE_WIDTH));
    }

    pub fn progress(&mut self, text: impl Display) {
        self.line(format_args!("{} {}", ICON_PROGRESS, text));
    }

    pub fn ok(&mut self, text: impl Display) {
        self.line(format_args!("{} {}", ICON_OK, text));
    }

    pub fn fail(&mut self, text: impl Display) {
        self.line(format_args!("{} {}", ICON_FAIL, text));
    }

    pub fn tally(&mut self, text: impl Display) {
        self.line(format_args!("{} {}", ICON_TALLY, text));
    }

    /// Static guidance shown when nothing could be reset
    pub fn remediation(&mut self) {
        self.line(format_args!("{} Next steps:", ICON_STEPS));
        for (i, step) in REMEDIATION_STEPS.iter().enumerate() {
            self.line(format_args!("{}. {}", i + 1, step));
        }
    }

    pub fn done(&mut self, text: impl Display) {
        self.line(format_args!("{} {}", ICON_DONE, text));
    }

    pub fn flush(&mut self) {
        let _ = self.out.flush();
    }
}
