//! The interactive surface: one text box, one "Check News" action, one output region.
//!
//! [`NewsChecker`] owns the predictor for the lifetime of the process and runs one
//! submission cycle per call to [`NewsChecker::check`]. Each cycle ends in exactly one
//! [`Outcome`]; nothing carries over to the next one.

use std::fmt;
use std::io::{self, BufRead, Write};

use log::{debug, warn};

use crate::artifacts::ArtifactError;
use crate::predictor::{Label, LabelPredictor};

pub const TITLE: &str = "📰 AI-Based Fake News Detector";
pub const INTRO: &str = "Enter a news article or headline below to check if it's Real or Fake.";
pub const PROMPT: &str = "✍️ Enter News Text Here (type :check on its own line to 🔍 Check News, :quit to exit)";
pub const SIDEBAR_TITLE: &str = "📝 About the App";
pub const SIDEBAR: [&str; 3] = [
    "🔹 This AI-based Fake News Detector helps you identify whether a news article or headline is real or fake.",
    "🔹 Uses Machine Learning to analyze text patterns and provide predictions.",
    "🔹 Supports both short and long articles.",
];
pub const FOOTER: &str = "📌 Developed with ❤️ using Machine Learning & Rust";
pub const ANALYZING: &str = "🔄 Analyzing...";
pub const RESULT_HEADER: &str = "🧠 Prediction Result:";
pub const MISSING_INPUT_WARNING: &str = "⚠️ Please enter some text to analyze!";
pub const CHECK_COMMAND: &str = ":check";
pub const QUIT_COMMAND: &str = ":quit";

/// The two outcomes a successful prediction can have.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Real,
    Fake,
}

impl Verdict {
    /// `1` is real; every other label, including values outside `{0, 1}`, is fake.
    pub fn from_label(label: Label) -> Self {
        match label.value() {
            1 => Self::Real,
            0 => Self::Fake,
            other => {
                warn!("Classifier returned unexpected label {}; treating it as fake", other);
                Self::Fake
            }
        }
    }

    pub fn headline(&self) -> &'static str {
        match self {
            Self::Real => "✅ Real News 🟢",
            Self::Fake => "❌ Fake News 🔴",
        }
    }

    pub fn explanation(&self) -> &'static str {
        match self {
            Self::Real => "This article appears trustworthy.",
            Self::Fake => "This article might be misleading or false.",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Real => write!(f, "Real"),
            Self::Fake => write!(f, "Fake"),
        }
    }
}

/// Terminal state of one submission cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Verdict { verdict: Verdict, label: Label },
    /// The trimmed input was empty; the predictor was not called.
    MissingInput,
    /// The predictor failed; the user may resubmit.
    PredictionFailed(String),
}

impl Outcome {
    pub fn verdict(&self) -> Option<Verdict> {
        match self {
            Self::Verdict { verdict, .. } => Some(*verdict),
            _ => None,
        }
    }

    /// Process exit code for one-shot mode.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Verdict { .. } => 0,
            Self::PredictionFailed(_) => 1,
            Self::MissingInput => 2,
        }
    }

    pub fn render(&self) -> String {
        match self {
            Self::Verdict { verdict, .. } => format!(
                "{}\n{}\nℹ️ {}",
                RESULT_HEADER,
                verdict.headline(),
                verdict.explanation()
            ),
            Self::MissingInput => MISSING_INPUT_WARNING.to_string(),
            Self::PredictionFailed(reason) => {
                format!("⚠️ An error occurred during prediction: {}", reason)
            }
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// User-visible message for a failed startup.
pub fn startup_failure_message(err: &ArtifactError) -> String {
    if err.is_not_found() {
        format!("❌ {}", err)
    } else {
        format!("⚠️ An error occurred while loading the model or vectorizer: {}", err)
    }
}

/// Explicit front-end context: built once at startup, borrowed by every submission.
pub struct NewsChecker<P: LabelPredictor = Box<dyn LabelPredictor>> {
    predictor: P,
}

impl<P: LabelPredictor> NewsChecker<P> {
    pub fn new(predictor: P) -> Self {
        Self { predictor }
    }

    pub fn predictor(&self) -> &P {
        &self.predictor
    }

    /// Runs one submission cycle: validate, predict, map the label.
    pub fn check(&self, input: &str) -> Outcome {
        let text = input.trim();
        if text.is_empty() {
            debug!("Empty submission; skipping prediction");
            return Outcome::MissingInput;
        }

        debug!("Checking {} characters of text", text.len());
        match self.predictor.predict(text) {
            Ok(label) => {
                let verdict = Verdict::from_label(label);
                debug!("Label {} -> {}", label, verdict);
                Outcome::Verdict { verdict, label }
            }
            Err(e) => {
                warn!("Prediction failed: {}", e);
                Outcome::PredictionFailed(e.to_string())
            }
        }
    }

    /// Prints the static screen chrome shown before the first submission.
    pub fn write_header<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "{}", TITLE)?;
        writeln!(out, "{}", INTRO)?;
        writeln!(out)?;
        writeln!(out, "{}", SIDEBAR_TITLE)?;
        for line in SIDEBAR {
            writeln!(out, "{}", line)?;
        }
        writeln!(out)?;
        Ok(())
    }

    pub fn write_footer<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "---")?;
        writeln!(out, "{}", FOOTER)
    }

    /// Runs one cycle and writes its outcome.
    pub fn submit<W: Write>(&self, text: &str, out: &mut W) -> io::Result<Outcome> {
        if !text.trim().is_empty() {
            writeln!(out, "{}", ANALYZING)?;
        }
        let outcome = self.check(text);
        writeln!(out, "{}", outcome)?;
        writeln!(out)?;
        Ok(outcome)
    }

    /// Interactive loop: lines, blank ones included, accumulate into the text box until
    /// a `:check` line submits it. `:quit` or end of input leaves the loop; text still
    /// pending at end of input is submitted first.
    pub fn run_interactive<R: BufRead, W: Write>(
        &self,
        input: R,
        out: &mut W,
    ) -> io::Result<usize> {
        self.write_header(out)?;
        writeln!(out, "{}", PROMPT)?;
        out.flush()?;

        let mut submissions = 0;
        let mut buffer = String::new();
        for line in input.lines() {
            let line = line?;
            match line.trim() {
                QUIT_COMMAND => {
                    buffer.clear();
                    break;
                }
                CHECK_COMMAND => {
                    self.submit(&buffer, out)?;
                    submissions += 1;
                    buffer.clear();
                    writeln!(out, "{}", PROMPT)?;
                    out.flush()?;
                }
                _ => {
                    buffer.push_str(&line);
                    buffer.push('\n');
                }
            }
        }
        if !buffer.trim().is_empty() {
            self.submit(&buffer, out)?;
            submissions += 1;
        }

        self.write_footer(out)?;
        out.flush()?;
        Ok(submissions)
    }
}
