use alloy_primitives::Bytes;
use chained_account::{apply_injections_with, Injection, InjectionSkip};
use clap::Parser;
use serde::Serialize;

use crate::common::{decode_hex, load_hex, load_injections, Result};

/// Apply injection rules to call data, given the results of earlier calls
#[derive(Parser, Debug)]
pub struct Cmd {
    /// Call data to patch (hex string)
    #[arg(long = "input")]
    pub input: Option<String>,

    /// File containing the call data to patch. If '-' is specified, it is read from stdin
    #[arg(long = "inputfile")]
    pub input_file: Option<String>,

    /// Injection rules as inline JSON
    #[arg(long = "injections")]
    pub injections: Option<String>,

    /// File containing the JSON injection rules
    #[arg(long = "injectionsfile")]
    pub injections_file: Option<String>,

    /// Result of an earlier call (hex string). Repeat once per call, in call order
    #[arg(long = "result", value_name = "HEX")]
    pub results: Vec<String>,
}

/// Outcome of a patch: the patched input and the rules that were skipped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PatchOutcome {
    /// The input with every applicable rule applied
    pub patched: Bytes,
    /// Rules that did not apply, by position in the rule list
    pub skipped: Vec<SkippedRule>,
}

/// A rule that did not apply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkippedRule {
    /// Position of the rule in the rule list
    pub rule: usize,
    /// Why it was skipped
    pub reason: String,
}

impl Cmd {
    /// Execute the patch command
    pub fn run(&self) -> Result<()> {
        let outcome = self.patch()?;
        println!("{}", serde_json::to_string_pretty(&outcome)?);
        Ok(())
    }

    /// Loads the inputs and applies the rules.
    pub fn patch(&self) -> Result<PatchOutcome> {
        let input =
            load_hex(self.input.as_deref(), self.input_file.as_deref())?.unwrap_or_default();
        let injections =
            load_injections(self.injections.as_deref(), self.injections_file.as_deref())?;
        let results = self
            .results
            .iter()
            .map(|result| decode_hex(result).map(Bytes::from))
            .collect::<Result<Vec<_>>>()?;
        Ok(patch(&input, &injections, &results))
    }
}

/// Applies `injections` in order to a copy of `input`, recording the rules that were skipped.
pub fn patch(input: &[u8], injections: &[Injection], results: &[Bytes]) -> PatchOutcome {
    let mut skipped = Vec::new();
    let patched = apply_injections_with(input, injections, results, |rule, skip| {
        skipped.push(SkippedRule { rule, reason: describe(skip).to_owned() })
    });
    PatchOutcome { patched, skipped }
}

const fn describe(skip: InjectionSkip) -> &'static str {
    match skip {
        InjectionSkip::SourceOutOfRange => "source call index out of range",
        InjectionSkip::SourceEmpty => "source result is empty",
        InjectionSkip::SourceRangeOutOfBounds => "source range exceeds result",
        InjectionSkip::TargetRangeOutOfBounds => "target range exceeds input",
    }
}
