//! Terms command implementation.

use crate::cli::TermsArgs;
use crate::error::Result;
use crate::output::Formatter;
use quarry_expander::{extract_phrases, Expander, SearchInput};

/// Execute the terms command.
///
/// A single argument is one query; several are a body of work whose terms
/// are unioned.
pub async fn execute_terms(args: TermsArgs, expander: &Expander, formatter: &Formatter) -> Result<()> {
    if args.phrases {
        println!("{}", formatter.format_terms(&phrase_terms(&args.inputs))?);
        return Ok(());
    }

    let input = match args.inputs.len() {
        1 => SearchInput::from(args.inputs.join(" ")),
        _ => SearchInput::from(args.inputs),
    };

    let terms = expander.expand_search_terms(input).await;
    println!("{}", formatter.format_terms(&terms)?);
    Ok(())
}

/// Sub-phrases of every input, first occurrence wins
fn phrase_terms(inputs: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for phrase in inputs.iter().flat_map(|input| extract_phrases(input)) {
        if !out.contains(&phrase) {
            out.push(phrase);
        }
    }
    out
}
