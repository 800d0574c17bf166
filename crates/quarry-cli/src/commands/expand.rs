//! Expand command implementation.

use crate::cli::ExpandArgs;
use crate::error::Result;
use crate::output::Formatter;
use quarry_expander::Expander;

/// Execute the expand command.
pub async fn execute_expand(args: ExpandArgs, expander: &Expander, formatter: &Formatter) -> Result<()> {
    let query = args.query.join(" ");

    if args.remote_only {
        match expander.expand_query(&query).await {
            Some(queries) => println!("{}", formatter.format_queries(&queries)?),
            None => eprintln!("{}", formatter.warning("Remote expansion unavailable")),
        }
        return Ok(());
    }

    let result = expander.expand_search_terms_with_queries(&query).await;
    println!("{}", formatter.format_expansion(&result)?);
    Ok(())
}
