//! Categories command implementation.

use crate::error::Result;
use crate::output::Formatter;
use quarry_domain::Registry;

/// Execute the categories command.
pub fn execute_categories(registry: &Registry, formatter: &Formatter) -> Result<()> {
    println!("{}", formatter.format_categories(registry)?);
    Ok(())
}
