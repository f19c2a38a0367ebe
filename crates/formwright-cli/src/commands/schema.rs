//! Print the JSON Schema of the stored field array.

use crate::formatter;
use formwright_schema::FormSchema;

pub fn execute() -> anyhow::Result<()> {
    let schema = schemars::schema_for!(FormSchema);
    println!("{}", formatter::format_json(&schema)?);
    Ok(())
}
