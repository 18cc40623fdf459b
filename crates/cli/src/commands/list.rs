use quoteboard_core::catalog::build_store;
use quoteboard_core::config::{AppConfig, LoadOptions};
use quoteboard_core::domain::quote::QuoteRecord;

use crate::commands::CommandResult;

pub fn run(options: LoadOptions, json_output: bool) -> CommandResult {
    let config = match AppConfig::load(options) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure("list", "config_validation", error.to_string(), 2)
        }
    };

    let store = match build_store(&config.catalog) {
        Ok(store) => store,
        Err(error) => return CommandResult::failure("list", "catalog", error.to_string(), 3),
    };
    let records: Vec<&QuoteRecord> = store.iter().collect();

    if json_output {
        return match serde_json::to_string_pretty(&records) {
            Ok(output) => CommandResult { exit_code: 0, output },
            Err(error) => CommandResult::failure("list", "serialization", error.to_string(), 4),
        };
    }

    let mut lines = vec![format!("{} quotes loaded:", records.len())];
    lines.extend(records.iter().map(|record| {
        format!("- #{} {}: \"{}\"", record.id, record.author, record.text)
    }));
    CommandResult { exit_code: 0, output: lines.join("\n") }
}
