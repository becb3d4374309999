//! `init` command

use clap::Args;
use std::fs;
use std::path::PathBuf;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "books-etl.toml")]
    pub output: PathBuf,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        let output = self.output.display();
        tracing::info!(output = %output, "Initializing configuration file");

        if self.output.exists() && !self.force {
            println!("❌ Configuration file already exists: {output}");
            println!("   Use --force to overwrite");
            return Ok(2);
        }

        match fs::write(&self.output, sample_config()) {
            Ok(()) => {
                println!("✅ Configuration file created: {output}");
                println!();
                println!("Next steps:");
                println!("  1. Edit {output} with your organization and database settings");
                println!("  2. Put secrets in a .env file:");
                println!("     - ZOHO_REFRESH_TOKEN, ZOHO_CLIENT_SECRET");
                println!("     - SQL_PASSWORD");
                println!("  3. Validate configuration: books-etl --config {output} validate-config");
                println!("  4. Run a sync: books-etl --config {output} sync");
                println!();
                Ok(0)
            }
            Err(e) => {
                println!("❌ Failed to write configuration file");
                println!("   Error: {e}");
                Ok(1)
            }
        }
    }
}

/// Commented sample configuration
pub fn sample_config() -> &'static str {
    r#"# books-etl configuration
#
# ${VAR} placeholders are replaced from the environment (and .env).
# Environment variables such as SQL_SERVER or ZOHO_ORGANIZATION_ID
# override the values in this file.

[application]
# trace, debug, info, warn, error
log_level = "info"
# Run the pipeline but only log the writes
dry_run = false

[books]
accounts_url = "https://accounts.zoho.in/oauth/v2/token"
# Used when the token response carries no api_domain
default_api_domain = "https://www.zohoapis.in"
organization_id = "${ZOHO_ORGANIZATION_ID}"
client_id = "${ZOHO_CLIENT_ID}"
client_secret = "${ZOHO_CLIENT_SECRET}"
refresh_token = "${ZOHO_REFRESH_TOKEN}"
redirect_uri = "${ZOHO_REDIRECT_URI}"
timeout_seconds = 60
per_page = 200
# Pause after every detail request
rate_limit_delay_ms = 200
# Status.All, Status.Open, Status.Paid, Status.PartiallyPaid, Status.Overdue, Status.Void
# bills_status_filter = "Status.All"

[database]
driver = "postgresql"
host = "localhost"
port = 5432
database = "books"
username = "etl"
password = "${SQL_PASSWORD}"
max_connections = 4
connection_timeout_seconds = 30
statement_timeout_seconds = 60

[sync]
document_types = ["invoices", "creditnotes", "bills"]

# on_list_error: "abort" fails the run, "truncate" stops paging that type
# write_mode: "merge" updates existing rows, "append" always inserts
[sync.invoices]
on_list_error = "truncate"
write_mode = "merge"

[sync.creditnotes]
on_list_error = "truncate"
write_mode = "merge"

[sync.bills]
on_list_error = "abort"
write_mode = "merge"

[logging]
# JSON log files in addition to the console
local_enabled = false
local_path = "./logs"
# daily, hourly, never
local_rotation = "daily"
"#
}
