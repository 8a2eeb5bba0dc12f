use clap::Parser;
use form_schema::cli::commands::{ExtractArgs, cmd_extract, cmd_normalize, cmd_validate};
use form_schema::cli::config::{Cli, Commands, load_config, log_level};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // RUST_LOG wins over -v
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level(cli.verbose)));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = load_config(cli.config.as_deref());

    match cli.command {
        Commands::Extract {
            html,
            visibility,
            output,
            stdout,
            trace,
        } => {
            let args = ExtractArgs {
                html: &html,
                visibility: visibility.as_deref(),
                output: output.as_deref(),
                stdout,
                trace: trace.as_deref(),
            };
            let extraction = cmd_extract(&args, &config)?;
            if !stdout {
                println!("Extracted {} fields", extraction.fields.len());
            }
        }
        Commands::Validate { schema, values, step } => {
            let errors = cmd_validate(&schema, &values, step)?;
            if !errors.is_empty() {
                std::process::exit(1);
            }
        }
        Commands::Normalize { text } => {
            println!("{}", cmd_normalize(&text));
        }
    }

    Ok(())
}
