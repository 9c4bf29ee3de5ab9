//! brokercsv CLI: extract broker CSV exports as JSON lines.

use brokercsv_core::ExtractorConfig;
use brokercsv_degiro::DegiroProvider;
use brokercsv_io::CsvExtractor;
use clap::{Parser, Subcommand, ValueEnum};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "brokercsv")]
#[command(about = "Extract typed records from broker CSV exports", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Broker {
    Degiro,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract a CSV export and print one JSON object per record
    Extract {
        /// Path to the CSV file
        #[arg(short, long)]
        input: PathBuf,

        /// Broker whose schema and defaults apply
        #[arg(short, long, value_enum, default_value = "degiro")]
        broker: Broker,

        /// Field separator (overrides broker default)
        #[arg(long)]
        separator: Option<char>,

        /// Number of header rows to skip (overrides broker default)
        #[arg(long)]
        skip: Option<usize>,

        /// Charset label of the input (overrides broker default)
        #[arg(long)]
        charset: Option<String>,

        /// Maximum characters per record (overrides broker default)
        #[arg(long)]
        max_record_chars: Option<usize>,
    },

    /// List the fields of a broker schema
    Fields {
        #[arg(short, long, value_enum, default_value = "degiro")]
        broker: Broker,
    },
}

/// Command line values that take precedence over the broker's configuration.
#[derive(Debug, Default)]
struct Overrides {
    separator: Option<char>,
    skip: Option<usize>,
    charset: Option<String>,
    max_record_chars: Option<usize>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Extract {
            input,
            broker,
            separator,
            skip,
            charset,
            max_record_chars,
        } => {
            let overrides = Overrides {
                separator,
                skip,
                charset,
                max_record_chars,
            };
            if let Err(e) = extract(&input, broker, overrides) {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        }
        Commands::Fields { broker } => {
            if let Err(e) = list_fields(broker) {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        }
    }
}

fn extractor_for(broker: Broker, overrides: Overrides) -> Result<CsvExtractor, Box<dyn std::error::Error>> {
    match broker {
        Broker::Degiro => {
            let provider = DegiroProvider;
            let mut config = provider.config();
            apply_overrides(&mut config, overrides);
            Ok(CsvExtractor::new(provider.schema()?, &config)?)
        }
    }
}

fn apply_overrides(config: &mut ExtractorConfig, overrides: Overrides) {
    if let Some(sep) = overrides.separator {
        config.field_separator = sep;
    }
    if let Some(skip) = overrides.skip {
        config.skip_count = skip;
    }
    if let Some(charset) = overrides.charset {
        config.charset = charset;
    }
    if let Some(max) = overrides.max_record_chars {
        config.max_record_chars = max;
    }
}

fn extract(
    input: &PathBuf,
    broker: Broker,
    overrides: Overrides,
) -> Result<(), Box<dyn std::error::Error>> {
    let extractor = extractor_for(broker, overrides)?;
    let file = File::open(input)?;

    tracing::info!(input = %input.display(), ?broker, charset = %extractor.charset(), "extracting");

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let mut count = 0usize;
    for record in extractor.extract_reader(file) {
        let record = record?;
        serde_json::to_writer(&mut out, &record)?;
        out.write_all(b"\n")?;
        count += 1;
    }
    out.flush()?;

    tracing::info!(records = count, "extraction finished");
    Ok(())
}

fn list_fields(broker: Broker) -> Result<(), Box<dyn std::error::Error>> {
    let schema = match broker {
        Broker::Degiro => DegiroProvider.schema()?,
    };
    println!("{:<4} {:<26} {:<9} {}", "#", "NAME", "TYPE", "NULLABLE");
    for field in schema.fields() {
        println!(
            "{:<4} {:<26} {:<9} {}",
            field.ordinal(),
            field.name(),
            field.value_type(),
            if field.is_nullable() { "yes" } else { "no" }
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides_replace_broker_defaults() {
        let mut config = DegiroProvider.config();
        apply_overrides(
            &mut config,
            Overrides {
                separator: Some(';'),
                skip: Some(0),
                ..Default::default()
            },
        );
        assert_eq!(config.field_separator, ';');
        assert_eq!(config.skip_count, 0);
        assert_eq!(config.charset, "ISO-8859-1");
    }

    #[test]
    fn invalid_override_is_rejected() {
        let overrides = Overrides {
            separator: Some('"'),
            ..Default::default()
        };
        assert!(extractor_for(Broker::Degiro, overrides).is_err());
    }

    #[test]
    fn unknown_charset_is_rejected() {
        let overrides = Overrides {
            charset: Some("no-such-charset".into()),
            ..Default::default()
        };
        assert!(extractor_for(Broker::Degiro, overrides).is_err());
    }
}
