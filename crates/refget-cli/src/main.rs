use std::borrow::Cow;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use refget::{schema, Reference, Resolver, Target};
use tracing_subscriber::EnvFilter;

mod config;

use config::RefgetConfig;

/// refget - resolve values from literals or schema:value references
#[derive(Parser, Debug)]
#[command(name = "refget")]
#[command(about = "Resolve a value from a literal or a schema:value reference")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to configuration file (default: ~/.config/refget/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Resolve a reference and print its value
    Resolve {
        /// Reference or literal (e.g. env.file.head:TOKEN_FILE, conf:app/token)
        #[arg(required_unless_present = "name", conflicts_with = "name")]
        reference: Option<String>,

        /// Resolve a named reference from the [refs] table of the config file
        #[arg(short, long)]
        name: Option<String>,

        /// Trim surrounding whitespace from the value
        #[arg(long)]
        trim: bool,
    },

    /// Show how an input splits into schema and remainder
    Split {
        input: String,
    },

    /// Parse an SSH/SCP target (long or short form) and print its fields
    Target {
        raw: String,
    },

    /// List every recognized schema
    Schemas,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose)?;

    match cli.command {
        Commands::Resolve {
            reference,
            name,
            trim,
        } => run_resolve(cli.config, reference, name, trim),
        Commands::Split { input } => run_split(&input),
        Commands::Target { raw } => run_target(&raw),
        Commands::Schemas => {
            run_schemas();
            Ok(())
        }
    }
}

/// Logs go to stderr so stdout carries only values
fn init_logging(verbose: bool) -> Result<()> {
    let directive = if verbose { "refget=debug" } else { "refget=warn" };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::from_default_env().add_directive(directive.parse()?))
        .init();

    Ok(())
}

fn run_resolve(
    config_path: Option<PathBuf>,
    reference: Option<String>,
    name: Option<String>,
    trim: bool,
) -> Result<()> {
    let reference = match (reference, name) {
        (Some(raw), _) => Reference::parse(&raw),
        (None, Some(name)) => {
            let config = RefgetConfig::load_or_default(config_path.as_deref())?;
            config
                .get(&name)
                .cloned()
                .with_context(|| format!("No reference named '{}' in [refs]", name))?
        }
        (None, None) => anyhow::bail!("Provide a reference or --name"),
    };

    let resolver = Resolver::new();
    let value = resolver
        .resolve_reference(&reference)
        .with_context(|| format!("Failed to resolve {}", reference))?;

    let value = if trim { value.trim() } else { value.as_str() };
    print!("{}", with_newline(value));
    Ok(())
}

fn run_split(input: &str) -> Result<()> {
    let (schema, remainder) = refget::split(input);
    let json = serde_json::json!({
        "schema": schema,
        "remainder": remainder,
    });
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}

fn run_target(raw: &str) -> Result<()> {
    let target = parse_target(raw)
        .with_context(|| format!("'{}' is not a valid SSH target", raw))?;
    println!("{}", serde_json::to_string_pretty(&target)?);
    Ok(())
}

fn parse_target(raw: &str) -> Option<Target> {
    Target::parse(raw).or_else(|| Target::parse_short(raw, "ssh"))
}

fn run_schemas() {
    for token in schema::TOKENS {
        let reducer = token.reducer.map_or("-", |r| r.name());
        println!("{:<15} {:<9} {}", token.name, token.source.name(), reducer);
    }
    println!("{:<15} {:<9} -", "user@host", "ssh");
}

fn with_newline(value: &str) -> Cow<'_, str> {
    if value.ends_with('\n') {
        Cow::Borrowed(value)
    } else {
        Cow::Owned(format!("{}\n", value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_resolve_args() {
        let cli = Cli::try_parse_from(["refget", "resolve", "--trim", "env:TOKEN"]).unwrap();
        match cli.command {
            Commands::Resolve {
                reference, trim, ..
            } => {
                assert_eq!(reference.as_deref(), Some("env:TOKEN"));
                assert!(trim);
            }
            other => panic!("unexpected command {:?}", other),
        }

        assert!(Cli::try_parse_from(["refget", "resolve"]).is_err());
        assert!(Cli::try_parse_from(["refget", "resolve", "x", "--name", "y"]).is_err());
    }

    #[test]
    fn test_parse_target_falls_back_to_short_form() {
        let long = parse_target("ssh://user@host:22/f").unwrap();
        assert_eq!(long.port(), Some("22"));

        let short = parse_target("user@host:f").unwrap();
        assert_eq!(short.scheme, "ssh");
        assert_eq!(short.path(), Some("f"));

        assert!(parse_target("user@:f").is_none());
    }

    #[test]
    fn test_with_newline() {
        assert_eq!(with_newline("token"), "token\n");
        assert_eq!(with_newline("token\n"), "token\n");
        assert_eq!(with_newline(""), "\n");
    }
}
