//! oas-validate CLI
//!
//! Command-line front end for checking a described request against an
//! OpenAPI/Swagger contract, and for inspecting a contract's surface.

use std::collections::HashMap;
use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use oas_validate::{
    validate_request, AcceptValue, LoaderOptions, Request, SpecError, SpecLoader,
    ValidationOptions, Verdict,
};

#[derive(Parser)]
#[command(name = "oas-validate")]
#[command(about = "Validate HTTP requests against an OpenAPI/Swagger contract")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check one described request against a spec
    Check {
        /// Spec identifier: URL, inline JSON ({...}), inline YAML (---), or
        /// a bundled resource name
        spec: String,

        /// Request URL path
        #[arg(long)]
        path: String,

        /// HTTP verb (any case)
        #[arg(long)]
        verb: String,

        /// Base path to check against the spec's declared basePath
        #[arg(long)]
        base_path: Option<String>,

        /// Query parameter, as name=value (repeatable)
        #[arg(long = "query", value_name = "NAME=VALUE")]
        query: Vec<String>,

        /// Header, as name=value (repeatable)
        #[arg(long = "header", value_name = "NAME=VALUE")]
        header: Vec<String>,

        /// Accept header value
        #[arg(long)]
        accept: Option<String>,

        /// Content-Type header value
        #[arg(long)]
        content_type: Option<String>,

        /// File containing the request body
        #[arg(long)]
        body: Option<PathBuf>,

        /// Directory under which bundled resource names are resolved
        #[arg(long, default_value = "resources")]
        resource_root: PathBuf,

        /// Output the verdict as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the paths, verbs and media types a spec declares
    Show {
        /// Spec identifier (same forms as for check)
        spec: String,

        /// Directory under which bundled resource names are resolved
        #[arg(long, default_value = "resources")]
        resource_root: PathBuf,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Check {
            spec,
            path,
            verb,
            base_path,
            query,
            header,
            accept,
            content_type,
            body,
            resource_root,
            json,
        } => run_check(CheckArgs {
            spec,
            path,
            verb,
            base_path,
            query,
            header,
            accept,
            content_type,
            body,
            resource_root,
            json,
        }),

        Commands::Show {
            spec,
            resource_root,
        } => run_show(&spec, resource_root),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(code) => ExitCode::from(code),
    }
}

struct CheckArgs {
    spec: String,
    path: String,
    verb: String,
    base_path: Option<String>,
    query: Vec<String>,
    header: Vec<String>,
    accept: Option<String>,
    content_type: Option<String>,
    body: Option<PathBuf>,
    resource_root: PathBuf,
    json: bool,
}

fn run_check(args: CheckArgs) -> Result<(), u8> {
    let doc = load_spec(&args.spec, args.resource_root)?;

    let query = parse_pairs(&args.query, "query")?;
    let headers = parse_pairs(&args.header, "header")?;

    let body_content = match &args.body {
        Some(path) => Some(std::fs::read(path).map_err(|e| {
            eprintln!("Error reading body file {}: {}", path.display(), e);
            3u8
        })?),
        None => None,
    };
    let mut body_reader = body_content.as_deref();

    let options = ValidationOptions {
        check_base_path: args.base_path.is_some(),
    };
    let verdict = validate_request(
        &doc,
        Request {
            path: &args.path,
            base_path: args.base_path.as_deref(),
            verb: &args.verb,
            query: &query,
            headers: &headers,
            accept: args.accept.as_deref().map(AcceptValue::Raw),
            content_type: args.content_type.as_deref(),
            body: body_reader.as_mut().map(|r| r as &mut dyn Read),
        },
        &options,
    );

    match &verdict {
        Verdict::Valid => {
            if args.json {
                println!(r#"{{"valid":true}}"#);
            } else {
                println!("Valid");
            }
            Ok(())
        }
        Verdict::Invalid(failure) => {
            if args.json {
                let output = serde_json::json!({
                    "valid": false,
                    "code": failure.code,
                    "detail": failure.detail,
                });
                println!("{}", output);
            } else {
                eprintln!("Invalid request: {}", failure);
            }
            Err(1)
        }
    }
}

fn run_show(spec: &str, resource_root: PathBuf) -> Result<(), u8> {
    let doc = load_spec(spec, resource_root)?;

    if let Some(title) = &doc.info.title {
        println!("{} {}", title, doc.info.version.as_deref().unwrap_or(""));
    }
    println!("basePath: {}", doc.base_path.as_deref().unwrap_or("(none)"));
    for (template, item) in &doc.paths {
        println!("{}", template);
        for verb in item.declared_verbs() {
            if let Some(op) = item.operation(verb) {
                print!("  {}", verb);
                if !op.produces.is_empty() {
                    print!("  produces: {}", op.produces.join(", "));
                }
                if !op.consumes.is_empty() {
                    print!("  consumes: {}", op.consumes.join(", "));
                }
                println!();
            }
        }
    }
    Ok(())
}

fn load_spec(spec: &str, resource_root: PathBuf) -> Result<oas_validate::SpecDocument, u8> {
    let loader = SpecLoader::new(LoaderOptions {
        resource_root,
        ..LoaderOptions::default()
    });
    loader.load(spec).map_err(|e: SpecError| {
        eprintln!("Error: {}", e);
        e.exit_code() as u8
    })
}

/// Parse repeated `name=value` flags into a lookup map.
fn parse_pairs(pairs: &[String], what: &str) -> Result<HashMap<String, String>, u8> {
    let mut map = HashMap::new();
    for pair in pairs {
        match pair.split_once('=') {
            Some((name, value)) => {
                map.insert(name.to_string(), value.to_string());
            }
            None => {
                eprintln!("Error: --{} expects NAME=VALUE, got \"{}\"", what, pair);
                return Err(2);
            }
        }
    }
    Ok(map)
}
