use std::{fs, path::PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use dispatcher::{dispatch_str, ActOp, DispatchOptions, Document, DomOp};
use shared::protocol::WirePayload;

#[derive(Parser, Debug)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Apply a payload to an HTML page and print the result.
    Replay {
        #[arg(long)]
        page: PathBuf,
        #[arg(long)]
        payload: PathBuf,
        #[arg(long, default_value = "#messages")]
        message_area: String,
        #[arg(long)]
        no_enhance: bool,
    },
    /// List the selectors and operations of a payload.
    Inspect {
        #[arg(long)]
        payload: PathBuf,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter("warn")
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();

    match cli.command {
        Command::Replay {
            page,
            payload,
            message_area,
            no_enhance,
        } => {
            let html = read_text(&page, "page")?;
            let raw = read_text(&payload, "payload")?;
            let options = DispatchOptions {
                message_area_selector: message_area,
                enhance: !no_enhance,
            };

            let mut document = Document::parse(&html);
            let report = dispatch_str(&mut document, &raw, &options);
            if let Some(err) = &report.payload_error {
                anyhow::bail!("'{}' is not a command payload: {err}", payload.display());
            }
            println!("{}", document.to_html());

            let effects = document.effects();
            for text in &effects.alerts {
                eprintln!("alert: {text}");
            }
            for value in &effects.console {
                eprintln!("console: {value}");
            }
            for url in &effects.scripts {
                eprintln!("script: {url}");
            }
            for target in &effects.navigations {
                eprintln!("navigate: {}", target.as_deref().unwrap_or("<reload>"));
            }
            for selector in &report.skipped_selectors {
                eprintln!("skipped selector: {selector}");
            }
            for rejected in &report.rejected {
                eprintln!("rejected {}: {}", rejected.op, rejected.reason);
            }
            eprintln!("applied {} operation(s)", report.applied);
        }
        Command::Inspect { payload } => {
            let payload = read_payload(&payload)?;
            for group in &payload.dom {
                println!("dom {}", group.selector);
                for op in &group.ops {
                    let flag = DomOp::parse(op)
                        .err()
                        .map(|err| format!("  <- {err}"))
                        .unwrap_or_default();
                    println!("  {} {}{flag}", op.f, op.a);
                }
            }
            for op in &payload.act {
                let flag = ActOp::parse(op)
                    .err()
                    .map(|err| format!("  <- {err}"))
                    .unwrap_or_default();
                println!("act {} {}{flag}", op.f, op.a);
            }
            println!("{} operation(s)", payload.op_count());
        }
    }

    Ok(())
}

fn read_text(path: &PathBuf, what: &str) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("failed to read {what} '{}'", path.display()))
}

fn read_payload(path: &PathBuf) -> Result<WirePayload> {
    let raw = read_text(path, "payload")?;
    WirePayload::from_json(&raw)
        .with_context(|| format!("'{}' is not a command payload", path.display()))
}
