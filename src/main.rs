use clap::Parser;
use impxref::config::Config;
use impxref::error::XrefError;
use impxref::writer::OutputEncoding;
use std::env;
use std::path::PathBuf;
use std::process;

#[derive(Parser)]
#[command(
    name = "impxref",
    about = "Extract product descriptions from an IMP export for a list of product numbers"
)]
struct Cli {
    /// CSV file whose first column holds the product numbers
    keys: PathBuf,

    /// Fixed-width IMP export with the product data
    imp: PathBuf,

    /// Output file (default: <output_dir or Desktop>/<output_name>)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output encoding: utf16, utf8 (default: from config or utf16)
    #[arg(long)]
    encoding: Option<String>,

    /// Skip the first row of the key file
    #[arg(long)]
    skip_key_header: bool,

    /// Config file path
    #[arg(long)]
    config: Option<PathBuf>,
}

fn die(msg: &str) -> ! {
    eprintln!("error: {}", msg);
    process::exit(1);
}

fn report(err: &XrefError) -> ! {
    match err.stage() {
        Some(stage) => die(&format!("{} failed: {}", stage, err)),
        None => die(&err.to_string()),
    }
}

fn desktop_dir() -> Option<PathBuf> {
    let home = env::var_os("HOME").or_else(|| env::var_os("USERPROFILE"))?;
    Some(PathBuf::from(home).join("Desktop"))
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = Config::discover(cli.config.as_deref()).unwrap_or_else(|e| report(&e));

    // CLI overrides
    if let Some(ref encoding) = cli.encoding {
        config.output_encoding = match encoding.as_str() {
            "utf16" | "utf-16" => OutputEncoding::Utf16,
            "utf8" | "utf-8" => OutputEncoding::Utf8,
            _ => die(&format!("invalid encoding: {}", encoding)),
        };
    }
    if cli.skip_key_header {
        config.skip_key_header = true;
    }

    let output_path = match cli.output {
        Some(path) => path,
        None => {
            let dir = config
                .output_dir
                .clone()
                .or_else(desktop_dir)
                .unwrap_or_else(|| die("cannot locate the Desktop directory; pass --output"));
            dir.join(&config.output_name)
        }
    };

    let summary = impxref::cross_reference(&cli.keys, &cli.imp, &output_path, &config)
        .unwrap_or_else(|e| report(&e));

    println!(
        "The new file has been saved as \"{}\" ({} matching rows).",
        output_path.display(),
        summary.matched
    );
}
