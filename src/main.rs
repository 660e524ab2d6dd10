use std::io::{
    stdin,
    stdout,
};

use ankiwords::{
    anki::api::{
        AnkiClient,
        DEFAULT_ENDPOINT,
    },
    core::ExportError,
    export::{
        clipboard::SystemClipboard,
        export_to_clipboard,
    },
    wizard::run_wizard,
};
use clap::Parser;
use log::LevelFilter;
use log4rs::{
    append::console::ConsoleAppender,
    config::{
        Appender,
        Config,
        Root,
    },
    encode::pattern::PatternEncoder,
};

/// Export the words from your mature Anki cards to the clipboard.
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// AnkiConnect endpoint
    #[arg(long, default_value = DEFAULT_ENDPOINT)]
    endpoint: String,

    /// Show debug output
    #[arg(short, long)]
    verbose: bool,
}

/// Console-only logging; the tool keeps no files around.
fn setup_logging(verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    let level = if verbose { LevelFilter::Debug } else { LevelFilter::Warn };

    let stderr_appender = ConsoleAppender::builder()
        .target(log4rs::append::console::Target::Stderr)
        .encoder(Box::new(PatternEncoder::new("[{l}] {m}{n}")))
        .build();

    let config = Config::builder()
        .appender(Appender::builder().build("stderr", Box::new(stderr_appender)))
        .build(Root::builder().appender("stderr").build(level))?;

    log4rs::init_config(config)?;
    Ok(())
}

fn run(client: &AnkiClient) -> Result<(), ExportError> {
    let version = client.version().map_err(|error| {
        ExportError::CollectionQuery(format!(
            "could not reach AnkiConnect ({error}). Is Anki running with the AnkiConnect add-on installed?"
        ))
    })?;
    log::debug!("AnkiConnect is online, version {version}");

    let mut input = stdin().lock();
    let mut output = stdout().lock();

    let Some(request) = run_wizard(client, &mut input, &mut output)? else {
        println!("Cancelled.");
        return Ok(());
    };

    let summary = export_to_clipboard(client, &request, &mut SystemClipboard)?;
    println!("{}", summary.message());
    Ok(())
}

fn main() {
    let cli = Cli::parse();

    if let Err(error) = setup_logging(cli.verbose) {
        eprintln!("Failed to initialize logging: {error}");
    }

    let client = AnkiClient::new(&cli.endpoint);
    if let Err(error) = run(&client) {
        println!("{error}");
        std::process::exit(1);
    }
}
