use anyhow::Context;
use std::io::{self, Write};
use tracing::{debug, info, warn};

use textstore::{config::Config, FileTextStore, StoreResult};

const FILE_PATH: &str = "sample.txt";
const CONTENT: &str = "Hello, this is a sample text file.\nWelcome to Java file handling!";
const OLD_WORD: &str = "sample";
const NEW_WORD: &str = "example";

/// Load configuration and start logging.
///
/// Nothing here stops the demo: a broken `textstore.toml` falls back to the
/// defaults and a logging failure only loses the log output.
fn setup() {
    let (config, config_error) = Config::load_default_or_fallback();

    if let Err(e) =
        textstore::init_with_logger(&config.logging).context("Failed to initialize logging")
    {
        eprintln!("{:#}", e);
    }

    if let Some(e) = config_error {
        warn!("{:#}, using default configuration", e);
    }
}

/// Write, print, replace and print again
fn run(store: &FileTextStore, out: &mut impl Write) -> StoreResult<()> {
    store.write(CONTENT)?;

    writeln!(out, "File Contents:")?;
    print_lines(store, out)?;

    let outcome = store.replace_word(OLD_WORD, NEW_WORD)?;
    debug!(
        "Replaced {} occurrences on {} lines",
        outcome.replacements, outcome.lines_changed
    );

    writeln!(out, "\nFile Contents After Modification:")?;
    print_lines(store, out)?;

    Ok(())
}

fn print_lines(store: &FileTextStore, out: &mut impl Write) -> StoreResult<()> {
    let mut lines = store.read_all()?;
    for line in lines.by_ref() {
        writeln!(out, "{}", line?)?;
    }
    debug!("Printed {} lines", lines.line_count());
    Ok(())
}

fn main() {
    setup();

    info!("Starting textstore v{} on {}", textstore::version(), FILE_PATH);

    let store = FileTextStore::new(FILE_PATH);
    let stdout = io::stdout();
    let mut out = stdout.lock();

    // Failures are reported, not turned into a non-zero exit status
    if let Err(e) = run(&store, &mut out) {
        if let Some(path) = e.path() {
            debug!("Failed operation on {}", path.display());
        }
        eprintln!("An error occurred: {}", e);
    }
}
