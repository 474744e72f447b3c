//! sheetcal CLI binary
//!
//! This is the minimal entrypoint for the sheetcal CLI.
//! All logic is in the library; main.rs only invokes cli::run().

fn main() {
    // cli::run() handles all output on the success path. Failures are
    // reported here once, with their full context chain, and collapse to a
    // single generic exit code regardless of error kind.
    if let Err(err) = sheetcal::cli::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
