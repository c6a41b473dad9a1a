//! Entry point for the command-line interface.
#![forbid(unsafe_code)]

fn main() {
    if let Err(err) = osm_rdf_cli::run() {
        eprintln!("osm-rdf: {err}");
        std::process::exit(1);
    }
}
