fn main() {
    #[cfg(feature = "cli")]
    asegraph::cli::run();

    #[cfg(not(feature = "cli"))]
    {
        eprintln!("asegraph: CLI not enabled. Rebuild with `--features cli`.");
        std::process::exit(1);
    }
}
