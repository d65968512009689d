fn main() {
    let cli = litmus::cli::parse();
    litmus::utils::logging::init(cli.verbose, cli.quiet);
    let code = litmus::app::run_cli(cli);
    if code != 0 {
        std::process::exit(code);
    }
}
