fn main() {
    if let Err(err) = tubechat::cli::main() {
        eprintln!("❌ {err}");
        std::process::exit(1);
    }
}
