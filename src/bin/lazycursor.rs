fn main() {
    if let Err(e) = lazycursor::cli::run() {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
