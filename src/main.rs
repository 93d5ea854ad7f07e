fn main() {
    if let Err(err) = league_flat::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
