fn main() {
    if let Err(err) = gdp_atlas::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
