fn main() {
    if let Err(err) = diagram_anchors::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
