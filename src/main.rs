fn main() {
    if let Err(err) = pedigree_renderer::run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
