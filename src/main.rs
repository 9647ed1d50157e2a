fn main() {
    dotenvy::from_filename(".env.local").ok();
    dotenvy::dotenv().ok();
    vigil::app::logging::init();
    if let Err(err) = vigil::app::cli::run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
