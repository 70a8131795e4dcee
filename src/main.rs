mod app;
mod audio;
mod config;
mod library;
mod runtime;

fn main() {
    if let Err(e) = runtime::run() {
        eprintln!("segue: {e}");
        std::process::exit(1);
    }
}
