fn main() {
    if let Err(err) = palette_settings_lib::run() {
        eprintln!("palette-settings: {err:#}");
        std::process::exit(1);
    }
}
