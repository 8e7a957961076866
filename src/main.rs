fn main() {
    match prompt_gallery_lib::run() {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("prompt-gallery error: {err:#}");
            std::process::exit(1);
        }
    }
}
