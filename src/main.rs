#[cfg(not(target_arch = "wasm32"))]
fn main() {
    eprintln!("pyvisualizer-site runs in the browser. Build it with `trunk build --release`.");
}

#[cfg(target_arch = "wasm32")]
fn main() {
    pyvisualizer_site::web::run();
}
