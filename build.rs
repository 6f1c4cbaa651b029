// build.rs

fn main() {
    // Prefer pkg-config for libX11; fall back to plain linker flags when the
    // .pc file is missing (minimal containers, non-standard prefixes).
    match pkg_config::probe_library("x11") {
        Ok(_) => {
            eprintln!("pkg-config found x11. Linking configured automatically.");
        }
        Err(e) => {
            eprintln!(
                "pkg-config failed for library 'x11' ({}). Falling back to manual linking.",
                e
            );
            println!("cargo:rustc-link-lib=X11");
            println!("cargo:rustc-link-search=/usr/lib");
        }
    }
}
