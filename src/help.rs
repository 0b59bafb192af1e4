use current_platform::CURRENT_PLATFORM;

/// `dpix 0.1.0 x86_64 (avif gif jpeg png tiff webp)`
pub fn version_string() -> String {
    let cpu = CURRENT_PLATFORM.split('-').next().unwrap_or("unknown");
    let version = env!("CARGO_PKG_VERSION");
    format!("dpix {version} {cpu} ({})", enabled_formats().join(" "))
}

fn enabled_formats() -> Vec<&'static str> {
    let mut formats = Vec::new();
    if cfg!(feature = "avif") {
        formats.push("avif");
    }
    if cfg!(feature = "gif") {
        formats.push("gif");
    }
    if cfg!(feature = "jpeg") {
        formats.push("jpeg");
    }
    if cfg!(feature = "png") {
        formats.push("png");
    }
    if cfg!(feature = "tiff") {
        formats.push("tiff");
    }
    if cfg!(feature = "webp") {
        formats.push("webp");
    }
    formats
}

pub fn print_version() {
    println!("Version: {}", version_string());
    println!("License: {}", env!("CARGO_PKG_LICENSE"));
}
