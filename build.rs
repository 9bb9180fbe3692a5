//! # Build Script
//!
//! Embeds the Windows Application Manifest (`app.manifest`) into the executable
//! through the `app.rc` resource script.
//!
//! The manifest controls:
//! - DPI Awareness, so message boxes render crisply on high-DPI screens.
//! - UAC behavior: the launcher runs `asInvoker`, it never needs elevation.
//! - Common Controls v6, so native dialogs use the modern visual style.

fn main() {
    println!("cargo:rerun-if-changed=app.rc");
    println!("cargo:rerun-if-changed=app.manifest");
    // A failed embed still yields a working binary, just without the manifest.
    let _ = embed_resource::compile("app.rc", embed_resource::NONE);
}
