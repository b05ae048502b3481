fn main() {
    println!("cargo:rerun-if-changed=src/native/vformat.c");

    // The native handler and its shim only exist on unix targets
    if std::env::var_os("CARGO_CFG_UNIX").is_none() {
        return;
    }

    cc::Build::new()
        .file("src/native/vformat.c")
        .compile("log_bridge_vformat");
}
