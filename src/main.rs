fn main() {
    if let Err(err) = rsp_dashboard::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
