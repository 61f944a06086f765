fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    if let Err(err) = birdc_drv::run(&args) {
        eprintln!("{:#}", err);
        std::process::exit(1);
    }
}
