use std::path::Path;
use std::process;

const USAGE: &str = "usage: gnashc <source.gnash> <output.sh>";

fn main() {
    let args: Vec<String> = std::env::args().collect();
    if args.len() != 3 {
        eprintln!("{}", USAGE);
        process::exit(2);
    }
    gnashc::init_tracing();

    if let Err(e) = gnashc::compile_file(Path::new(&args[1]), Path::new(&args[2])) {
        eprintln!("{}", e);
        process::exit(e.code());
    }
}
