use std::env;

use iniparser::Parser;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let path = env::args().nth(1).expect("expected path as first argument");
    let ini = Parser::open(path);

    ini.dump_stdout().expect("failed to write to stdout");
}
