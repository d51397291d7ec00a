use dotenv::dotenv;
use std::{env, path::Path};

use pasticceria::error_pasticceria::ErrorPasticceria;
use pasticceria::pasticceria::{start, start_stdin};
use pasticceria::utils::init_logger;

fn main() -> Result<(), ErrorPasticceria> {
    init_logger();
    dotenv().ok();

    let args: Vec<String> = env::args().collect();

    match args.get(1) {
        Some(file_name) => start(Path::new(file_name)),
        None => start_stdin(),
    }
}
