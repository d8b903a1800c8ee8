use std::error::Error;

use potemkin::apps::run_report;

fn main() -> Result<(), Box<dyn Error>> {
    run_report(std::env::args().skip(1))
}
