use clap::Parser;
use coursetree::Status;

use super::terminal::Colorize;

#[derive(Debug, Parser)]
#[command(about = "Explain what each course status means")]
pub struct Legend {}

impl Legend {
    pub fn run() {
        for status in Status::ALL {
            let label = format!("{:<4}", status.as_str());
            println!("{}  This course{}", label.status(status), status.description());
        }
    }
}
