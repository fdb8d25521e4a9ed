use clap::Parser;
use tracing::instrument;

use super::{Context, parse_code, terminal::Colorize};

#[derive(Debug, Parser)]
#[command(about = "Display a course's name, description and requisites")]
pub struct Show {
    /// The course code
    code: String,
}

impl Show {
    #[instrument(level = "debug", skip_all, fields(code = %self.code))]
    pub fn run(self, context: &Context) -> anyhow::Result<()> {
        let config = context.config()?;
        let db = context.database(&config)?;
        let code = parse_code(&self.code, &config)?;

        let Some(course) = db.get(&code) else {
            anyhow::bail!("course {code} is not in the database");
        };

        let mut paragraphs = course.summary().into_iter();
        if let Some(title) = paragraphs.next() {
            println!("{}", title.heading());
        }
        for paragraph in paragraphs {
            println!("{paragraph}");
        }
        Ok(())
    }
}
