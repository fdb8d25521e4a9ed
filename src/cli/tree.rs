use clap::Parser;
use coursetree::{
    Config, Course, CourseCode, CourseDatabase, Seed, WorkingSet,
    domain::{Cascade, Related},
};
use serde_json::json;
use tracing::instrument;

use super::{
    Context, parse_code,
    terminal::{Colorize, terminal_width, truncate},
};

#[derive(Debug, Parser)]
#[command(about = "Build a prerequisite tree from a seed and print it by layer")]
pub struct Tree {
    /// Courses to add, then a semicolon and courses already taken
    ///
    /// For example `"CPSC 210, MATH 200; CPSC 110"`.
    seed: String,

    /// Flip the done marking of a course after the tree is built
    ///
    /// May be given more than once; toggles are applied in order.
    #[arg(long, value_name = "CODE")]
    toggle: Vec<String>,

    /// Also list the courses in the tree related to this course
    #[arg(long, value_name = "CODE")]
    highlight: Option<String>,

    /// Output format
    #[arg(long, value_name = "FORMAT", default_value = "table")]
    output: OutputFormat,
}

#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Table,
    Json,
}

impl Tree {
    #[instrument(level = "debug", skip_all)]
    pub fn run(self, context: &Context) -> anyhow::Result<()> {
        let config = context.config()?;
        let db = context.database(&config)?;

        let seed = Seed::parse(&self.seed, config.normalize_codes);
        let working_set = self.build(&db, &seed, &config)?;

        let highlight = match &self.highlight {
            Some(input) => {
                let code = parse_code(input, &config)?;
                let related = working_set
                    .related(&db, &code)
                    .ok_or_else(|| anyhow::anyhow!("course {code} is not in the database"))?;
                Some((code, related))
            }
            None => None,
        };

        match self.output {
            OutputFormat::Table => Self::output_table(&db, &working_set, highlight.as_ref()),
            OutputFormat::Json => {
                Self::output_json(&db, &seed, &working_set, highlight.as_ref())?;
            }
        }
        Ok(())
    }

    fn build(
        &self,
        db: &CourseDatabase,
        seed: &Seed,
        config: &Config,
    ) -> anyhow::Result<WorkingSet> {
        let mut working_set = WorkingSet::build(db, seed, config.max_layout_passes())?;

        for input in &self.toggle {
            let code = parse_code(input, config)?;
            if working_set.toggle_done(db, &code).is_none() {
                anyhow::bail!("course {code} is not in the tree");
            }
            if config.cascade == Cascade::Full {
                working_set.refresh_all(db);
            }
        }
        Ok(working_set)
    }

    fn output_table(
        db: &CourseDatabase,
        working_set: &WorkingSet,
        highlight: Option<&(CourseCode, Related<'_>)>,
    ) {
        if working_set.is_empty() {
            println!("{}", "No courses in the tree".dim());
            return;
        }

        let width = usize::from(terminal_width().unwrap_or(80));
        let code_width = working_set
            .iter()
            .map(|(code, _)| code.len())
            .max()
            .unwrap_or_default();

        for (depth, codes) in working_set.layers() {
            println!("{}", format!("Layer {depth}").heading());
            for code in codes {
                let status = working_set.status(code).unwrap_or_default();
                let name = db.get(code).and_then(Course::name).unwrap_or("");
                let room = width.saturating_sub(code_width + status.as_str().len() + 6);
                let label = format!("{:<code_width$}  {:<4}", code.as_str(), status.as_str());
                let marker = if status.is_takeable() { "+" } else { " " };
                println!(
                    " {marker}{}  {}",
                    label.status(status),
                    truncate(name, room).dim()
                );
            }
        }

        if let Some((code, related)) = highlight {
            println!();
            println!("{}", format!("Related to {code}").heading());
            for (label, codes) in [
                ("Prerequisites", &related.prerequisites),
                ("Corequisites", &related.corequisites),
                ("Exclusions", &related.exclusions),
                ("Required by", &related.dependents),
            ] {
                if codes.is_empty() {
                    continue;
                }
                let joined: Vec<&str> = codes.iter().map(|code| code.as_str()).collect();
                println!("  {label:<14} {}", joined.join(", "));
            }
        }
    }

    fn output_json(
        db: &CourseDatabase,
        seed: &Seed,
        working_set: &WorkingSet,
        highlight: Option<&(CourseCode, Related<'_>)>,
    ) -> anyhow::Result<()> {
        let layers: Vec<_> = working_set
            .layers()
            .into_iter()
            .map(|(depth, codes)| {
                let courses: Vec<_> = codes
                    .into_iter()
                    .filter_map(|code| {
                        let entry = working_set.get(code)?;
                        Some(json!({
                            "code": code,
                            "name": db.get(code).and_then(Course::name),
                            "status": entry.status(),
                            "done": entry.is_done(),
                            "takeable": entry.status().is_takeable(),
                        }))
                    })
                    .collect();
                json!({ "depth": depth, "courses": courses })
            })
            .collect();

        let mut output = json!({
            "seed": seed.to_string(),
            "layers": layers,
        });
        if let Some((code, related)) = highlight {
            output["highlight"] = json!({
                "code": code,
                "prerequisites": related.prerequisites,
                "corequisites": related.corequisites,
                "exclusions": related.exclusions,
                "dependents": related.dependents,
            });
        }

        println!("{}", serde_json::to_string_pretty(&output)?);
        Ok(())
    }
}
