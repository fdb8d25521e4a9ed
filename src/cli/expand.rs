use clap::Parser;
use coursetree::{Seed, domain::Relation};
use tracing::instrument;

use super::{Context, parse_code};

#[derive(Debug, Parser)]
#[command(about = "Append a course and its related courses to a seed")]
pub struct Expand {
    /// The course to append
    code: String,

    /// Which related courses to append with it
    #[arg(long = "with", value_name = "RELATION")]
    relation: RelationArg,

    /// The seed to extend
    #[arg(long, default_value = "")]
    seed: String,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum RelationArg {
    /// Credit excluded courses
    Exclusions,
    /// Courses that require this one
    Dependents,
}

impl From<RelationArg> for Relation {
    fn from(arg: RelationArg) -> Self {
        match arg {
            RelationArg::Exclusions => Self::Exclusions,
            RelationArg::Dependents => Self::Dependents,
        }
    }
}

impl Expand {
    #[instrument(level = "debug", skip_all, fields(code = %self.code))]
    pub fn run(self, context: &Context) -> anyhow::Result<()> {
        let config = context.config()?;
        let db = context.database(&config)?;
        let code = parse_code(&self.code, &config)?;

        let mut seed = Seed::parse(&self.seed, config.normalize_codes);
        if !seed.expand(&db, &code, self.relation.into()) {
            anyhow::bail!("course {code} is not in the database");
        }

        println!("{seed}");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relation_names_map_across() {
        assert_eq!(Relation::from(RelationArg::Exclusions), Relation::Exclusions);
        assert_eq!(Relation::from(RelationArg::Dependents), Relation::Dependents);
    }
}
