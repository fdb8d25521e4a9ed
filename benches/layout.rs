//! This bench test builds a working set over a large synthetic catalogue:
//! ten subjects of prerequisite chains, with every second course paired with
//! a corequisite lab.

#![allow(missing_docs)]

use std::hint::black_box;

use criterion::{BatchSize, Criterion, criterion_group, criterion_main};
use coursetree::{Course, CourseCode, CourseDatabase, Expr, Seed, WorkingSet};

const SUBJECTS: usize = 10;
const LEVELS: usize = 40;

fn code(subject: usize, level: usize) -> CourseCode {
    CourseCode::new(format!("S{subject} {}", 100 + level)).unwrap()
}

fn lab(subject: usize, level: usize) -> CourseCode {
    CourseCode::new(format!("L{subject} {}", 100 + level)).unwrap()
}

/// Generates a catalogue where each course requires the one below it, or the
/// one below it in the next subject.
fn catalogue() -> CourseDatabase {
    let mut courses = Vec::new();
    for subject in 0..SUBJECTS {
        for level in 0..LEVELS {
            let mut course = Course::new(code(subject, level));
            if level > 0 {
                course = course.with_prerequisites(Expr::any(vec![
                    Expr::course(code(subject, level - 1)),
                    Expr::course(code((subject + 1) % SUBJECTS, level - 1)),
                ]));
            }
            if level % 2 == 1 {
                course = course.with_corequisites(Expr::course(lab(subject, level)));
                courses.push(
                    Course::new(lab(subject, level))
                        .with_corequisites(Expr::course(code(subject, level))),
                );
            }
            courses.push(course);
        }
    }
    CourseDatabase::new(courses)
}

fn build_working_set(c: &mut Criterion) {
    let db = catalogue();
    let seed = Seed::new(
        (0..SUBJECTS).map(|subject| code(subject, LEVELS - 1)).collect(),
        vec![code(0, 0)],
    );

    c.bench_function("build working set", |b| {
        b.iter(|| WorkingSet::build(black_box(&db), black_box(&seed), None).unwrap());
    });

    c.bench_function("toggle every course", |b| {
        b.iter_batched(
            || WorkingSet::build(&db, &seed, None).unwrap(),
            |mut working_set| {
                let codes: Vec<CourseCode> = working_set
                    .iter()
                    .map(|(course, _)| course.clone())
                    .collect();
                for code in &codes {
                    working_set.toggle_done(&db, code);
                }
                working_set
            },
            BatchSize::SmallInput,
        );
    });
}

criterion_group!(benches, build_working_set);
criterion_main!(benches);
