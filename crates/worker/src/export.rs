use anyhow::Context;
use sentiment_core::domain::{DateRange, Program};
use sentiment_core::generator::generate_comments;
use sentiment_core::store;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct ExportPlan {
    pub programs: Vec<Program>,
    pub range: DateRange,
    pub data_dir: PathBuf,
    pub dry_run: bool,
}

/// Generates history for each planned program and writes its data file.
/// Returns the number of rows generated per program.
pub fn run(plan: &ExportPlan) -> anyhow::Result<Vec<(Program, usize)>> {
    let mut rng = rand::rng();
    let mut out = Vec::with_capacity(plan.programs.len());

    for &program in &plan.programs {
        let comments = generate_comments(program, plan.range, &mut rng);

        if plan.dry_run {
            tracing::info!(
                %program,
                start = %plan.range.start,
                end = %plan.range.end,
                rows = comments.len(),
                dry_run = true,
                "history generated"
            );
        } else {
            let path = store::write_program_file(&plan.data_dir, program, &comments)
                .with_context(|| format!("writing history for {program} failed"))?;
            tracing::info!(
                %program,
                path = %path.display(),
                rows = comments.len(),
                "history written"
            );
        }

        out.push((program, comments.len()));
    }

    Ok(out)
}
