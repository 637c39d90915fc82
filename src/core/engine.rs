use crate::domain::model::RunSummary;
use crate::domain::ports::Pipeline;
use crate::utils::error::Result;

pub struct Engine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> Engine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub async fn run(&self) -> Result<RunSummary> {
        tracing::info!("Starting {} pipeline", self.pipeline.name());
        println!("Starting {} pipeline...", self.pipeline.name());

        let summary = self.pipeline.run().await?;
        report(&summary);

        Ok(summary)
    }
}

fn report(summary: &RunSummary) {
    println!("\nDone!");
    if !summary.output_path.is_empty() {
        println!("Output file: {}", summary.output_path);
    }
    println!("Attempted: {}", summary.attempted);
    println!("Succeeded: {}", summary.succeeded);
    println!("Failed: {}", summary.failed());
    println!("Rows written: {}", summary.rows_written);

    if let Some(credits) = summary.remaining_credits {
        println!("Remaining API credits: {}", credits);
    }

    if !summary.failed_keys.is_empty() {
        println!("\nFailed keys:");
        for key in &summary.failed_keys {
            println!("{}", key);
        }
    }
}
