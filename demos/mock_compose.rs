//! Example: composing song fields with MockGenerator, no model needed.
//!
//! Run with: `cargo run --example mock_compose`

use prompt_lyrics::{MockGenerator, RequestContext, SongWriter};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // A chatty response: commentary, a fence, and a schema echo before the real object
    let mock = MockGenerator::fixed(
        "Sure! The format is {\"prompt\": \"string\", \"lyrics\": \"string\"}.\n\
         ```json\n\
         {\"prompt\": \"dream pop, 90 bpm, reverb guitars\", \
          \"lyrics\": \"[verse]:\\nstreetlights hum \\u{2728}\\n[chorus]\\nwe drift\", \
          \"title\": \"Streetlight Drift\"}\n\
         ```",
    );

    let writer = SongWriter::new(Arc::new(mock));
    let ctx = RequestContext::new("late night city walk")
        .with_target_seconds(120.0)
        .with_target_lines(12);

    let (fields, diag) = writer.compose_with_diagnostics(&ctx).await?;
    println!("Title:  {}", fields.title);
    println!("Prompt: {}", fields.prompt);
    println!("Lyrics:\n{}", fields.lyrics);

    // Check diagnostics
    println!("Strategy: {:?}", diag.strategy);
    println!("Candidates scanned: {}", diag.candidates_scanned);
    println!("Degraded: {}", diag.degraded());

    Ok(())
}
