//! Command-line front end: prompt in, image file and transcript out.

use std::process::ExitCode;

use gemini_image_gen::GenerativeModel;

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let mut args = std::env::args().skip(1);
    let prompt = match args.next() {
        Some(prompt) if !prompt.trim().is_empty() => prompt,
        _ => {
            eprintln!("usage: gemini-image-gen <prompt> [output-base-name]");
            return ExitCode::FAILURE;
        }
    };
    let base_name = args.next().unwrap_or_else(|| "generated_image".to_string());

    let model = match GenerativeModel::from_env(
        gemini_image_gen::models::ModelParams::default().model,
    ) {
        Ok(model) => model,
        Err(error) => {
            eprintln!("{error}");
            return ExitCode::FAILURE;
        }
    };

    match model.generate_image(prompt, &base_name).await {
        Ok(assembly) => {
            if !assembly.transcript.is_empty() {
                println!("{}", assembly.transcript);
            }
            match assembly.artifact {
                Some(artifact) => println!("Image saved: {}", artifact.file_name),
                None => println!("The model returned no image."),
            }
            ExitCode::SUCCESS
        }
        Err(error) => {
            // Text that streamed in before the failure is still worth showing.
            if !error.transcript().is_empty() {
                println!("{}", error.transcript());
            }
            eprintln!("Image generation failed: {error}");
            ExitCode::FAILURE
        }
    }
}
