use gemini_image_gen::GenerativeModel;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    // Uses the default image generation model
    let model = GenerativeModel::from_env("gemini-2.0-flash-preview-image-generation")?;

    let assembly = model
        .generate_image("A watercolor painting of a lighthouse at dawn", "lighthouse")
        .await?;

    if !assembly.transcript.is_empty() {
        println!("{}", assembly.transcript);
    }
    match assembly.artifact {
        Some(artifact) => println!("Saved {} ({} bytes)", artifact.file_name, artifact.bytes.len()),
        None => println!("No image in the response."),
    }

    Ok(())
}
