use std::io::Write;

use futures::StreamExt;
use gemini_image_gen::{models::Request, GenerativeModel};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let model = GenerativeModel::from_env("gemini-1.5-flash")?;

    let request = Request::from_prompt("Describe a lighthouse at dawn in two sentences.");
    let mut stream = model.stream_generate_response(request).await?;

    while let Some(fragment) = stream.next().await {
        match fragment {
            Ok(fragment) => {
                print!("{}", fragment.text());
                std::io::stdout().flush()?;
            }
            Err(error) => eprintln!("Error: {error}"),
        }
    }
    println!();

    Ok(())
}
