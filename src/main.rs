use panelgen::logger::{self, LoggerConfig};
use panelgen::{comic::html, config, GeminiClient, GeminiConfig, LogSink, PanelRenderer};
use std::env;
use std::io::{self, Write as _};
use std::path::PathBuf;

/// Example stories, selectable with `--example <n>`.
const EXAMPLE_STORIES: &[&str] = &[
    "A shy robot who works the night shift in a lighthouse discovers that the lamp has burned out just as a storm rolls in.",
    "A tiny dragon who cannot breathe fire opens a soup stand in a mountain village and becomes famous for a completely different talent.",
    "An old astronaut plants a garden inside an abandoned space station and finds something growing that she never planted.",
    "A raccoon detective takes the case of the missing moon, which nobody else in the city seems to have noticed is gone.",
];

const DEFAULT_OUTPUT: &str = "comic.html";

fn print_usage() {
    println!("Usage: panelgen [OPTIONS] [STORY...]");
    println!();
    println!("Turns a short story into an illustrated comic slideshow.");
    println!();
    println!("Options:");
    println!("  --example <n>      Use built-in example story n (see --list-examples)");
    println!("  --list-examples    Print the built-in example stories and exit");
    println!("  --output <path>    Where to write the slideshow (default: {})", DEFAULT_OUTPUT);
    println!("  --help             Show this message");
    println!();
    println!("With no story on the command line, panelgen reads one from stdin.");
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    logger::init_with_config(LoggerConfig::development())?;

    match dotenv::dotenv() {
        Ok(_) => log::debug!(".env file loaded"),
        Err(_) => log::debug!("No .env file found, using system environment"),
    }

    let args: Vec<String> = env::args().skip(1).collect();
    let mut output = PathBuf::from(DEFAULT_OUTPUT);
    let mut example: Option<usize> = None;
    let mut story_words: Vec<String> = Vec::new();

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                print_usage();
                return Ok(());
            }
            "--list-examples" => {
                for (n, story) in EXAMPLE_STORIES.iter().enumerate() {
                    println!("  {}: {}", n, story);
                }
                return Ok(());
            }
            "--example" => {
                i += 1;
                let n = args
                    .get(i)
                    .and_then(|v| v.parse::<usize>().ok())
                    .ok_or("--example expects a number")?;
                example = Some(n);
            }
            "--output" => {
                i += 1;
                let path = args.get(i).ok_or("--output expects a path")?;
                output = PathBuf::from(path);
            }
            word => story_words.push(word.to_string()),
        }
        i += 1;
    }

    let story = match example {
        Some(n) => EXAMPLE_STORIES
            .get(n)
            .ok_or_else(|| {
                format!(
                    "no example {} (there are {})",
                    n,
                    EXAMPLE_STORIES.len()
                )
            })?
            .to_string(),
        None if !story_words.is_empty() => story_words.join(" "),
        None => prompt_for_story()?,
    };

    if story.trim().is_empty() {
        log::error!("No story provided; nothing to generate");
        print_usage();
        return Err("empty story".into());
    }

    let api_key = match config::load_api_key() {
        Some(key) => {
            log::info!("🔑 Using stored API key");
            key
        }
        None => prompt_for_key()?,
    };

    let gemini_config = GeminiConfig::from_env().with_api_key(api_key);
    log::info!(
        "⚙️  Models: text={}, image={}",
        gemini_config.text_model(),
        gemini_config.image_model()
    );

    let client = GeminiClient::new(gemini_config)?;
    let mut renderer = PanelRenderer::new(client);
    let mut sink = LogSink;

    let report = renderer.generate(&story, &mut sink).await;

    if !report.slides.is_empty() {
        let title = story_title(&story);
        html::write_slideshow(&output, &title, &report.slides)?;
    }

    match report.outcome {
        panelgen::RunOutcome::Done => {
            log::info!("🎉 Comic finished: {} panels", report.slides.len());
            Ok(())
        }
        panelgen::RunOutcome::Failed(e) => {
            log::error!("Run failed: {}", e);
            if !report.slides.is_empty() {
                log::warn!(
                    "⚠️  Kept the {} panel(s) rendered before the failure",
                    report.slides.len()
                );
            }
            Err(Box::new(e) as Box<dyn std::error::Error>)
        }
    }
}

fn prompt_for_story() -> Result<String, io::Error> {
    print!("📖 Enter a story: ");
    io::stdout().flush()?;

    let mut story = String::new();
    io::stdin().read_line(&mut story)?;
    Ok(story.trim().to_string())
}

/// Interactive credential bootstrap: ask for a key, offer to persist it.
fn prompt_for_key() -> Result<String, Box<dyn std::error::Error>> {
    for attempt in 1..=3 {
        print!("🔑 Paste your Gemini API key: ");
        io::stdout().flush()?;

        let mut key = String::new();
        io::stdin().read_line(&mut key)?;
        let key = key.trim().to_string();

        if key.is_empty() {
            log::warn!("Empty key (attempt {}/3)", attempt);
            continue;
        }

        print!("💾 Save this key for future runs? [y/N] ");
        io::stdout().flush()?;
        let mut answer = String::new();
        io::stdin().read_line(&mut answer)?;
        if answer.trim().eq_ignore_ascii_case("y") {
            if let Err(e) = config::save_api_key(&key) {
                log::warn!("Could not save API key: {}", e);
            }
        }

        return Ok(key);
    }

    Err("no API key provided".into())
}

fn story_title(story: &str) -> String {
    let story = story.trim();
    if story.chars().count() <= 60 {
        story.to_string()
    } else {
        let truncated: String = story.chars().take(57).collect();
        format!("{}...", truncated.trim_end())
    }
}
