//! ai-audio-cli: speech synthesis and transcription from the command line
//!
//! Usage:
//!   ai-audio-cli speak <text> --out <file> [--voice v] [--model m] [--format f] [--speed s]
//!   ai-audio-cli transcribe <file> [--format f] [--language l] [--model m]
//!   ai-audio-cli translate <file> [--format f] [--model m]

use ai_audio_rust::audio::{
    AudioClient, AudioRequest, AudioResponse, AudioResponseFormat, AudioSource,
    CreateSpeechRequest, SpeechModel, SpeechVoice, WHISPER_1,
};
use ai_audio_rust::ClientConfig;
use anyhow::{anyhow, bail, Context};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        print_usage();
        std::process::exit(1);
    }

    let result = match args[1].as_str() {
        "speak" => cmd_speak(&args[2..]).await,
        "transcribe" => cmd_audio(&args[2..], false).await,
        "translate" => cmd_audio(&args[2..], true).await,
        "version" | "--version" | "-V" => {
            cmd_version();
            Ok(())
        }
        "help" | "--help" | "-h" => {
            print_usage();
            Ok(())
        }
        other => {
            eprintln!("Unknown command: {other}");
            eprintln!();
            print_usage();
            std::process::exit(1);
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

fn print_usage() {
    println!(
        r#"ai-audio-cli: speech synthesis and transcription

USAGE:
    ai-audio-cli <COMMAND> [OPTIONS]

COMMANDS:
    speak <text> --out <file>   Synthesize speech [--voice v] [--model m] [--format f] [--speed s]
    transcribe <file>           Transcribe audio [--format f] [--language l] [--model m]
    translate <file>            Translate audio to English [--format f] [--model m]
    version                     Show version information
    help                        Show this help message

ENVIRONMENT:
    OPENAI_API_KEY              API key (the OS keyring entry ai-audio/openai wins)
    AI_AUDIO_BASE_URL           API base URL
    AI_HTTP_TIMEOUT_SECS        Request timeout
    RUST_LOG                    Log filter (e.g. ai_audio_rust=debug)"#
    );
}

fn cmd_version() {
    println!("ai-audio-cli {}", env!("CARGO_PKG_VERSION"));
}

/// Value following `--name`, if present.
fn flag<'a>(args: &'a [String], name: &str) -> Option<&'a str> {
    args.iter()
        .position(|a| a == name)
        .and_then(|i| args.get(i + 1))
        .map(String::as_str)
}

/// First argument that is neither a flag nor a flag value.
fn positional(args: &[String]) -> Option<&str> {
    let mut skip_next = false;
    for arg in args {
        if skip_next {
            skip_next = false;
            continue;
        }
        if arg.starts_with("--") {
            skip_next = true;
            continue;
        }
        return Some(arg);
    }
    None
}

fn client() -> anyhow::Result<AudioClient> {
    AudioClient::from_config(ClientConfig::from_env()).context("building client")
}

async fn cmd_speak(args: &[String]) -> anyhow::Result<()> {
    let text = positional(args).ok_or_else(|| anyhow!("missing <text>"))?;
    let out = flag(args, "--out").ok_or_else(|| anyhow!("missing --out <file>"))?;

    let mut request = CreateSpeechRequest::new(
        flag(args, "--model").map_or(SpeechModel::Tts1, SpeechModel::from),
        text,
        flag(args, "--voice").map_or(SpeechVoice::Alloy, SpeechVoice::from),
    );
    if let Some(format) = flag(args, "--format") {
        request = request.with_response_format(format);
    }
    if let Some(speed) = flag(args, "--speed") {
        let speed: f64 = speed
            .parse()
            .with_context(|| format!("invalid --speed {speed}"))?;
        request = request.with_speed(speed);
    }

    let audio = client()?.create_speech(&request).await?;
    std::fs::write(out, &audio.body).with_context(|| format!("writing {out}"))?;
    println!("wrote {} bytes to {}", audio.len(), out);
    Ok(())
}

async fn cmd_audio(args: &[String], translate: bool) -> anyhow::Result<()> {
    let file = positional(args).ok_or_else(|| anyhow!("missing <file>"))?;
    let mut request = AudioRequest::new(
        flag(args, "--model").unwrap_or(WHISPER_1),
        AudioSource::path(file),
    );
    if let Some(format) = flag(args, "--format") {
        let Some(format) = AudioResponseFormat::from_str(format) else {
            bail!("unknown --format {format}");
        };
        request = request.with_format(format);
    }
    if let Some(language) = flag(args, "--language") {
        request = request.with_language(language);
    }

    let client = client()?;
    let response = if translate {
        client.create_translation(request).await?
    } else {
        client.create_transcription(request).await?
    };
    print_response(&response);
    Ok(())
}

fn print_response(response: &AudioResponse) {
    if response.segments.is_empty() {
        println!("{}", response.text);
        return;
    }
    for seg in &response.segments {
        let speaker = if seg.speaker.is_empty() {
            String::new()
        } else {
            format!(" [{}]", seg.speaker)
        };
        println!("{:>8.2} {:>8.2}{} {}", seg.start, seg.end, speaker, seg.text.trim());
    }
    for warning in &response.warnings {
        eprintln!("warning: {warning}");
    }
}
