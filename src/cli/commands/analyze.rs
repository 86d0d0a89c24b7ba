//! Analyze command - run the media pipeline on one input.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::error::{Result, SanseError};
use crate::job::MediaJob;
use crate::pipeline::MediaPipeline;
use crate::router::{Dispatch, Router};
use std::path::Path;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Analyze a local media file or a remote video link.
pub async fn run_analyze(input: &str, query: &str, settings: Settings) -> Result<()> {
    let router = Router::new();

    // A link can arrive as the input itself or embedded in the query.
    let dispatch = match router.find_remote_url(input) {
        Some(url) => Dispatch::RemoteVideo(url),
        None => router.dispatch(query, Some(input)),
    };

    let operation = match dispatch {
        Dispatch::RemoteVideo(_) => Operation::AnalyzeRemote,
        _ => Operation::AnalyzeUpload,
    };
    preflight::check(operation)?;

    let pipeline = MediaPipeline::new(settings)?;
    let cancel = CancellationToken::new();

    let output = match dispatch {
        Dispatch::RemoteVideo(url) => {
            info!("Analyzing remote video: {}", url);
            let job = MediaJob::remote(url, query);
            run_job(&pipeline, &job, &cancel).await?
        }
        Dispatch::Audio(mode) => {
            let (filename, bytes) = read_attachment(input)?;
            let job = MediaJob::upload(filename, bytes, query).with_mode(mode);
            run_job(&pipeline, &job, &cancel).await?
        }
        Dispatch::Video => {
            let (filename, bytes) = read_attachment(input)?;
            let job = MediaJob::upload(filename, bytes, query);
            run_job(&pipeline, &job, &cancel).await?
        }
        Dispatch::Image => {
            let (filename, bytes) = read_attachment(input)?;
            let spinner = Output::spinner("Describing image...");
            let result = pipeline.describe_image(&filename, &bytes, query).await;
            spinner.finish_and_clear();
            result.map_err(report_user_facing)?
        }
        Dispatch::Document => {
            return Err(SanseError::InvalidInput(
                "Documents are handled by the text pipeline, not media analysis".to_string(),
            ));
        }
        Dispatch::PlainQuery | Dispatch::Unsupported(_) => {
            return Err(SanseError::InvalidInput(format!(
                "Not a supported media input: {}",
                input
            )));
        }
    };

    Output::answer(&output.source_label, &output.text, output.truncated);
    if let Some(category) = output.category {
        Output::kv("category", category.label());
    }

    Ok(())
}

async fn run_job(
    pipeline: &MediaPipeline,
    job: &MediaJob,
    cancel: &CancellationToken,
) -> Result<crate::job::AnalysisOutput> {
    let spinner = Output::spinner("Analyzing media...");
    let result = pipeline.analyze_media(job, cancel).await;
    spinner.finish_and_clear();
    result.map_err(report_user_facing)
}

/// Print the user-facing summary before returning the error for logging.
fn report_user_facing(err: SanseError) -> SanseError {
    Output::error(&err.user_message());
    err
}

fn read_attachment(input: &str) -> Result<(String, Vec<u8>)> {
    let path = Path::new(input);
    if !path.exists() {
        return Err(SanseError::InvalidInput(format!("File not found: {}", input)));
    }

    let filename = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("upload")
        .to_string();
    let bytes = std::fs::read(path)?;

    Ok((filename, bytes))
}
