use std::path::PathBuf;

use tabled::Table;

use crate::{
    error, formats,
    fragments::{ConvertedArtifact, FragmentsClient},
    info, success,
    types::ConversionTableRow,
    utils,
};

use super::{signed_in_user, spinner};

/// Fetches a fragment converted to `extension`.
///
/// Text is printed unless `output` is given. Binary data is always written
/// to a file, `fragment-<id>.<ext>` by default.
pub async fn convert(id: String, extension: String, output: Option<PathBuf>) {
    let user = signed_in_user().await;
    let client = FragmentsClient::from_env();
    let extension = extension.trim_start_matches('.').to_ascii_lowercase();

    let pb = spinner(&format!("Converting fragment to .{extension}..."));
    let converted = client.convert_fragment(&user, &id, &extension).await;
    pb.finish_and_clear();

    let artifact = match converted {
        Ok(artifact) => artifact,
        Err(e) => error!("Failed to convert fragment {} to .{}: {}", id, extension, e),
    };

    match (&artifact, output) {
        (ConvertedArtifact::Text { content, .. }, None) => println!("{}", content),
        (_, output) => {
            let path =
                output.unwrap_or_else(|| PathBuf::from(utils::download_filename(&id, &extension)));
            if let Err(e) = async_fs::write(&path, artifact.as_bytes()).await {
                error!("Cannot write {}: {}", path.display(), e);
            }
            success!(
                "Saved {} ({}, {})",
                path.display(),
                artifact.mime_type(),
                utils::format_size(artifact.as_bytes().len() as u64)
            );
        }
    }
}

/// Lists supported fragment types, or the conversions for one type.
pub fn formats(content_type: Option<String>) {
    let Some(content_type) = content_type else {
        for (mime, label) in formats::SUPPORTED_TYPES {
            info!("{} ({})", mime, label);
        }
        return;
    };

    let options = formats::conversion_options(&content_type);
    if !formats::has_conversions(&content_type) {
        info!("{} doesn't support conversions.", content_type);
        return;
    }

    let rows: Vec<ConversionTableRow> = options
        .iter()
        .map(|c| ConversionTableRow {
            extension: c.extension.to_string(),
            label: c.label.to_string(),
            mime: c.mime.to_string(),
        })
        .collect();
    println!("{}", Table::new(rows));
}
