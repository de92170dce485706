use std::io::Write;

use tabled::Table;

use crate::{
    error,
    formats::{self, base_type},
    fragments::FragmentsClient,
    identity::User,
    info, success, utils, warning,
};

use super::{ContentSource, signed_in_user, spinner};

/// Prints the user's fragments as a table.
///
/// The default listing is best effort and shows an empty table when the
/// service cannot be reached; `strict` reports the failure instead.
pub async fn list(strict: bool) {
    let user = signed_in_user().await;
    let client = FragmentsClient::from_env();

    let pb = spinner("Fetching fragments...");
    let listing = if strict {
        match client.try_list_fragments(&user).await {
            Ok(listing) => listing,
            Err(e) => {
                pb.finish_and_clear();
                error!("Unable to list fragments: {}", e);
            }
        }
    } else {
        client.list_fragments(&user).await
    };
    pb.finish_and_clear();

    if listing.fragments.is_empty() {
        info!("No fragments yet. Create one with fragcli create.");
        return;
    }

    let rows = utils::fragment_table_rows(&listing.fragments);
    println!("{}", Table::new(rows));
    info!("{} fragment(s)", listing.fragments.len());
}

pub async fn create(source: ContentSource, content_type: Option<String>) {
    let user = signed_in_user().await;
    let content_type = content_type.unwrap_or_else(|| match &source {
        ContentSource::File(path) => utils::detect_content_type(path).to_string(),
        ContentSource::Inline(_) => crate::fragments::DEFAULT_CONTENT_TYPE.to_string(),
    });
    let content = read_content(&source, &content_type).await;

    let client = FragmentsClient::from_env();
    let pb = spinner("Creating fragment...");
    let created = client
        .create_fragment(&user, content, Some(content_type.as_str()))
        .await;
    pb.finish_and_clear();

    match created {
        Ok(fragment) => {
            success!("Fragment created: {}", fragment.id);
            info!(
                "Type: {}  Size: {}",
                fragment.content_type,
                utils::format_size(fragment.size)
            );
        }
        Err(e) => error!("Failed to create fragment: {}", e),
    }
}

pub async fn get(id: String) {
    let user = signed_in_user().await;
    let client = FragmentsClient::from_env();

    match client.get_fragment(&user, &id).await {
        Ok(body) => {
            if let Err(e) = write_body(&mut std::io::stdout().lock(), &body) {
                error!("Cannot write fragment {}: {}", id, e);
            }
        }
        Err(e) => error!("Failed to get fragment {}: {}", id, e),
    }
}

/// Replaces a fragment's data.
///
/// The service only accepts the fragment's existing type, so the type is
/// looked up from the listing and an explicit `content_type` must match it.
pub async fn update(id: String, source: ContentSource, content_type: Option<String>) {
    let user = signed_in_user().await;
    let client = FragmentsClient::from_env();

    let existing_type = existing_type(&client, &user, &id).await;
    if let Some(requested) = &content_type {
        if base_type(requested) != base_type(&existing_type) {
            error!(
                "Fragment {} is {}; it cannot be updated with {}.",
                id,
                existing_type,
                requested
            );
        }
    }

    let content = read_content(&source, &existing_type).await;

    let pb = spinner("Updating fragment...");
    let updated = client
        .update_fragment(&user, &id, content, &existing_type)
        .await;
    pb.finish_and_clear();

    match updated {
        Ok(fragment) => success!(
            "Fragment {} updated ({})",
            fragment.id,
            utils::format_size(fragment.size)
        ),
        Err(e) => error!("Failed to update fragment {}: {}", id, e),
    }
}

pub async fn delete(id: String) {
    let user = signed_in_user().await;
    let client = FragmentsClient::from_env();

    match client.delete_fragment(&user, &id).await {
        Ok(_) => success!("Fragment {} deleted", id),
        Err(e) => error!("Failed to delete fragment {}: {}", id, e),
    }
}

/// Writes `body` followed by a newline unless it already ends with one.
fn write_body(out: &mut impl Write, body: &str) -> std::io::Result<()> {
    out.write_all(body.as_bytes())?;
    if !body.ends_with('\n') {
        out.write_all(b"\n")?;
    }
    out.flush()
}

async fn existing_type(client: &FragmentsClient, user: &User, id: &str) -> String {
    let listing = match client.try_list_fragments(user).await {
        Ok(listing) => listing,
        Err(e) => error!("Unable to look up fragment {}: {}", id, e),
    };

    match listing.fragments.into_iter().find(|f| f.id == id) {
        Some(fragment) => fragment.content_type,
        None => error!("Fragment {} not found", id),
    }
}

async fn read_content(source: &ContentSource, content_type: &str) -> Vec<u8> {
    if !formats::is_supported(content_type) {
        warning!(
            "{} is not a known fragment type; the service may reject it.",
            content_type
        );
    }

    let content = match source {
        ContentSource::File(path) => match async_fs::read(path).await {
            Ok(bytes) => bytes,
            Err(e) => error!("Cannot read {}: {}", path.display(), e),
        },
        ContentSource::Inline(text) => text.clone().into_bytes(),
    };

    if let Err(e) = formats::validate_content(content_type, &content) {
        error!("{}", e);
    }

    content
}

#[cfg(test)]
mod tests {
    use std::io;

    use super::*;

    struct ClosedPipe;

    impl Write for ClosedPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::from(io::ErrorKind::BrokenPipe))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn write_body_appends_missing_newline() {
        let mut out = Vec::new();
        write_body(&mut out, "hello").unwrap();
        assert_eq!(out, b"hello\n");

        let mut out = Vec::new();
        write_body(&mut out, "hello\n").unwrap();
        assert_eq!(out, b"hello\n");
    }

    #[test]
    fn write_body_reports_write_errors() {
        let err = write_body(&mut ClosedPipe, "hello").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
    }
}
