use std::io::{BufRead, Write};

use thiserror::Error;
use tracing::warn;
use url::Url;

pub const SERVICE_DOMAIN: &str = "gofundme.com";

#[derive(Debug, Error)]
pub enum CampaignError {
    #[error("`{input}` is not a gofundme.com address (host: {host})")]
    ForeignDomain { input: String, host: String },

    #[error("`{0}` does not name a campaign")]
    MissingSlug(String),

    #[error("could not parse `{input}`: {reason}")]
    Unparseable { input: String, reason: String },

    #[error("input closed before a valid campaign was entered")]
    InputClosed,

    #[error("gave up after {0} invalid campaign identifiers")]
    TooManyAttempts(usize),

    #[error("terminal I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Extracts the campaign slug from a full or partial campaign URL.
///
/// `https://www.gofundme.com/f/help-the-shelter`, `gofundme.com/f/help-the-shelter`
/// and `www.gofundme.com/help-the-shelter` all resolve to `help-the-shelter`.
/// A scheme-less input is parsed as if it were `https://`, so the slug is
/// always the first path segment after the optional `f/` prefix.
pub fn resolve_slug(input: &str) -> Result<String, CampaignError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(CampaignError::MissingSlug(trimmed.to_string()));
    }

    let candidate = if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("https://{trimmed}")
    };

    let parsed = Url::parse(&candidate).map_err(|err| CampaignError::Unparseable {
        input: trimmed.to_string(),
        reason: err.to_string(),
    })?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(CampaignError::Unparseable {
            input: trimmed.to_string(),
            reason: format!("unsupported scheme `{}`", parsed.scheme()),
        });
    }

    let host = parsed.host_str().unwrap_or_default().to_ascii_lowercase();
    let on_service = host == SERVICE_DOMAIN || host.ends_with(&format!(".{SERVICE_DOMAIN}"));
    if !on_service {
        return Err(CampaignError::ForeignDomain {
            input: trimmed.to_string(),
            host,
        });
    }

    let mut segments = parsed
        .path_segments()
        .into_iter()
        .flatten()
        .filter(|segment| !segment.is_empty());

    let slug = match segments.next() {
        Some("f") => segments.next(),
        other => other,
    };

    slug.map(str::to_string)
        .ok_or_else(|| CampaignError::MissingSlug(trimmed.to_string()))
}

/// Asks for a campaign URL until one resolves.
///
/// Stops on end of input, or once `max_attempts` identifiers have been
/// rejected when a bound is given.
pub fn prompt_for_slug<R: BufRead, W: Write>(
    reader: &mut R,
    writer: &mut W,
    max_attempts: Option<usize>,
) -> Result<String, CampaignError> {
    let mut rejected = 0usize;

    loop {
        write!(writer, "Campaign URL: ")?;
        writer.flush()?;

        let mut line = String::new();
        if reader.read_line(&mut line)? == 0 {
            return Err(CampaignError::InputClosed);
        }

        match resolve_slug(&line) {
            Ok(slug) => return Ok(slug),
            Err(err) => {
                warn!(input = %line.trim(), error = %err, "rejected campaign identifier");
                writeln!(writer, "{err}")?;
                rejected += 1;
                if max_attempts.is_some_and(|max| rejected >= max) {
                    return Err(CampaignError::TooManyAttempts(rejected));
                }
            }
        }
    }
}

/// Uses `initial` when it resolves, otherwise falls back to prompting.
pub fn resolve_or_prompt<R: BufRead, W: Write>(
    initial: Option<&str>,
    reader: &mut R,
    writer: &mut W,
    max_attempts: Option<usize>,
) -> Result<String, CampaignError> {
    if let Some(input) = initial {
        match resolve_slug(input) {
            Ok(slug) => return Ok(slug),
            Err(err) => {
                warn!(input = %input, error = %err, "rejected campaign identifier");
                writeln!(writer, "{err}")?;
            }
        }
    }

    prompt_for_slug(reader, writer, max_attempts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn resolves_full_url_with_scheme() {
        let slug = resolve_slug("https://www.gofundme.com/f/help-the-shelter").unwrap();
        assert_eq!(slug, "help-the-shelter");
    }

    #[test]
    fn resolves_partial_url_without_scheme() {
        assert_eq!(
            resolve_slug("gofundme.com/f/help-the-shelter").unwrap(),
            "help-the-shelter"
        );
        assert_eq!(
            resolve_slug("www.gofundme.com/help-the-shelter").unwrap(),
            "help-the-shelter"
        );
    }

    #[test]
    fn ignores_query_fragment_and_trailing_slash() {
        let slug =
            resolve_slug("  https://www.gofundme.com/f/help-the-shelter/?utm_source=x#share \n")
                .unwrap();
        assert_eq!(slug, "help-the-shelter");
    }

    #[test]
    fn rejects_other_domains() {
        let err = resolve_slug("https://example.com/f/help-the-shelter").unwrap_err();
        assert!(matches!(err, CampaignError::ForeignDomain { .. }));

        let err = resolve_slug("notgofundme.com/f/x").unwrap_err();
        assert!(matches!(err, CampaignError::ForeignDomain { .. }));
    }

    #[test]
    fn rejects_missing_slug() {
        assert!(matches!(
            resolve_slug("https://www.gofundme.com/f/"),
            Err(CampaignError::MissingSlug(_))
        ));
        assert!(matches!(resolve_slug("   "), Err(CampaignError::MissingSlug(_))));
    }

    #[test]
    fn prompt_repeats_until_valid() {
        let mut input = Cursor::new("example.com/f/nope\n\ngofundme.com/f/ok-campaign\n");
        let mut output = Vec::new();

        let slug = prompt_for_slug(&mut input, &mut output, None).unwrap();
        assert_eq!(slug, "ok-campaign");

        let transcript = String::from_utf8(output).unwrap();
        assert_eq!(transcript.matches("Campaign URL: ").count(), 3);
        assert!(transcript.contains("is not a gofundme.com address"));
    }

    #[test]
    fn prompt_stops_at_end_of_input() {
        let mut input = Cursor::new("example.com/f/nope\n");
        let mut output = Vec::new();

        let err = prompt_for_slug(&mut input, &mut output, None).unwrap_err();
        assert!(matches!(err, CampaignError::InputClosed));
    }

    #[test]
    fn prompt_respects_attempt_bound() {
        let mut input = Cursor::new("a.com/x\nb.com/y\ngofundme.com/f/late\n");
        let mut output = Vec::new();

        let err = prompt_for_slug(&mut input, &mut output, Some(2)).unwrap_err();
        assert!(matches!(err, CampaignError::TooManyAttempts(2)));
    }

    #[test]
    fn valid_argument_skips_prompt() {
        let mut input = Cursor::new("");
        let mut output = Vec::new();

        let slug = resolve_or_prompt(
            Some("https://gofundme.com/f/direct"),
            &mut input,
            &mut output,
            None,
        )
        .unwrap();
        assert_eq!(slug, "direct");
        assert!(output.is_empty());
    }

    #[test]
    fn invalid_argument_falls_back_to_prompt() {
        let mut input = Cursor::new("gofundme.com/f/second-try\n");
        let mut output = Vec::new();

        let slug =
            resolve_or_prompt(Some("example.org/f/x"), &mut input, &mut output, None).unwrap();
        assert_eq!(slug, "second-try");
    }
}
