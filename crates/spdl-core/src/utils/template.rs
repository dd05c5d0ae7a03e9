//! Filename templates.
//!
//! Templates use `{placeholder}` fields. Only `track_number` accepts a format
//! spec, a zero-padded width such as `{track_number:02}`. The trailing `d`
//! type suffix (`{track_number:02d}`) is accepted for compatibility with
//! older config files. `{{` and `}}` produce literal braces.

use thiserror::Error;

/// Values substituted into a filename template.
#[derive(Debug, Clone, Copy)]
pub struct FilenameFields<'a> {
    pub artist: &'a str,
    pub title: &'a str,
    pub album: &'a str,
    pub track_number: u32,
}

/// Errors from parsing a filename template.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    #[error("Unknown placeholder '{{{0}}}' (expected artist, title, album or track_number)")]
    UnknownPlaceholder(String),

    #[error("Invalid format spec '{spec}' for '{field}'")]
    InvalidSpec { field: String, spec: String },

    #[error("Unbalanced braces in filename template")]
    Unbalanced,

    #[error("Filename template renders to an empty name")]
    Empty,
}

/// Render `template` with `fields`.
pub fn render_filename(template: &str, fields: &FilenameFields<'_>) -> Result<String, TemplateError> {
    let mut out = String::with_capacity(template.len() + 32);
    let mut chars = template.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '{' if chars.peek() == Some(&'{') => {
                chars.next();
                out.push('{');
            }
            '}' if chars.peek() == Some(&'}') => {
                chars.next();
                out.push('}');
            }
            '}' => return Err(TemplateError::Unbalanced),
            '{' => {
                let mut field = String::new();
                loop {
                    match chars.next() {
                        Some('}') => break,
                        Some('{') | None => return Err(TemplateError::Unbalanced),
                        Some(ch) => field.push(ch),
                    }
                }
                render_field(&field, fields, &mut out)?;
            }
            other => out.push(other),
        }
    }

    if out.trim().is_empty() {
        return Err(TemplateError::Empty);
    }
    Ok(out)
}

/// Check a template against sample values without keeping the output.
pub fn validate_template(template: &str) -> Result<(), TemplateError> {
    let sample = FilenameFields {
        artist: "Artist",
        title: "Title",
        album: "Album",
        track_number: 1,
    };
    render_filename(template, &sample).map(|_| ())
}

fn render_field(
    field: &str,
    fields: &FilenameFields<'_>,
    out: &mut String,
) -> Result<(), TemplateError> {
    let (name, spec) = match field.split_once(':') {
        Some((name, spec)) => (name.trim(), Some(spec.trim())),
        None => (field.trim(), None),
    };

    let text = match name {
        "artist" => fields.artist,
        "title" => fields.title,
        "album" => fields.album,
        "track_number" => {
            let width = match spec {
                Some(spec) => parse_width(spec).ok_or_else(|| TemplateError::InvalidSpec {
                    field: name.to_string(),
                    spec: spec.to_string(),
                })?,
                None => 0,
            };
            out.push_str(&format!("{:0width$}", fields.track_number));
            return Ok(());
        }
        other => return Err(TemplateError::UnknownPlaceholder(other.to_string())),
    };

    if let Some(spec) = spec {
        return Err(TemplateError::InvalidSpec {
            field: name.to_string(),
            spec: spec.to_string(),
        });
    }
    out.push_str(text);
    Ok(())
}

/// Widest zero padding accepted for `track_number`; `u32::MAX` has 10 digits.
const MAX_PAD_WIDTH: usize = 10;

fn parse_width(spec: &str) -> Option<usize> {
    let digits = spec.strip_suffix('d').unwrap_or(spec);
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok().filter(|width| *width <= MAX_PAD_WIDTH)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields() -> FilenameFields<'static> {
        FilenameFields {
            artist: "Radiohead",
            title: "Airbag",
            album: "OK Computer",
            track_number: 1,
        }
    }

    #[test]
    fn test_default_template() {
        let name = render_filename("{track_number:02} - {artist} - {title}", &fields()).unwrap();
        assert_eq!(name, "01 - Radiohead - Airbag");
    }

    #[test]
    fn test_legacy_d_suffix() {
        let name = render_filename("{track_number:02d}. {title}", &fields()).unwrap();
        assert_eq!(name, "01. Airbag");
    }

    #[test]
    fn test_unpadded_and_wide_numbers() {
        let mut f = fields();
        f.track_number = 12;
        assert_eq!(render_filename("{track_number}", &f).unwrap(), "12");
        assert_eq!(render_filename("{track_number:03}", &f).unwrap(), "012");
    }

    #[test]
    fn test_escaped_braces() {
        let name = render_filename("{{{album}}}", &fields()).unwrap();
        assert_eq!(name, "{OK Computer}");
    }

    #[test]
    fn test_unknown_placeholder() {
        assert_eq!(
            render_filename("{year} - {title}", &fields()),
            Err(TemplateError::UnknownPlaceholder("year".to_string()))
        );
    }

    #[test]
    fn test_spec_on_text_field_rejected() {
        assert!(matches!(
            render_filename("{artist:10}", &fields()),
            Err(TemplateError::InvalidSpec { .. })
        ));
        assert!(matches!(
            render_filename("{track_number:x}", &fields()),
            Err(TemplateError::InvalidSpec { .. })
        ));
    }

    #[test]
    fn test_pad_width_is_capped() {
        assert_eq!(
            render_filename("{track_number:10}", &fields()).unwrap(),
            "0000000001"
        );
        assert_eq!(
            render_filename("{track_number:11}", &fields()),
            Err(TemplateError::InvalidSpec {
                field: "track_number".to_string(),
                spec: "11".to_string(),
            })
        );
        assert!(matches!(
            validate_template("{track_number:4000000000}"),
            Err(TemplateError::InvalidSpec { .. })
        ));
        assert!(matches!(
            render_filename("{track_number:99999999999999999999999}", &fields()),
            Err(TemplateError::InvalidSpec { .. })
        ));
    }

    #[test]
    fn test_unbalanced() {
        assert_eq!(
            render_filename("{artist", &fields()),
            Err(TemplateError::Unbalanced)
        );
        assert_eq!(
            render_filename("artist}", &fields()),
            Err(TemplateError::Unbalanced)
        );
    }

    #[test]
    fn test_validate_template() {
        assert!(validate_template("{artist} - {title}").is_ok());
        assert!(validate_template("   ").is_err());
    }
}
