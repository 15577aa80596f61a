//! Command templates — rendering a script's commands against job data.
//!
//! Templates use `{placeholder}` fields; `{{` and `}}` produce literal
//! braces. Two placeholders exist:
//!
//! | Placeholder | Value |
//! |-------------|-------|
//! | `file` | name of the completed job file (empty when unknown) |
//! | `elapsed_time` | job duration, e.g. `1h 2min` or `1d 1h 0min` (`?` when unknown) |
//!
//! A field may carry a conversion and a format spec, `{name!conv:spec}`.
//! Both values are text, so the accepted subset is the one that applies to
//! strings:
//!
//! - conversion `s` (as is), `r` (quoted) or `a` (quoted, non-ASCII escaped)
//! - spec `[[fill]align][0][width][.precision][s]` with align `<`, `>` or `^`
//!
//! `{elapsed_time:>12}` right-aligns the duration in 12 columns and
//! `{file:.20}` keeps the first 20 characters of the file name.
//!
//! Rendering never panics: unknown placeholders, unsupported specs and
//! unbalanced braces come back as a [`FormatError`].

use serde_json::Value;

use crate::error::FormatError;
use crate::lifecycle::JobPayload;

const SECONDS_PER_DAY: u64 = 86_400;
const SECONDS_PER_HOUR: u64 = 3_600;
const SECONDS_PER_MINUTE: u64 = 60;

/// Rendered when the elapsed time is missing or unusable.
pub const UNKNOWN_ELAPSED_TIME: &str = "?";

/// Values available to command templates for one job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholders<'a> {
    pub file: &'a str,
    pub elapsed_time: String,
}

impl<'a> Placeholders<'a> {
    #[must_use]
    pub fn from_job(job: &'a JobPayload) -> Self {
        Self {
            file: job.name.as_deref().unwrap_or_default(),
            elapsed_time: elapsed_seconds(job.time.as_ref())
                .map_or_else(|| UNKNOWN_ELAPSED_TIME.to_owned(), format_elapsed_time),
        }
    }

    fn lookup(&self, key: &str) -> Option<&str> {
        match key {
            "file" => Some(self.file),
            "elapsed_time" => Some(&self.elapsed_time),
            _ => None,
        }
    }
}

/// Interpret a host-reported job duration as whole seconds.
///
/// Integers are taken as-is, finite non-negative floats are truncated and
/// strings must parse as an unsigned integer. Everything else is `None`.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn elapsed_seconds(value: Option<&Value>) -> Option<u64> {
    match value? {
        Value::Number(number) => number.as_u64().or_else(|| {
            number
                .as_f64()
                .filter(|secs| secs.is_finite() && *secs >= 0.0)
                .map(|secs| secs.trunc() as u64)
        }),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}

/// Render a duration as `{h}h {m}min`, or `{d}d {h}h {m}min` past one day.
/// Leftover seconds are dropped.
#[must_use]
pub fn format_elapsed_time(secs: u64) -> String {
    let days = secs / SECONDS_PER_DAY;
    let hours = secs % SECONDS_PER_DAY / SECONDS_PER_HOUR;
    let minutes = secs % SECONDS_PER_HOUR / SECONDS_PER_MINUTE;

    if days > 0 {
        format!("{days}d {hours}h {minutes}min")
    } else {
        format!("{hours}h {minutes}min")
    }
}

/// Substitute placeholders in a single template.
///
/// # Errors
///
/// Returns [`FormatError::UnknownPlaceholder`] for a field other than
/// `file` / `elapsed_time`, [`FormatError::UnclosedBrace`] when a `{` is
/// never closed and [`FormatError::UnmatchedClosingBrace`] for a lone `}`.
pub fn render(template: &str, placeholders: &Placeholders<'_>) -> Result<String, FormatError> {
    let mut out = String::with_capacity(template.len());
    let mut chars = template.char_indices().peekable();

    while let Some((pos, ch)) = chars.next() {
        match ch {
            '{' => {
                if chars.next_if(|&(_, next)| next == '{').is_some() {
                    out.push('{');
                    continue;
                }
                let end = chars
                    .by_ref()
                    .find(|&(_, next)| next == '}')
                    .map(|(end, _)| end)
                    .ok_or(FormatError::UnclosedBrace(pos))?;
                out.push_str(&render_field(&template[pos + 1..end], placeholders)?);
            }
            '}' => {
                if chars.next_if(|&(_, next)| next == '}').is_none() {
                    return Err(FormatError::UnmatchedClosingBrace(pos));
                }
                out.push('}');
            }
            _ => out.push(ch),
        }
    }

    Ok(out)
}

/// Render one `name[!conversion][:spec]` field.
fn render_field(field: &str, placeholders: &Placeholders<'_>) -> Result<String, FormatError> {
    let (head, spec) = field.split_once(':').unwrap_or((field, ""));
    let (key, conversion) = match head.split_once('!') {
        Some((key, conversion)) => (key, Some(conversion)),
        None => (head, None),
    };
    let value = placeholders
        .lookup(key)
        .ok_or_else(|| FormatError::UnknownPlaceholder(key.to_owned()))?;
    let value = match conversion {
        None | Some("s") => value.to_owned(),
        Some("r") => quote(value, false),
        Some("a") => quote(value, true),
        Some(other) => return Err(FormatError::InvalidConversion(other.to_owned())),
    };
    apply_spec(value, spec)
}

fn apply_spec(value: String, spec: &str) -> Result<String, FormatError> {
    if spec.is_empty() {
        return Ok(value);
    }
    let invalid = || FormatError::InvalidFormatSpec(spec.to_owned());
    let is_align = |ch: char| matches!(ch, '<' | '>' | '^' | '=');

    let mut chars = spec.chars().peekable();
    let mut fill = ' ';
    let mut align = None;
    let mut lookahead = spec.chars();
    match (lookahead.next(), lookahead.next()) {
        (Some(f), Some(a)) if is_align(a) => {
            fill = f;
            align = Some(a);
            chars.nth(1);
        }
        (Some(a), _) if is_align(a) => {
            align = Some(a);
            chars.next();
        }
        _ => {}
    }
    // `=` pads after a numeric sign and is meaningless for text
    if align == Some('=') {
        return Err(invalid());
    }
    if chars.next_if_eq(&'0').is_some() && align.is_none() {
        fill = '0';
    }
    let width = take_number(&mut chars).map_err(|()| invalid())?;
    let precision = if chars.next_if_eq(&'.').is_some() {
        Some(take_number(&mut chars).map_err(|()| invalid())?.ok_or_else(invalid)?)
    } else {
        None
    };
    chars.next_if_eq(&'s');
    if chars.next().is_some() {
        return Err(invalid());
    }

    let text: String = match precision {
        Some(precision) => value.chars().take(precision).collect(),
        None => value,
    };
    let len = text.chars().count();
    let Some(pad) = width.and_then(|width| width.checked_sub(len)).filter(|pad| *pad > 0) else {
        return Ok(text);
    };
    let (left, right) = match align {
        Some('>') => (pad, 0),
        Some('^') => (pad / 2, pad - pad / 2),
        _ => (0, pad),
    };
    let fill = fill.to_string();
    Ok(format!("{}{text}{}", fill.repeat(left), fill.repeat(right)))
}

/// Read a run of ASCII digits; `Ok(None)` when there are none.
fn take_number(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> Result<Option<usize>, ()> {
    let mut digits = String::new();
    while let Some(digit) = chars.next_if(char::is_ascii_digit) {
        digits.push(digit);
    }
    if digits.is_empty() {
        return Ok(None);
    }
    digits.parse().map(Some).map_err(|_| ())
}

/// Quote `value` the way a `!r` / `!a` conversion shows text.
fn quote(value: &str, ascii_only: bool) -> String {
    let delimiter = if value.contains('\'') && !value.contains('"') {
        '"'
    } else {
        '\''
    };
    let mut out = String::with_capacity(value.len() + 2);
    out.push(delimiter);
    for ch in value.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            ch if ch == delimiter => {
                out.push('\\');
                out.push(ch);
            }
            ch if ch.is_control() || (ascii_only && !ch.is_ascii()) => {
                let code = u32::from(ch);
                let escaped = if code <= 0xff {
                    format!("\\x{code:02x}")
                } else if code <= 0xffff {
                    format!("\\u{code:04x}")
                } else {
                    format!("\\U{code:08x}")
                };
                out.push_str(&escaped);
            }
            ch => out.push(ch),
        }
    }
    out.push(delimiter);
    out
}

/// Render every command of a script for `job`, trimming the results and
/// dropping the ones that end up empty.
///
/// # Errors
///
/// Returns the first [`FormatError`]; no partial result is produced.
pub fn format_commands(commands: &[String], job: &JobPayload) -> Result<Vec<String>, FormatError> {
    let placeholders = Placeholders::from_job(job);
    let mut rendered = Vec::with_capacity(commands.len());

    for command in commands {
        let line = render(command, &placeholders)?;
        let line = line.trim();
        if !line.is_empty() {
            rendered.push(line.to_owned());
        }
    }

    Ok(rendered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn job(name: &str, time: Value) -> JobPayload {
        JobPayload {
            name: Some(name.to_string()),
            time: Some(time),
        }
    }

    #[test]
    fn should_format_hours_and_minutes() {
        assert_eq!(format_elapsed_time(3725), "1h 2min");
    }

    #[test]
    fn should_format_days_when_longer_than_one_day() {
        assert_eq!(format_elapsed_time(90_000), "1d 1h 0min");
    }

    #[test]
    fn should_format_zero_and_minutes_only() {
        assert_eq!(format_elapsed_time(0), "0h 0min");
        assert_eq!(format_elapsed_time(300), "0h 5min");
        assert_eq!(format_elapsed_time(59), "0h 0min");
    }

    #[test]
    fn should_read_elapsed_seconds_from_supported_shapes() {
        assert_eq!(elapsed_seconds(Some(&json!(3725))), Some(3725));
        assert_eq!(elapsed_seconds(Some(&json!(3725.9))), Some(3725));
        assert_eq!(elapsed_seconds(Some(&json!(" 42 "))), Some(42));
    }

    #[test]
    fn should_reject_unusable_elapsed_seconds() {
        assert_eq!(elapsed_seconds(None), None);
        assert_eq!(elapsed_seconds(Some(&Value::Null)), None);
        assert_eq!(elapsed_seconds(Some(&json!(-5))), None);
        assert_eq!(elapsed_seconds(Some(&json!("12.5"))), None);
        assert_eq!(elapsed_seconds(Some(&json!("soon"))), None);
        assert_eq!(elapsed_seconds(Some(&json!(true))), None);
        assert_eq!(elapsed_seconds(Some(&json!([1]))), None);
    }

    #[test]
    fn should_default_placeholders_when_job_data_missing() {
        let payload = JobPayload::default();
        let placeholders = Placeholders::from_job(&payload);
        assert_eq!(placeholders.file, "");
        assert_eq!(placeholders.elapsed_time, UNKNOWN_ELAPSED_TIME);
    }

    #[test]
    fn should_substitute_known_placeholders() {
        let payload = job("benchy.gcode", json!(3725));
        let placeholders = Placeholders::from_job(&payload);
        let line = render("M117 {file} done in {elapsed_time}", &placeholders).unwrap();
        assert_eq!(line, "M117 benchy.gcode done in 1h 2min");
    }

    #[test]
    fn should_unescape_doubled_braces() {
        let payload = JobPayload::default();
        let placeholders = Placeholders::from_job(&payload);
        assert_eq!(render("{{literal}}", &placeholders).unwrap(), "{literal}");
    }

    #[test]
    fn should_fail_on_unknown_placeholder() {
        let payload = JobPayload::default();
        let placeholders = Placeholders::from_job(&payload);
        assert_eq!(
            render("M117 {layer}", &placeholders),
            Err(FormatError::UnknownPlaceholder("layer".to_string()))
        );
    }

    #[test]
    fn should_fail_on_unbalanced_braces() {
        let payload = JobPayload::default();
        let placeholders = Placeholders::from_job(&payload);
        assert_eq!(
            render("M117 {file", &placeholders),
            Err(FormatError::UnclosedBrace(5))
        );
        assert_eq!(
            render("M117 }", &placeholders),
            Err(FormatError::UnmatchedClosingBrace(5))
        );
    }

    #[test]
    fn should_apply_text_format_specs() {
        let payload = job("benchy.gcode", json!(3725));
        let placeholders = Placeholders::from_job(&payload);
        let render = |template: &str| render(template, &placeholders).unwrap();

        assert_eq!(render("[{elapsed_time:>10}]"), "[   1h 2min]");
        assert_eq!(render("[{elapsed_time:<10}]"), "[1h 2min   ]");
        assert_eq!(render("[{elapsed_time:^10}]"), "[ 1h 2min  ]");
        assert_eq!(render("[{elapsed_time:*^11s}]"), "[**1h 2min**]");
        assert_eq!(render("[{elapsed_time:010}]"), "[1h 2min000]");
        assert_eq!(render("{file:.6}"), "benchy");
        assert_eq!(render("{file:3}"), "benchy.gcode");
    }

    #[test]
    fn should_apply_conversions() {
        let payload = job("it's.gcode", json!(60));
        let placeholders = Placeholders::from_job(&payload);
        assert_eq!(render("{file!s}", &placeholders).unwrap(), "it's.gcode");
        assert_eq!(render("{file!r}", &placeholders).unwrap(), "\"it's.gcode\"");
        assert_eq!(
            render("{elapsed_time!r:>12}", &placeholders).unwrap(),
            "   '0h 1min'"
        );

        let payload = job("pièce.gcode", json!(60));
        let placeholders = Placeholders::from_job(&payload);
        assert_eq!(render("{file!a}", &placeholders).unwrap(), "'pi\\xe8ce.gcode'");
    }

    #[test]
    fn should_reject_specs_that_do_not_apply_to_text() {
        let payload = job("a.gcode", json!(10));
        let placeholders = Placeholders::from_job(&payload);
        for spec in ["+", "d", "=5", ",", "#", ".", "5.2f", "<<<"] {
            let template = format!("{{file:{spec}}}");
            assert_eq!(
                render(&template, &placeholders),
                Err(FormatError::InvalidFormatSpec(spec.to_string())),
                "{template} should be rejected"
            );
        }
        assert_eq!(
            render("{file!x}", &placeholders),
            Err(FormatError::InvalidConversion("x".to_string()))
        );
    }

    #[test]
    fn should_trim_and_drop_empty_rendered_commands() {
        let payload = JobPayload {
            name: None,
            time: None,
        };
        let commands = vec![
            "  M104 S0  ".to_string(),
            "{file}".to_string(),
            "M117 {elapsed_time}".to_string(),
        ];
        let rendered = format_commands(&commands, &payload).unwrap();
        assert_eq!(rendered, vec!["M104 S0", "M117 ?"]);
        assert_eq!(commands[0], "  M104 S0  ");
    }

    #[test]
    fn should_abort_whole_script_on_first_format_error() {
        let commands = vec!["M104 S0".to_string(), "M117 {nope}".to_string()];
        let result = format_commands(&commands, &job("a.gcode", json!(10)));
        assert!(matches!(result, Err(FormatError::UnknownPlaceholder(key)) if key == "nope"));
    }
}
