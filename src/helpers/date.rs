//! Date helper functions

use chrono::{DateTime, TimeZone};

/// Format a date using a Moment.js-style format string, as Hexo's
/// `date_format` setting does
///
/// # Examples
/// ```ignore
/// format_date(&date, "YYYY-MM-DD") // -> "2024-01-15"
/// ```
pub fn format_date<Tz: TimeZone>(date: &DateTime<Tz>, format: &str) -> String
where
    Tz::Offset: std::fmt::Display,
{
    date.format(&moment_to_chrono_format(format)).to_string()
}

/// Format a date in ISO 8601 / XML format, keeping its offset
pub fn date_xml<Tz: TimeZone>(date: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    date.format("%Y-%m-%dT%H:%M:%S%:z").to_string()
}

/// Convert Moment.js tokens to chrono specifiers.
///
/// Runs of the same letter form one token; `[...]` is copied literally.
fn moment_to_chrono_format(format: &str) -> String {
    let chars: Vec<char> = format.chars().collect();
    let mut out = String::with_capacity(format.len() * 2);
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];

        if c == '[' {
            let end = chars[i + 1..]
                .iter()
                .position(|&c| c == ']')
                .map(|p| i + 1 + p);
            if let Some(end) = end {
                for &lit in &chars[i + 1..end] {
                    push_literal(&mut out, lit);
                }
                i = end + 1;
                continue;
            }
        }

        let run = chars[i..].iter().take_while(|&&x| x == c).count();
        let spec = match (c, run) {
            ('Y', 4) => Some("%Y"),
            ('Y', 2) => Some("%y"),
            ('M', 4) => Some("%B"),
            ('M', 3) => Some("%b"),
            ('M', 2) => Some("%m"),
            ('M', 1) => Some("%-m"),
            ('D', 4) => Some("%j"),
            ('D', 2) => Some("%d"),
            ('D', 1) => Some("%-d"),
            ('d', 4) => Some("%A"),
            ('d', 3) => Some("%a"),
            ('H', 2) => Some("%H"),
            ('H', 1) => Some("%-H"),
            ('h', 2) => Some("%I"),
            ('h', 1) => Some("%-I"),
            ('m', 2) => Some("%M"),
            ('s', 2) => Some("%S"),
            ('S', 3) => Some("%3f"),
            ('A', 1) => Some("%p"),
            ('Z', 2) => Some("%z"),
            ('Z', 1) => Some("%:z"),
            _ => None,
        };

        match spec {
            Some(spec) => out.push_str(spec),
            None => {
                for _ in 0..run {
                    push_literal(&mut out, c);
                }
            }
        }
        i += run;
    }

    out
}

fn push_literal(out: &mut String, c: char) {
    if c == '%' {
        out.push_str("%%");
    } else {
        out.push(c);
    }
}
