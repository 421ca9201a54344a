//! Plain-text rendering of package previews and artifact details.
//!
//! Record fields are rendered through an explicit [`FieldValue`] enumeration so
//! every field kind has one formatting rule. Output is plain text; the detail
//! component styles it when drawing.

use crate::domain::{NoArchKind, Record};
use crate::ui::helpers::group_thousands;
use chrono::{DateTime, Utc};

const LABEL_WIDTH: usize = 20;
const OTHER_VERSION_PREVIEW: usize = 4;
const MIN_BOX_INNER_WIDTH: usize = 30;
const MIN_VALUE_WIDTH: usize = 10;

/// A record field value, tagged with how it is formatted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue<'a> {
    Text(Option<&'a str>),
    List(&'a [String]),
    Number(u64),
    ByteSize(Option<u64>),
    Timestamp(Option<DateTime<Utc>>),
    NoArch(NoArchKind),
}

impl FieldValue<'_> {
    #[must_use]
    pub fn render(&self) -> String {
        match self {
            Self::Text(Some(text)) => (*text).to_string(),
            Self::Text(None) | Self::Timestamp(None) => "not available".to_string(),
            Self::List([]) => "none".to_string(),
            Self::List(items) => items.join(", "),
            Self::Number(value) => value.to_string(),
            Self::ByteSize(value) => format_byte_size(*value),
            Self::Timestamp(Some(at)) => at.to_rfc3339(),
            Self::NoArch(kind) => kind.to_string(),
        }
    }
}

/// Formats a byte count with binary units, keeping the exact count for larger sizes.
///
/// ```
/// use conda_browse::ui::detail::format_byte_size;
///
/// assert_eq!(format_byte_size(Some(512)), "512 B");
/// assert_eq!(format_byte_size(Some(1536)), "1.5 KiB (1,536 bytes)");
/// assert_eq!(format_byte_size(None), "not available");
/// ```
#[must_use]
pub fn format_byte_size(value: Option<u64>) -> String {
    const UNITS: [&str; 6] = ["B", "KiB", "MiB", "GiB", "TiB", "PiB"];

    let Some(value) = value else {
        return "not available".to_string();
    };

    #[allow(clippy::cast_precision_loss)]
    let mut size = value as f64;
    let mut unit = UNITS[0];
    for (index, candidate) in UNITS.iter().enumerate() {
        unit = candidate;
        if size < 1024.0 || index == UNITS.len() - 1 {
            break;
        }
        size /= 1024.0;
    }

    if unit == "B" {
        format!("{} B", group_thousands(value))
    } else {
        format!("{size:.1} {unit} ({} bytes)", group_thousands(value))
    }
}

fn detail_row(label: &str, value: &str) -> String {
    format!("{label:<LABEL_WIDTH$}{value}")
}

/// Greedy word wrap; words longer than `width` are split.
fn wrap(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    let mut line = String::new();

    for word in text.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();
        loop {
            let line_len = line.chars().count();
            let needed = if line.is_empty() { word.len() } else { line_len + 1 + word.len() };
            if needed <= width {
                if !line.is_empty() {
                    line.push(' ');
                }
                line.extend(word.iter());
                break;
            }
            if !line.is_empty() {
                lines.push(std::mem::take(&mut line));
                continue;
            }
            let rest = word.split_off(width);
            lines.push(word.iter().collect());
            word = rest;
        }
    }

    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

/// Draws a bordered two-column box of `rows`, wrapped to `width` columns.
#[must_use]
pub fn render_kv_box(rows: &[(&str, String)], width: usize) -> Vec<String> {
    if rows.is_empty() {
        return Vec::new();
    }

    let label_width = rows.iter().map(|(label, _)| label.chars().count()).max().unwrap_or(0);
    let inner_width = MIN_BOX_INNER_WIDTH.max(width.saturating_sub(2));
    let value_width = MIN_VALUE_WIDTH.max(inner_width.saturating_sub(label_width + 3));

    let mut lines = vec![format!("╭{}╮", "─".repeat(inner_width))];
    for (label, value) in rows {
        let wrapped = wrap(value, value_width);
        let mut wrapped = wrapped.iter().map(String::as_str);
        let first = wrapped.next().unwrap_or("");
        lines.push(format!("│ {label:<label_width$} {first:<value_width$} │"));
        for continuation in wrapped {
            lines.push(format!("│ {:<label_width$} {continuation:<value_width$} │", ""));
        }
    }
    lines.push(format!("╰{}╯", "─".repeat(inner_width)));
    lines
}

fn plural_builds(count: usize) -> String {
    format!("{count} build{}", if count == 1 { "" } else { "s" })
}

fn bullet_list(lines: &mut Vec<String>, items: &[String]) {
    if items.is_empty() {
        lines.push(" - none".to_string());
    } else {
        lines.extend(items.iter().map(|item| format!(" - {item}")));
    }
}

/// Renders the package summary shown in packages mode.
///
/// `records` must be sorted newest first.
#[must_use]
pub fn render_package_preview(package: &str, records: &[Record]) -> String {
    let Some(latest) = records.first() else {
        return format!("# {package}\n\nNo metadata records found.");
    };

    // versions in first-seen order, which is newest first
    let mut versions: Vec<(&str, Vec<&Record>)> = Vec::new();
    for record in records {
        let version = record.version.as_str();
        match versions.iter_mut().find(|(v, _)| *v == version) {
            Some((_, group)) => group.push(record),
            None => versions.push((version, vec![record])),
        }
    }

    let latest_version = latest.version.as_str();
    let latest_extra = versions
        .first()
        .map_or(0, |(_, group)| group.len().saturating_sub(1));
    let latest_extra_text = if latest_extra > 0 {
        format!(" (+ {})", plural_builds(latest_extra))
    } else {
        String::new()
    };

    let artifact_line = format!("{}{latest_extra_text}", latest.file_name);
    let divider = "-".repeat(44.max(artifact_line.chars().count()));

    let mut lines = vec![
        format!("# {package}"),
        String::new(),
        artifact_line,
        divider,
        String::new(),
        detail_row("Name", &latest.name),
        detail_row("Version", latest_version),
        detail_row("Build", &latest.build),
        detail_row("Size", &format_byte_size(latest.size)),
        detail_row("License", latest.license.as_deref().unwrap_or("unknown")),
        detail_row("Subdir", &latest.subdir),
        detail_row("File Name", &latest.file_name),
        detail_row("URL", &latest.url),
        detail_row("MD5", &FieldValue::Text(latest.md5.as_deref()).render()),
        detail_row("SHA256", &FieldValue::Text(latest.sha256.as_deref()).render()),
        String::new(),
        "Dependencies:".to_string(),
    ];
    bullet_list(&mut lines, &latest.depends);

    let others = &versions[1..];
    lines.push(String::new());
    lines.push(format!("Other Versions ({}):", others.len()));
    if !others.is_empty() {
        lines.push("Version    Build".to_string());
        for (version, group) in others.iter().take(OTHER_VERSION_PREVIEW) {
            let extra = group.len().saturating_sub(1);
            let extra_text = if extra > 0 {
                format!("  (+ {})", plural_builds(extra))
            } else {
                String::new()
            };
            lines.push(format!("{version:<10} {}{extra_text}", group[0].build));
        }
        if others.len() > OTHER_VERSION_PREVIEW {
            lines.push(format!("... and {} more", others.len() - OTHER_VERSION_PREVIEW));
        }
    }

    lines.join("\n")
}

/// Renders the full metadata of one artifact, wrapped to `width` columns.
#[must_use]
pub fn render_version_details(package: &str, record: &Record, width: usize) -> String {
    let fields: [(&str, FieldValue<'_>); 21] = [
        ("Name", FieldValue::Text(Some(&record.name))),
        ("Version", FieldValue::Text(Some(record.version.as_str()))),
        ("Build", FieldValue::Text(Some(&record.build))),
        ("Build Number", FieldValue::Number(record.build_number)),
        ("Subdir", FieldValue::Text(Some(&record.subdir))),
        ("File Name", FieldValue::Text(Some(&record.file_name))),
        ("Channel", FieldValue::Text(Some(&record.channel))),
        ("Size", FieldValue::ByteSize(record.size)),
        ("Timestamp", FieldValue::Timestamp(record.timestamp)),
        ("License", FieldValue::Text(record.license.as_deref())),
        ("License Family", FieldValue::Text(record.license_family.as_deref())),
        ("Arch", FieldValue::Text(record.arch.as_deref())),
        ("Platform", FieldValue::Text(record.platform.as_deref())),
        ("NoArch", FieldValue::NoArch(record.noarch)),
        ("Features", FieldValue::Text(record.features.as_deref())),
        ("Track Features", FieldValue::List(&record.track_features)),
        (
            "Python Site-Packages",
            FieldValue::Text(record.python_site_packages_path.as_deref()),
        ),
        ("MD5", FieldValue::Text(record.md5.as_deref())),
        ("SHA256", FieldValue::Text(record.sha256.as_deref())),
        ("Legacy .tar.bz2 MD5", FieldValue::Text(record.legacy_bz2_md5.as_deref())),
        ("Legacy .tar.bz2 Size", FieldValue::ByteSize(record.legacy_bz2_size)),
    ];
    let rows: Vec<(&str, String)> = fields
        .iter()
        .map(|(label, value)| (*label, value.render()))
        .collect();

    let mut lines = vec![
        format!("# {package} {}", record.version),
        String::new(),
        "Repodata metadata:".to_string(),
    ];
    lines.extend(render_kv_box(&rows, width));
    lines.extend([String::new(), "URL:".to_string(), record.url.clone(), String::new()]);
    lines.push("Dependencies:".to_string());
    bullet_list(&mut lines, &record.depends);
    lines.push(String::new());
    lines.push("Constrains:".to_string());
    bullet_list(&mut lines, &record.constrains);
    lines.extend([
        String::new(),
        "Files:".to_string(),
        " - not available in repodata".to_string(),
    ]);

    lines.join("\n")
}

/// Text shown while a subdir section row is highlighted.
#[must_use]
pub fn render_section_hint(package: &str, subdir: &str) -> String {
    format!("# {package}\n\nPlatform section: {subdir}\nPress Enter to collapse or expand.")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PackageVersion;

    fn record(version: &str, build: &str) -> Record {
        Record {
            name: "demo".to_string(),
            version: PackageVersion::new(version),
            build: build.to_string(),
            subdir: "noarch".to_string(),
            file_name: format!("demo-{version}-{build}.conda"),
            url: format!("https://conda.anaconda.org/conda-forge/noarch/demo-{version}-{build}.conda"),
            license: Some("MIT".to_string()),
            depends: vec!["python >=3.9".to_string()],
            ..Record::default()
        }
    }

    #[test]
    fn byte_sizes_use_binary_units() {
        assert_eq!(format_byte_size(Some(0)), "0 B");
        assert_eq!(format_byte_size(Some(1023)), "1,023 B");
        assert_eq!(format_byte_size(Some(5 * 1024 * 1024)), "5.0 MiB (5,242,880 bytes)");
    }

    #[test]
    fn field_values_render_absent_and_empty() {
        assert_eq!(FieldValue::Text(None).render(), "not available");
        assert_eq!(FieldValue::List(&[]).render(), "none");
        assert_eq!(
            FieldValue::List(&["a".to_string(), "b".to_string()]).render(),
            "a, b"
        );
        assert_eq!(FieldValue::NoArch(NoArchKind::Python).render(), "python");
    }

    #[test]
    fn kv_box_wraps_long_values_within_width() {
        let rows = [("Key", "word ".repeat(20))];
        let lines = render_kv_box(&rows, 40);

        assert!(lines.len() > 3);
        let widths: Vec<usize> = lines.iter().map(|line| line.chars().count()).collect();
        assert!(widths.iter().all(|w| *w == widths[0]), "ragged box: {widths:?}");
        assert_eq!(widths[0], 40);
    }

    #[test]
    fn kv_box_has_minimum_width() {
        let lines = render_kv_box(&[("A", "b".to_string())], 5);
        assert_eq!(lines[0].chars().count(), MIN_BOX_INNER_WIDTH + 2);
    }

    #[test]
    fn package_preview_summarizes_latest_and_other_versions() {
        let records = vec![
            record("6.0", "h1_0"),
            record("6.0", "h0_0"),
            record("5.0", "h0_0"),
            record("4.0", "h0_0"),
            record("3.0", "h0_0"),
            record("2.0", "h0_0"),
            record("1.0", "h0_0"),
        ];
        let text = render_package_preview("demo", &records);

        assert!(text.starts_with("# demo\n\ndemo-6.0-h1_0.conda (+ 1 build)"));
        assert!(text.contains("License             MIT"));
        assert!(text.contains(" - python >=3.9"));
        assert!(text.contains("Other Versions (5):"));
        assert!(text.contains("5.0        h0_0"));
        assert!(!text.contains("1.0        h0_0"));
        assert!(text.ends_with("... and 1 more"));
    }

    #[test]
    fn package_preview_without_records() {
        assert_eq!(
            render_package_preview("ghost", &[]),
            "# ghost\n\nNo metadata records found."
        );
    }

    #[test]
    fn version_details_list_sections() {
        let text = render_version_details("demo", &record("1.0", "h0_0"), 60);

        assert!(text.starts_with("# demo 1.0\n\nRepodata metadata:\n╭"));
        assert!(text.contains("│ Build Number"));
        assert!(text.contains("URL:\nhttps://conda.anaconda.org/conda-forge/noarch/demo-1.0-h0_0.conda"));
        assert!(text.contains("Constrains:\n - none"));
        assert!(text.ends_with("Files:\n - not available in repodata"));
    }
}
