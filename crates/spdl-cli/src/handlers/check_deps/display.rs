//! Display utilities for dependency status output.

use console::style;

use super::{Dependency, DependencyStatus};

/// Print a single dependency row in the status table.
pub fn print_dependency(dep: &Dependency) {
    println!("{}", dependency_row(dep));
}

fn dependency_row(dep: &Dependency) -> String {
    let text = match &dep.status {
        DependencyStatus::Present { version } if version.is_empty() => "✓ installed".to_string(),
        DependencyStatus::Present { version } => format!("✓ v{version}"),
        DependencyStatus::Missing => "✗ missing".to_string(),
    };

    // Pad before styling so escape codes don't break alignment.
    let padded = format!("{text:<25}");
    let status = match dep.status {
        DependencyStatus::Present { .. } => style(padded).green(),
        DependencyStatus::Missing if dep.required => style(padded).red(),
        DependencyStatus::Missing => style(padded.replacen('✗', "○", 1)).yellow(),
    };

    let marker = if dep.required {
        style("*").red().to_string()
    } else {
        " ".to_string()
    };

    format!("{marker}{:<19} {status} {}", dep.name, dep.description)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_present() {
        let dep = Dependency::new("ffmpeg", "Audio conversion", true).with_status(
            DependencyStatus::Present {
                version: "6.1".to_string(),
            },
        );
        let row = dependency_row(&dep);
        assert!(row.contains("ffmpeg"));
        assert!(row.contains("✓ v6.1"));
        assert!(row.contains("Audio conversion"));
    }

    #[test]
    fn test_row_missing_optional() {
        let dep = Dependency::new("ffprobe", "Duration check", false);
        let row = dependency_row(&dep);
        assert!(row.starts_with(' '));
        assert!(row.contains("○ missing"));
    }
}
