//! Display functions for packages, conflicts and reports

use console::Style;

use crate::overlay::{Conflict, RemovalReport, Violation};
use crate::wizard::InstallReport;

/// One line per violation
pub fn format_violation(violation: &Violation) -> String {
    match violation {
        Violation::MissingRealFile { package, real_file } => {
            format!("[{package}] real file missing: {}", real_file.display())
        }
        Violation::MissingLink {
            package,
            virtual_path,
        } => format!("[{package}] link missing: {virtual_path}"),
        Violation::WrongTarget {
            package,
            virtual_path,
            expected,
            actual: Some(actual),
        } => format!(
            "[{package}] {virtual_path} points to {} instead of {}",
            actual.display(),
            expected.display()
        ),
        Violation::WrongTarget {
            package,
            virtual_path,
            expected,
            actual: None,
        } => format!(
            "[{package}] {virtual_path} is not a link to {}",
            expected.display()
        ),
    }
}

/// Package names with their file counts, oldest first
pub fn display_packages(packages: &[(&str, usize)]) {
    if packages.is_empty() {
        println!("No packages installed.");
        return;
    }
    println!("Installed packages ({}):", packages.len());
    println!();
    for (name, files) in packages {
        println!(
            "  {} {}",
            Style::new().bold().yellow().apply_to(name),
            Style::new().dim().apply_to(format!("({files} files)"))
        );
    }
}

pub fn display_conflicts(conflicts: &[Conflict]) {
    if conflicts.is_empty() {
        println!("No conflicting files.");
        return;
    }
    println!("Conflicting files ({}):", conflicts.len());
    for conflict in conflicts {
        println!();
        println!("  {}", Style::new().bold().apply_to(&conflict.virtual_path));
        println!(
            "    {} {} {}",
            Style::new().green().apply_to("owner"),
            Style::new().yellow().apply_to(&conflict.owner.package),
            Style::new().dim().apply_to(conflict.owner.real_file.display())
        );
        for claim in &conflict.shadowed {
            println!(
                "    {} {} {}",
                Style::new().red().apply_to("shadows"),
                claim.package,
                Style::new().dim().apply_to(claim.real_file.display())
            );
        }
    }
}

pub fn display_violations(violations: &[Violation]) {
    if violations.is_empty() {
        println!("{}", Style::new().green().apply_to("Overlay is consistent."));
        return;
    }
    for violation in violations {
        println!("{}", Style::new().red().apply_to(format_violation(violation)));
    }
}

pub fn display_install(package: &str, report: &InstallReport) {
    println!(
        "{} {} {}",
        Style::new().green().bold().apply_to("Installed"),
        Style::new().bold().apply_to(package),
        Style::new().dim().apply_to(format!(
            "({} files, {} step(s) shown)",
            report.written.len(),
            report.steps_shown
        ))
    );
    if !report.flags.is_empty() {
        let flags: Vec<String> = report.flags.iter().map(|(k, v)| format!("{k}={v}")).collect();
        println!("  {} {}", Style::new().dim().apply_to("flags:"), flags.join(" "));
    }
    for source in &report.unmatched {
        println!(
            "  {} {}",
            Style::new().yellow().apply_to("not found in archive:"),
            source
        );
    }
}

pub fn display_removal(report: &RemovalReport) {
    println!(
        "{} {} {}",
        Style::new().green().bold().apply_to("Removed"),
        Style::new().bold().apply_to(&report.package),
        Style::new()
            .dim()
            .apply_to(format!("({} files deleted)", report.deleted_files))
    );
    for path in &report.restored {
        println!("  {} {}", Style::new().cyan().apply_to("restored"), path);
    }
    if !report.kept.is_empty() {
        println!(
            "  {}",
            Style::new()
                .dim()
                .apply_to(format!("{} file(s) still provided by newer packages", report.kept.len()))
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_format_violation() {
        let wrong = Violation::WrongTarget {
            package: "A".into(),
            virtual_path: "x.ini".into(),
            expected: PathBuf::from("/o/A/x.ini"),
            actual: Some(PathBuf::from("/o/B/x.ini")),
        };
        assert_eq!(
            format_violation(&wrong),
            "[A] x.ini points to /o/B/x.ini instead of /o/A/x.ini"
        );

        let missing = Violation::MissingLink {
            package: "A".into(),
            virtual_path: "x.ini".into(),
        };
        assert_eq!(format_violation(&missing), "[A] link missing: x.ini");
    }
}
