//! Interactive prompts for CLI commands
//!
//! Uses dialoguer for terminal-based confirmation of archive upload plans.

use colored::Colorize;
use dialoguer::Confirm;
use docsync_core::UploadPlan;
use docsync_core::sync::Confirm as ConfirmPlans;

/// Prints every upload plan and asks once before anything is sent.
pub struct PromptConfirm;

impl ConfirmPlans for PromptConfirm {
    fn confirm(&self, plans: &[UploadPlan]) -> docsync_core::Result<bool> {
        println!();
        for plan in plans {
            for line in render_plan(plan) {
                println!("{}", line);
            }
            println!();
        }

        Confirm::new()
            .with_prompt("Upload?")
            .default(true)
            .interact()
            .map_err(|e| std::io::Error::other(e.to_string()).into())
    }
}

/// Lines describing one plan.
pub fn render_plan(plan: &UploadPlan) -> Vec<String> {
    let state = if plan.exists_on_server {
        "update".yellow()
    } else {
        "new".green()
    };
    let mut lines = vec![format!(
        "{} {} {} ({})",
        "=>".blue().bold(),
        plan.reference.to_string().bold(),
        plan.path.cyan(),
        state
    )];

    let sections = [
        ("+", "archive", &plan.included),
        ("-", "ignored", &plan.ignored),
        ("=", "synced", &plan.synced),
        ("+", "upload", &plan.add_assets),
        ("x", "delete", &plan.remove_assets),
    ];
    for (marker, label, names) in sections {
        for name in names {
            lines.push(format!("   {} {} {}", marker, format!("{label}:").dimmed(), name));
        }
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use docsync_meta::Reference;
    use std::path::PathBuf;

    fn plan() -> UploadPlan {
        UploadPlan {
            reference: Reference::Template,
            path: "/layout".into(),
            dir: PathBuf::from("template"),
            exists_on_server: false,
            included: vec!["content.html".into(), "settings.json".into()],
            ignored: vec!["notes.txt".into()],
            synced: vec![],
            add_assets: vec!["logo.png".into()],
            remove_assets: vec!["old.png".into()],
        }
    }

    #[test]
    fn plan_lists_every_file_once() {
        let lines = render_plan(&plan());
        assert_eq!(lines.len(), 6);
        assert!(lines[0].contains("/layout"));
        assert!(lines.iter().any(|l| l.contains("notes.txt")));
        assert!(lines.iter().any(|l| l.contains("old.png")));
    }

    #[test]
    fn header_marks_new_documents() {
        let lines = render_plan(&plan());
        assert!(lines[0].contains("new"));
    }
}
