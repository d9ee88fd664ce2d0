//! Plain-text rendering of form state for the terminal.

use chrono::Local;
use client_core::QuestionForm;
use shared::domain::{Catalog, History, ResponseCategory, ResponseRecord};

pub fn response_heading(category: ResponseCategory) -> Option<&'static str> {
    match category {
        ResponseCategory::Empty => None,
        ResponseCategory::System => Some("Notice"),
        ResponseCategory::Escalation => Some("Teacher review"),
        ResponseCategory::Ai => Some("Answer"),
    }
}

pub fn format_response(record: &ResponseRecord) -> String {
    let Some(heading) = response_heading(record.category) else {
        return String::new();
    };
    let mut out = format!("== {heading} ==\n{}", record.text);
    if let Some(detail) = &record.detail {
        out.push_str(&format!("\n({detail})"));
    }
    out
}

pub fn format_history(history: &History) -> String {
    if history.is_empty() {
        return "No recent questions.".to_string();
    }
    history
        .entries()
        .iter()
        .enumerate()
        .map(|(idx, entry)| {
            let scope = match (&entry.subject, &entry.chapter) {
                (Some(subject), Some(chapter)) => format!(" [{subject} / {chapter}]"),
                (Some(subject), None) => format!(" [{subject}]"),
                _ => String::new(),
            };
            let when = entry
                .asked_at
                .map(|at| format!(" {}", at.with_timezone(&Local).format("%Y-%m-%d %H:%M")))
                .unwrap_or_default();
            format!(
                "{}.{scope}{when}\n   Q: {}\n   A: {}",
                idx + 1,
                entry.question,
                entry.answer
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn format_catalog(catalog: &Catalog) -> String {
    catalog
        .subjects()
        .map(|subject| {
            let chapters = catalog.chapters(subject).unwrap_or_default().join(", ");
            format!("{subject}: {chapters}")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn format_selection(form: &QuestionForm) -> String {
    format!("{} / {}", form.subject(), form.chapter())
}
