//! Colours and headings for the response panel.

use eframe::egui::Color32;
use shared::domain::ResponseCategory;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResponseStyle {
    pub heading: &'static str,
    pub fill: Color32,
    pub stroke: Color32,
    pub text: Color32,
}

pub fn response_style(category: ResponseCategory) -> Option<ResponseStyle> {
    match category {
        ResponseCategory::Empty => None,
        ResponseCategory::Ai => Some(ResponseStyle {
            heading: "Answer",
            fill: Color32::from_rgb(0x1f, 0x2a, 0x37),
            stroke: Color32::from_rgb(0x3b, 0x82, 0xf6),
            text: Color32::from_rgb(0xe5, 0xe7, 0xeb),
        }),
        ResponseCategory::System => Some(ResponseStyle {
            heading: "Notice",
            fill: Color32::from_rgb(0x2b, 0x2b, 0x2b),
            stroke: Color32::from_rgb(0x9c, 0xa3, 0xaf),
            text: Color32::from_rgb(0xd1, 0xd5, 0xdb),
        }),
        ResponseCategory::Escalation => Some(ResponseStyle {
            heading: "Sent for teacher review",
            fill: Color32::from_rgb(0x3b, 0x2a, 0x12),
            stroke: Color32::from_rgb(0xf5, 0x9e, 0x0b),
            text: Color32::from_rgb(0xfd, 0xe6, 0x8a),
        }),
    }
}

pub fn server_environment_label(server_url: &str) -> &'static str {
    let server = server_url.to_ascii_lowercase();
    if server.contains("127.0.0.1") || server.contains("localhost") {
        "Local"
    } else if server.contains("staging") {
        "Staging"
    } else if server.contains("dev") {
        "Development"
    } else {
        "Production"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escalation_is_styled_apart_from_answers() {
        let escalation = response_style(ResponseCategory::Escalation).expect("style");
        let answer = response_style(ResponseCategory::Ai).expect("style");
        assert_ne!(escalation.stroke, answer.stroke);
        assert_ne!(escalation.heading, answer.heading);
        assert!(response_style(ResponseCategory::Empty).is_none());
    }

    #[test]
    fn labels_default_local_service() {
        assert_eq!(server_environment_label("http://127.0.0.1:5000"), "Local");
        assert_eq!(
            server_environment_label("https://api.curionest.example"),
            "Production"
        );
    }
}
