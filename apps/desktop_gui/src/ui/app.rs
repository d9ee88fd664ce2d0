use crossbeam_channel::{Receiver, Sender};
use eframe::egui;
use storage::HistoryStore;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::UiEvent;
use crate::controller::orchestration::dispatch_backend_command;
use crate::controller::reducer::{Effects, FormAction, FormController, HistoryEffect};
use crate::ui::theme::{response_style, server_environment_label};
use client_core::QuestionForm;

pub struct CurioNestApp {
    controller: FormController,
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
    history_store: Option<HistoryStore>,
    server_url: String,

    // Mirrors the form's draft so the text box has a buffer to edit.
    draft: String,
    status: Option<String>,
}

impl CurioNestApp {
    pub fn new(
        form: QuestionForm,
        cmd_tx: Sender<BackendCommand>,
        ui_rx: Receiver<UiEvent>,
        history_store: Option<HistoryStore>,
        server_url: String,
    ) -> Self {
        Self {
            controller: FormController::new(form),
            cmd_tx,
            ui_rx,
            history_store,
            server_url,
            draft: String::new(),
            status: None,
        }
    }

    fn process_ui_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            let effects = self.controller.apply(event);
            self.apply_effects(effects);
        }
    }

    fn run(&mut self, action: FormAction) {
        let effects = self.controller.dispatch(action);
        self.apply_effects(effects);
    }

    fn apply_effects(&mut self, effects: Effects) {
        if let Some(status) = effects.status {
            self.status = Some(status);
        }

        match effects.history {
            HistoryEffect::Unchanged => {}
            HistoryEffect::Save => {
                if let Some(store) = self.history_store.as_mut() {
                    if let Err(err) = store.save(self.controller.form().history()) {
                        tracing::warn!("failed to persist history: {err:#}");
                        self.status = Some(format!("Could not save history: {err}"));
                    }
                }
            }
            HistoryEffect::Remove => {
                if let Some(store) = self.history_store.as_mut() {
                    if let Err(err) = store.clear() {
                        tracing::warn!("failed to remove persisted history: {err:#}");
                        self.status = Some(format!("Could not remove saved history: {err}"));
                    }
                }
            }
        }

        if let Some(pending) = effects.request {
            if let Err((_, reason)) =
                dispatch_backend_command(&self.cmd_tx, BackendCommand::AskQuestion { pending })
            {
                self.status = Some(reason);
                let effects = self.controller.abandon_in_flight();
                self.apply_effects(effects);
            }
        }
    }

    fn show_selectors(&mut self, ui: &mut egui::Ui) {
        let form = self.controller.form();
        let busy = form.is_busy();
        let subjects: Vec<String> = form.catalog().subjects().map(str::to_string).collect();
        let chapters = form.chapters().to_vec();
        let mut subject = form.subject().to_string();
        let mut chapter = form.chapter().to_string();

        ui.add_enabled_ui(!busy, |ui| {
            egui::Grid::new("selectors")
                .num_columns(2)
                .spacing([12.0, 8.0])
                .show(ui, |ui| {
                    ui.label("Subject:");
                    egui::ComboBox::from_id_salt("subject")
                        .selected_text(subject.clone())
                        .width(220.0)
                        .show_ui(ui, |ui| {
                            for name in &subjects {
                                ui.selectable_value(&mut subject, name.clone(), name.as_str());
                            }
                        });
                    ui.end_row();

                    ui.label("Chapter:");
                    egui::ComboBox::from_id_salt("chapter")
                        .selected_text(chapter.clone())
                        .width(220.0)
                        .show_ui(ui, |ui| {
                            for name in &chapters {
                                ui.selectable_value(&mut chapter, name.clone(), name.as_str());
                            }
                        });
                    ui.end_row();
                });
        });

        if subject != self.controller.form().subject() {
            self.run(FormAction::SelectSubject(subject));
        } else if chapter != self.controller.form().chapter() {
            self.run(FormAction::SelectChapter(chapter));
        }
    }

    fn show_composer(&mut self, ui: &mut egui::Ui) {
        let busy = self.controller.form().is_busy();
        self.draft.clear();
        self.draft.push_str(self.controller.form().question());

        let edit = ui.add_enabled(
            !busy,
            egui::TextEdit::multiline(&mut self.draft)
                .hint_text("Enter question")
                .desired_rows(4)
                .desired_width(f32::INFINITY),
        );
        if edit.changed() {
            self.run(FormAction::EditQuestion(self.draft.clone()));
        }

        ui.horizontal(|ui| {
            let label = if busy { "Asking..." } else { "Ask" };
            let can_submit = self.controller.form().can_submit();
            if ui
                .add_enabled(can_submit, egui::Button::new(label))
                .clicked()
            {
                self.run(FormAction::Submit);
            }
            if busy {
                ui.spinner();
            }
        });
    }

    fn show_response(&mut self, ui: &mut egui::Ui) {
        let response = self.controller.form().response();
        let Some(style) = response_style(response.category) else {
            return;
        };

        ui.add_space(12.0);
        egui::Frame::group(ui.style())
            .fill(style.fill)
            .stroke(egui::Stroke::new(1.5, style.stroke))
            .show(ui, |ui| {
                ui.set_width(ui.available_width());
                ui.label(
                    egui::RichText::new(style.heading)
                        .strong()
                        .size(16.0)
                        .color(style.stroke),
                );
                ui.label(egui::RichText::new(&response.text).color(style.text));
                if let Some(detail) = &response.detail {
                    ui.label(egui::RichText::new(detail).italics().color(style.text));
                }
            });
    }

    fn show_history(&mut self, ui: &mut egui::Ui) {
        let form = self.controller.form();
        if form.history().is_empty() {
            return;
        }
        let busy = form.is_busy();
        let entries = form.history().entries().to_vec();

        ui.add_space(16.0);
        ui.horizontal(|ui| {
            ui.heading("Recent questions");
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui
                    .add_enabled(!busy, egui::Button::new("Clear history"))
                    .clicked()
                {
                    self.run(FormAction::ClearHistory);
                }
            });
        });

        let mut recall = None;
        ui.add_enabled_ui(!busy, |ui| {
            for (idx, entry) in entries.iter().enumerate() {
                let scope = match (&entry.subject, &entry.chapter) {
                    (Some(subject), Some(chapter)) => format!("{subject} / {chapter}"),
                    _ => String::new(),
                };
                let clicked = ui
                    .add(
                        egui::Button::new(
                            egui::RichText::new(format!("Q: {}", entry.question)).strong(),
                        )
                        .frame(false),
                    )
                    .on_hover_text("Load this question into the form")
                    .clicked();
                if clicked {
                    recall = Some(idx);
                }
                if !scope.is_empty() {
                    ui.small(scope);
                }
                ui.label(format!("A: {}", entry.answer));
                ui.separator();
            }
        });
        if let Some(idx) = recall {
            self.run(FormAction::Recall(idx));
        }
    }
}

impl eframe::App for CurioNestApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events();

        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.small(format!(
                    "{} service: {}",
                    server_environment_label(&self.server_url),
                    self.server_url
                ));
                if let Some(status) = &self.status {
                    ui.separator();
                    ui.colored_label(egui::Color32::from_rgb(0xf8, 0x71, 0x71), status.as_str());
                }
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.heading("CurioNest");
                ui.add_space(8.0);
                self.show_selectors(ui);
                ui.add_space(8.0);
                self.show_composer(ui);
                self.show_response(ui);
                self.show_history(ui);
            });
        });
    }
}
