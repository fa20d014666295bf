// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Settings page — persistent app configuration.

use std::path::PathBuf;

use dioxus::prelude::*;

use crate::services::app_services::AppServices;
use crate::state::AppState;

#[component]
pub fn Settings() -> Element {
    let mut state = use_context::<Signal<AppState>>();
    let svc = use_context::<AppServices>();
    let mut draft = use_signal(|| state.read().config.clone());
    let mut save_msg = use_signal(|| Option::<String>::None);

    let save_dir = draft
        .read()
        .default_save_dir
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_default();

    rsx! {
        div {
            h1 { "Settings" }

            section { style: "margin: 16px 0;",
                h3 { "Output" }
                TextRow {
                    label: "File name",
                    value: draft.read().output_file_name.clone(),
                    on_change: move |v: String| {
                        let v = v.trim().to_string();
                        if !v.is_empty() {
                            draft.write().output_file_name = v;
                        }
                    },
                }
                TextRow {
                    label: "Document title",
                    value: draft.read().document_title.clone(),
                    on_change: move |v: String| draft.write().document_title = v,
                }
                TextRow {
                    label: "Save folder",
                    value: save_dir,
                    on_change: move |v: String| {
                        let v = v.trim();
                        draft.write().default_save_dir = (!v.is_empty()).then(|| PathBuf::from(v));
                    },
                }
            }

            section { style: "margin: 16px 0;",
                h3 { "Preview" }
                div { style: "display: flex; justify-content: space-between; align-items: center; padding: 12px 0; border-bottom: 1px solid #f0f0f0;",
                    span { "Thumbnail size (px)" }
                    input {
                        r#type: "number",
                        style: "width: 80px; padding: 4px 8px; border: 1px solid #ccc; border-radius: 4px; text-align: right;",
                        value: "{draft.read().thumbnail_edge_px}",
                        onchange: move |evt| {
                            if let Ok(px) = evt.value().parse::<u32>()
                                && (16..=512).contains(&px)
                            {
                                draft.write().thumbnail_edge_px = px;
                            }
                        },
                    }
                }
            }

            // Save button
            button {
                style: "width: 100%; padding: 12px; border-radius: 8px; border: none; background: #007aff; color: white; font-size: 16px; margin-top: 8px;",
                onclick: {
                    let svc = svc.clone();
                    move |_| {
                        let config = draft.read().clone();
                        match svc.save_config(&config) {
                            Ok(()) => {
                                tracing::info!("settings saved");
                                state.write().apply_config(config);
                                save_msg.set(Some("Settings saved.".into()));
                            }
                            Err(e) => {
                                tracing::error!(error = %e, "failed to save settings");
                                save_msg.set(Some(format!("Save failed: {e}")));
                            }
                        }
                    }
                },
                "Save Settings"
            }
            if let Some(ref msg) = *save_msg.read() {
                p { style: "color: #34c759; font-size: 14px; text-align: center; margin-top: 8px;",
                    "{msg}"
                }
            }

            section { style: "margin: 24px 0;",
                h3 { "About" }
                p { style: "color: #666; font-size: 14px;",
                    "Bildwerk v0.1.0"
                    br {}
                    "Data folder: {svc.data_dir().display()}"
                    br {}
                    "PMPL-1.0-or-later"
                }
            }
        }
    }
}

#[component]
fn TextRow(label: &'static str, value: String, on_change: EventHandler<String>) -> Element {
    rsx! {
        div { style: "display: flex; justify-content: space-between; align-items: center; padding: 12px 0; border-bottom: 1px solid #f0f0f0;",
            span { "{label}" }
            input {
                r#type: "text",
                style: "width: 200px; padding: 4px 8px; border: 1px solid #ccc; border-radius: 4px;",
                value: "{value}",
                onchange: move |evt| on_change.call(evt.value()),
            }
        }
    }
}
