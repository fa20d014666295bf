// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Home page — drop zone, preview list with drag-to-reorder, and the convert
// trigger.

use std::path::PathBuf;

use dioxus::core::spawn_forever;
use dioxus::html::HasFileData;
use dioxus::prelude::*;

use bildwerk_core::format::format_bytes;
use bildwerk_core::human_errors::Severity;
use bildwerk_core::preview::{DisplayRow, PreviewListSync};
use bildwerk_core::types::ImageFileEntry;

use crate::services::app_services::AppServices;
use crate::state::AppState;

// Background work is spawned on the root scope so that switching tabs does
// not cancel it.

/// Add a batch of paths to the working set and start deriving thumbnails for
/// whatever was accepted.
fn ingest(svc: AppServices, mut state: Signal<AppState>, paths: Vec<PathBuf>) {
    if paths.is_empty() {
        return;
    }
    spawn_forever(async move {
        let batch = svc.ingest_paths(paths).await;
        let added = state.write().absorb(batch);
        derive_thumbnails(&svc, state, added);
    });
}

fn derive_thumbnails(svc: &AppServices, mut state: Signal<AppState>, entries: Vec<ImageFileEntry>) {
    for entry in entries {
        let svc = svc.clone();
        spawn_forever(async move {
            match svc.derive_thumbnail(entry).await {
                Ok(_) => state.write().thumbnails_ready += 1,
                Err(e) => tracing::warn!(error = %e, "thumbnail derivation failed"),
            }
        });
    }
}

#[component]
pub fn Home() -> Element {
    let mut state = use_context::<Signal<AppState>>();
    let svc = use_context::<AppServices>();

    // Pick up thumbnails a previous visit left unfinished.
    use_hook(|| {
        let pending = state.read().pending_thumbnails();
        if !pending.is_empty() {
            tracing::debug!(count = pending.len(), "resuming thumbnails");
            derive_thumbnails(&svc, state, pending);
        }
    });

    let rows = PreviewListSync::render(&state.read().collection);
    let count = rows.len();
    let badge = PreviewListSync::count_badge(count);
    let total_size = format_bytes(state.read().collection.iter().map(|e| e.size_bytes()).sum());
    let saved_message = state.read().last_report.as_ref().map(|report| match report.delivered_to {
        Some(ref path) => format!("Saved {} page(s) to {}", report.pages, path.display()),
        None => "Save cancelled.".to_string(),
    });
    let drag_over = state.read().drag_over;
    let convert_enabled = state.read().orchestrator.trigger_enabled(count);
    let convert_label = state.read().orchestrator.trigger_label();
    let zone_border = if drag_over { "#007aff" } else { "#c7c7cc" };
    let zone_bg = if drag_over { "#e7f3ff" } else { "#fafafa" };

    rsx! {
        div {
            h1 { "Bildwerk" }
            p { style: "color: #666;", "Turn PNG and JPG images into a single PDF" }

            // Drop zone
            div {
                class: if drag_over { "drop-zone drag-over" } else { "drop-zone" },
                style: "margin: 16px 0; padding: 32px 16px; border: 2px dashed {zone_border}; border-radius: 12px; background: {zone_bg}; text-align: center;",
                ondragover: move |evt| {
                    evt.prevent_default();
                    if !state.read().drag_over {
                        state.write().drag_over = true;
                    }
                },
                ondragleave: move |_| {
                    state.write().drag_over = false;
                },
                ondrop: {
                    let svc = svc.clone();
                    move |evt: DragEvent| {
                        evt.prevent_default();
                        state.write().drag_over = false;
                        let paths: Vec<PathBuf> = evt.files().iter().map(|f| f.path()).collect();
                        tracing::info!(count = paths.len(), "files dropped");
                        ingest(svc.clone(), state, paths);
                    }
                },
                p { style: "font-size: 16px; margin: 0 0 12px 0;", "Drop images here" }
                button {
                    style: "padding: 8px 20px; border-radius: 8px; border: 1px solid #007aff; color: #007aff; background: white;",
                    onclick: {
                        let svc = svc.clone();
                        move |_| match svc.pick_images() {
                            Ok(paths) => ingest(svc.clone(), state, paths),
                            Err(e) => tracing::error!(error = %e, "file picker failed"),
                        }
                    },
                    "Browse files"
                }
            }

            // Preview list
            div { style: "display: flex; justify-content: space-between; align-items: center;",
                h2 { "Images {badge}" }
                if count > 0 {
                    button {
                        style: "padding: 4px 12px; border-radius: 4px; border: 1px solid #ccc; background: white; font-size: 12px;",
                        onclick: move |_| state.write().clear(),
                        "Clear all"
                    }
                }
            }

            if rows.is_empty() {
                p { style: "color: #888;", "No images yet." }
            } else {
                p { style: "color: #666; font-size: 14px; margin-bottom: 8px;",
                    "Drag rows to change the page order. Total {total_size}"
                }
                for row in rows {
                    PreviewRow { key: "{row.id}", row: row.clone() }
                }
            }

            // Convert trigger
            button {
                style: "width: 100%; padding: 12px; border-radius: 8px; border: none; background: #007aff; color: white; font-size: 16px; margin-top: 16px;",
                disabled: !convert_enabled,
                onclick: {
                    let svc = svc.clone();
                    move |_| {
                        let Some(job) = state.write().start_conversion() else {
                            return;
                        };
                        let svc = svc.clone();
                        spawn_forever(async move {
                            let result = svc.run_conversion(job).await;
                            state.write().finish_conversion(result);
                        });
                    }
                },
                "{convert_label}"
            }

            if let Some(msg) = saved_message {
                p { style: "color: #155724; font-size: 14px; margin-top: 12px;", "{msg}" }
            }

            NoticeBanner {}
        }
    }
}

#[component]
fn PreviewRow(row: DisplayRow) -> Element {
    let mut state = use_context::<Signal<AppState>>();
    let position = row.position;
    let number = position + 1;
    let remove = row.remove;
    let opacity = if state.read().drag.origin() == Some(position) { "0.5" } else { "1" };

    rsx! {
        div {
            draggable: "true",
            style: "display: flex; align-items: center; gap: 12px; padding: 8px; margin: 6px 0; border: 1px solid #e0e0e0; border-radius: 8px; background: white; cursor: grab; opacity: {opacity};",
            ondragstart: move |_| state.write().drag.begin(position),
            ondragover: move |evt| evt.prevent_default(),
            ondrop: move |evt| {
                evt.prevent_default();
                evt.stop_propagation();
                state.write().drop_on(position);
            },
            ondragend: move |_| state.write().drag.cancel(),

            span { style: "color: #888; width: 24px; text-align: right;", "{number}" }
            if let Some(ref src) = row.thumbnail {
                img { src: "{src}", style: "width: 48px; height: 48px; object-fit: cover; border-radius: 4px;" }
            } else {
                div { style: "width: 48px; height: 48px; border-radius: 4px; background: #f0f0f0;" }
            }
            div { style: "flex: 1; min-width: 0;",
                strong { style: "display: block; overflow: hidden; text-overflow: ellipsis; white-space: nowrap;",
                    "{row.name}"
                }
                span { style: "color: #666; font-size: 12px;", "{row.size_label}" }
            }
            button {
                style: "padding: 4px 10px; border-radius: 4px; border: 1px solid #ff3b30; color: #ff3b30; background: white; font-size: 12px;",
                onclick: move |_| state.write().remove(remove),
                "Remove"
            }
        }
    }
}

/// Shows the pending notice. Blocking notices cover the page until
/// acknowledged; informational ones sit inline.
#[component]
fn NoticeBanner() -> Element {
    let mut state = use_context::<Signal<AppState>>();
    let Some(notice) = state.read().notice.clone() else {
        return rsx! {};
    };

    let dismiss = move |_| state.write().notice = None;

    match notice.severity {
        Severity::Blocking => rsx! {
            div { style: "position: fixed; inset: 0; background: rgba(0,0,0,0.4); display: flex; align-items: center; justify-content: center;",
                div { style: "background: white; border-radius: 12px; padding: 24px; max-width: 360px;",
                    p { style: "font-weight: 600; margin: 0 0 8px 0;", "{notice.message}" }
                    p { style: "color: #666; font-size: 14px;", "{notice.suggestion}" }
                    button {
                        style: "width: 100%; padding: 10px; border-radius: 8px; border: none; background: #007aff; color: white;",
                        onclick: dismiss,
                        "OK"
                    }
                }
            }
        },
        _ => rsx! {
            div { style: "margin-top: 12px; padding: 10px 12px; border-radius: 8px; background: #fff3cd; color: #856404; font-size: 14px; display: flex; justify-content: space-between; gap: 8px;",
                span { "{notice.message} {notice.suggestion}" }
                button {
                    style: "border: none; background: none; color: #856404;",
                    onclick: dismiss,
                    "Dismiss"
                }
            }
        },
    }
}
