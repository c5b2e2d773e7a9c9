//! Render-ready snapshot handed to the presentation layer

use crate::config::AssemblerConfig;
use crate::finalize::FinalizeButton;
use crate::geometry::{Layout, Position};
use crate::model::{BuildData, Origin};
use crate::modifications::rotation_of;
use crate::reorder::ReorderEngine;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DropzoneView {
    /// Drops are ignored while previews load
    pub disabled: bool,
    /// Loading slot while busy, placeholder slot otherwise
    pub content: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AreaView {
    /// Outer height of the page strip
    pub height: f64,
    pub padding: f64,
    /// Height thumbnails are scaled to
    pub inner_height: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageView {
    pub origin: Origin,
    pub uri: String,
    /// 1-based page number in the output
    pub number: usize,
    pub width: f64,
    pub height: f64,
    pub position: Position,
    pub dragging: bool,
    pub last_dragged: bool,
    pub disappeared: bool,
    /// Clockwise rotation in degrees requested for this page
    pub rotation: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssemblerView {
    pub dropzone: DropzoneView,
    pub heading: Option<String>,
    pub area: AreaView,
    /// Scrollable width of the page strip
    pub content_width: f64,
    pub pages: Vec<PageView>,
    pub finalize: FinalizeButton,
}

pub(crate) fn build_view(
    config: &AssemblerConfig,
    data: &BuildData,
    layout: &Layout,
    reorder: &ReorderEngine,
    busy: bool,
    finalize: FinalizeButton,
) -> AssemblerView {
    let slots = &config.slots;
    let dropzone = DropzoneView {
        disabled: busy,
        content: if busy {
            slots.loading.clone()
        } else {
            slots.dropzone_placeholder.clone()
        },
    };

    let pages = data
        .pages
        .iter()
        .enumerate()
        .map(|(index, page)| {
            let size = layout.dimensions.get(index).copied().unwrap_or_default();
            PageView {
                origin: page.origin,
                uri: data
                    .preview(page.origin)
                    .map(|preview| preview.uri.clone())
                    .unwrap_or_default(),
                number: index + 1,
                width: size.width,
                height: size.height,
                position: page.position,
                dragging: reorder.dragging() == Some(index),
                last_dragged: reorder.last_dropped() == Some(index),
                disappeared: page.disappeared,
                rotation: rotation_of(&page.modifications).to_degrees(),
            }
        })
        .collect();

    AssemblerView {
        dropzone,
        heading: slots.uploaded_pages_heading.clone(),
        area: AreaView {
            height: config.preview_area_height,
            padding: config.preview_area_padding,
            inner_height: config.inner_area_height(),
        },
        content_width: layout.content_width,
        pages,
        finalize,
    }
}
