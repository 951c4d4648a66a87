// this file builds the searchable stop/gym and quest lists shown next to the map

use std::collections::HashMap;

use clap::ValueEnum;

use crate::core::bounds::{LatLng, Viewport};
use crate::core::catalog::{build_gym_catalog, build_stop_catalog, CatalogContext};
use crate::core::data::PointOfInterest;
use crate::core::json::JsonSnapshot;

/// zoom level a double-clicked row recenters the map at
pub const FOCUS_ZOOM: u8 = 17;

/// which of the two finder lists to build
#[derive(PartialEq, Eq, Hash, Copy, Clone, ValueEnum, Debug)]
pub enum ListKind {
    /// every stop and gym whose name matches
    StopsGyms,
    /// stops with a quest whose name or quest text matches
    Quests,
}

impl ListKind {
    /// id of the page element each list is written into
    pub fn default_container(&self) -> &'static str {
        match self {
            ListKind::StopsGyms => "findStopsGyms",
            ListKind::Quests => "findQuests",
        }
    }
}

/// the circle drawn around a row's point while the pointer is over it
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HighlightStyle {
    pub stroke_color: &'static str,
    pub stroke_opacity: f64,
    pub stroke_weight: u32,
    pub fill_color: &'static str,
    pub fill_opacity: f64,
    pub radius: f64,
}

pub const HIGHLIGHT: HighlightStyle = HighlightStyle {
    stroke_color: "#FF8000",
    stroke_opacity: 1.0,
    stroke_weight: 5,
    fill_color: "#000000",
    fill_opacity: 0.0,
    radius: 70.0,
};

/// the parts of the map widget the list rows drive
pub trait MapWidget {
    type Overlay;

    fn draw_circle(&mut self, center: LatLng, style: &HighlightStyle) -> Self::Overlay;
    fn remove_overlay(&mut self, overlay: Self::Overlay);
    fn recenter(&mut self, center: LatLng, zoom: u8);
}

/// a page element whose content can be swapped for a markup string
pub trait Container {
    fn replace_inner(&mut self, id: &str, markup: String);
}

/// in-memory stand-in for the page, keyed by element id
#[derive(Default, Debug)]
pub struct Document {
    elements: HashMap<String, String>,
}

impl Document {
    pub fn inner(&self, id: &str) -> Option<&str> {
        self.elements.get(id).map(String::as_str)
    }
}

impl Container for Document {
    fn replace_inner(&mut self, id: &str, markup: String) {
        self.elements.insert(id.to_owned(), markup);
    }
}

/// owns the single highlight overlay the rows draw and remove
pub struct HighlightSession<W: MapWidget> {
    widget: W,
    current: Option<W::Overlay>,
}

impl<W: MapWidget> HighlightSession<W> {
    pub fn new(widget: W) -> Self {
        Self {
            widget,
            current: None,
        }
    }

    /// pointer entered a row: replaces any circle still on the map
    pub fn hover_start(&mut self, center: LatLng) {
        self.release();
        self.current = Some(self.widget.draw_circle(center, &HIGHLIGHT));
    }

    /// pointer left a row
    pub fn hover_end(&mut self) {
        self.release();
    }

    pub fn double_click(&mut self, center: LatLng) {
        self.widget.recenter(center, FOCUS_ZOOM);
    }

    pub fn is_highlighting(&self) -> bool {
        self.current.is_some()
    }

    pub fn widget(&self) -> &W {
        &self.widget
    }

    pub fn into_inner(mut self) -> W {
        self.release();
        self.widget
    }

    fn release(&mut self) {
        if let Some(overlay) = self.current.take() {
            self.widget.remove_overlay(overlay);
        }
    }
}

#[derive(Clone, Debug)]
pub struct ListRequest {
    pub kind: ListKind,
    pub filter: String,
    pub container_id: String,
}

impl ListRequest {
    pub fn new(kind: ListKind, filter: impl Into<String>) -> Self {
        Self {
            kind,
            filter: filter.into(),
            container_id: kind.default_container().to_owned(),
        }
    }
}

/// the points a list shows: filtered on text, sorted by kind and name, clipped to the viewport
pub fn list_points<V: Viewport + ?Sized>(
    snapshot: &JsonSnapshot,
    ctx: &CatalogContext<'_>,
    kind: ListKind,
    filter: &str,
    viewport: &V,
) -> Vec<PointOfInterest> {
    let filter = filter.to_lowercase();
    let mut points: Vec<PointOfInterest> = match kind {
        ListKind::StopsGyms => {
            let mut points = build_stop_catalog(snapshot);
            points.extend(build_gym_catalog(snapshot, ctx));
            points.retain(|point| matches(&point.name, &filter));
            points
        }
        ListKind::Quests => {
            let mut points = build_stop_catalog(snapshot);
            points.retain(|point| match &point.quest_text {
                Some(quest) => matches(quest, &filter) || matches(&point.name, &filter),
                None => false,
            });
            points
        }
    };
    let matched = points.len();

    points.sort_by_cached_key(PointOfInterest::sort_key);
    points.retain(|point| {
        viewport.contains(LatLng {
            lat: point.latitude,
            lng: point.longitude,
        })
    });

    tracing::debug!(?kind, matched, visible = points.len(), "filtered finder list");
    points
}

/// builds the list and writes it into the request's container, returning the number of rows
pub fn render_list<V, C>(
    snapshot: &JsonSnapshot,
    ctx: &CatalogContext<'_>,
    request: &ListRequest,
    viewport: &V,
    container: &mut C,
) -> usize
where
    V: Viewport + ?Sized,
    C: Container + ?Sized,
{
    let points = list_points(snapshot, ctx, request.kind, &request.filter, viewport);
    container.replace_inner(&request.container_id, render_markup(&points));
    points.len()
}

pub fn render_markup(points: &[PointOfInterest]) -> String {
    let mut markup = String::from("<table><tr><th>Name</th></tr>");
    for point in points {
        render_row(&mut markup, point);
    }
    markup.push_str("</table>");
    markup
}

fn render_row(out: &mut String, point: &PointOfInterest) {
    let (lat, lng) = (point.latitude, point.longitude);
    out.push_str(&format!(
        "<tr onmouseover=\"fp_draw_circle({lat}, {lng})\" onmouseout=\"fp_remove_circle()\" \
         ondblclick=\"centerMap({lat}, {lng}, {zoom})\"><td>\
         <img src=\"static/images/{icon}\" class=\"stopgym-image\" />{name}",
        zoom = FOCUS_ZOOM,
        icon = escape_html(&point.icon.to_string()),
        name = escape_html(&point.name),
    ));
    if let Some(quest) = &point.quest_text {
        let lines: Vec<String> = quest.lines().map(escape_html).collect();
        out.push_str(&format!(
            "<div class=\"quest-text\">{}</div>",
            lines.join("<br>")
        ));
    }
    out.push_str("</td></tr>");
}

fn matches(text: &str, lowercase_filter: &str) -> bool {
    text.to_lowercase().contains(lowercase_filter)
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
